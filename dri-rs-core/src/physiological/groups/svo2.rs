use core::fmt;

use super::{Group, GroupHeader};
use crate::codec::{ByteReader, ReadError};

bitflags::bitflags! {
    pub struct SvO2Status: u16 {
        const CALIBRATED_OVER_24H_AGO = 1 << 2;
        const FAULTY_CABLE = 1 << 3;
        const NO_CABLE = 1 << 4;
        const NOT_CALIBRATED = 1 << 5;
        const RECALIBRATED = 1 << 6;
        const OUT_OF_RANGE = 1 << 7;
        const CHECK_CATHETER_POSITION = 1 << 8;
        const INTENSITY_SHIFT = 1 << 9;
    }
}

/// What the saturation value of an [`SvO2Group`] measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaturationType {
    So2,
    SaO2,
    SvO2,
    Unknown(u16),
}

impl From<u16> for SaturationType {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::So2,
            1 => Self::SaO2,
            2 => Self::SvO2,
            v => Self::Unknown(v),
        }
    }
}

impl fmt::Display for SaturationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaturationType::So2 => write!(f, "SO2"),
            SaturationType::SaO2 => write!(f, "SaO2"),
            SaturationType::SvO2 => write!(f, "SvO2"),
            SaturationType::Unknown(v) => write!(f, "Unknown type {v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SvO2Group {
    pub header: GroupHeader,
    pub svo2: i16,
}

impl SvO2Group {
    pub fn value(&self) -> f64 {
        self.svo2 as f64
    }

    pub fn saturation_type(&self) -> SaturationType {
        SaturationType::from(self.header.label)
    }

    pub fn status(&self) -> SvO2Status {
        SvO2Status::from_bits_truncate(self.header.status)
    }
}

impl Group for SvO2Group {
    const SIZE: usize = GroupHeader::SIZE + 2;
    const NAME: &'static str = "SvO2";

    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(Self {
            header: GroupHeader::read(reader)?,
            svo2: reader.read_i16()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physiological::groups::test_util::group_bytes;

    #[test]
    fn label_and_status() {
        let data = group_bytes(Some((0x0210, 2)), &[72]);
        let group = SvO2Group::parse(&data).unwrap();

        assert_eq!(group.value(), 72.0);
        assert_eq!(group.saturation_type(), SaturationType::SvO2);
        assert_eq!(
            group.status(),
            SvO2Status::NO_CABLE | SvO2Status::INTENSITY_SHIFT
        );
        assert_eq!(SaturationType::from(9).to_string(), "Unknown type 9");
    }
}
