use crate::{
    codec::{ByteReader, ByteWriter},
    DecodeError, Timestamp,
};

/// Times of the latest intermittent measurements and the patient's body
/// surface area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxPhysiologicalInfo {
    pub nibp_time: Timestamp,
    pub reserved1: i16,
    /// Cardiac output.
    pub co_time: Timestamp,
    pub pcwp_time: Timestamp,
    /// Body surface area in 1/100 m².
    pub pat_bsa: i16,
    pub reserved: [u8; 98],
}

impl Default for AuxPhysiologicalInfo {
    fn default() -> Self {
        Self {
            nibp_time: Timestamp::UNKNOWN,
            reserved1: 0,
            co_time: Timestamp::UNKNOWN,
            pcwp_time: Timestamp::UNKNOWN,
            pat_bsa: 0,
            reserved: [0; 98],
        }
    }
}

impl AuxPhysiologicalInfo {
    pub const SIZE: usize = 114;

    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < Self::SIZE {
            return Err(DecodeError::not_enough_data(Self::SIZE, data.len()));
        }

        let mut reader = ByteReader::new(data);

        Ok(Self {
            nibp_time: reader.read_u32()?.into(),
            reserved1: reader.read_i16()?,
            co_time: reader.read_u32()?.into(),
            pcwp_time: reader.read_u32()?.into(),
            pat_bsa: reader.read_i16()?,
            reserved: reader.read_array()?,
        })
    }

    pub fn write(&self, writer: &mut ByteWriter) {
        writer
            .write_u32(self.nibp_time.value())
            .write_i16(self.reserved1)
            .write_u32(self.co_time.value())
            .write_u32(self.pcwp_time.value())
            .write_i16(self.pat_bsa)
            .write_bytes(&self.reserved);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(Self::SIZE);
        self.write(&mut writer);
        writer.into_inner()
    }

    /// Body surface area in m².
    pub fn body_surface_area(&self) -> f64 {
        self.pat_bsa as f64 / 100.0
    }

    pub fn set_body_surface_area(&mut self, square_meters: f64) {
        self.pat_bsa = (square_meters * 100.0).round() as i16;
    }

    /// Whether at least one measurement time is known.
    pub fn is_valid(&self) -> bool {
        self.nibp_time.is_known() || self.co_time.is_known() || self.pcwp_time.is_known()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_encode() {
        let mut info = AuxPhysiologicalInfo {
            co_time: Timestamp::from(1_600_000_000),
            ..Default::default()
        };
        info.set_body_surface_area(1.85);
        info.reserved[97] = 0x5A;

        let bytes = info.to_bytes();
        assert_eq!(bytes.len(), AuxPhysiologicalInfo::SIZE);
        assert_eq!(&bytes[14..16], &185i16.to_le_bytes());

        let parsed = AuxPhysiologicalInfo::parse(&bytes).unwrap();
        assert_eq!(parsed, info);
        assert_eq!(parsed.body_surface_area(), 1.85);
        assert!(!parsed.nibp_time.is_known());
        assert!(parsed.is_valid());
    }

    #[test]
    fn all_times_unknown() {
        let info = AuxPhysiologicalInfo::default();
        assert!(!info.is_valid());

        assert_eq!(
            AuxPhysiologicalInfo::parse(&info.to_bytes()[..113]),
            Err(DecodeError::NotEnoughData {
                needed: 114,
                available: 113
            })
        );
    }
}
