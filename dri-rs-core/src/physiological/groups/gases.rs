use core::fmt;

use super::{scaled, Group, GroupHeader};
use crate::codec::{ByteReader, ReadError};

bitflags::bitflags! {
    /// Status bits shared by the N2O and anesthesia agent groups.
    pub struct GasStatus: u16 {
        const CALIBRATING = 1 << 2;
        const MEASUREMENT_OFF = 1 << 3;
    }
}

/// Expired and inspired O2 concentration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct O2Group {
    pub header: GroupHeader,
    /// 1/100 %.
    pub et: i16,
    /// 1/100 %.
    pub fi: i16,
}

impl O2Group {
    /// Expiratory concentration in %.
    pub fn et_percent(&self) -> f64 {
        scaled(self.et, 100.0)
    }

    /// Inspiratory concentration in %.
    pub fn fi_percent(&self) -> f64 {
        scaled(self.fi, 100.0)
    }
}

impl Group for O2Group {
    const SIZE: usize = GroupHeader::SIZE + 4;
    const NAME: &'static str = "O2";

    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(Self {
            header: GroupHeader::read(reader)?,
            et: reader.read_i16()?,
            fi: reader.read_i16()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct N2OGroup {
    pub header: GroupHeader,
    /// 1/100 %.
    pub et: i16,
    /// 1/100 %.
    pub fi: i16,
}

impl N2OGroup {
    pub fn et_percent(&self) -> f64 {
        scaled(self.et, 100.0)
    }

    pub fn fi_percent(&self) -> f64 {
        scaled(self.fi, 100.0)
    }

    pub fn status(&self) -> GasStatus {
        GasStatus::from_bits_truncate(self.header.status)
    }

    pub fn is_calibrating(&self) -> bool {
        self.status().contains(GasStatus::CALIBRATING)
    }

    pub fn is_measurement_off(&self) -> bool {
        self.status().contains(GasStatus::MEASUREMENT_OFF)
    }
}

impl Group for N2OGroup {
    const SIZE: usize = GroupHeader::SIZE + 4;
    const NAME: &'static str = "N2O";

    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(Self {
            header: GroupHeader::read(reader)?,
            et: reader.read_i16()?,
            fi: reader.read_i16()?,
        })
    }
}

/// The agent named by the label of an [`AnesthesiaAgentGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentLabel {
    Unknown,
    None,
    Halothane,
    Enflurane,
    Isoflurane,
    Desflurane,
    Sevoflurane,
    Other(u16),
}

impl AgentLabel {
    pub fn value(&self) -> u16 {
        match self {
            AgentLabel::Unknown => 0,
            AgentLabel::None => 1,
            AgentLabel::Halothane => 2,
            AgentLabel::Enflurane => 3,
            AgentLabel::Isoflurane => 4,
            AgentLabel::Desflurane => 5,
            AgentLabel::Sevoflurane => 6,
            AgentLabel::Other(v) => *v,
        }
    }
}

impl From<u16> for AgentLabel {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::Unknown,
            1 => Self::None,
            2 => Self::Halothane,
            3 => Self::Enflurane,
            4 => Self::Isoflurane,
            5 => Self::Desflurane,
            6 => Self::Sevoflurane,
            v => Self::Other(v),
        }
    }
}

impl fmt::Display for AgentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentLabel::Unknown => write!(f, "Unknown"),
            AgentLabel::None => write!(f, "NONE"),
            AgentLabel::Halothane => write!(f, "HAL"),
            AgentLabel::Enflurane => write!(f, "ENF"),
            AgentLabel::Isoflurane => write!(f, "ISO"),
            AgentLabel::Desflurane => write!(f, "DES"),
            AgentLabel::Sevoflurane => write!(f, "SEV"),
            AgentLabel::Other(v) => write!(f, "Unknown Agent {v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnesthesiaAgentGroup {
    pub header: GroupHeader,
    /// 1/100 %.
    pub et: i16,
    /// 1/100 %.
    pub fi: i16,
    /// Total minimum alveolar concentration, 1/100.
    pub mac_sum: i16,
}

impl AnesthesiaAgentGroup {
    pub fn et_percent(&self) -> f64 {
        scaled(self.et, 100.0)
    }

    pub fn fi_percent(&self) -> f64 {
        scaled(self.fi, 100.0)
    }

    pub fn mac_sum(&self) -> f64 {
        scaled(self.mac_sum, 100.0)
    }

    pub fn agent(&self) -> AgentLabel {
        AgentLabel::from(self.header.label)
    }

    pub fn status(&self) -> GasStatus {
        GasStatus::from_bits_truncate(self.header.status)
    }

    pub fn is_calibrating(&self) -> bool {
        self.status().contains(GasStatus::CALIBRATING)
    }

    pub fn is_measurement_off(&self) -> bool {
        self.status().contains(GasStatus::MEASUREMENT_OFF)
    }
}

impl Group for AnesthesiaAgentGroup {
    const SIZE: usize = GroupHeader::SIZE + 6;
    const NAME: &'static str = "Anesthesia Agent";

    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(Self {
            header: GroupHeader::read(reader)?,
            et: reader.read_i16()?,
            fi: reader.read_i16()?,
            mac_sum: reader.read_i16()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{physiological::groups::test_util::group_bytes, DecodeError};

    #[test]
    fn o2() {
        let group = O2Group::parse(&group_bytes(Some((0, 0)), &[1650, 5000])).unwrap();
        assert_eq!(group.et_percent(), 16.5);
        assert_eq!(group.fi_percent(), 50.0);
    }

    #[test]
    fn n2o_status() {
        let group = N2OGroup::parse(&group_bytes(Some((0x0008, 0)), &[0, 0])).unwrap();
        assert!(!group.is_calibrating());
        assert!(group.is_measurement_off());

        assert_eq!(
            N2OGroup::parse(&[0; 7]),
            Err(DecodeError::NotEnoughData {
                needed: 8,
                available: 7
            })
        );
    }

    #[test]
    fn anesthesia_agent() {
        let data = group_bytes(Some((0x0004, 6)), &[210, 250, 105]);
        let group = AnesthesiaAgentGroup::parse(&data).unwrap();

        assert_eq!(group.agent(), AgentLabel::Sevoflurane);
        assert_eq!(group.agent().to_string(), "SEV");
        assert_eq!(group.et_percent(), 2.1);
        assert_eq!(group.fi_percent(), 2.5);
        assert_eq!(group.mac_sum(), 1.05);
        assert!(group.is_calibrating());
        assert!(!group.is_measurement_off());

        assert_eq!(AgentLabel::from(42).to_string(), "Unknown Agent 42");
        assert_eq!(AgentLabel::from(0).to_string(), "Unknown");
    }
}
