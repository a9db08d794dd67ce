use core::fmt;

use super::{scaled, Group, GroupHeader};
use crate::codec::{ByteReader, ReadError};

bitflags::bitflags! {
    pub struct CoWedgeLabel: u16 {
        const CO_OVER_60S_OLD = 1 << 0;
        const PCWP_OVER_60S_OLD = 1 << 1;
    }
}

/// Cardiac output measuring mode, label bits 2-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoMode {
    None,
    Bolus,
    Continuous,
    Reserved,
    Unknown(u8),
}

impl From<u8> for CoMode {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Bolus,
            2 => Self::Continuous,
            3 => Self::Reserved,
            v => Self::Unknown(v),
        }
    }
}

impl fmt::Display for CoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoMode::None => write!(f, "No mode"),
            CoMode::Bolus => write!(f, "Bolus mode"),
            CoMode::Continuous => write!(f, "Continuous mode"),
            CoMode::Reserved => write!(f, "Reserved"),
            CoMode::Unknown(v) => write!(f, "Unknown mode ({v})"),
        }
    }
}

/// Cardiac output and wedge pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoWedgeGroup {
    pub header: GroupHeader,
    /// ml/min.
    pub co: i16,
    /// 1/100 °C.
    pub blood_temp: i16,
    /// Right heart ejection fraction, 1/100 %.
    pub ref_: i16,
    /// 1/100 mmHg.
    pub pcwp: i16,
}

impl CoWedgeGroup {
    pub fn cardiac_output(&self) -> f64 {
        self.co as f64
    }

    pub fn blood_temperature(&self) -> f64 {
        scaled(self.blood_temp, 100.0)
    }

    pub fn ejection_fraction(&self) -> f64 {
        scaled(self.ref_, 100.0)
    }

    pub fn wedge_pressure(&self) -> f64 {
        scaled(self.pcwp, 100.0)
    }

    pub fn label(&self) -> CoWedgeLabel {
        CoWedgeLabel::from_bits_truncate(self.header.label)
    }

    pub fn is_co_over_60s_old(&self) -> bool {
        self.label().contains(CoWedgeLabel::CO_OVER_60S_OLD)
    }

    pub fn is_pcwp_over_60s_old(&self) -> bool {
        self.label().contains(CoWedgeLabel::PCWP_OVER_60S_OLD)
    }

    pub fn co_mode(&self) -> CoMode {
        CoMode::from(((self.header.label >> 2) & 0x07) as u8)
    }
}

impl Group for CoWedgeGroup {
    const SIZE: usize = GroupHeader::SIZE + 8;
    const NAME: &'static str = "C.O. & PCWP";

    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(Self {
            header: GroupHeader::read(reader)?,
            co: reader.read_i16()?,
            blood_temp: reader.read_i16()?,
            ref_: reader.read_i16()?,
            pcwp: reader.read_i16()?,
        })
    }
}
