use core::fmt;

use super::{scaled, Group, GroupHeader};
use crate::codec::{ByteReader, ReadError};

bitflags::bitflags! {
    pub struct FlowVolumeStatus: u16 {
        const DISCONNECTION = 1 << 2;
        const CALIBRATING = 1 << 3;
        const ZEROING = 1 << 4;
        const OBSTRUCTION = 1 << 5;
        const LEAK = 1 << 6;
        const MEASUREMENT_OFF = 1 << 7;
    }
}

/// Conditions tidal volumes are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TidalVolumeBase {
    Atpd,
    Ntpd,
    Btps,
    Stpd,
}

impl TidalVolumeBase {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::Atpd,
            1 => Self::Ntpd,
            2 => Self::Btps,
            _ => Self::Stpd,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TidalVolumeBase::Atpd => "Atmospheric/ambient temperature and pressure, dry gas",
            TidalVolumeBase::Ntpd => "Normal temperature and pressure, dry gas",
            TidalVolumeBase::Btps => "Body temperature and pressure, saturated gas",
            TidalVolumeBase::Stpd => "Standard temperature and pressure, dry gas",
        }
    }
}

impl fmt::Display for TidalVolumeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TidalVolumeBase::Atpd => "ATPD",
            TidalVolumeBase::Ntpd => "NTPD",
            TidalVolumeBase::Btps => "BTPS",
            TidalVolumeBase::Stpd => "STPD",
        };
        write!(f, "{name}")
    }
}

/// Spirometry pressures, volumes and compliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlowVolumeGroup {
    pub header: GroupHeader,
    /// Respiration rate, 1/min.
    pub rr: i16,
    /// 1/100 cmH2O.
    pub ppeak: i16,
    /// 1/100 cmH2O.
    pub peep: i16,
    /// 1/100 cmH2O.
    pub pplat: i16,
    /// 1/10 ml.
    pub tv_insp: i16,
    /// 1/10 ml.
    pub tv_exp: i16,
    /// 1/100 ml/cmH2O.
    pub compliance: i16,
    /// 1/100 l/min.
    pub mv_exp: i16,
}

impl FlowVolumeGroup {
    pub fn respiration_rate(&self) -> f64 {
        self.rr as f64
    }

    pub fn peak_pressure(&self) -> f64 {
        scaled(self.ppeak, 100.0)
    }

    pub fn peep(&self) -> f64 {
        scaled(self.peep, 100.0)
    }

    pub fn plateau_pressure(&self) -> f64 {
        scaled(self.pplat, 100.0)
    }

    pub fn inspiratory_tidal_volume(&self) -> f64 {
        scaled(self.tv_insp, 10.0)
    }

    pub fn expiratory_tidal_volume(&self) -> f64 {
        scaled(self.tv_exp, 10.0)
    }

    pub fn compliance(&self) -> f64 {
        scaled(self.compliance, 100.0)
    }

    pub fn expiratory_minute_volume(&self) -> f64 {
        scaled(self.mv_exp, 100.0)
    }

    /// Status bits 8-9.
    pub fn tv_base(&self) -> TidalVolumeBase {
        TidalVolumeBase::from_bits(self.header.status_field(8, 0x03))
    }

    pub fn status(&self) -> FlowVolumeStatus {
        FlowVolumeStatus::from_bits_truncate(self.header.status)
    }

    pub fn is_disconnected(&self) -> bool {
        self.status().contains(FlowVolumeStatus::DISCONNECTION)
    }

    pub fn is_calibrating(&self) -> bool {
        self.status().contains(FlowVolumeStatus::CALIBRATING)
    }

    pub fn is_zeroing(&self) -> bool {
        self.status().contains(FlowVolumeStatus::ZEROING)
    }

    pub fn is_obstructed(&self) -> bool {
        self.status().contains(FlowVolumeStatus::OBSTRUCTION)
    }

    pub fn is_leaking(&self) -> bool {
        self.status().contains(FlowVolumeStatus::LEAK)
    }

    pub fn is_measurement_off(&self) -> bool {
        self.status().contains(FlowVolumeStatus::MEASUREMENT_OFF)
    }
}

impl Group for FlowVolumeGroup {
    const SIZE: usize = GroupHeader::SIZE + 16;
    const NAME: &'static str = "Flow & Volume";

    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(Self {
            header: GroupHeader::read(reader)?,
            rr: reader.read_i16()?,
            ppeak: reader.read_i16()?,
            peep: reader.read_i16()?,
            pplat: reader.read_i16()?,
            tv_insp: reader.read_i16()?,
            tv_exp: reader.read_i16()?,
            compliance: reader.read_i16()?,
            mv_exp: reader.read_i16()?,
        })
    }
}
