use core::fmt;

use super::{scaled, Group, GroupHeader};
use crate::codec::{ByteReader, ReadError};

bitflags::bitflags! {
    pub struct NmtStatus: u16 {
        const SUPRAMAX_CURRENT_FOUND = 1 << 6;
        const CALIBRATED = 1 << 7;
    }
}

/// Status bits 2-3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StimulusMode {
    TrainOfFour,
    DoubleBurst,
    SingleTwitch,
    PostTetanicCount,
}

impl StimulusMode {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::TrainOfFour,
            1 => Self::DoubleBurst,
            2 => Self::SingleTwitch,
            _ => Self::PostTetanicCount,
        }
    }
}

impl fmt::Display for StimulusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StimulusMode::TrainOfFour => write!(f, "Train Of Four (TOF mode)"),
            StimulusMode::DoubleBurst => write!(f, "Double Burst (DB mode)"),
            StimulusMode::SingleTwitch => write!(f, "Single Twitch (ST mode)"),
            StimulusMode::PostTetanicCount => write!(f, "Post-tetanic count"),
        }
    }
}

/// Status bits 4-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseWidth {
    NotUsed,
    Us100,
    Us200,
    Us300,
}

impl PulseWidth {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            0 => Self::NotUsed,
            1 => Self::Us100,
            2 => Self::Us200,
            _ => Self::Us300,
        }
    }

    /// Width in microseconds, if a pulse is used.
    pub fn micros(&self) -> Option<u16> {
        match self {
            PulseWidth::NotUsed => None,
            PulseWidth::Us100 => Some(100),
            PulseWidth::Us200 => Some(200),
            PulseWidth::Us300 => Some(300),
        }
    }
}

impl fmt::Display for PulseWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.micros() {
            Some(us) => write!(f, "{us} us"),
            None => write!(f, "not used"),
        }
    }
}

/// Neuromuscular transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NmtGroup {
    pub header: GroupHeader,
    /// Twitch 1 of a train of four, 1/10 %.
    pub t1: i16,
    /// t4/t1 in TOF mode, t2/t1 in DB mode, 1/10 %.
    pub tratio: i16,
    /// Bit field, see [`Self::post_tetanic_count`], [`Self::tof_count`] and
    /// [`Self::stimulus_current`].
    pub ptc: i16,
}

impl NmtGroup {
    pub fn t1_percent(&self) -> f64 {
        scaled(self.t1, 10.0)
    }

    pub fn tratio_percent(&self) -> f64 {
        scaled(self.tratio, 10.0)
    }

    pub fn stimulus_mode(&self) -> StimulusMode {
        StimulusMode::from_bits(self.header.status_field(2, 0x03))
    }

    pub fn pulse_width(&self) -> PulseWidth {
        PulseWidth::from_bits(self.header.status_field(4, 0x03))
    }

    pub fn status(&self) -> NmtStatus {
        NmtStatus::from_bits_truncate(self.header.status)
    }

    pub fn is_supramax_current_found(&self) -> bool {
        self.status().contains(NmtStatus::SUPRAMAX_CURRENT_FOUND)
    }

    pub fn is_calibrated(&self) -> bool {
        self.status().contains(NmtStatus::CALIBRATED)
    }

    fn ptc_bits(&self) -> u16 {
        self.ptc as u16
    }

    /// Bits 0-4 of `ptc`.
    pub fn post_tetanic_count(&self) -> u8 {
        (self.ptc_bits() & 0x1F) as u8
    }

    /// Bits 5-8 of `ptc`.
    pub fn tof_count(&self) -> u8 {
        ((self.ptc_bits() >> 5) & 0x0F) as u8
    }

    /// Stimulus current in mA, bits 9-15 of `ptc`.
    pub fn stimulus_current(&self) -> u8 {
        ((self.ptc_bits() >> 9) & 0x7F) as u8
    }
}

impl Group for NmtGroup {
    const SIZE: usize = GroupHeader::SIZE + 6;
    const NAME: &'static str = "NMT";

    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(Self {
            header: GroupHeader::read(reader)?,
            t1: reader.read_i16()?,
            tratio: reader.read_i16()?,
            ptc: reader.read_i16()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physiological::groups::test_util::group_bytes;

    #[test]
    fn ptc_bit_field() {
        // 70 mA, TOF count 4, PTC 12
        let ptc = ((70u16 << 9) | (4 << 5) | 12) as i16;
        let status = (1 << 2) | (2 << 4) | (1 << 7);
        let data = group_bytes(Some((status, 0)), &[955, 880, ptc]);
        let group = NmtGroup::parse(&data).unwrap();

        assert_eq!(group.t1_percent(), 95.5);
        assert_eq!(group.tratio_percent(), 88.0);
        assert_eq!(group.post_tetanic_count(), 12);
        assert_eq!(group.tof_count(), 4);
        assert_eq!(group.stimulus_current(), 70);
        assert_eq!(group.stimulus_mode(), StimulusMode::DoubleBurst);
        assert_eq!(group.pulse_width(), PulseWidth::Us200);
        assert_eq!(group.pulse_width().to_string(), "200 us");
        assert!(group.is_calibrated());
        assert!(!group.is_supramax_current_found());
    }

    #[test]
    fn current_uses_top_bits() {
        let data = group_bytes(Some((0x003C, 0)), &[0, 0, -1]);
        let group = NmtGroup::parse(&data).unwrap();

        assert_eq!(group.stimulus_current(), 0x7F);
        assert_eq!(group.tof_count(), 0x0F);
        assert_eq!(group.post_tetanic_count(), 0x1F);
        assert_eq!(group.stimulus_mode(), StimulusMode::PostTetanicCount);
        assert_eq!(group.pulse_width(), PulseWidth::Us300);
    }
}
