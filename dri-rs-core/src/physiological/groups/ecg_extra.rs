use super::Group;
use crate::codec::{ByteReader, ReadError};

/// Heart rate statistics. Unlike the other groups this one has no header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EcgExtraGroup {
    pub hr_ecg: i16,
    pub hr_max: i16,
    pub hr_min: i16,
}

impl EcgExtraGroup {
    /// Heart rate derived from the ECG signal, 1/min.
    pub fn heart_rate(&self) -> f64 {
        self.hr_ecg as f64
    }

    pub fn max_heart_rate(&self) -> f64 {
        self.hr_max as f64
    }

    pub fn min_heart_rate(&self) -> f64 {
        self.hr_min as f64
    }
}

impl Group for EcgExtraGroup {
    const SIZE: usize = 6;
    const NAME: &'static str = "ECG Extra";

    fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(Self {
            hr_ecg: reader.read_i16()?,
            hr_max: reader.read_i16()?,
            hr_min: reader.read_i16()?,
        })
    }
}
