use core::fmt;

use crate::{codec::ReadError, header::MainType};

/// A failure that aborts the decode of the current structure.
///
/// Findings that only affect part of a record are reported as
/// [`Diagnostic`](crate::Diagnostic)s instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The input is too short for a fixed field of the structure.
    NotEnoughData { needed: usize, available: usize },
    /// `r_len` of a record is non-positive, smaller than the header or
    /// larger than the input.
    InvalidRecordLength { declared: i16, available: usize },
    /// A waveform declares a negative number of samples.
    InvalidSampleCount(i16),
    /// A type-specific decoder was handed a record of another main type.
    MainTypeMismatch { expected: MainType, found: MainType },
}

impl DecodeError {
    pub fn not_enough_data(needed: usize, available: usize) -> Self {
        Self::NotEnoughData { needed, available }
    }
}

impl From<ReadError> for DecodeError {
    fn from(value: ReadError) -> Self {
        Self::NotEnoughData {
            needed: value.offset + value.needed,
            available: value.offset + value.available,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::NotEnoughData { needed, available } => {
                write!(f, "invalid data length: need {needed} bytes, got {available}")
            }
            DecodeError::InvalidRecordLength { declared, available } => write!(
                f,
                "invalid record length {declared} ({available} bytes available)"
            ),
            DecodeError::InvalidSampleCount(count) => {
                write!(f, "invalid waveform sample count {count}")
            }
            DecodeError::MainTypeMismatch { expected, found } => write!(
                f,
                "expected record main type {} ({}), got {} ({})",
                expected.value(),
                expected.name(),
                found.value(),
                found.name()
            ),
        }
    }
}

impl std::error::Error for DecodeError {}
