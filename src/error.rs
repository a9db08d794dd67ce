use core::fmt;

use dri_rs_core::{stream::RecordError, DecodeError};

#[derive(Clone, Debug, PartialEq)]
pub enum DriError {
    /// The record could not be decoded.
    Decode(DecodeError),
    /// A record inside a stream could not be decoded.
    Record(RecordError),
    /// Decoding succeeded, but diagnostics were found and the decoder is
    /// configured to reject them.
    Diagnostics(Vec<String>),
}

impl From<DecodeError> for DriError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

impl From<RecordError> for DriError {
    fn from(value: RecordError) -> Self {
        Self::Record(value)
    }
}

impl fmt::Display for DriError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriError::Decode(e) => write!(f, "{e}"),
            DriError::Record(e) => write!(f, "{e}"),
            DriError::Diagnostics(messages) => {
                write!(f, "record decoded with {} diagnostic(s)", messages.len())?;
                if let Some(first) = messages.first() {
                    write!(f, ", first: {first}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DriError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriError::Decode(e) => Some(e),
            DriError::Record(e) => Some(e),
            DriError::Diagnostics(_) => None,
        }
    }
}
