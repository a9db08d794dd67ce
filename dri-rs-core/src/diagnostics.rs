//! Non-fatal decode findings.
//!
//! Each top-level decode call returns its own [`Diagnostics`] next to the
//! decoded value (see [`Decoded`]). Diagnostics are only ever appended, in the
//! order they were found; an empty list means the input decoded cleanly.

use core::fmt;

use crate::{
    header::{DriLevel, MainType},
    physiological::DataClass,
    DecodeError,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A header field that must be zero is not.
    ReservedFieldNotZero { field: &'static str, value: u16 },
    UnknownDriLevel(DriLevel),
    UnknownMainType(MainType),
    /// No decoder exists for a subrecord type in this kind of record. The
    /// subrecord is kept as a raw byte range.
    UnknownSubrecordType {
        index: usize,
        main_type: MainType,
        ty: u8,
    },
    /// An active descriptor appears after an end-of-list descriptor.
    SubrecordAfterEndOfList { index: usize, ty: u8 },
    SubrecordOutOfBounds {
        index: usize,
        offset: i16,
        body_len: usize,
    },
    SubrecordDecodeFailed {
        index: usize,
        ty: u8,
        error: DecodeError,
    },
    UnknownWaveformType { index: usize, ty: u8 },
    /// A waveform in a run of concatenated waveforms could not be decoded.
    IncompleteWaveform { offset: usize, error: DecodeError },
    /// The class bits of `cl_drilvl_subt` name a class outside 0..=3.
    UnknownDataClass(u8),
    /// The payload was decoded as `selected`, but the record says `declared`.
    DataClassMismatch {
        selected: DataClass,
        declared: DataClass,
    },
    UnknownSilenceInfo(u8),
    UnknownAlarmColor { slot: usize, color: u8 },
    /// An alarm record without an alarm status subrecord.
    MissingAlarmStatus,
    /// The length of the record at `offset` cannot be trusted, so the rest
    /// of the stream cannot be split.
    InvalidStreamLength {
        offset: usize,
        declared: i16,
        remaining: usize,
    },
    /// Bytes at the end of a stream that are too short to hold a record.
    TrailingBytes { offset: usize, len: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ReservedFieldNotZero { field, value } => {
                write!(f, "{field} must be zeroed, got {value}")
            }
            Diagnostic::UnknownDriLevel(level) => {
                write!(f, "unknown DRI level {}", level.value())
            }
            Diagnostic::UnknownMainType(ty) => write!(f, "unknown record main type {}", ty.value()),
            Diagnostic::UnknownSubrecordType {
                index,
                main_type,
                ty,
            } => write!(
                f,
                "subrecord {index}: no decoder for type {ty} in {} record, kept as raw bytes",
                main_type.name()
            ),
            Diagnostic::SubrecordAfterEndOfList { index, ty } => write!(
                f,
                "subrecord {index}: type {ty} follows an end-of-list descriptor"
            ),
            Diagnostic::SubrecordOutOfBounds {
                index,
                offset,
                body_len,
            } => write!(
                f,
                "subrecord {index}: offset {offset} outside record body of {body_len} bytes"
            ),
            Diagnostic::SubrecordDecodeFailed { index, ty, error } => {
                write!(f, "subrecord {index} (type {ty}): {error}")
            }
            Diagnostic::UnknownWaveformType { index, ty } => write!(
                f,
                "subrecord {index}: unknown waveform type {ty}, decoded with ECG defaults"
            ),
            Diagnostic::IncompleteWaveform { offset, error } => {
                write!(f, "incomplete waveform at offset {offset}: {error}")
            }
            Diagnostic::UnknownDataClass(class) => {
                write!(f, "unknown physiological data class {class}")
            }
            Diagnostic::DataClassMismatch { selected, declared } => write!(
                f,
                "payload decoded as {} class, record declares {} class",
                selected.name(),
                declared.name()
            ),
            Diagnostic::UnknownSilenceInfo(value) => write!(f, "unknown silence info {value}"),
            Diagnostic::UnknownAlarmColor { slot, color } => {
                write!(f, "alarm slot {slot}: unknown color {color}")
            }
            Diagnostic::MissingAlarmStatus => {
                write!(f, "alarm record has no alarm status subrecord")
            }
            Diagnostic::InvalidStreamLength {
                offset,
                declared,
                remaining,
            } => write!(
                f,
                "invalid record length {declared} at offset {offset} ({remaining} bytes remaining), stopping"
            ),
            Diagnostic::TrailingBytes { offset, len } => {
                write!(f, "{len} trailing bytes at offset {offset} ignored")
            }
        }
    }
}

/// An ordered, append-only list of [`Diagnostic`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        #[cfg(feature = "log")]
        log::debug!(target: "dri_rs_core::diagnostics", "{diagnostic}");

        self.0.push(diagnostic);
    }

    /// Append all diagnostics of `other`, keeping their order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn is_clean(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.0
    }

    /// The human-readable form of every diagnostic.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = core::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A decoded value together with the diagnostics found while decoding it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub diagnostics: Diagnostics,
}

impl<T> Decoded<T> {
    pub fn new(value: T, diagnostics: Diagnostics) -> Self {
        Self { value, diagnostics }
    }

    pub fn clean(value: T) -> Self {
        Self::new(value, Diagnostics::new())
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_clean()
    }

    pub fn map<U, F>(self, f: F) -> Decoded<U>
    where
        F: FnOnce(T) -> U,
    {
        Decoded {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    pub fn into_parts(self) -> (T, Diagnostics) {
        (self.value, self.diagnostics)
    }
}
