//! dri-rs-core: decoding of Datex-Ohmeda DRI records.
//!
//! A record is a fixed [`header`] followed by up to eight subrecords. How the
//! subrecords are interpreted depends on the main type of the record: see
//! [`waveform`], [`physiological`] and [`alarm`]. [`decode_record`] decodes a
//! single record, the [`stream`] module splits buffers of several records.
//!
//! Decoding never stops at the first oddity. Everything that does not make
//! a record unusable is reported as a [`Diagnostic`] next to the decoded
//! value.

pub mod codec;

mod diagnostics;
pub use diagnostics::{Decoded, Diagnostic, Diagnostics};

mod error;
pub use error::DecodeError;

mod timestamp;
pub use timestamp::Timestamp;

pub mod header;

pub mod record;
pub use record::DatexRecord;

pub mod subrecord;
pub use subrecord::DecodeOptions;

pub mod waveform;

pub mod physiological;

pub mod alarm;

mod decode;
pub use decode::{decode_record, decode_record_of_type, DecodedRecord, RecordSummary};

pub mod stream;

#[cfg(test)]
mod tests;
