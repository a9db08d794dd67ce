//! Splitting of buffers that hold several records back to back.
//!
//! Every record carries its own length in the first two bytes of its
//! header. A record that fails to decode is reported and skipped, but a
//! length that cannot be trusted ends the scan: there is no way to find
//! the start of the next record.

use core::fmt;

use crate::{
    alarm::AlarmRecord,
    decode::{decode_record, decode_record_of_type, DecodedRecord},
    header::{DatexHeader, MainType, HEADER_SIZE},
    physiological::ClassSelection,
    subrecord::DecodeOptions,
    Decoded, DecodeError, Diagnostic, Diagnostics,
};

/// How the length of the next record is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Read the two byte length at the start of every record.
    #[default]
    LengthPrefix,
    /// Decode the whole header and use its `r_len`. Lengths shorter than a
    /// header end the scan.
    Header,
}

impl Framing {
    fn min_len(&self) -> usize {
        match self {
            Framing::LengthPrefix => 2,
            Framing::Header => HEADER_SIZE,
        }
    }
}

/// A record inside a stream that could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordError {
    /// Byte offset of the record inside the stream.
    pub offset: usize,
    pub error: DecodeError,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record at offset {}: {}", self.offset, self.error)
    }
}

impl std::error::Error for RecordError {}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamError {
    /// A single record failed. The stream continues after it.
    Record(RecordError),
    /// The stream itself is corrupt. Nothing follows this error.
    Framing(Diagnostic),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Record(e) => write!(f, "{e}"),
            StreamError::Framing(d) => write!(f, "{d}"),
        }
    }
}

impl std::error::Error for StreamError {}

/// A lazy iterator over the records of a stream.
///
/// Every record is handed to `decode` as a slice of exactly `r_len` bytes.
pub struct RecordStream<'a, F> {
    data: &'a [u8],
    offset: usize,
    framing: Framing,
    decode: F,
    done: bool,
}

impl<'a, F> RecordStream<'a, F> {
    pub fn new(data: &'a [u8], framing: Framing, decode: F) -> Self {
        Self {
            data,
            offset: 0,
            framing,
            decode,
            done: false,
        }
    }

    /// Offset of the next record to be read.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn stop(&mut self, diagnostic: Diagnostic) -> StreamError {
        self.done = true;
        StreamError::Framing(diagnostic)
    }

    fn next_frame(&mut self) -> Option<Result<(usize, &'a [u8]), StreamError>> {
        if self.done || self.offset >= self.data.len() {
            return None;
        }

        let data = self.data;
        let offset = self.offset;
        let remaining = &data[offset..];

        if remaining.len() < self.framing.min_len() {
            return Some(Err(self.stop(Diagnostic::TrailingBytes {
                offset,
                len: remaining.len(),
            })));
        }

        let (declared, min_len) = match self.framing {
            Framing::LengthPrefix => (i16::from_le_bytes([remaining[0], remaining[1]]), 1),
            Framing::Header => match DatexHeader::parse(remaining) {
                Ok(header) => (header.r_len, HEADER_SIZE),
                Err(error) => {
                    self.done = true;
                    return Some(Err(StreamError::Record(RecordError { offset, error })));
                }
            },
        };

        let len = usize::try_from(declared)
            .ok()
            .filter(|len| *len >= min_len && *len <= remaining.len());

        let Some(len) = len else {
            return Some(Err(self.stop(Diagnostic::InvalidStreamLength {
                offset,
                declared,
                remaining: remaining.len(),
            })));
        };

        self.offset += len;
        Some(Ok((offset, &remaining[..len])))
    }
}

impl<'a, T, F> Iterator for RecordStream<'a, F>
where
    F: FnMut(&'a [u8]) -> Result<Decoded<T>, DecodeError>,
{
    type Item = Result<Decoded<T>, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (offset, frame) = match self.next_frame()? {
            Ok(frame) => frame,
            Err(e) => return Some(Err(e)),
        };

        let decoded = (self.decode)(frame)
            .map_err(|error| StreamError::Record(RecordError { offset, error }));

        Some(decoded)
    }
}

/// The outcome of splitting a whole stream: one entry per record that could
/// be framed, plus diagnostics about the stream itself.
pub type StreamResult<T> = Decoded<Vec<Result<Decoded<T>, RecordError>>>;

fn collect_stream<'a, T, F>(stream: RecordStream<'a, F>) -> StreamResult<T>
where
    F: FnMut(&'a [u8]) -> Result<Decoded<T>, DecodeError>,
{
    let mut records = Vec::new();
    let mut diagnostics = Diagnostics::new();

    for item in stream {
        match item {
            Ok(record) => records.push(Ok(record)),
            Err(StreamError::Record(e)) => records.push(Err(e)),
            Err(StreamError::Framing(d)) => diagnostics.push(d),
        }
    }

    Decoded::new(records, diagnostics)
}

/// Split `data` into records and decode each of them by its main type.
pub fn split_records(
    data: &[u8],
    framing: Framing,
    options: &DecodeOptions,
) -> StreamResult<DecodedRecord> {
    collect_stream(RecordStream::new(data, framing, |frame| {
        decode_record(frame, options)
    }))
}

/// Split a stream that only holds alarm records.
pub fn split_alarm_records(data: &[u8]) -> StreamResult<AlarmRecord> {
    collect_stream(RecordStream::new(data, Framing::Header, AlarmRecord::parse))
}

/// Split a stream that only holds physiological database records. Records
/// of another main type are reported as [`DecodeError::MainTypeMismatch`].
pub fn split_phdb_records(
    data: &[u8],
    class_selection: ClassSelection,
) -> StreamResult<DecodedRecord> {
    let options = DecodeOptions::default().with_class_selection(class_selection);

    collect_stream(RecordStream::new(data, Framing::Header, |frame| {
        decode_record_of_type(frame, MainType::Phdb, &options)
    }))
}
