//! dri-rs: a pure-rust decoder for the Datex-Ohmeda DRI protocol.
//!
//! The record formats live in [`dri_rs_core`].
//! [`Dri`] decodes single records or whole captures according to a
//! [`DecoderConfig`], and reports what it finds through the `log` crate.

pub use dri_rs_core;
pub use dri_rs_log;

mod config;
pub use config::DecoderConfig;

mod error;
pub use error::DriError;

#[cfg(test)]
mod tests;

pub use dri_rs_log::{LogOutput, Loggable, Logger};

use dri_rs_core::{
    alarm::AlarmRecord,
    decode_record,
    stream::{split_records, RecordStream, StreamError},
    Decoded, DecodeError, DecodedRecord, Diagnostics,
};

pub struct Dri {
    config: DecoderConfig,
}

impl From<DecoderConfig> for Dri {
    fn from(value: DecoderConfig) -> Self {
        Self::new(value)
    }
}

impl Default for Dri {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

impl Dri {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode the record at the start of `data`.
    pub fn decode(&self, data: &[u8]) -> Result<Decoded<DecodedRecord>, DriError> {
        let decoded = decode_record(data, &self.config.decode_options())?;
        self.finish(decoded)
    }

    /// Decode the alarm record at the start of `data`. Records of any other
    /// main type are rejected.
    pub fn decode_alarm(&self, data: &[u8]) -> Result<Decoded<AlarmRecord>, DriError> {
        let decoded = AlarmRecord::parse(data)?;
        self.finish(decoded)
    }

    /// Lazily decode every record of `data`.
    ///
    /// Records that fail to decode, or that strict mode rejects, are
    /// yielded as errors and iteration continues with the next record.
    /// Iteration ends at the first record length that cannot be trusted.
    pub fn records<'a>(&'a self, data: &'a [u8]) -> RecordIter<'a> {
        let options = self.config.decode_options();
        let decode: DecodeFn<'a> = Box::new(move |frame: &'a [u8]| decode_record(frame, &options));

        RecordIter {
            dri: self,
            stream: RecordStream::new(data, self.config.framing, decode),
        }
    }

    /// Decode every record of `data`, keeping records that failed to decode
    /// or that strict mode rejects as errors.
    ///
    /// The diagnostics of the result describe the stream itself.
    pub fn decode_all(&self, data: &[u8]) -> Decoded<Vec<RecordResult>> {
        let options = self.config.decode_options();
        let (records, diagnostics) =
            split_records(data, self.config.framing, &options).into_parts();

        let records = records
            .into_iter()
            .map(|record| match record {
                Ok(record) => self.finish(record),
                Err(e) => Err(DriError::from(e)),
            })
            .collect();

        self.report(&diagnostics);

        Decoded::new(records, diagnostics)
    }

    fn report(&self, diagnostics: &Diagnostics) {
        if diagnostics.is_clean() {
            return;
        }

        if let Some(output) = &self.config.diagnostics_output {
            Logger::log(output, diagnostics);
        }
    }

    fn finish<T>(&self, decoded: Decoded<T>) -> Result<Decoded<T>, DriError> {
        self.report(&decoded.diagnostics);

        if self.config.strict && !decoded.is_clean() {
            Err(DriError::Diagnostics(decoded.diagnostics.messages()))
        } else {
            Ok(decoded)
        }
    }
}

pub type RecordResult = Result<Decoded<DecodedRecord>, DriError>;

type DecodeFn<'a> = Box<dyn FnMut(&'a [u8]) -> Result<Decoded<DecodedRecord>, DecodeError> + 'a>;

pub struct RecordIter<'a> {
    dri: &'a Dri,
    stream: RecordStream<'a, DecodeFn<'a>>,
}

impl Iterator for RecordIter<'_> {
    type Item = RecordResult;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.stream.offset();

        match self.stream.next()? {
            Ok(record) => {
                let record = self.dri.finish(record);
                if let Err(e) = &record {
                    log::warn!("Rejected record at offset {offset}: {e}");
                }
                Some(record)
            }
            Err(StreamError::Record(e)) => {
                log::warn!("Recoverable error while decoding {e}");
                Some(Err(e.into()))
            }
            Err(StreamError::Framing(d)) => {
                log::error!("Unrecoverable error in record stream: {d}. Stopping iteration.");
                None
            }
        }
    }
}
