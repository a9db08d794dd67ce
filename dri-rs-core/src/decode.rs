use crate::{
    alarm::AlarmStatusMessage,
    header::{DatexHeader, MainType},
    physiological::{AuxPhysiologicalInfo, PhdbRecord},
    record::DatexRecord,
    subrecord::{self, DecodeOptions, Subrecord, SubrecordPayload},
    waveform::Waveform,
    Decoded, DecodeError,
};

/// A record with all of its subrecords decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub header: DatexHeader,
    /// One entry per descriptor slot, in slot order.
    pub subrecords: Vec<Subrecord>,
}

impl DecodedRecord {
    pub fn main_type(&self) -> MainType {
        self.header.main_type
    }

    pub fn active_subrecord_count(&self) -> usize {
        self.header.active_subrecord_count()
    }

    /// Number of subrecords that were decoded into a structure.
    pub fn decoded_subrecord_count(&self) -> usize {
        self.payloads().filter(|p| p.is_decoded()).count()
    }

    fn payloads(&self) -> impl Iterator<Item = &SubrecordPayload> {
        self.subrecords.iter().map(|s| &s.payload)
    }

    pub fn waveforms(&self) -> impl Iterator<Item = &Waveform> {
        self.payloads().filter_map(|p| match p {
            SubrecordPayload::Waveform(waveform) => Some(waveform),
            _ => None,
        })
    }

    pub fn phdb_records(&self) -> impl Iterator<Item = &PhdbRecord> {
        self.payloads().filter_map(|p| match p {
            SubrecordPayload::Physiological { record, .. } => Some(record),
            _ => None,
        })
    }

    pub fn aux_info(&self) -> Option<&AuxPhysiologicalInfo> {
        self.payloads().find_map(|p| match p {
            SubrecordPayload::AuxInfo(info) => Some(info),
            _ => None,
        })
    }

    pub fn alarm_status(&self) -> Option<&AlarmStatusMessage> {
        self.payloads().find_map(|p| match p {
            SubrecordPayload::AlarmStatus(status) => Some(status),
            _ => None,
        })
    }
}

/// Counts that describe how well a record decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSummary {
    pub main_type: MainType,
    pub active_subrecords: usize,
    pub decoded_subrecords: usize,
    pub diagnostics: usize,
}

impl Decoded<DecodedRecord> {
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            main_type: self.value.main_type(),
            active_subrecords: self.value.active_subrecord_count(),
            decoded_subrecords: self.value.decoded_subrecord_count(),
            diagnostics: self.diagnostics.len(),
        }
    }
}

/// Decode the record at the start of `data`, dispatching every subrecord
/// according to the main type of the record.
pub fn decode_record(
    data: &[u8],
    options: &DecodeOptions,
) -> Result<Decoded<DecodedRecord>, DecodeError> {
    let (record, diagnostics) = DatexRecord::parse(data)?.into_parts();
    Ok(decode_parsed(record, diagnostics, options))
}

/// Like [`decode_record`], but fails with [`DecodeError::MainTypeMismatch`]
/// unless the record is of type `expected`.
pub fn decode_record_of_type(
    data: &[u8],
    expected: MainType,
    options: &DecodeOptions,
) -> Result<Decoded<DecodedRecord>, DecodeError> {
    let (record, diagnostics) = DatexRecord::parse(data)?.into_parts();
    record.expect_main_type(expected)?;
    Ok(decode_parsed(record, diagnostics, options))
}

fn decode_parsed(
    record: DatexRecord,
    mut diagnostics: crate::Diagnostics,
    options: &DecodeOptions,
) -> Decoded<DecodedRecord> {
    let (subrecords, found) = subrecord::dispatch(&record, options).into_parts();
    diagnostics.extend(found);

    let decoded = DecodedRecord {
        header: record.header,
        subrecords,
    };

    Decoded::new(decoded, diagnostics)
}
