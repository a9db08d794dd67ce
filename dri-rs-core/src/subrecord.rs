//! Subrecord dispatch.
//!
//! Every slot of the descriptor table is visited in order, including slots
//! after an end-of-list descriptor. The extent of a subrecord runs from its
//! offset to the next larger offset of another active descriptor, or to the
//! end of the record body.

use crate::{
    alarm::{AlarmStatusMessage, ALARM_STATUS},
    header::{MainType, SrDesc},
    physiological::{AuxPhysiologicalInfo, ClassSelection, PhdbRecord, PhdbSubrecordType},
    record::DatexRecord,
    waveform::{Waveform, WaveformType},
    Decoded, DecodeError, Diagnostic, Diagnostics,
};

/// Options that change how subrecord payloads are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub class_selection: ClassSelection,
}

impl DecodeOptions {
    pub fn with_class_selection(mut self, class_selection: ClassSelection) -> Self {
        self.class_selection = class_selection;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubrecordPayload {
    /// The slot holds an end-of-list descriptor.
    EndOfList,
    Waveform(Waveform),
    Physiological {
        kind: PhdbSubrecordType,
        record: PhdbRecord,
    },
    AuxInfo(AuxPhysiologicalInfo),
    AlarmStatus(AlarmStatusMessage),
    /// A subrecord without a decoder, as a range of the record body.
    Raw { offset: usize, len: usize },
    /// The offset of the subrecord lies outside of the record body.
    OutOfBounds,
    /// The subrecord could not be decoded.
    Invalid(DecodeError),
}

impl SubrecordPayload {
    /// Whether the payload was decoded into a structure.
    pub fn is_decoded(&self) -> bool {
        matches!(
            self,
            SubrecordPayload::Waveform(_)
                | SubrecordPayload::Physiological { .. }
                | SubrecordPayload::AuxInfo(_)
                | SubrecordPayload::AlarmStatus(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subrecord {
    /// Slot of the descriptor in the header.
    pub index: usize,
    pub descriptor: SrDesc,
    pub payload: SubrecordPayload,
}

impl Subrecord {
    pub fn is_end_of_list(&self) -> bool {
        self.descriptor.is_end_of_list()
    }
}

/// Start and end of every active subrecord inside a body of `body_len`
/// bytes. Slots whose offset lies outside of the body get `None`.
fn extents(descriptors: &[SrDesc], body_len: usize) -> Vec<Option<(usize, usize)>> {
    let starts: Vec<Option<usize>> = descriptors
        .iter()
        .map(|d| {
            d.body_offset()
                .filter(|offset| d.is_active() && *offset < body_len)
        })
        .collect();

    starts
        .iter()
        .map(|start| {
            let start = (*start)?;
            let end = starts
                .iter()
                .flatten()
                .copied()
                .filter(|other| *other > start)
                .min()
                .unwrap_or(body_len);
            Some((start, end))
        })
        .collect()
}

/// Decode every subrecord of `record` according to its main type.
///
/// Problems with individual subrecords are reported as diagnostics and
/// never abort the remaining slots.
pub fn dispatch(record: &DatexRecord, options: &DecodeOptions) -> Decoded<Vec<Subrecord>> {
    let descriptors = &record.header.subrecords;
    let main_type = record.header.main_type;
    let body = record.data.as_slice();
    let end_of_list = record.header.end_of_list_index();

    let mut diagnostics = Diagnostics::new();
    let mut subrecords = Vec::with_capacity(descriptors.len());

    for (index, (descriptor, extent)) in descriptors
        .iter()
        .zip(extents(descriptors, body.len()))
        .enumerate()
    {
        let payload = match descriptor.active_type() {
            None => SubrecordPayload::EndOfList,
            Some(ty) => {
                let ty = ty.get();
                if end_of_list.map_or(false, |eol| index > eol) {
                    diagnostics.push(Diagnostic::SubrecordAfterEndOfList { index, ty });
                }

                match extent {
                    Some((start, end)) => decode_payload(
                        index,
                        ty,
                        main_type,
                        start,
                        &body[start..end],
                        options,
                        &mut diagnostics,
                    ),
                    None => {
                        diagnostics.push(Diagnostic::SubrecordOutOfBounds {
                            index,
                            offset: descriptor.offset,
                            body_len: body.len(),
                        });
                        SubrecordPayload::OutOfBounds
                    }
                }
            }
        };

        subrecords.push(Subrecord {
            index,
            descriptor: *descriptor,
            payload,
        });
    }

    Decoded::new(subrecords, diagnostics)
}

fn decode_payload(
    index: usize,
    ty: u8,
    main_type: MainType,
    offset: usize,
    data: &[u8],
    options: &DecodeOptions,
    diagnostics: &mut Diagnostics,
) -> SubrecordPayload {
    let result = match main_type {
        MainType::Wave => {
            let wave_type = WaveformType::from(ty);
            if !wave_type.is_known() {
                diagnostics.push(Diagnostic::UnknownWaveformType { index, ty });
            }
            Waveform::parse(data, wave_type).map(SubrecordPayload::Waveform)
        }
        MainType::Phdb => {
            let kind = PhdbSubrecordType::from(ty);
            if kind.is_database_record() {
                PhdbRecord::parse(data, options.class_selection).map(|decoded| {
                    let (record, found) = decoded.into_parts();
                    diagnostics.extend(found);
                    SubrecordPayload::Physiological { kind, record }
                })
            } else if kind.is_auxiliary() {
                AuxPhysiologicalInfo::parse(data).map(SubrecordPayload::AuxInfo)
            } else {
                return raw(index, ty, main_type, offset, data, diagnostics);
            }
        }
        MainType::Alarm if ty == ALARM_STATUS => {
            AlarmStatusMessage::parse(data).map(|decoded| {
                let (status, found) = decoded.into_parts();
                diagnostics.extend(found);
                SubrecordPayload::AlarmStatus(status)
            })
        }
        _ => return raw(index, ty, main_type, offset, data, diagnostics),
    };

    result.unwrap_or_else(|error| {
        diagnostics.push(Diagnostic::SubrecordDecodeFailed { index, ty, error });
        SubrecordPayload::Invalid(error)
    })
}

fn raw(
    index: usize,
    ty: u8,
    main_type: MainType,
    offset: usize,
    data: &[u8],
    diagnostics: &mut Diagnostics,
) -> SubrecordPayload {
    diagnostics.push(Diagnostic::UnknownSubrecordType {
        index,
        main_type,
        ty,
    });

    SubrecordPayload::Raw {
        offset,
        len: data.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::DatexHeader;

    fn record(main_type: MainType, descriptors: &[(i16, u8)], body: Vec<u8>) -> DatexRecord {
        let mut header = DatexHeader {
            main_type,
            ..Default::default()
        };
        for (index, (offset, ty)) in descriptors.iter().enumerate() {
            header.set_subrecord(index, *offset, *ty);
        }
        DatexRecord::new(header, body)
    }

    #[test]
    fn extents_use_next_larger_offset() {
        let descriptors = [
            SrDesc::new(10, 1),
            SrDesc::new(0, 2),
            SrDesc::END_OF_LIST,
            SrDesc::new(30, 3),
            SrDesc::new(-4, 4),
            SrDesc::new(40, 5),
            SrDesc::new(10, 6),
            SrDesc::END_OF_LIST,
        ];

        assert_eq!(
            extents(&descriptors, 40),
            vec![
                Some((10, 30)),
                Some((0, 10)),
                None,
                Some((30, 40)),
                None,
                None,
                Some((10, 30)),
                None,
            ]
        );
    }

    #[test]
    fn unknown_main_type_is_raw() {
        let record = record(MainType::Network, &[(0, 1), (4, 2)], vec![0; 10]);
        let decoded = dispatch(&record, &DecodeOptions::default());

        assert_eq!(
            decoded.value[0].payload,
            SubrecordPayload::Raw { offset: 0, len: 4 }
        );
        assert_eq!(
            decoded.value[1].payload,
            SubrecordPayload::Raw { offset: 4, len: 6 }
        );
        assert!(decoded.value[2..].iter().all(Subrecord::is_end_of_list));
        assert_eq!(decoded.diagnostics.len(), 2);
    }

    #[test]
    fn out_of_bounds_offset_is_skipped() {
        let record = record(MainType::Wave, &[(100, 9)], vec![0; 6]);
        let decoded = dispatch(&record, &DecodeOptions::default());

        assert_eq!(decoded.value[0].payload, SubrecordPayload::OutOfBounds);
        assert_eq!(
            decoded.diagnostics.as_slice(),
            &[Diagnostic::SubrecordOutOfBounds {
                index: 0,
                offset: 100,
                body_len: 6
            }]
        );
    }

    #[test]
    fn slot_after_end_of_list_is_still_decoded() {
        let body = Waveform::new(WaveformType::Co2, 0, vec![5]).to_bytes();
        let mut record = record(MainType::Wave, &[], body);
        record.header.set_subrecord(3, 0, 9);

        let decoded = dispatch(&record, &DecodeOptions::default());
        assert_eq!(decoded.value.len(), 8);
        assert!(decoded.value[0].is_end_of_list());
        assert!(decoded.value[3].payload.is_decoded());
        assert_eq!(
            decoded.diagnostics.as_slice(),
            &[Diagnostic::SubrecordAfterEndOfList { index: 3, ty: 9 }]
        );
    }

    #[test]
    fn failed_subrecord_does_not_stop_dispatch() {
        let mut body = vec![0u8; 4];
        body.extend(Waveform::new(WaveformType::Ecg1, 0, vec![1, 2]).to_bytes());
        // first waveform claims 10 samples but only has 4 bytes
        body[0] = 10;

        let record = record(MainType::Wave, &[(0, 1), (4, 200)], body);
        let decoded = dispatch(&record, &DecodeOptions::default());

        assert!(matches!(
            decoded.value[0].payload,
            SubrecordPayload::Invalid(DecodeError::NotEnoughData { .. })
        ));
        match &decoded.value[1].payload {
            SubrecordPayload::Waveform(waveform) => {
                assert_eq!(waveform.ty, WaveformType::Unknown(200));
                assert_eq!(waveform.sampling_rate(), 300);
                assert_eq!(waveform.samples, vec![1, 2]);
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(decoded.diagnostics.len(), 2);
    }

    #[test]
    fn phdb_dispatch() {
        let phdb = PhdbRecord::new(
            crate::Timestamp::from(1),
            crate::physiological::PhysData::Basic(Default::default()),
            0,
        );
        let aux = AuxPhysiologicalInfo::default();

        let mut body = phdb.to_bytes();
        body.extend(aux.to_bytes());
        body.extend([0xAA; 3]);

        let record = record(MainType::Phdb, &[(0, 17), (8, 19), (122, 42)], body);
        let decoded = dispatch(&record, &DecodeOptions::default());

        assert_eq!(
            decoded.value[0].payload,
            SubrecordPayload::Physiological {
                kind: PhdbSubrecordType::Trend10s,
                record: phdb
            }
        );
        assert_eq!(decoded.value[1].payload, SubrecordPayload::AuxInfo(aux));
        assert_eq!(
            decoded.value[2].payload,
            SubrecordPayload::Raw {
                offset: 122,
                len: 3
            }
        );
        assert_eq!(
            decoded.diagnostics.as_slice(),
            &[Diagnostic::UnknownSubrecordType {
                index: 2,
                main_type: MainType::Phdb,
                ty: 42
            }]
        );
    }
}
