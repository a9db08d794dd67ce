use crate::{
    alarm::{decode_alarm_record, AlarmColor, AlarmDisplay, AlarmRecord, AlarmStatusMessage},
    header::{DatexHeader, MainType, HEADER_SIZE},
    physiological::{
        groups::{CoWedgeGroup, EcgExtraGroup, Group, O2Group},
        BasicPhysiologicalData, ClassSelection, PhdbRecord, PhysData,
    },
    record::DatexRecord,
    stream::{split_alarm_records, split_records, Framing, RecordError},
    subrecord::SubrecordPayload,
    waveform::WaveformType,
    decode_record, DecodeError, DecodeOptions, Diagnostic, Timestamp,
};

fn record_bytes(main_type: MainType, descriptors: &[(i16, u8)], body: Vec<u8>) -> Vec<u8> {
    let mut header = DatexHeader {
        main_type,
        ..Default::default()
    };
    for (index, (offset, ty)) in descriptors.iter().enumerate() {
        header.set_subrecord(index, *offset, *ty);
    }
    DatexRecord::new(header, body).to_bytes()
}

#[test]
fn co2_waveform_record() {
    let mut data = vec![0u8; HEADER_SIZE];
    // r_len = 40 + 6 + 3 * 2
    data[0..2].copy_from_slice(&52i16.to_le_bytes());
    data[3] = 10;
    // main type: waveform
    data[14..16].copy_from_slice(&1i16.to_le_bytes());
    // SrDesc[0] = { offset: 0, type: 9 }, every other slot end of list
    data[16..19].copy_from_slice(&[0, 0, 9]);
    for slot in 1..8 {
        data[16 + slot * 3 + 2] = 0xFF;
    }

    // act_len 3, status 0x0001, label 0, samples [2500, -32000, 100]
    data.extend(hex::decode("030001000000c40900836400").unwrap());

    let decoded = decode_record(&data, &DecodeOptions::default()).unwrap();
    assert!(decoded.is_clean(), "{:?}", decoded.diagnostics);

    let record = decoded.value;
    assert_eq!(record.main_type(), MainType::Wave);
    assert_eq!(record.active_subrecord_count(), 1);

    let waveform = record.waveforms().next().unwrap();
    assert_eq!(waveform.ty, WaveformType::Co2);
    assert!(waveform.header.has_gap());
    assert_eq!(waveform.samples, vec![2500, -32000, 100]);
    assert_eq!(waveform.sampling_rate(), 25);

    let values = waveform.physical_values();
    assert_eq!(values[0], 25.0);
    assert!(values[1].is_nan());
    assert_eq!(values[2], 1.0);
}

#[test]
fn stream_stops_at_bad_length() {
    let first = record_bytes(MainType::Network, &[], vec![1, 2]);
    let mut second = record_bytes(MainType::Network, &[], vec![3, 4]);
    let third = record_bytes(MainType::Network, &[], vec![5, 6]);

    // longer than the second and third record together
    second[0..2].copy_from_slice(&500i16.to_le_bytes());

    let mut data = first.clone();
    data.extend(&second);
    data.extend(&third);

    for framing in [Framing::LengthPrefix, Framing::Header] {
        let result = split_records(&data, framing, &DecodeOptions::default());

        assert_eq!(result.value.len(), 1);
        let record = result.value[0].as_ref().unwrap();
        assert_eq!(record.value.header.r_len, 42);

        assert_eq!(
            result.diagnostics.as_slice(),
            &[Diagnostic::InvalidStreamLength {
                offset: 42,
                declared: 500,
                remaining: 84
            }]
        );
    }
}

#[test]
fn stream_continues_after_failed_record() {
    let first = record_bytes(MainType::Wave, &[], vec![]);
    // the record is framed, but its header is cut off
    let second = vec![6, 0, 1, 2, 3, 4];
    let third = record_bytes(MainType::Alarm, &[], vec![]);

    let mut data = first;
    data.extend(&second);
    data.extend(&third);

    let result = split_records(&data, Framing::LengthPrefix, &DecodeOptions::default());
    assert!(result.is_clean());
    assert_eq!(result.value.len(), 3);
    assert!(result.value[0].is_ok());
    assert_eq!(
        result.value[1],
        Err(RecordError {
            offset: 40,
            error: DecodeError::NotEnoughData {
                needed: 40,
                available: 6
            }
        })
    );
    assert_eq!(
        result.value[2].as_ref().map(|r| r.value.main_type()),
        Ok(MainType::Alarm)
    );
}

#[test]
fn alarm_decode_rejects_other_main_types() {
    let data = record_bytes(MainType::Phdb, &[], vec![]);

    assert_eq!(
        AlarmRecord::parse(&data),
        Err(DecodeError::MainTypeMismatch {
            expected: MainType::Alarm,
            found: MainType::Phdb
        })
    );

    let record = DatexRecord::parse(&data).unwrap().value;
    assert!(decode_alarm_record(&record).is_err());
}

#[test]
fn alarm_record_end_to_end() {
    let mut message = AlarmStatusMessage::default();
    message.displays[0] = AlarmDisplay::new("HR LOW", AlarmColor::Yellow);
    message.displays[1] = AlarmDisplay::new("ASYSTOLE", AlarmColor::Red);
    message.sound_on = true;

    let mut data = record_bytes(MainType::Alarm, &[(0, 1)], message.to_bytes());
    data.extend(record_bytes(MainType::Alarm, &[], vec![]));

    let result = split_alarm_records(&data);
    assert!(result.is_clean());
    assert_eq!(result.value.len(), 2);

    let first = result.value[0].as_ref().unwrap();
    let status = first.value.status.as_ref().unwrap();
    assert_eq!(status, &message);

    let (index, display) = status.highest_priority_alarm().unwrap();
    assert_eq!(index, 1);
    assert_eq!(display.text.as_str(), "ASYSTOLE");

    let second = result.value[1].as_ref().unwrap();
    assert!(second.value.status.is_none());
    assert_eq!(
        second.diagnostics.iter().last(),
        Some(&Diagnostic::MissingAlarmStatus)
    );
}

#[test]
fn active_subrecord_count_all_combinations() {
    for mask in 0u16..256 {
        let mut header = DatexHeader::default();
        for slot in 0..8 {
            if mask & (1 << slot) != 0 {
                header.set_subrecord(slot, 0, slot as u8);
            }
        }

        assert_eq!(
            header.active_subrecord_count(),
            mask.count_ones() as usize,
            "mask {mask:08b}"
        );

        let parsed = DatexHeader::parse(&header.to_bytes()).unwrap();
        assert_eq!(parsed, header);
    }
}

#[test]
fn groups_from_basic_payload() {
    let mut payload = Vec::new();
    // O2: status, label, et 16.50 %, fi 20.00 %
    payload.extend(hex::decode("000000007206d007").unwrap());
    // ECG extra: hr 72, max 120, min 40
    payload.extend(hex::decode("480078002800").unwrap());

    let phdb = PhdbRecord::new(
        Timestamp::from(1_700_000_000),
        PhysData::Basic(BasicPhysiologicalData::new(payload)),
        3,
    );

    let data = record_bytes(MainType::Phdb, &[(0, 16)], phdb.to_bytes());
    let decoded = decode_record(&data, &DecodeOptions::default()).unwrap();

    let record = decoded.value.phdb_records().next().unwrap();
    assert!(record.is_valid());
    assert_eq!(record.marker, 3);

    let basic = record.data.basic().unwrap();
    let o2: O2Group = basic.group(0).unwrap();
    assert_eq!(o2.et_percent(), 16.5);
    assert_eq!(o2.fi_percent(), 20.0);

    let ecg: EcgExtraGroup = basic.group(O2Group::SIZE).unwrap();
    assert_eq!(ecg.hr_ecg, 72);

    assert_eq!(
        basic.group::<CoWedgeGroup>(O2Group::SIZE),
        Err(DecodeError::NotEnoughData {
            needed: 8 + 12,
            available: 14
        })
    );
}

#[test]
fn explicit_class_is_reported() {
    let phdb = PhdbRecord::new(
        Timestamp::from(5),
        PhysData::Basic(BasicPhysiologicalData::new(vec![0; 4])),
        0,
    );
    let data = record_bytes(MainType::Phdb, &[(0, 18)], phdb.to_bytes());

    let options = DecodeOptions::default()
        .with_class_selection(ClassSelection::Explicit(crate::physiological::DataClass::Ext2));
    let decoded = decode_record(&data, &options).unwrap();

    match &decoded.value.subrecords[0].payload {
        SubrecordPayload::Physiological { record, .. } => {
            assert_eq!(record.data, PhysData::Ext2(vec![0; 4]));
        }
        other => panic!("unexpected payload {other:?}"),
    }
    assert!(matches!(
        decoded.diagnostics.iter().last(),
        Some(Diagnostic::DataClassMismatch { .. })
    ));
    assert_eq!(decoded.summary().decoded_subrecords, 1);
}
