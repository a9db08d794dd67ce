use dri_rs_core::{
    alarm::{AlarmColor, AlarmDisplay, AlarmStatusMessage},
    header::{DatexHeader, DriLevel, MainType},
    stream::{Framing, RecordError},
    waveform::{Waveform, WaveformType},
    DatexRecord, DecodeError,
};

use crate::{DecoderConfig, Dri, DriError};

fn record_bytes(main_type: MainType, descriptors: &[(i16, u8)], body: Vec<u8>) -> Vec<u8> {
    let mut header = DatexHeader {
        main_type,
        dri_level: DriLevel::L09,
        ..Default::default()
    };
    for (index, (offset, ty)) in descriptors.iter().enumerate() {
        header.set_subrecord(index, *offset, *ty);
    }
    DatexRecord::new(header, body).to_bytes()
}

fn ecg_record(samples: Vec<i16>) -> Vec<u8> {
    let waveform = Waveform::new(WaveformType::Ecg1, 0, samples);
    record_bytes(MainType::Wave, &[(0, 1)], waveform.to_bytes())
}

#[test]
fn decode_waveform_record() {
    let dri = Dri::default();
    let decoded = dri.decode(&ecg_record(vec![10, 20, 30])).unwrap();

    assert!(decoded.is_clean());
    let summary = decoded.summary();
    assert_eq!(summary.main_type, MainType::Wave);
    assert_eq!(summary.active_subrecords, 1);
    assert_eq!(summary.decoded_subrecords, 1);

    let waveform = decoded.value.waveforms().next().unwrap();
    assert_eq!(waveform.samples, vec![10, 20, 30]);
}

#[test]
fn strict_decoder_rejects_diagnostics() {
    // a second ECG slot after the end of list marker
    let mut data = ecg_record(vec![1]);
    data[16 + 3 * 3..16 + 4 * 3].copy_from_slice(&[0, 0, 1]);

    let lenient = Dri::default();
    assert_eq!(lenient.decode(&data).unwrap().diagnostics.len(), 1);

    let strict = Dri::new(DecoderConfig::new().with_strict(true));
    assert!(matches!(strict.decode(&data), Err(DriError::Diagnostics(m)) if m.len() == 1));
}

#[test]
fn decode_alarm_checks_main_type() {
    let dri = Dri::default();

    let mut message = AlarmStatusMessage::default();
    message.displays[0] = AlarmDisplay::new("SpO2 LOW", AlarmColor::Yellow);
    let alarm = record_bytes(MainType::Alarm, &[(0, 1)], message.to_bytes());

    let decoded = dri.decode_alarm(&alarm).unwrap();
    assert_eq!(decoded.value.status, Some(message));

    assert_eq!(
        dri.decode_alarm(&ecg_record(vec![])),
        Err(DriError::Decode(DecodeError::MainTypeMismatch {
            expected: MainType::Alarm,
            found: MainType::Wave
        }))
    );
}

#[test]
fn records_yield_failed_and_stop_at_bad_length() {
    let mut data = ecg_record(vec![1, 2]);
    // framed, but too short for a header
    data.extend([8, 0, 0, 0, 0, 0, 0, 0]);
    data.extend(ecg_record(vec![3]));
    let mut corrupt = ecg_record(vec![4]);
    corrupt[0] = 0xFF;
    corrupt[1] = 0x7F;
    data.extend(corrupt);
    data.extend(ecg_record(vec![5]));

    let dri = Dri::default();
    let records: Vec<_> = dri.records(&data).collect();
    assert_eq!(records.len(), 3);
    assert!(matches!(
        &records[1],
        Err(DriError::Record(RecordError { offset: 50, .. }))
    ));

    let samples: Vec<_> = records
        .iter()
        .flatten()
        .flat_map(|r| r.value.waveforms().next().map(|w| w.samples.clone()))
        .collect();
    assert_eq!(samples, vec![vec![1, 2], vec![3]]);

    let all = dri.decode_all(&data);
    assert_eq!(all.value.len(), 3);
    assert!(all.value[0].is_ok());
    assert!(matches!(all.value[1], Err(DriError::Record(_))));
    assert!(all.value[2].is_ok());
    assert_eq!(all.diagnostics.len(), 1);
}

#[test]
fn strict_mode_applies_to_every_entry_point() {
    let mut data = ecg_record(vec![1]);
    // reserved2
    data[11] = 1;
    data.extend(ecg_record(vec![2]));

    let lenient = Dri::default();
    assert!(lenient.records(&data).all(|r| r.is_ok()));
    assert!(lenient.decode_all(&data).value.iter().all(Result::is_ok));

    let strict = Dri::new(DecoderConfig::new().with_strict(true));

    let records: Vec<_> = strict.records(&data).collect();
    assert_eq!(records.len(), 2);
    assert!(matches!(&records[0], Err(DriError::Diagnostics(m)) if m.len() == 1));
    assert!(records[1].is_ok());

    let all = strict.decode_all(&data);
    assert_eq!(all.value.len(), 2);
    assert!(matches!(&all.value[0], Err(DriError::Diagnostics(m)) if m.len() == 1));
    assert!(all.value[1].is_ok());
    assert!(all.is_clean());
}

#[test]
fn header_framing() {
    let mut data = ecg_record(vec![7]);
    data.extend(ecg_record(vec![8, 9]));

    let dri = Dri::new(DecoderConfig::new().with_framing(Framing::Header));
    assert_eq!(dri.records(&data).count(), 2);
}

#[test]
fn error_display() {
    let error = DriError::from(DecodeError::InvalidSampleCount(-1));
    assert_eq!(error.to_string(), "invalid waveform sample count -1");

    let error = DriError::from(RecordError {
        offset: 12,
        error: DecodeError::InvalidSampleCount(-1),
    });
    assert_eq!(
        error.to_string(),
        "record at offset 12: invalid waveform sample count -1"
    );

    let error = DriError::Diagnostics(vec!["a".into(), "b".into()]);
    assert_eq!(error.to_string(), "record decoded with 2 diagnostic(s), first: a");
}
