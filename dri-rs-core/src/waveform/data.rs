use core::time::Duration;

use super::{is_control_code, physical_value, WaveformType};
use crate::{
    codec::{ByteReader, ByteWriter},
    Decoded, DecodeError, Diagnostic, Diagnostics,
};

bitflags::bitflags! {
    pub struct WaveformStatus: u16 {
        const GAP = 1 << 0;
        const PACER_DETECTED = 1 << 2;
        const LEAD_OFF = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaveformHeader {
    /// Number of samples following the header.
    pub act_len: i16,
    pub status: u16,
    /// Reserved.
    pub label: u16,
}

impl WaveformHeader {
    pub const SIZE: usize = 6;

    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = ByteReader::new(data);

        Ok(Self {
            act_len: reader.read_i16()?,
            status: reader.read_u16()?,
            label: reader.read_u16()?,
        })
    }

    pub fn write(&self, writer: &mut ByteWriter) {
        writer
            .write_i16(self.act_len)
            .write_u16(self.status)
            .write_u16(self.label);
    }

    /// The known status bits. Use [`Self::status_bit`] for the others.
    pub fn flags(&self) -> WaveformStatus {
        WaveformStatus::from_bits_truncate(self.status)
    }

    pub fn has_gap(&self) -> bool {
        self.flags().contains(WaveformStatus::GAP)
    }

    pub fn has_pacer_detected(&self) -> bool {
        self.flags().contains(WaveformStatus::PACER_DETECTED)
    }

    pub fn has_lead_off(&self) -> bool {
        self.flags().contains(WaveformStatus::LEAD_OFF)
    }

    /// Whether bit `bit` (0..16) of the status word is set.
    pub fn status_bit(&self, bit: u32) -> bool {
        bit < u16::BITS && self.status & (1 << bit) != 0
    }

    pub fn status_bits(&self) -> [bool; 16] {
        let mut bits = [false; 16];
        for (bit, value) in bits.iter_mut().enumerate() {
            *value = self.status_bit(bit as u32);
        }
        bits
    }

    /// Total size of the waveform described by this header, if `act_len`
    /// is not negative.
    pub fn total_len(&self) -> Result<usize, DecodeError> {
        let count = usize::try_from(self.act_len)
            .map_err(|_| DecodeError::InvalidSampleCount(self.act_len))?;
        Ok(Self::SIZE + count * 2)
    }
}

/// One sample of a [`Waveform`], with its physical interpretation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub index: usize,
    pub raw: i16,
    /// `NaN` for control codes.
    pub physical: f64,
    pub is_control_code: bool,
    /// Time of the sample relative to the first sample.
    pub offset: Duration,
}

/// A decoded waveform subrecord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveform {
    pub ty: WaveformType,
    pub header: WaveformHeader,
    pub samples: Vec<i16>,
}

impl Waveform {
    /// Decode a waveform of type `ty` from the start of `data`.
    ///
    /// Fails if `data` is shorter than the header plus the `act_len`
    /// samples it announces. Bytes after the last sample are ignored.
    pub fn parse(data: &[u8], ty: WaveformType) -> Result<Self, DecodeError> {
        let header = WaveformHeader::parse(data)?;
        let total_len = header.total_len()?;

        if data.len() < total_len {
            return Err(DecodeError::not_enough_data(total_len, data.len()));
        }

        let mut reader = ByteReader::new(&data[WaveformHeader::SIZE..total_len]);
        let samples = (0..header.act_len)
            .map(|_| reader.read_i16())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            ty,
            header,
            samples,
        })
    }

    /// Build a waveform, setting `act_len` to the number of samples.
    ///
    /// Samples past the first `i16::MAX` are dropped.
    pub fn new(ty: WaveformType, status: u16, mut samples: Vec<i16>) -> Self {
        samples.truncate(i16::MAX as usize);
        let header = WaveformHeader {
            act_len: samples.len() as i16,
            status,
            label: 0,
        };

        Self {
            ty,
            header,
            samples,
        }
    }

    /// Size of the encoded waveform.
    pub fn size(&self) -> usize {
        WaveformHeader::SIZE + self.samples.len() * 2
    }

    pub fn write(&self, writer: &mut ByteWriter) {
        self.header.write(writer);
        for sample in &self.samples {
            writer.write_i16(*sample);
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.size());
        self.write(&mut writer);
        writer.into_inner()
    }

    pub fn sampling_rate(&self) -> u32 {
        self.ty.sampling_rate()
    }

    pub fn unit(&self) -> &'static str {
        self.ty.unit()
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(1) / self.sampling_rate()
    }

    /// Time covered by the samples, in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sampling_rate() as f64
    }

    pub fn control_code_count(&self) -> usize {
        self.samples.iter().filter(|s| is_control_code(**s)).count()
    }

    pub fn physical_values(&self) -> Vec<f64> {
        let divisor = self.ty.divisor();
        self.samples
            .iter()
            .map(|s| physical_value(*s, divisor))
            .collect()
    }

    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        let divisor = self.ty.divisor();
        let interval = self.sample_interval();

        self.samples.iter().enumerate().map(move |(index, raw)| Sample {
            index,
            raw: *raw,
            physical: physical_value(*raw, divisor),
            is_control_code: is_control_code(*raw),
            offset: interval * index as u32,
        })
    }
}

/// Decode back-to-back waveforms of type `ty`.
///
/// The scan stops at the first waveform that cannot be decoded, reporting
/// it as a diagnostic. Waveforms decoded before it are kept.
pub fn split_waveforms(data: &[u8], ty: WaveformType) -> Decoded<Vec<Waveform>> {
    let mut waveforms = Vec::new();
    let mut diagnostics = Diagnostics::new();
    let mut offset = 0;

    while offset < data.len() {
        match Waveform::parse(&data[offset..], ty) {
            Ok(waveform) => {
                offset += waveform.size();
                waveforms.push(waveform);
            }
            Err(error) => {
                diagnostics.push(Diagnostic::IncompleteWaveform { offset, error });
                break;
            }
        }
    }

    Decoded::new(waveforms, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(act_len: i16, status: u16, samples: &[i16]) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        WaveformHeader {
            act_len,
            status,
            label: 0,
        }
        .write(&mut writer);
        for sample in samples {
            writer.write_i16(*sample);
        }
        writer.into_inner()
    }

    #[test]
    fn decodes_samples() {
        let data = bytes(3, 0x0001, &[2500, -32000, 100]);
        let waveform = Waveform::parse(&data, WaveformType::Co2).unwrap();

        assert!(waveform.header.has_gap());
        assert!(!waveform.header.has_pacer_detected());
        assert_eq!(waveform.samples, vec![2500, -32000, 100]);

        let values = waveform.physical_values();
        assert_eq!(values[0], 25.0);
        assert!(values[1].is_nan());
        assert_eq!(values[2], 1.0);
        assert_eq!(waveform.control_code_count(), 1);
        assert_eq!(waveform.sampling_rate(), 25);
        assert_eq!(waveform.to_bytes(), data);
    }

    #[test]
    fn status_bits_are_independent() {
        let header = WaveformHeader {
            act_len: 0,
            status: 0x800D,
            label: 0,
        };

        assert!(header.has_gap());
        assert!(header.has_pacer_detected());
        assert!(header.has_lead_off());
        assert!(header.status_bit(15));
        assert!(!header.status_bit(1));
        assert!(!header.status_bit(16));
        assert_eq!(header.status_bits().iter().filter(|b| **b).count(), 4);
        assert_eq!(header.flags().bits(), 0x000D);
    }

    #[test]
    fn short_sample_data() {
        let mut data = bytes(4, 0, &[1, 2, 3, 4]);
        data.truncate(12);

        assert_eq!(
            Waveform::parse(&data, WaveformType::Ecg1),
            Err(DecodeError::NotEnoughData {
                needed: 14,
                available: 12
            })
        );
    }

    #[test]
    fn negative_sample_count() {
        let data = bytes(-1, 0, &[]);
        assert_eq!(
            Waveform::parse(&data, WaveformType::Ecg1),
            Err(DecodeError::InvalidSampleCount(-1))
        );
    }

    #[test]
    fn timing() {
        let waveform = Waveform::new(WaveformType::Invp1, 0, vec![0; 50]);
        assert_eq!(waveform.header.act_len, 50);
        assert_eq!(waveform.duration_secs(), 0.5);
        assert_eq!(waveform.sample_interval(), Duration::from_millis(10));

        let last = waveform.samples().last().unwrap();
        assert_eq!(last.index, 49);
        assert_eq!(last.offset, Duration::from_millis(490));
    }

    #[test]
    fn oversized_waveform_is_truncated() {
        let waveform = Waveform::new(WaveformType::Ecg1, 0, vec![1; 40_000]);
        assert_eq!(waveform.header.act_len, i16::MAX);
        assert_eq!(waveform.samples.len(), i16::MAX as usize);
        assert_eq!(waveform.header.total_len(), Ok(waveform.size()));
    }

    #[test]
    fn splits_concatenated_waveforms() {
        let mut data = bytes(2, 0, &[100, 200]);
        data.extend(bytes(1, 0x0008, &[300]));
        data.extend(bytes(5, 0, &[1]));

        let decoded = split_waveforms(&data, WaveformType::Pleth);
        assert_eq!(decoded.value.len(), 2);
        assert_eq!(decoded.value[1].samples, vec![300]);
        assert!(decoded.value[1].header.has_lead_off());
        assert_eq!(
            decoded.diagnostics.as_slice(),
            &[Diagnostic::IncompleteWaveform {
                offset: 18,
                error: DecodeError::NotEnoughData {
                    needed: 16,
                    available: 8
                }
            }]
        );
    }
}
