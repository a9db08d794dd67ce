//! Waveform subrecords.
//!
//! A waveform subrecord carries a 6 byte [`WaveformHeader`] followed by
//! `act_len` signed 16 bit samples. How a sample translates to a physical
//! value, and how fast samples are produced, depends only on the subrecord
//! type, described by [`WaveformType`].

mod data;
pub use data::{split_waveforms, Sample, Waveform, WaveformHeader, WaveformStatus};

use core::fmt;

/// Samples at or below this value are control codes, not measurements.
pub const CONTROL_CODE_LIMIT: i16 = -32000;

/// Sampling rate used for types without a known rate.
pub const DEFAULT_SAMPLING_RATE: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaveformType {
    Ecg1,
    Ecg2,
    Ecg3,
    Invp1,
    Invp2,
    Invp3,
    Invp4,
    Pleth,
    Co2,
    O2,
    N2O,
    /// Anesthesia agent.
    Aa,
    /// Airway pressure.
    Awp,
    /// Airway flow.
    Flow,
    /// Respiration measured from the ECG leads.
    Resp,
    Invp5,
    Invp6,
    Eeg1,
    Eeg2,
    Eeg3,
    Eeg4,
    Ecg12,
    /// Airway volume.
    Vol,
    /// Tonometry catheter pressure.
    TonoPress,
    /// Spirometry loop bit pattern.
    SpiLoopStatus,
    Ent100,
    EegBis,
    Invp7,
    Invp8,
    Pleth2,
    /// High resolution impedance respiration.
    Resp100,
    Unknown(u8),
}

/// How raw samples of a waveform type are scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Ecg12,
    InvasivePressure,
    Pleth,
    Gas,
    Other,
}

impl WaveformType {
    pub fn value(&self) -> u8 {
        match self {
            WaveformType::Ecg1 => 1,
            WaveformType::Ecg2 => 2,
            WaveformType::Ecg3 => 3,
            WaveformType::Invp1 => 4,
            WaveformType::Invp2 => 5,
            WaveformType::Invp3 => 6,
            WaveformType::Invp4 => 7,
            WaveformType::Pleth => 8,
            WaveformType::Co2 => 9,
            WaveformType::O2 => 10,
            WaveformType::N2O => 11,
            WaveformType::Aa => 12,
            WaveformType::Awp => 13,
            WaveformType::Flow => 14,
            WaveformType::Resp => 15,
            WaveformType::Invp5 => 16,
            WaveformType::Invp6 => 17,
            WaveformType::Eeg1 => 18,
            WaveformType::Eeg2 => 19,
            WaveformType::Eeg3 => 20,
            WaveformType::Eeg4 => 21,
            WaveformType::Ecg12 => 22,
            WaveformType::Vol => 23,
            WaveformType::TonoPress => 24,
            WaveformType::SpiLoopStatus => 29,
            WaveformType::Ent100 => 32,
            WaveformType::EegBis => 35,
            WaveformType::Invp7 => 36,
            WaveformType::Invp8 => 37,
            WaveformType::Pleth2 => 38,
            WaveformType::Resp100 => 39,
            WaveformType::Unknown(v) => *v,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, WaveformType::Unknown(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            WaveformType::Ecg1 => "ECG 1",
            WaveformType::Ecg2 => "ECG 2",
            WaveformType::Ecg3 => "ECG 3",
            WaveformType::Invp1 => "Invasive Pressure 1",
            WaveformType::Invp2 => "Invasive Pressure 2",
            WaveformType::Invp3 => "Invasive Pressure 3",
            WaveformType::Invp4 => "Invasive Pressure 4",
            WaveformType::Pleth => "Plethysmograph",
            WaveformType::Co2 => "CO2",
            WaveformType::O2 => "O2",
            WaveformType::N2O => "N2O",
            WaveformType::Aa => "Anesthesia Agent",
            WaveformType::Awp => "Airway Pressure",
            WaveformType::Flow => "Airway Flow",
            WaveformType::Resp => "ECG Respiratory",
            WaveformType::Invp5 => "Invasive Pressure 5",
            WaveformType::Invp6 => "Invasive Pressure 6",
            WaveformType::Eeg1 => "EEG 1",
            WaveformType::Eeg2 => "EEG 2",
            WaveformType::Eeg3 => "EEG 3",
            WaveformType::Eeg4 => "EEG 4",
            WaveformType::Ecg12 => "12-Lead ECG",
            WaveformType::Vol => "Airway Volume",
            WaveformType::TonoPress => "Tonometry Pressure",
            WaveformType::SpiLoopStatus => "Spirometry Loop",
            WaveformType::Ent100 => "Entropy",
            WaveformType::EegBis => "BIS",
            WaveformType::Invp7 => "Invasive Pressure 7",
            WaveformType::Invp8 => "Invasive Pressure 8",
            WaveformType::Pleth2 => "Plethysmograph 2",
            WaveformType::Resp100 => "High Resolution Respiration",
            WaveformType::Unknown(_) => "Unknown",
        }
    }

    fn channel(&self) -> Channel {
        use WaveformType::*;

        match self {
            Ecg12 => Channel::Ecg12,
            Invp1 | Invp2 | Invp3 | Invp4 | Invp5 | Invp6 | Invp7 | Invp8 => {
                Channel::InvasivePressure
            }
            Pleth | Pleth2 => Channel::Pleth,
            Co2 | O2 | N2O | Aa => Channel::Gas,
            _ => Channel::Other,
        }
    }

    /// Samples per second. Types without a dedicated rate use the ECG rate.
    pub fn sampling_rate(&self) -> u32 {
        match self.channel() {
            Channel::Ecg12 => 500,
            Channel::InvasivePressure | Channel::Pleth => 100,
            Channel::Gas => 25,
            Channel::Other => DEFAULT_SAMPLING_RATE,
        }
    }

    /// The value a raw sample is divided by to get [`Self::unit`].
    pub fn divisor(&self) -> f64 {
        match self.channel() {
            Channel::InvasivePressure | Channel::Pleth | Channel::Gas => 100.0,
            Channel::Ecg12 | Channel::Other => 1.0,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            WaveformType::Ecg12 => "μV",
            WaveformType::TonoPress => "mmHg",
            WaveformType::Awp => "cmH2O",
            WaveformType::Flow => "L/min",
            WaveformType::Vol => "mL",
            other => match other.channel() {
                Channel::InvasivePressure => "mmHg",
                Channel::Pleth | Channel::Gas => "%",
                _ => "raw",
            },
        }
    }

    /// Convert a raw sample of this type to its physical value.
    pub fn physical_value(&self, sample: i16) -> f64 {
        physical_value(sample, self.divisor())
    }
}

impl From<u8> for WaveformType {
    fn from(value: u8) -> Self {
        use WaveformType::*;

        match value {
            1 => Ecg1,
            2 => Ecg2,
            3 => Ecg3,
            4 => Invp1,
            5 => Invp2,
            6 => Invp3,
            7 => Invp4,
            8 => Pleth,
            9 => Co2,
            10 => O2,
            11 => N2O,
            12 => Aa,
            13 => Awp,
            14 => Flow,
            15 => Resp,
            16 => Invp5,
            17 => Invp6,
            18 => Eeg1,
            19 => Eeg2,
            20 => Eeg3,
            21 => Eeg4,
            22 => Ecg12,
            23 => Vol,
            24 => TonoPress,
            29 => SpiLoopStatus,
            32 => Ent100,
            35 => EegBis,
            36 => Invp7,
            37 => Invp8,
            38 => Pleth2,
            39 => Resp100,
            v => Unknown(v),
        }
    }
}

impl fmt::Display for WaveformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaveformType::Unknown(v) => write!(f, "Unknown Type {v}"),
            other => write!(f, "{}", other.name()),
        }
    }
}

pub fn is_control_code(sample: i16) -> bool {
    sample <= CONTROL_CODE_LIMIT
}

/// Scale `sample` by `divisor`. Control codes have no physical value and
/// yield `NaN`.
pub fn physical_value(sample: i16, divisor: f64) -> f64 {
    if is_control_code(sample) {
        f64::NAN
    } else {
        sample as f64 / divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table() {
        let co2 = WaveformType::from(9);
        assert_eq!(co2, WaveformType::Co2);
        assert_eq!(co2.sampling_rate(), 25);
        assert_eq!(co2.divisor(), 100.0);
        assert_eq!(co2.unit(), "%");

        let ecg12 = WaveformType::from(22);
        assert_eq!(ecg12.sampling_rate(), 500);
        assert_eq!(ecg12.divisor(), 1.0);
        assert_eq!(ecg12.unit(), "μV");

        let invp7 = WaveformType::from(36);
        assert_eq!(invp7.sampling_rate(), 100);
        assert_eq!(invp7.unit(), "mmHg");

        assert_eq!(WaveformType::from(24).unit(), "mmHg");
        assert_eq!(WaveformType::from(24).divisor(), 1.0);
        assert_eq!(WaveformType::from(13).unit(), "cmH2O");
        assert_eq!(WaveformType::from(15).unit(), "raw");
    }

    #[test]
    fn unknown_types_use_ecg_defaults() {
        let unknown = WaveformType::from(200);
        assert_eq!(unknown, WaveformType::Unknown(200));
        assert!(!unknown.is_known());
        assert_eq!(unknown.sampling_rate(), DEFAULT_SAMPLING_RATE);
        assert_eq!(unknown.divisor(), 1.0);
        assert_eq!(unknown.to_string(), "Unknown Type 200");
    }

    #[test]
    fn every_known_value_maps_back() {
        for value in 0..=u8::MAX {
            assert_eq!(WaveformType::from(value).value(), value);
        }
    }

    #[test]
    fn control_codes_are_nan() {
        for sample in [i16::MIN, -32001, -32000] {
            assert!(is_control_code(sample));
            assert!(WaveformType::Co2.physical_value(sample).is_nan());
        }

        for sample in [-31999i16, 0, 2500, i16::MAX] {
            assert!(!is_control_code(sample));
            assert_eq!(
                WaveformType::Invp1.physical_value(sample),
                sample as f64 / 100.0
            );
            assert_eq!(WaveformType::Ecg12.physical_value(sample), sample as f64);
        }
    }
}
