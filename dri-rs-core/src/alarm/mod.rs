//! Alarm records.

mod display;
pub use display::{AlarmColor, AlarmDisplay, AlarmText};

use core::fmt;

use crate::{
    codec::{ByteReader, ByteWriter},
    header::{DatexHeader, MainType},
    record::DatexRecord,
    subrecord::{self, DecodeOptions, SubrecordPayload},
    Decoded, DecodeError, Diagnostic, Diagnostics,
};

/// Subrecord type of an alarm status message.
pub const ALARM_STATUS: u8 = 1;

/// Number of alarm slots in an alarm status message.
pub const ALARM_SLOTS: usize = 5;

/// Which alarms have been silenced at the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SilenceInfo {
    #[default]
    None,
    Apnea,
    Asystole,
    ApneaAsystole,
    All,
    All2Min,
    All5Min,
    All20S,
    Unknown(u8),
}

impl SilenceInfo {
    pub fn value(&self) -> u8 {
        match self {
            SilenceInfo::None => 0,
            SilenceInfo::Apnea => 1,
            SilenceInfo::Asystole => 2,
            SilenceInfo::ApneaAsystole => 3,
            SilenceInfo::All => 4,
            SilenceInfo::All2Min => 5,
            SilenceInfo::All5Min => 6,
            SilenceInfo::All20S => 7,
            SilenceInfo::Unknown(v) => *v,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SilenceInfo::Unknown(_))
    }

    pub fn description(&self) -> &'static str {
        match self {
            SilenceInfo::None => "Alarms are not silenced at bedside",
            SilenceInfo::Apnea => "Apnea alarms have been silenced at bedside",
            SilenceInfo::Asystole => "Asystole alarms have been silenced at bedside",
            SilenceInfo::ApneaAsystole => {
                "Both apnea and asystole alarms have been silenced at bedside"
            }
            SilenceInfo::All => "All alarms have been silenced at bedside",
            SilenceInfo::All2Min => "All alarms have been silenced at bedside for two minutes",
            SilenceInfo::All5Min => "All alarms have been silenced at bedside for five minutes",
            SilenceInfo::All20S => "All alarms have been silenced at bedside for 20 seconds",
            SilenceInfo::Unknown(_) => "Unknown silence info",
        }
    }
}

impl From<u8> for SilenceInfo {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Apnea,
            2 => Self::Asystole,
            3 => Self::ApneaAsystole,
            4 => Self::All,
            5 => Self::All2Min,
            6 => Self::All5Min,
            7 => Self::All20S,
            v => Self::Unknown(v),
        }
    }
}

impl fmt::Display for SilenceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SilenceInfo::Unknown(v) => write!(f, "Unknown silence info {v}"),
            other => write!(f, "{}", other.description()),
        }
    }
}

/// The alarm state of a monitor.
///
/// The monitor sorts `displays` by descending priority. They are kept in
/// the order they were received.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlarmStatusMessage {
    pub reserved: i16,
    pub sound_on: bool,
    pub reserved2: i16,
    pub reserved3: i16,
    pub silence_info: SilenceInfo,
    pub displays: [AlarmDisplay; ALARM_SLOTS],
    pub reserved4: [i16; 5],
}

impl AlarmStatusMessage {
    pub const SIZE: usize = 2 + 1 + 2 + 2 + 1 + ALARM_SLOTS * AlarmDisplay::SIZE + 5 * 2;

    /// Decode a message. Unknown silence info values and alarm colors are
    /// kept and reported as diagnostics.
    pub fn parse(data: &[u8]) -> Result<Decoded<Self>, DecodeError> {
        if data.len() < Self::SIZE {
            return Err(DecodeError::not_enough_data(Self::SIZE, data.len()));
        }

        let mut reader = ByteReader::new(data);

        let reserved = reader.read_i16()?;
        let sound_on = reader.read_bool()?;
        let reserved2 = reader.read_i16()?;
        let reserved3 = reader.read_i16()?;
        let silence_info = SilenceInfo::from(reader.read_u8()?);

        let mut displays: [AlarmDisplay; ALARM_SLOTS] = Default::default();
        for display in displays.iter_mut() {
            *display = AlarmDisplay::read(&mut reader)?;
        }

        let mut reserved4 = [0i16; 5];
        for word in reserved4.iter_mut() {
            *word = reader.read_i16()?;
        }

        let message = Self {
            reserved,
            sound_on,
            reserved2,
            reserved3,
            silence_info,
            displays,
            reserved4,
        };

        let diagnostics = message.validate();
        Ok(Decoded::new(message, diagnostics))
    }

    fn validate(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        if !self.silence_info.is_known() {
            diagnostics.push(Diagnostic::UnknownSilenceInfo(self.silence_info.value()));
        }

        for (slot, display) in self.displays.iter().enumerate() {
            if !display.color.is_known() {
                diagnostics.push(Diagnostic::UnknownAlarmColor {
                    slot,
                    color: display.color.value(),
                });
            }
        }

        diagnostics
    }

    pub fn write(&self, writer: &mut ByteWriter) {
        writer
            .write_i16(self.reserved)
            .write_bool(self.sound_on)
            .write_i16(self.reserved2)
            .write_i16(self.reserved3)
            .write_u8(self.silence_info.value());

        for display in &self.displays {
            display.write(writer);
        }

        for word in self.reserved4 {
            writer.write_i16(word);
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(Self::SIZE);
        self.write(&mut writer);
        writer.into_inner()
    }

    /// Number of slots with any color other than "no alarm".
    pub fn active_alarm_count(&self) -> usize {
        self.displays.iter().filter(|d| d.is_active()).count()
    }

    /// The slot with the most severe known color. The first slot wins if
    /// several share that color.
    pub fn highest_priority_alarm(&self) -> Option<(usize, &AlarmDisplay)> {
        let mut highest: Option<(usize, &AlarmDisplay)> = None;

        for (index, display) in self.displays.iter().enumerate() {
            let Some(priority) = display.color.priority() else {
                continue;
            };

            let is_higher = highest
                .and_then(|(_, current)| current.color.priority())
                .map_or(true, |current| priority > current);

            if is_higher {
                highest = Some((index, display));
            }
        }

        highest
    }

    pub fn is_sound_on(&self) -> bool {
        self.sound_on
    }

    pub fn is_silenced(&self) -> bool {
        self.silence_info != SilenceInfo::None
    }
}

/// A decoded alarm record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmRecord {
    pub header: DatexHeader,
    /// The first alarm status subrecord of the record.
    pub status: Option<AlarmStatusMessage>,
}

impl AlarmRecord {
    /// Parse a record from the start of `data` and decode it as an alarm
    /// record.
    pub fn parse(data: &[u8]) -> Result<Decoded<Self>, DecodeError> {
        let (record, mut diagnostics) = DatexRecord::parse(data)?.into_parts();
        let (alarm, alarm_diagnostics) = decode_alarm_record(&record)?.into_parts();
        diagnostics.extend(alarm_diagnostics);

        Ok(Decoded::new(alarm, diagnostics))
    }
}

/// Decode the alarm status of an alarm main type record.
///
/// Any other main type fails with [`DecodeError::MainTypeMismatch`].
pub fn decode_alarm_record(record: &DatexRecord) -> Result<Decoded<AlarmRecord>, DecodeError> {
    record.expect_main_type(MainType::Alarm)?;

    let (subrecords, mut diagnostics) =
        subrecord::dispatch(record, &DecodeOptions::default()).into_parts();

    let status = subrecords
        .into_iter()
        .find_map(|s| match s.payload {
            SubrecordPayload::AlarmStatus(status) => Some(status),
            _ => None,
        });

    if status.is_none() {
        diagnostics.push(Diagnostic::MissingAlarmStatus);
    }

    let alarm = AlarmRecord {
        header: record.header.clone(),
        status,
    };

    Ok(Decoded::new(alarm, diagnostics))
}
