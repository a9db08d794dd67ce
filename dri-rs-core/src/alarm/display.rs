use core::fmt;
use std::borrow::Cow;

use crate::codec::{ByteReader, ByteWriter, ReadError};

/// Alarm priority, as shown by the color of the alarm on the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlarmColor {
    #[default]
    None,
    White,
    Yellow,
    Red,
    Unknown(u8),
}

impl AlarmColor {
    pub fn value(&self) -> u8 {
        match self {
            AlarmColor::None => 0,
            AlarmColor::White => 1,
            AlarmColor::Yellow => 2,
            AlarmColor::Red => 3,
            AlarmColor::Unknown(v) => *v,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AlarmColor::None => "No alarm",
            AlarmColor::White => "White",
            AlarmColor::Yellow => "Yellow",
            AlarmColor::Red => "Red",
            AlarmColor::Unknown(_) => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AlarmColor::Unknown(_))
    }

    /// Any color other than [`AlarmColor::None`], unknown colors included.
    pub fn is_active(&self) -> bool {
        self.value() >= 1
    }

    /// Rank of a known, active color. Red ranks highest.
    pub fn priority(&self) -> Option<u8> {
        match self {
            AlarmColor::White | AlarmColor::Yellow | AlarmColor::Red => Some(self.value()),
            AlarmColor::None | AlarmColor::Unknown(_) => None,
        }
    }
}

impl From<u8> for AlarmColor {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::None,
            1 => Self::White,
            2 => Self::Yellow,
            3 => Self::Red,
            v => Self::Unknown(v),
        }
    }
}

impl fmt::Display for AlarmColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlarmColor::Unknown(v) => write!(f, "Unknown color {v}"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// The text of an alarm: at most [`AlarmText::MAX_LEN`] bytes, without the
/// null terminator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlarmText(Vec<u8>);

impl AlarmText {
    pub const MAX_LEN: usize = 80;

    /// Create a text from `text`, truncated to [`Self::MAX_LEN`] bytes at
    /// a character boundary.
    pub fn new(text: &str) -> Self {
        let end = text
            .char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .take_while(|end| *end <= Self::MAX_LEN)
            .last()
            .unwrap_or(0);

        Self::from_bytes(text[..end].as_bytes())
    }

    /// Take the bytes of `bytes` up to the first null byte, or up to
    /// [`Self::MAX_LEN`] bytes if there is none.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let bytes = &bytes[..bytes.len().min(Self::MAX_LEN)];
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
        Self(bytes[..end].to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The null padded wire form.
    pub fn to_field(&self) -> [u8; Self::MAX_LEN] {
        let mut field = [0u8; Self::MAX_LEN];
        field[..self.0.len()].copy_from_slice(&self.0);
        field
    }
}

impl fmt::Display for AlarmText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One alarm slot of an alarm status message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlarmDisplay {
    pub text: AlarmText,
    /// The text changed since the previous transmission.
    pub text_changed: bool,
    pub color: AlarmColor,
    pub color_changed: bool,
    pub reserved: [i16; 5],
}

impl AlarmDisplay {
    pub const SIZE: usize = 93;

    pub fn new(text: &str, color: AlarmColor) -> Self {
        Self {
            text: AlarmText::new(text),
            color,
            ..Default::default()
        }
    }

    pub(crate) fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        let text = AlarmText::from_bytes(&reader.read_array::<{ AlarmText::MAX_LEN }>()?);
        let text_changed = reader.read_bool()?;
        let color = AlarmColor::from(reader.read_u8()?);
        let color_changed = reader.read_bool()?;

        let mut reserved = [0i16; 5];
        for word in reserved.iter_mut() {
            *word = reader.read_i16()?;
        }

        Ok(Self {
            text,
            text_changed,
            color,
            color_changed,
            reserved,
        })
    }

    pub(crate) fn write(&self, writer: &mut ByteWriter) {
        writer
            .write_bytes(&self.text.to_field())
            .write_bool(self.text_changed)
            .write_u8(self.color.value())
            .write_bool(self.color_changed);

        for word in self.reserved {
            writer.write_i16(word);
        }
    }

    pub fn is_active(&self) -> bool {
        self.color.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_stops_at_null() {
        let text = AlarmText::from_bytes(b"HR HIGH\0garbage");
        assert_eq!(text.as_str(), "HR HIGH");
        assert_eq!(text.len(), 7);

        let mut field = text.to_field();
        assert_eq!(&field[..8], b"HR HIGH\0");
        assert!(field[8..].iter().all(|b| *b == 0));

        field[79] = b'X';
        assert_eq!(AlarmText::from_bytes(&field), text);
    }

    #[test]
    fn text_is_truncated() {
        let long = "A".repeat(100);
        let text = AlarmText::new(&long);
        assert_eq!(text.len(), AlarmText::MAX_LEN);

        // 'é' is two bytes and would straddle the limit
        let accented = format!("{}é", "A".repeat(79));
        let text = AlarmText::new(&accented);
        assert_eq!(text.len(), 79);
        assert_eq!(text.as_str(), "A".repeat(79));

        let full = AlarmText::from_bytes(&[b'B'; 80]);
        assert_eq!(full.len(), 80);
        assert!(!full.is_empty());
    }

    #[test]
    fn colors() {
        assert_eq!(AlarmColor::from(3), AlarmColor::Red);
        assert_eq!(AlarmColor::from(3).name(), "Red");
        assert!(!AlarmColor::None.is_active());
        assert!(AlarmColor::Unknown(9).is_active());
        assert_eq!(AlarmColor::Unknown(9).priority(), None);
        assert_eq!(AlarmColor::from(9).to_string(), "Unknown color 9");
    }

    #[test]
    fn display_layout() {
        let mut display = AlarmDisplay::new("APNEA", AlarmColor::Red);
        display.color_changed = true;
        display.reserved[4] = -2;

        let mut writer = ByteWriter::new();
        display.write(&mut writer);
        let bytes = writer.into_inner();

        assert_eq!(bytes.len(), AlarmDisplay::SIZE);
        assert_eq!(&bytes[80..83], &[0, 3, 1]);
        assert_eq!(&bytes[91..93], &[0xFE, 0xFF]);

        let parsed = AlarmDisplay::read(&mut ByteReader::new(&bytes)).unwrap();
        assert_eq!(parsed, display);
    }
}
