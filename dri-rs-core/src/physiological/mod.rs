//! Physiological database (PHDB) subrecords.
//!
//! Displayed values, 10 second trends and 60 second trends share one layout:
//! a time stamp, a class specific payload and a 4 byte trailer whose
//! `cl_drilvl_subt` word names the class of the payload. Which class the
//! payload is decoded as is chosen with a [`ClassSelection`].

mod aux_info;
mod class_mask;
pub mod groups;

pub use aux_info::AuxPhysiologicalInfo;
pub use class_mask::PhdbClassRequest;

use core::fmt;

use crate::{
    codec::{ByteReader, ByteWriter},
    Decoded, DecodeError, Diagnostic, Diagnostics, Timestamp,
};

use groups::Group;

/// Bits 8-11 of `cl_drilvl_subt`.
pub const CLASS_MASK: u16 = 0x0F00;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhdbSubrecordType {
    Displayed,
    Trend10s,
    Trend60s,
    AuxInfo,
    Unknown(u8),
}

impl PhdbSubrecordType {
    pub fn value(&self) -> u8 {
        match self {
            PhdbSubrecordType::Displayed => 16,
            PhdbSubrecordType::Trend10s => 17,
            PhdbSubrecordType::Trend60s => 18,
            PhdbSubrecordType::AuxInfo => 19,
            PhdbSubrecordType::Unknown(v) => *v,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PhdbSubrecordType::Displayed => "Displayed Values",
            PhdbSubrecordType::Trend10s => "10 Second Trended Values",
            PhdbSubrecordType::Trend60s => "60 Second Trended Values",
            PhdbSubrecordType::AuxInfo => "Auxiliary Information",
            PhdbSubrecordType::Unknown(_) => "Unknown",
        }
    }

    /// Whether subrecords of this type use the [`PhdbRecord`] layout.
    pub fn is_database_record(&self) -> bool {
        self.is_displayed() || self.is_trended()
    }

    pub fn is_displayed(&self) -> bool {
        matches!(self, PhdbSubrecordType::Displayed)
    }

    pub fn is_trended(&self) -> bool {
        matches!(self, PhdbSubrecordType::Trend10s | PhdbSubrecordType::Trend60s)
    }

    pub fn is_auxiliary(&self) -> bool {
        matches!(self, PhdbSubrecordType::AuxInfo)
    }

    /// 10 second trends are only sent over the computer interface.
    pub fn is_computer_interface_only(&self) -> bool {
        matches!(self, PhdbSubrecordType::Trend10s)
    }

    /// Trend interval in seconds, or 0 for untrended data.
    pub fn trend_interval(&self) -> u32 {
        match self {
            PhdbSubrecordType::Trend10s => 10,
            PhdbSubrecordType::Trend60s => 60,
            _ => 0,
        }
    }
}

impl From<u8> for PhdbSubrecordType {
    fn from(value: u8) -> Self {
        match value {
            16 => Self::Displayed,
            17 => Self::Trend10s,
            18 => Self::Trend60s,
            19 => Self::AuxInfo,
            v => Self::Unknown(v),
        }
    }
}

impl fmt::Display for PhdbSubrecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhdbSubrecordType::Unknown(v) => write!(f, "Unknown Type {v}"),
            other => write!(f, "{}", other.name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DataClass {
    Basic,
    Ext1,
    Ext2,
    Ext3,
}

impl DataClass {
    pub fn value(&self) -> u8 {
        match self {
            DataClass::Basic => 0,
            DataClass::Ext1 => 1,
            DataClass::Ext2 => 2,
            DataClass::Ext3 => 3,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Basic),
            1 => Some(Self::Ext1),
            2 => Some(Self::Ext2),
            3 => Some(Self::Ext3),
            _ => None,
        }
    }

    /// The class named by bits 8-11 of `cl_drilvl_subt`, if it is known.
    pub fn from_word(cl_drilvl_subt: u16) -> Option<Self> {
        Self::from_value(class_from_word(cl_drilvl_subt))
    }

    pub fn name(&self) -> &'static str {
        match self {
            DataClass::Basic => "Basic",
            DataClass::Ext1 => "Extended 1",
            DataClass::Ext2 => "Extended 2",
            DataClass::Ext3 => "Extended 3",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DataClass::Basic => "Basic physiological data: ECG, blood pressures, temperatures, SpO2, gases, spirometry flow and volume, C.O., PCWP, NMT, SvO2, etc.",
            DataClass::Ext1 => "Arrhythmia analysis and ST analysis data, 12-lead ECG data, invasive blood pressure channels 7 and 8, 2nd SpO2 channel, temperature channels 5 and 6",
            DataClass::Ext2 => "More NMT data, EEG, entropy, surgical pleth index data",
            DataClass::Ext3 => "More gas measurement data, gas exchange data, more spirometry parameters, tonometry, invasive pressure data, delta pressure, CPP and PiCCO data",
        }
    }

    /// Lowest interface level that can transmit this class.
    pub fn required_interface_level(&self) -> u8 {
        match self {
            DataClass::Basic => 1,
            DataClass::Ext1 | DataClass::Ext2 | DataClass::Ext3 => 3,
        }
    }

    pub fn is_supported_at(&self, interface_level: u8) -> bool {
        interface_level >= self.required_interface_level()
    }
}

impl fmt::Display for DataClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The raw class bits (8-11) of a `cl_drilvl_subt` word.
pub fn class_from_word(cl_drilvl_subt: u16) -> u8 {
    ((cl_drilvl_subt & CLASS_MASK) >> 8) as u8
}

/// Replace the class bits of `cl_drilvl_subt`, keeping all other bits.
pub fn set_class_in_word(cl_drilvl_subt: u16, class: DataClass) -> u16 {
    (cl_drilvl_subt & !CLASS_MASK) | ((class.value() as u16) << 8)
}

/// How the class of a physiological payload is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassSelection {
    /// Always decode as [`DataClass::Basic`].
    #[default]
    Default,
    /// Decode as the given class.
    Explicit(DataClass),
    /// Decode as the class declared by `cl_drilvl_subt`. Unknown classes
    /// fall back to [`DataClass::Basic`].
    FromClassWord,
}

/// A basic class payload. Parameter groups are read from it at known
/// offsets with [`BasicPhysiologicalData::group`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BasicPhysiologicalData {
    pub data: Vec<u8>,
}

impl BasicPhysiologicalData {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Decode group `G` starting `offset` bytes into the payload.
    pub fn group<G: Group>(&self, offset: usize) -> Result<G, DecodeError> {
        let data = self
            .data
            .get(offset..)
            .ok_or(DecodeError::not_enough_data(offset, self.data.len()))?;

        G::parse(data).map_err(|e| match e {
            DecodeError::NotEnoughData { needed, available } => DecodeError::NotEnoughData {
                needed: offset + needed,
                available: offset + available,
            },
            other => other,
        })
    }
}

/// The class specific payload of a [`PhdbRecord`]. Exactly one class is
/// present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhysData {
    Basic(BasicPhysiologicalData),
    Ext1(Vec<u8>),
    Ext2(Vec<u8>),
    Ext3(Vec<u8>),
}

impl PhysData {
    pub fn new(class: DataClass, data: Vec<u8>) -> Self {
        match class {
            DataClass::Basic => Self::Basic(BasicPhysiologicalData::new(data)),
            DataClass::Ext1 => Self::Ext1(data),
            DataClass::Ext2 => Self::Ext2(data),
            DataClass::Ext3 => Self::Ext3(data),
        }
    }

    pub fn class(&self) -> DataClass {
        match self {
            PhysData::Basic(_) => DataClass::Basic,
            PhysData::Ext1(_) => DataClass::Ext1,
            PhysData::Ext2(_) => DataClass::Ext2,
            PhysData::Ext3(_) => DataClass::Ext3,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            PhysData::Basic(basic) => &basic.data,
            PhysData::Ext1(data) | PhysData::Ext2(data) | PhysData::Ext3(data) => data,
        }
    }

    pub fn basic(&self) -> Option<&BasicPhysiologicalData> {
        match self {
            PhysData::Basic(basic) => Some(basic),
            _ => None,
        }
    }
}

/// A displayed or trended physiological database subrecord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhdbRecord {
    pub time: Timestamp,
    pub data: PhysData,
    /// Number of the latest entered mark.
    pub marker: u8,
    pub reserved: u8,
    pub cl_drilvl_subt: u16,
}

impl PhdbRecord {
    /// Size of the time stamp and trailer around the payload.
    pub const FRAME_SIZE: usize = 8;

    /// Decode a record spanning all of `data`.
    ///
    /// The payload is everything between the time stamp and the trailer.
    /// A class that differs from the one declared in `cl_drilvl_subt`, or
    /// a declared class that is not known, is reported as a diagnostic.
    pub fn parse(data: &[u8], selection: ClassSelection) -> Result<Decoded<Self>, DecodeError> {
        if data.len() < Self::FRAME_SIZE {
            return Err(DecodeError::not_enough_data(Self::FRAME_SIZE, data.len()));
        }

        let payload_end = data.len() - 4;

        let mut reader = ByteReader::new(data);
        let time = Timestamp::from(reader.read_u32()?);
        let payload = reader.read_vec(payload_end - 4)?;
        let marker = reader.read_u8()?;
        let reserved = reader.read_u8()?;
        let cl_drilvl_subt = reader.read_u16()?;

        let mut diagnostics = Diagnostics::new();
        let declared = DataClass::from_word(cl_drilvl_subt);

        if declared.is_none() {
            diagnostics.push(Diagnostic::UnknownDataClass(class_from_word(cl_drilvl_subt)));
        }

        let selected = match selection {
            ClassSelection::Default => DataClass::Basic,
            ClassSelection::Explicit(class) => class,
            ClassSelection::FromClassWord => declared.unwrap_or(DataClass::Basic),
        };

        if let Some(declared) = declared.filter(|d| *d != selected) {
            diagnostics.push(Diagnostic::DataClassMismatch { selected, declared });
        }

        let record = Self {
            time,
            data: PhysData::new(selected, payload),
            marker,
            reserved,
            cl_drilvl_subt,
        };

        Ok(Decoded::new(record, diagnostics))
    }

    /// Build a record, declaring the class of `data` in `cl_drilvl_subt`.
    pub fn new(time: Timestamp, data: PhysData, marker: u8) -> Self {
        let cl_drilvl_subt = set_class_in_word(0, data.class());

        Self {
            time,
            data,
            marker,
            reserved: 0,
            cl_drilvl_subt,
        }
    }

    pub fn size(&self) -> usize {
        Self::FRAME_SIZE + self.data.bytes().len()
    }

    pub fn write(&self, writer: &mut ByteWriter) {
        writer
            .write_u32(self.time.value())
            .write_bytes(self.data.bytes())
            .write_u8(self.marker)
            .write_u8(self.reserved)
            .write_u16(self.cl_drilvl_subt);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(self.size());
        self.write(&mut writer);
        writer.into_inner()
    }

    /// The class the payload was decoded as.
    pub fn data_class(&self) -> DataClass {
        self.data.class()
    }

    /// The class declared by `cl_drilvl_subt`, if it is known.
    pub fn declared_class(&self) -> Option<DataClass> {
        DataClass::from_word(self.cl_drilvl_subt)
    }

    pub fn is_valid(&self) -> bool {
        self.time.is_known()
    }
}
