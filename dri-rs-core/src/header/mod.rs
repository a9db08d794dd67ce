mod descriptor;
pub use descriptor::{SrDesc, END_OF_LIST};

use core::fmt;

use crate::{
    codec::{ByteReader, ByteWriter},
    Decoded, DecodeError, Diagnostic, Diagnostics, Timestamp,
};

/// Size of the fixed record header, including the descriptor table.
pub const HEADER_SIZE: usize = 40;

/// Number of entries in the subrecord descriptor table.
pub const MAX_SUBRECORDS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainType {
    /// Physiological database.
    Phdb,
    Wave,
    Alarm,
    Network,
    /// Foreground (front-end) record.
    Fo,
    Unknown(i16),
}

impl MainType {
    pub fn value(&self) -> i16 {
        match self {
            MainType::Phdb => 0,
            MainType::Wave => 1,
            MainType::Alarm => 4,
            MainType::Network => 5,
            MainType::Fo => 8,
            MainType::Unknown(v) => *v,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MainType::Phdb => "Physiological Database",
            MainType::Wave => "Waveform",
            MainType::Alarm => "Alarm",
            MainType::Network => "Network Management",
            MainType::Fo => "Foreground",
            MainType::Unknown(_) => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, MainType::Unknown(_))
    }
}

impl From<i16> for MainType {
    fn from(value: i16) -> Self {
        match value {
            0 => Self::Phdb,
            1 => Self::Wave,
            4 => Self::Alarm,
            5 => Self::Network,
            8 => Self::Fo,
            v => Self::Unknown(v),
        }
    }
}

impl From<MainType> for i16 {
    fn from(value: MainType) -> Self {
        value.value()
    }
}

impl fmt::Display for MainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MainType::Unknown(v) => write!(f, "Unknown ({v})"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Interface level of the monitor that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DriLevel {
    L95,
    L97,
    L98,
    L99,
    L01,
    L02,
    L03,
    L05,
    L09,
    L15,
    L19,
    Unknown(u8),
}

impl DriLevel {
    pub fn value(&self) -> u8 {
        match self {
            DriLevel::L95 => 2,
            DriLevel::L97 => 3,
            DriLevel::L98 => 4,
            DriLevel::L99 => 5,
            DriLevel::L01 => 6,
            DriLevel::L02 => 7,
            DriLevel::L03 => 8,
            DriLevel::L05 => 9,
            DriLevel::L09 => 10,
            DriLevel::L15 => 11,
            DriLevel::L19 => 12,
            DriLevel::Unknown(v) => *v,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DriLevel::L95 => "1995 '95",
            DriLevel::L97 => "1997 '97",
            DriLevel::L98 => "1998 '98",
            DriLevel::L99 => "1999 '99",
            DriLevel::L01 => "2001 '01",
            DriLevel::L02 => "2002 '02",
            DriLevel::L03 => "2003 '03",
            DriLevel::L05 => "2005 '05",
            DriLevel::L09 => "2009 '09",
            DriLevel::L15 => "2015 '15",
            DriLevel::L19 => "2019 '19",
            DriLevel::Unknown(_) => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, DriLevel::Unknown(_))
    }
}

impl From<u8> for DriLevel {
    fn from(value: u8) -> Self {
        match value {
            2 => Self::L95,
            3 => Self::L97,
            4 => Self::L98,
            5 => Self::L99,
            6 => Self::L01,
            7 => Self::L02,
            8 => Self::L03,
            9 => Self::L05,
            10 => Self::L09,
            11 => Self::L15,
            12 => Self::L19,
            v => Self::Unknown(v),
        }
    }
}

impl fmt::Display for DriLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriLevel::Unknown(v) => write!(f, "Unknown ({v})"),
            other => write!(f, "{}", other.description()),
        }
    }
}

/// The fixed header at the start of every DRI record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatexHeader {
    /// Total record length, header included.
    pub r_len: i16,
    pub r_nbr: u8,
    pub dri_level: DriLevel,
    pub plug_id: u16,
    pub r_time: Timestamp,
    pub n_subnet: u8,
    pub reserved2: u8,
    pub reserved3: u16,
    pub main_type: MainType,
    pub subrecords: [SrDesc; MAX_SUBRECORDS],
}

impl Default for DatexHeader {
    fn default() -> Self {
        Self {
            r_len: HEADER_SIZE as i16,
            r_nbr: 0,
            dri_level: DriLevel::Unknown(0),
            plug_id: 0,
            r_time: Timestamp::UNKNOWN,
            n_subnet: 0,
            reserved2: 0,
            reserved3: 0,
            main_type: MainType::Phdb,
            subrecords: [SrDesc::END_OF_LIST; MAX_SUBRECORDS],
        }
    }
}

impl DatexHeader {
    /// Decode the fixed fields of a header.
    ///
    /// Only the first [`HEADER_SIZE`] bytes of `data` are used. Use
    /// [`DatexHeader::decode`] to also get diagnostics for reserved fields
    /// and unknown enumeration values.
    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < HEADER_SIZE {
            return Err(DecodeError::not_enough_data(HEADER_SIZE, data.len()));
        }

        let mut reader = ByteReader::new(data);

        let r_len = reader.read_i16()?;
        let r_nbr = reader.read_u8()?;
        let dri_level = DriLevel::from(reader.read_u8()?);
        let plug_id = reader.read_u16()?;
        let r_time = Timestamp::from(reader.read_u32()?);
        let n_subnet = reader.read_u8()?;
        let reserved2 = reader.read_u8()?;
        let reserved3 = reader.read_u16()?;
        let main_type = MainType::from(reader.read_i16()?);

        let mut subrecords = [SrDesc::END_OF_LIST; MAX_SUBRECORDS];
        for desc in subrecords.iter_mut() {
            *desc = SrDesc::read(&mut reader)?;
        }

        Ok(Self {
            r_len,
            r_nbr,
            dri_level,
            plug_id,
            r_time,
            n_subnet,
            reserved2,
            reserved3,
            main_type,
            subrecords,
        })
    }

    /// Decode a header and report reserved fields that are not zero, as well
    /// as DRI levels and main types that are not known.
    pub fn decode(data: &[u8]) -> Result<Decoded<Self>, DecodeError> {
        let header = Self::parse(data)?;
        let mut diagnostics = header.validate_reserved_fields();

        if !header.dri_level.is_known() {
            diagnostics.push(Diagnostic::UnknownDriLevel(header.dri_level));
        }

        if !header.main_type.is_known() {
            diagnostics.push(Diagnostic::UnknownMainType(header.main_type));
        }

        Ok(Decoded::new(header, diagnostics))
    }

    pub fn write(&self, writer: &mut ByteWriter) {
        writer
            .write_i16(self.r_len)
            .write_u8(self.r_nbr)
            .write_u8(self.dri_level.value())
            .write_u16(self.plug_id)
            .write_u32(self.r_time.value())
            .write_u8(self.n_subnet)
            .write_u8(self.reserved2)
            .write_u16(self.reserved3)
            .write_i16(self.main_type.value());

        for desc in &self.subrecords {
            desc.write(writer);
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut writer = ByteWriter::with_capacity(HEADER_SIZE);
        self.write(&mut writer);

        let mut out = [0u8; HEADER_SIZE];
        out.copy_from_slice(&writer.into_inner());
        out
    }

    /// Report every reserved field that is not zero.
    pub fn validate_reserved_fields(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        let fields = [
            ("n_subnet", self.n_subnet as u16),
            ("reserved2", self.reserved2 as u16),
            ("reserved3", self.reserved3),
        ];

        for (field, value) in fields {
            if value != 0 {
                diagnostics.push(Diagnostic::ReservedFieldNotZero { field, value });
            }
        }

        diagnostics
    }

    pub fn zero_reserved_fields(&mut self) {
        self.n_subnet = 0;
        self.reserved2 = 0;
        self.reserved3 = 0;
    }

    pub fn main_type_name(&self) -> &'static str {
        self.main_type.name()
    }

    pub fn dri_level_description(&self) -> &'static str {
        self.dri_level.description()
    }

    /// Number of descriptor slots that are not end-of-list markers, wherever
    /// they appear in the table.
    pub fn active_subrecord_count(&self) -> usize {
        self.subrecords.iter().filter(|d| d.is_active()).count()
    }

    /// Whether records of this main type are only sent over the network
    /// interface.
    pub fn is_network_interface_only(&self) -> bool {
        matches!(
            self.main_type,
            MainType::Alarm | MainType::Network | MainType::Fo
        )
    }

    /// Index of the first end-of-list descriptor, if any.
    pub fn end_of_list_index(&self) -> Option<usize> {
        self.subrecords.iter().position(SrDesc::is_end_of_list)
    }

    pub fn subrecord_type(&self, index: usize) -> Option<u8> {
        self.subrecords.get(index).map(|d| d.ty)
    }

    pub fn subrecord_offset(&self, index: usize) -> Option<i16> {
        self.subrecords.get(index).map(|d| d.offset)
    }

    /// Set descriptor `index`. Returns `false` and leaves the table untouched
    /// if `index` is out of range.
    pub fn set_subrecord(&mut self, index: usize, offset: i16, ty: u8) -> bool {
        match self.subrecords.get_mut(index) {
            Some(desc) => {
                *desc = SrDesc::new(offset, ty);
                true
            }
            None => false,
        }
    }

    pub fn clear_subrecords(&mut self) {
        self.subrecords = [SrDesc::END_OF_LIST; MAX_SUBRECORDS];
    }

    /// Length of the record body as declared by `r_len`, if `r_len` covers
    /// at least the header.
    pub fn body_len(&self) -> Option<usize> {
        usize::try_from(self.r_len)
            .ok()
            .and_then(|len| len.checked_sub(HEADER_SIZE))
    }
}
