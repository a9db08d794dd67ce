use nonmax::NonMaxU8;

use crate::codec::{ByteReader, ByteWriter, ReadError};

/// Subrecord type marking the end of the subrecord list.
pub const END_OF_LIST: u8 = 0xFF;

/// One entry of the subrecord descriptor table of a record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SrDesc {
    /// Offset of the subrecord, relative to the start of the record body.
    pub offset: i16,
    pub ty: u8,
}

impl SrDesc {
    pub const SIZE: usize = 3;

    /// A descriptor that terminates the subrecord list.
    pub const END_OF_LIST: Self = Self {
        offset: 0,
        ty: END_OF_LIST,
    };

    pub fn new(offset: i16, ty: u8) -> Self {
        Self { offset, ty }
    }

    pub(crate) fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        let offset = reader.read_i16()?;
        let ty = reader.read_u8()?;
        Ok(Self { offset, ty })
    }

    pub(crate) fn write(&self, writer: &mut ByteWriter) {
        writer.write_i16(self.offset).write_u8(self.ty);
    }

    pub fn is_end_of_list(&self) -> bool {
        self.ty == END_OF_LIST
    }

    pub fn is_active(&self) -> bool {
        !self.is_end_of_list()
    }

    /// The subrecord type, or `None` for an end-of-list descriptor.
    pub fn active_type(&self) -> Option<NonMaxU8> {
        NonMaxU8::new(self.ty)
    }

    /// The offset as a body index, if it is not negative.
    pub fn body_offset(&self) -> Option<usize> {
        usize::try_from(self.offset).ok()
    }
}

impl Default for SrDesc {
    fn default() -> Self {
        Self::END_OF_LIST
    }
}
