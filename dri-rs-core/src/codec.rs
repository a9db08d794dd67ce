//! Little-endian primitive reads and writes.
//!
//! Every multi-byte quantity in a DRI record is little-endian. [`ByteReader`]
//! keeps track of its position and refuses to read past the end of its
//! input, so decoders can use `?` instead of indexing slices directly.

use core::fmt;

/// A read went past the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadError {
    /// Position of the failed read, relative to the start of the reader.
    pub offset: usize,
    /// Number of bytes the read required.
    pub needed: usize,
    /// Number of bytes that were left.
    pub available: usize,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read of {} bytes at offset {} exceeds input ({} bytes left)",
            self.needed, self.offset, self.available
        )
    }
}

impl std::error::Error for ReadError {}

#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// The bytes that have not been read yet.
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ReadError> {
        if self.remaining() < len {
            return Err(ReadError {
                offset: self.position,
                needed: len,
                available: self.remaining(),
            });
        }

        let bytes = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(bytes)
    }

    pub fn skip(&mut self, len: usize) -> Result<(), ReadError> {
        self.take(len).map(|_| ())
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ReadError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Copy `len` bytes out of the input.
    pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, ReadError> {
        self.take(len).map(<[u8]>::to_vec)
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        Ok(self.take(1)?[0])
    }

    /// A single byte where any non-zero value means `true`.
    pub fn read_bool(&mut self) -> Result<bool, ReadError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16, ReadError> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }
}

/// Appends little-endian primitives to a byte buffer.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    data: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.data.push(value);
        self
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_u8(value as u8)
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_i16(&mut self, value: i16) -> &mut Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_bytes(&mut self, value: &[u8]) -> &mut Self {
        self.data.extend_from_slice(value);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian() {
        let data = [0x34, 0x12, 0xFE, 0xFF, 0x78, 0x56, 0x34, 0x12, 0x01];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.read_u16(), Ok(0x1234));
        assert_eq!(reader.read_i16(), Ok(-2));
        assert_eq!(reader.read_u32(), Ok(0x1234_5678));
        assert_eq!(reader.read_bool(), Ok(true));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn short_read_does_not_advance() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = ByteReader::new(&data);
        reader.skip(2).unwrap();

        let err = reader.read_u16().unwrap_err();
        assert_eq!(
            err,
            ReadError {
                offset: 2,
                needed: 2,
                available: 1
            }
        );
        assert_eq!(reader.position(), 2);
        assert_eq!(reader.read_u8(), Ok(0x03));
    }

    #[test]
    fn writer_matches_reader() {
        let mut writer = ByteWriter::new();
        writer.write_i16(-32000).write_u16(0xBEEF).write_u32(7);
        let bytes = writer.into_inner();

        let mut reader = ByteReader::new(&bytes);
        assert_eq!(reader.read_i16(), Ok(-32000));
        assert_eq!(reader.read_u16(), Ok(0xBEEF));
        assert_eq!(reader.read_u32(), Ok(7));
    }
}
