use crate::{
    codec::{ByteReader, ByteWriter},
    DecodeError,
};

/// Value of a class word that requests the class.
pub const CLASS_REQUEST: u16 = 0x0000;
/// Value of a class word that denies the class.
pub const CLASS_DENY: u16 = 0x0001;

/// The `phdb_class_bf` bit field, selecting which physiological data classes
/// a monitor should send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhdbClassRequest {
    pub basic: u16,
    pub ext1: u16,
    pub ext2: u16,
    pub ext3: u16,
}

impl PhdbClassRequest {
    pub const SIZE: usize = 8;

    pub fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < Self::SIZE {
            return Err(DecodeError::not_enough_data(Self::SIZE, data.len()));
        }

        let mut reader = ByteReader::new(data);

        Ok(Self {
            basic: reader.read_u16()?,
            ext1: reader.read_u16()?,
            ext2: reader.read_u16()?,
            ext3: reader.read_u16()?,
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut writer = ByteWriter::with_capacity(Self::SIZE);
        writer
            .write_u16(self.basic)
            .write_u16(self.ext1)
            .write_u16(self.ext2)
            .write_u16(self.ext3);

        let mut out = [0u8; Self::SIZE];
        out.copy_from_slice(&writer.into_inner());
        out
    }

    pub fn is_basic_enabled(&self) -> bool {
        self.basic == CLASS_REQUEST
    }

    pub fn is_basic_disabled(&self) -> bool {
        self.basic == CLASS_DENY
    }

    pub fn enable_basic(&mut self) {
        self.basic = CLASS_REQUEST;
    }

    pub fn disable_basic(&mut self) {
        self.basic = CLASS_DENY;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_class_toggle() {
        let mut request = PhdbClassRequest::parse(&[1, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        assert!(request.is_basic_disabled());
        assert!(!request.is_basic_enabled());

        request.enable_basic();
        assert!(request.is_basic_enabled());
        assert_eq!(request.to_bytes(), [0; 8]);
    }
}
