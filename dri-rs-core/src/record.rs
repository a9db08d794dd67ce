use crate::{
    header::{DatexHeader, MainType, HEADER_SIZE},
    Decoded, DecodeError,
};

/// A record split into its header and an owned copy of its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatexRecord {
    pub header: DatexHeader,
    /// The `r_len - HEADER_SIZE` bytes following the header.
    pub data: Vec<u8>,
}

impl DatexRecord {
    /// Parse one record from the start of `data`.
    ///
    /// `r_len` must cover at least the header and must not exceed `data`.
    /// Bytes after `r_len` are ignored.
    pub fn parse(data: &[u8]) -> Result<Decoded<Self>, DecodeError> {
        let (header, diagnostics) = DatexHeader::decode(data)?.into_parts();

        let record_len = usize::try_from(header.r_len)
            .ok()
            .filter(|len| *len >= HEADER_SIZE && *len <= data.len())
            .ok_or(DecodeError::InvalidRecordLength {
                declared: header.r_len,
                available: data.len(),
            })?;

        let body = data[HEADER_SIZE..record_len].to_vec();

        Ok(Decoded::new(Self { header, data: body }, diagnostics))
    }

    /// Largest body an `r_len` can describe.
    pub const MAX_BODY_LEN: usize = i16::MAX as usize - HEADER_SIZE;

    /// Build a record from a header and body, setting `r_len` accordingly.
    ///
    /// Bodies longer than [`Self::MAX_BODY_LEN`] are truncated.
    pub fn new(mut header: DatexHeader, mut data: Vec<u8>) -> Self {
        data.truncate(Self::MAX_BODY_LEN);
        header.r_len = (HEADER_SIZE + data.len()) as i16;
        Self { header, data }
    }

    pub fn main_type(&self) -> MainType {
        self.header.main_type
    }

    /// Fail with [`DecodeError::MainTypeMismatch`] unless this record is of
    /// type `expected`.
    pub fn expect_main_type(&self, expected: MainType) -> Result<(), DecodeError> {
        if self.header.main_type == expected {
            Ok(())
        } else {
            Err(DecodeError::MainTypeMismatch {
                expected,
                found: self.header.main_type,
            })
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.data.len());
        out.extend_from_slice(&self.header.to_bytes());
        out.extend_from_slice(&self.data);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_header_and_body() {
        let record = DatexRecord::new(DatexHeader::default(), vec![1, 2, 3, 4]);
        assert_eq!(record.header.r_len, 44);

        let mut bytes = record.to_bytes();
        bytes.extend_from_slice(&[0xAA, 0xBB]);

        let parsed = DatexRecord::parse(&bytes).unwrap();
        assert!(parsed.is_clean());
        assert_eq!(parsed.value, record);
    }

    #[test]
    fn oversized_body_is_truncated() {
        let record = DatexRecord::new(DatexHeader::default(), vec![0; 40_000]);
        assert_eq!(record.header.r_len, i16::MAX);
        assert_eq!(record.data.len(), DatexRecord::MAX_BODY_LEN);

        let bytes = record.to_bytes();
        assert_eq!(bytes.len(), i16::MAX as usize);
        assert_eq!(DatexRecord::parse(&bytes).unwrap().value, record);
    }

    #[test]
    fn rejects_bad_lengths() {
        for r_len in [-1i16, 0, 39, 45] {
            let mut header = DatexHeader::default();
            header.r_len = r_len;
            let mut bytes = header.to_bytes().to_vec();
            bytes.extend_from_slice(&[0; 4]);

            assert_eq!(
                DatexRecord::parse(&bytes),
                Err(DecodeError::InvalidRecordLength {
                    declared: r_len,
                    available: 44
                })
            );
        }
    }

    #[test]
    fn main_type_check() {
        let record = DatexRecord::new(DatexHeader::default(), Vec::new());
        assert_eq!(record.expect_main_type(MainType::Phdb), Ok(()));
        assert_eq!(
            record.expect_main_type(MainType::Alarm),
            Err(DecodeError::MainTypeMismatch {
                expected: MainType::Alarm,
                found: MainType::Phdb
            })
        );
    }
}
