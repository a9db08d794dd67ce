use core::fmt;

/// Seconds since 1.1.1970, as carried in record headers and physiological
/// subrecords. A value of zero means "not known".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp(u32);

impl Timestamp {
    pub const UNKNOWN: Self = Self(0);

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn is_known(&self) -> bool {
        self.0 != 0
    }

    #[cfg(feature = "time")]
    pub fn to_offset_date_time(&self) -> Option<time::OffsetDateTime> {
        if self.is_known() {
            time::OffsetDateTime::from_unix_timestamp(self.0 as i64).ok()
        } else {
            None
        }
    }
}

impl From<u32> for Timestamp {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<Timestamp> for u32 {
    fn from(value: Timestamp) -> Self {
        value.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            write!(f, "Unknown")
        } else {
            #[cfg(feature = "time")]
            {
                let timestamp = self.to_offset_date_time().ok_or(fmt::Error)?;

                let time = timestamp
                    .format(&time::format_description::well_known::Rfc3339)
                    .map_err(|_| fmt::Error)?;

                write!(f, "{}", time)
            }

            #[cfg(not(feature = "time"))]
            write!(f, "{}", self.0)
        }
    }
}
