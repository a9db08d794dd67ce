//! Physiological parameter groups.
//!
//! A group is a fixed layout block inside a basic class payload. Most groups
//! start with a [`GroupHeader`], whose status and label bits mean different
//! things for every group, followed by scaled 16 bit measurements.

mod co_wedge;
mod ecg_extra;
mod flow_volume;
mod gases;
mod nmt;
mod svo2;

pub use co_wedge::{CoMode, CoWedgeGroup, CoWedgeLabel};
pub use ecg_extra::EcgExtraGroup;
pub use flow_volume::{FlowVolumeGroup, FlowVolumeStatus, TidalVolumeBase};
pub use gases::{AgentLabel, AnesthesiaAgentGroup, GasStatus, N2OGroup, O2Group};
pub use nmt::{NmtGroup, NmtStatus, PulseWidth, StimulusMode};
pub use svo2::{SaturationType, SvO2Group, SvO2Status};

use crate::{
    codec::{ByteReader, ReadError},
    DecodeError,
};

/// A fixed layout parameter group.
pub trait Group: Sized {
    /// Encoded size of the group.
    const SIZE: usize;
    const NAME: &'static str;

    fn read(reader: &mut ByteReader) -> Result<Self, ReadError>;

    fn parse(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < Self::SIZE {
            return Err(DecodeError::not_enough_data(Self::SIZE, data.len()));
        }

        Ok(Self::read(&mut ByteReader::new(data))?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupHeader {
    pub status: u16,
    pub label: u16,
}

impl GroupHeader {
    pub const SIZE: usize = 4;

    pub fn read(reader: &mut ByteReader) -> Result<Self, ReadError> {
        Ok(Self {
            status: reader.read_u16()?,
            label: reader.read_u16()?,
        })
    }

    pub(crate) fn status_field(&self, shift: u32, mask: u16) -> u8 {
        ((self.status >> shift) & mask) as u8
    }
}

pub(crate) fn scaled(value: i16, divisor: f64) -> f64 {
    value as f64 / divisor
}

#[cfg(test)]
pub(crate) mod test_util {
    use crate::codec::ByteWriter;

    pub fn group_bytes(status: Option<(u16, u16)>, values: &[i16]) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        if let Some((status, label)) = status {
            writer.write_u16(status).write_u16(label);
        }
        for value in values {
            writer.write_i16(*value);
        }
        writer.into_inner()
    }
}
