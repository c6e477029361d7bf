//! TLV record encoding
//!
//! Record format:
//! - 1 byte: type tag
//! - 1 byte: value length
//! - N bytes: value (little-endian for multi-byte integers)

use byteorder::{ByteOrder, LittleEndian};
use std::io::{self, Write};

use super::{ChannelValue, TlvError};

/// Size of the type + length header
pub const HEADER_LEN: usize = 2;

/// Largest value a single record can carry
pub const MAX_VALUE_LEN: usize = u8::MAX as usize;

/// A single Type-Length-Value record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvRecord {
    tag: u8,
    value: Vec<u8>,
}

impl TlvRecord {
    /// Create a record from raw value bytes
    pub fn encode(tag: u8, value: &[u8]) -> Result<Self, TlvError> {
        if value.len() > MAX_VALUE_LEN {
            return Err(TlvError::ValueTooLong(value.len()));
        }
        Ok(Self {
            tag,
            value: value.to_vec(),
        })
    }

    /// Encode a single byte
    pub fn encode_u8(tag: u8, value: u8) -> Self {
        Self {
            tag,
            value: vec![value],
        }
    }

    /// Encode an unsigned 16-bit value (little-endian)
    pub fn encode_u16(tag: u8, value: u16) -> Self {
        let mut bytes = [0u8; 2];
        LittleEndian::write_u16(&mut bytes, value);
        Self {
            tag,
            value: bytes.to_vec(),
        }
    }

    /// Encode a signed 16-bit value (little-endian, two's complement)
    pub fn encode_i16(tag: u8, value: i16) -> Self {
        let mut bytes = [0u8; 2];
        LittleEndian::write_i16(&mut bytes, value);
        Self {
            tag,
            value: bytes.to_vec(),
        }
    }

    /// Encode a typed channel value with the matching helper
    pub fn from_value(tag: u8, value: ChannelValue) -> Self {
        match value {
            ChannelValue::U8(v) => Self::encode_u8(tag, v),
            ChannelValue::U16(v) => Self::encode_u16(tag, v),
            ChannelValue::I16(v) => Self::encode_i16(tag, v),
        }
    }

    /// Type tag
    pub fn tag(&self) -> u8 {
        self.tag
    }

    /// Value length as carried in the header
    pub fn len(&self) -> u8 {
        // Bounded by MAX_VALUE_LEN at construction.
        self.value.len() as u8
    }

    /// Whether the record carries no value bytes
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Value bytes
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Get the total encoded size
    pub fn encoded_size(&self) -> usize {
        HEADER_LEN + self.value.len()
    }

    /// Encode the record to raw bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_size());
        bytes.push(self.tag);
        bytes.push(self.len());
        bytes.extend_from_slice(&self.value);
        bytes
    }

    /// Write type, length and value to `sink`, in that order
    pub fn emit<W: Write + ?Sized>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(&[self.tag, self.len()])?;
        sink.write_all(&self.value)
    }
}
