//! Tag table
//!
//! [`CHANNELS`] is the single source for both the tag assigned to each
//! snapshot field and the order in which fields are emitted every tick.

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;
use std::fmt;

use super::{TlvError, TlvRecord};
use crate::snapshot::Field;

/// Width and signedness of a value on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// One unsigned byte
    U8,
    /// Unsigned 16-bit, little-endian
    U16,
    /// Signed 16-bit, little-endian
    I16,
}

impl ValueKind {
    /// Number of value bytes
    pub const fn width(self) -> u8 {
        match self {
            ValueKind::U8 => 1,
            ValueKind::U16 | ValueKind::I16 => 2,
        }
    }

    /// Decode a little-endian value of this kind
    pub fn decode(self, bytes: &[u8]) -> Option<ChannelValue> {
        if bytes.len() != self.width() as usize {
            return None;
        }
        Some(match self {
            ValueKind::U8 => ChannelValue::U8(bytes[0]),
            ValueKind::U16 => ChannelValue::U16(LittleEndian::read_u16(bytes)),
            ValueKind::I16 => ChannelValue::I16(LittleEndian::read_i16(bytes)),
        })
    }
}

/// A typed value as carried in a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChannelValue {
    /// One-byte value
    U8(u8),
    /// Unsigned two-byte value
    U16(u16),
    /// Signed two-byte value
    I16(i16),
}

impl ChannelValue {
    /// Wire kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            ChannelValue::U8(_) => ValueKind::U8,
            ChannelValue::U16(_) => ValueKind::U16,
            ChannelValue::I16(_) => ValueKind::I16,
        }
    }

    /// Widen to `i32` for display and arithmetic
    pub fn as_i32(&self) -> i32 {
        match *self {
            ChannelValue::U8(v) => i32::from(v),
            ChannelValue::U16(v) => i32::from(v),
            ChannelValue::I16(v) => i32::from(v),
        }
    }
}

impl fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// One row of the tag table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    /// Snapshot field carried by this channel
    pub field: Field,
    /// Type tag on the wire
    pub tag: u8,
    /// Value encoding
    pub kind: ValueKind,
    /// Display label
    pub label: &'static str,
}

/// Every channel, in emission order
#[rustfmt::skip]
pub const CHANNELS: [Channel; 10] = [
    Channel::new(0x01, Field::EngineRpm,        ValueKind::U16, "RPM"),
    Channel::new(0x02, Field::BoostPressure,    ValueKind::U16, "Boost Pressure (mbar)"),
    Channel::new(0x03, Field::OilPressure,      ValueKind::U16, "Oil Pressure"),
    Channel::new(0x04, Field::FuelLevel,        ValueKind::U16, "Fuel Level"),
    Channel::new(0x05, Field::VehicleSpeed,     ValueKind::U16, "Speed"),
    Channel::new(0x06, Field::StatusFlags,      ValueKind::U8,  "Status Flags"),
    Channel::new(0x07, Field::SteeringAngle,    ValueKind::I16, "Steering Angle"),
    Channel::new(0x08, Field::BrakePressure,    ValueKind::U16, "Brake Pressure"),
    Channel::new(0x09, Field::ThrottlePosition, ValueKind::U8,  "Throttle Position"),
    Channel::new(0x0A, Field::GearPosition,     ValueKind::U8,  "Gear Position"),
];

impl Channel {
    const fn new(tag: u8, field: Field, kind: ValueKind, label: &'static str) -> Self {
        Self {
            field,
            tag,
            kind,
            label,
        }
    }

    /// Look up a channel by its wire tag
    pub fn from_tag(tag: u8) -> Option<Channel> {
        CHANNELS.iter().copied().find(|c| c.tag == tag)
    }

    /// Look up the channel carrying a snapshot field
    pub fn for_field(field: Field) -> Channel {
        match CHANNELS.iter().copied().find(|c| c.field == field) {
            Some(channel) => channel,
            None => unreachable!("every field has a channel"),
        }
    }

    /// Number of value bytes
    pub fn width(&self) -> u8 {
        self.kind.width()
    }

    /// Decode the value of a record addressed to this channel
    pub fn decode(&self, record: &TlvRecord) -> Result<ChannelValue, TlvError> {
        if record.tag() != self.tag {
            return Err(TlvError::UnknownTag(record.tag()));
        }
        self.kind
            .decode(record.value())
            .ok_or(TlvError::LengthMismatch {
                tag: self.tag,
                expected: self.width(),
                actual: record.len(),
            })
    }
}
