//! Narrowing of intermediate readings to wire field widths
//!
//! Readings are combined as `i32` and only narrowed once, when the
//! [`Snapshot`](crate::Snapshot) is assembled. The policy decides what happens
//! to a value that does not fit the target width.

use serde::{Deserialize, Serialize};

/// How an out-of-range reading is narrowed to its field width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Narrowing {
    /// Two's-complement wrap-around, identical to a fixed-width integer cast.
    /// This is what existing consumers of the stream see.
    #[default]
    Wrap,
    /// Clamp to the representable range of the field.
    Saturate,
}

impl Narrowing {
    /// Narrow to an unsigned 16-bit field
    pub fn to_u16(self, value: i32) -> u16 {
        match self {
            Narrowing::Wrap => value as u16,
            Narrowing::Saturate => value.clamp(0, i32::from(u16::MAX)) as u16,
        }
    }

    /// Narrow to a signed 16-bit field
    pub fn to_i16(self, value: i32) -> i16 {
        match self {
            Narrowing::Wrap => value as i16,
            Narrowing::Saturate => value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16,
        }
    }

    /// Narrow to an unsigned 8-bit field
    pub fn to_u8(self, value: i32) -> u8 {
        match self {
            Narrowing::Wrap => value as u8,
            Narrowing::Saturate => value.clamp(0, i32::from(u8::MAX)) as u8,
        }
    }
}

/// Truncate toward zero. NaN becomes 0 and infinities saturate, so this never traps.
#[inline]
pub(crate) fn trunc(x: f32) -> i32 {
    x as i32
}
