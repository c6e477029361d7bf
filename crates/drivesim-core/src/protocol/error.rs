//! Protocol errors

use thiserror::Error;

use crate::snapshot::Field;

/// Errors raised while building or interpreting TLV records
#[derive(Error, Debug)]
pub enum TlvError {
    /// Value does not fit the one-byte length field
    #[error("Value too long for a TLV record: {0} bytes (max 255)")]
    ValueTooLong(usize),

    /// Record length disagrees with the channel width
    #[error("Length mismatch for tag {tag:#04x}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Record tag
        tag: u8,
        /// Width the tag table assigns
        expected: u8,
        /// Length the record carried
        actual: u8,
    },

    /// Tag not in the table
    #[error("Unknown tag {0:#04x}")]
    UnknownTag(u8),

    /// A full snapshot needs every channel, this one was absent
    #[error("Channel missing from record set: {0}")]
    MissingChannel(&'static str),

    /// Value width or signedness is wrong for the field
    #[error("Value kind does not match field {0:?}")]
    KindMismatch(Field),
}

/// Errors that can occur on the telemetry link
#[derive(Error, Debug)]
pub enum TransportError {
    /// Serial driver failure
    #[error("Serial port error: {0}")]
    SerialError(String),

    /// No device behind the port name
    #[error("Port not found: {0}")]
    PortNotFound(String),

    /// TCP connect failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Read or write on an open link failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
