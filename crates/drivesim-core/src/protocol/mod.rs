//! TLV Wire Protocol
//!
//! Implements the one-way telemetry stream: a flat sequence of
//! `[type:1][length:1][value:length]` records with little-endian values,
//! no framing, no sequence numbers and no checksum.
//!
//! Also carries the serial and TCP transports the stream is written to.

mod channel;
mod decoder;
mod encoder;
mod error;
mod record;
pub mod serial;
pub mod stream;

pub use channel::{Channel, ChannelValue, ValueKind, CHANNELS};
pub use decoder::TlvDecoder;
pub use encoder::{emit, encode_snapshot, TlvEncoder, SNAPSHOT_WIRE_LEN};
pub use error::{TlvError, TransportError};
pub use record::{TlvRecord, HEADER_LEN, MAX_VALUE_LEN};
pub use serial::{configure_port, list_ports, open_port, PortInfo};
pub use stream::{SerialChannel, TcpChannel, TelemetryChannel};

/// Default baud rate of the telemetry link
pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// Read timeout used when listening to a telemetry link
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
