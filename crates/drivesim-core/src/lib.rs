//! # drivesim Core Library
//!
//! Synthetic vehicle telemetry for exercising telemetry consumers without
//! real hardware.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - A 60 second driving-cycle simulator (idle, launch, shifts, cruise, braking)
//! - TLV record encoding and the fixed channel/tag table
//! - A fixed-cadence tick loop writing to serial or TCP links
//! - Stream reassembly and a live-value monitor for the receiving side
//!
//! ## Example
//!
//! ```rust,no_run
//! use drivesim_core::{cycle::CycleSimulator, generator::Generator, protocol::SerialChannel};
//!
//! let mut link = SerialChannel::open("/dev/ttyUSB0", 115200)?;
//! let period = std::time::Duration::from_millis(50);
//! let mut generator = Generator::realtime(CycleSimulator::new(), period);
//! generator.run(&mut link, None)?;
//! # Ok::<(), drivesim_core::protocol::TransportError>(())
//! ```

pub mod config;
pub mod cycle;
pub mod generator;
pub mod monitor;
pub mod protocol;
pub mod snapshot;

pub use snapshot::{Field, Snapshot};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ConfigError, ConfigOverrides, GeneratorConfig, LinkTarget};
    pub use crate::cycle::{compute, CycleSimulator, Narrowing, Phase, PhaseTime};
    pub use crate::generator::{Clock, Generator, MonotonicClock, SleepTicker, Ticker};
    pub use crate::monitor::{LiveValues, Monitor};
    pub use crate::protocol::{
        Channel, ChannelValue, TlvDecoder, TlvEncoder, TlvError, TlvRecord, TransportError,
        CHANNELS,
    };
    pub use crate::snapshot::{Field, Snapshot};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
