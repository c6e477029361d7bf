//! Generator configuration
//!
//! Only the link and the cadence are configurable; the driving cycle is
//! compiled in. Settings may come from a JSON file, and missing keys fall
//! back to their defaults:
//!
//! ```json
//! { "port": "/dev/ttyS0", "baud_rate": 115200, "tick_period_ms": 50 }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::cycle::Narrowing;
use crate::protocol::DEFAULT_BAUD_RATE;

/// Errors loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// File that was opened
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The file is not valid JSON for [`GeneratorConfig`]
    #[error("Invalid config {path}: {source}")]
    Parse {
        /// File that was parsed
        path: PathBuf,
        /// Parser error, with line and column
        source: serde_json::Error,
    },

    /// `tick_period_ms` is zero
    #[error("Tick period must be at least 1 ms")]
    ZeroPeriod,
}

/// Where the byte stream goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget<'a> {
    /// TCP endpoint, `host:port`
    Tcp(&'a str),
    /// Serial port
    Serial {
        /// Port name
        port: &'a str,
        /// Baud rate
        baud_rate: u32,
    },
}

/// Values given on the command line. Each one that is set replaces the
/// matching file setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Serial port name
    pub port: Option<String>,
    /// Baud rate
    pub baud_rate: Option<u32>,
    /// TCP endpoint
    pub tcp: Option<String>,
    /// Tick period in milliseconds
    pub tick_period_ms: Option<u64>,
    /// Narrowing policy
    pub narrowing: Option<Narrowing>,
}

/// Settings for the generator binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Serial port name
    pub port: String,

    /// Baud rate
    pub baud_rate: u32,

    /// TCP endpoint (`host:port`); takes precedence over the serial port
    pub tcp: Option<String>,

    /// Tick period in milliseconds
    pub tick_period_ms: u64,

    /// Narrowing of out-of-range readings
    pub narrowing: Narrowing,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyUSB0".to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            tcp: None,
            tick_period_ms: 50,
            narrowing: Narrowing::Wrap,
        }
    }
}

impl GeneratorConfig {
    /// Load settings from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::read(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// File settings (or defaults without a file), then `overrides`.
    ///
    /// Validation runs on the merged result, so a flag can repair a bad
    /// file value.
    pub fn resolve(
        path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None => Self::default(),
        };
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replace every setting that `overrides` carries
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(port) = &overrides.port {
            self.port = port.clone();
        }
        if let Some(baud_rate) = overrides.baud_rate {
            self.baud_rate = baud_rate;
        }
        if let Some(tcp) = &overrides.tcp {
            self.tcp = Some(tcp.clone());
        }
        if let Some(period) = overrides.tick_period_ms {
            self.tick_period_ms = period;
        }
        if let Some(narrowing) = overrides.narrowing {
            self.narrowing = narrowing;
        }
    }

    /// The link to open. A TCP endpoint wins over the serial port.
    pub fn link(&self) -> LinkTarget<'_> {
        match &self.tcp {
            Some(addr) => LinkTarget::Tcp(addr),
            None => LinkTarget::Serial {
                port: &self.port,
                baud_rate: self.baud_rate,
            },
        }
    }

    /// Check values the loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        Ok(())
    }

    /// Tick period as a [`Duration`]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}
