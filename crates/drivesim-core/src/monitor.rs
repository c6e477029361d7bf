//! Stream monitor
//!
//! Listens to a telemetry link, reassembles records and keeps the latest
//! value of every channel for display.

use std::fmt::Write as _;
use std::io::{self, Read};

use crate::protocol::{ChannelValue, TlvDecoder, TlvError, TlvRecord, TransportError, CHANNELS};

/// Read chunk size
const READ_CHUNK: usize = 64;

/// Latest value seen per channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveValues {
    values: [Option<ChannelValue>; CHANNELS.len()],
    unknown_records: u64,
}

impl LiveValues {
    /// Every channel unset
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one record.
    ///
    /// Returns `Ok(false)` for an unknown tag, which is counted and skipped.
    pub fn apply(&mut self, record: &TlvRecord) -> Result<bool, TlvError> {
        let slot = CHANNELS
            .into_iter()
            .zip(self.values.iter_mut())
            .find(|(channel, _)| channel.tag == record.tag());

        match slot {
            Some((channel, value)) => {
                *value = Some(channel.decode(record)?);
                Ok(true)
            }
            None => {
                tracing::warn!(
                    "Unknown tag {:#04x}, length {}, raw {:02x?}",
                    record.tag(),
                    record.len(),
                    record.value()
                );
                self.unknown_records += 1;
                Ok(false)
            }
        }
    }

    /// Latest value of the channel with `tag`
    pub fn get(&self, tag: u8) -> Option<ChannelValue> {
        CHANNELS
            .into_iter()
            .zip(self.values.iter())
            .find(|(channel, _)| channel.tag == tag)
            .and_then(|(_, value)| *value)
    }

    /// Records skipped because their tag is not in the table
    pub fn unknown_records(&self) -> u64 {
        self.unknown_records
    }

    /// Render the value table, in channel order
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Current Values:");
        let _ = writeln!(out, "{}", "-".repeat(32));
        for (channel, value) in CHANNELS.into_iter().zip(self.values.iter()) {
            let shown = value.map_or_else(|| "---".to_string(), |v| v.to_string());
            let _ = writeln!(out, "{:<22}: {:>8}", channel.label, shown);
        }
        out
    }
}

/// Reads a link and feeds decoded records into [`LiveValues`]
pub struct Monitor<R: Read> {
    source: R,
    decoder: TlvDecoder,
    values: LiveValues,
}

impl<R: Read> Monitor<R> {
    /// Monitor reading from `source`
    pub fn new(source: R) -> Self {
        Self {
            source,
            decoder: TlvDecoder::new(),
            values: LiveValues::new(),
        }
    }

    /// Current channel values
    pub fn values(&self) -> &LiveValues {
        &self.values
    }

    /// Read one chunk and apply every complete record in it.
    ///
    /// Returns the number of records applied. A read timeout is not an
    /// error and yields `Ok(0)`; end of stream is reported as
    /// `UnexpectedEof`.
    pub fn poll(&mut self) -> Result<usize, TransportError> {
        let mut buf = [0u8; READ_CHUNK];
        let n = match self.source.read(&mut buf) {
            Ok(0) => {
                let closed = io::Error::new(io::ErrorKind::UnexpectedEof, "telemetry link closed");
                return Err(closed.into());
            }
            Ok(n) => n,
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                return Ok(0)
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        self.decoder.push(&buf[..n]);
        let mut applied = 0;
        for record in self.decoder.drain_records() {
            match self.values.apply(&record) {
                Ok(true) => applied += 1,
                Ok(false) => {}
                // Corrupt or misaligned; keep listening.
                Err(e) => tracing::warn!("Dropping record: {}", e),
            }
        }
        Ok(applied)
    }
}
