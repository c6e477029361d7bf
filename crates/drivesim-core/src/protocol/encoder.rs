//! Snapshot encoding
//!
//! Walks [`CHANNELS`] in order and emits one record per field.

use std::io::{self, Write};

use super::{TlvRecord, CHANNELS, HEADER_LEN};
use crate::snapshot::Snapshot;

/// Bytes produced by one encoded snapshot
pub const SNAPSHOT_WIRE_LEN: usize = wire_len();

const fn wire_len() -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < CHANNELS.len() {
        total += HEADER_LEN + CHANNELS[i].kind.width() as usize;
        i += 1;
    }
    total
}

/// Write a record to a byte sink
pub fn emit<W: Write + ?Sized>(record: &TlvRecord, sink: &mut W) -> io::Result<()> {
    record.emit(sink)
}

/// Encode a snapshot into its wire bytes
pub fn encode_snapshot(snapshot: &Snapshot) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(SNAPSHOT_WIRE_LEN);
    for record in TlvEncoder::records(snapshot) {
        bytes.extend_from_slice(&record.to_bytes());
    }
    bytes
}

/// Serializes snapshots into TLV records
#[derive(Debug, Default)]
pub struct TlvEncoder {
    records_written: u64,
}

impl TlvEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for a snapshot, in emission order
    pub fn records(snapshot: &Snapshot) -> impl Iterator<Item = TlvRecord> + '_ {
        CHANNELS
            .into_iter()
            .map(move |channel| TlvRecord::from_value(channel.tag, snapshot.get(channel.field)))
    }

    /// Emit every field of `snapshot` to `sink`, one record per field.
    ///
    /// Returns the number of bytes written.
    pub fn emit_snapshot<W: Write + ?Sized>(
        &mut self,
        snapshot: &Snapshot,
        sink: &mut W,
    ) -> io::Result<usize> {
        let mut written = 0;
        for record in Self::records(snapshot) {
            record.emit(sink)?;
            written += record.encoded_size();
            self.records_written += 1;
        }
        Ok(written)
    }

    /// Total records emitted by this encoder
    pub fn records_written(&self) -> u64 {
        self.records_written
    }
}
