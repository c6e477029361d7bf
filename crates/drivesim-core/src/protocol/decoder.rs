//! Stream reassembly
//!
//! The stream has no framing, so a reader may see a record split across
//! several reads. [`TlvDecoder`] buffers partial input and hands out whole
//! records once their value bytes have arrived.

use super::{TlvRecord, HEADER_LEN};

/// Incremental decoder for a raw TLV byte stream
#[derive(Debug, Default)]
pub struct TlvDecoder {
    buffer: Vec<u8>,
}

impl TlvDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes read from the link
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Bytes waiting for the rest of their record
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Take the next complete record, if one is buffered
    pub fn next_record(&mut self) -> Option<TlvRecord> {
        let (&tag, rest) = self.buffer.split_first()?;
        let (&len, rest) = rest.split_first()?;
        let value = rest.get(..len as usize)?;

        // Length is a u8, so this cannot exceed MAX_VALUE_LEN.
        let record = TlvRecord::encode(tag, value).ok()?;
        self.buffer.drain(..HEADER_LEN + len as usize);
        Some(record)
    }

    /// Drain every complete record currently buffered
    pub fn drain_records(&mut self) -> Vec<TlvRecord> {
        std::iter::from_fn(|| self.next_record()).collect()
    }

    /// Discard any partial record
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::{compute, PhaseTime};
    use crate::protocol::encode_snapshot;

    #[test]
    fn test_waits_for_full_record() {
        let mut decoder = TlvDecoder::new();
        decoder.push(&[0x01]);
        assert!(decoder.next_record().is_none());
        decoder.push(&[0x02, 0xE8]);
        assert!(decoder.next_record().is_none());
        assert_eq!(decoder.pending(), 3);

        decoder.push(&[0x03, 0x09]);
        let record = decoder.next_record().unwrap();
        assert_eq!(record, TlvRecord::encode_u16(0x01, 1000));
        assert_eq!(decoder.pending(), 1);
    }

    #[test]
    fn test_zero_length_record() {
        let mut decoder = TlvDecoder::new();
        decoder.push(&[0x55, 0x00, 0x06, 0x01, 0x00]);
        let records = decoder.drain_records();
        assert_eq!(records.len(), 2);
        assert!(records[0].is_empty());
        assert_eq!(records[1], TlvRecord::encode_u8(0x06, 0));
    }

    #[test]
    fn test_byte_at_a_time() {
        let bytes = encode_snapshot(&compute(PhaseTime::from_secs(41.0)));
        let mut decoder = TlvDecoder::new();
        let mut records = Vec::new();
        for b in &bytes {
            decoder.push(std::slice::from_ref(b));
            records.extend(decoder.drain_records());
        }
        assert_eq!(records.len(), 10);
        assert_eq!(decoder.pending(), 0);
    }
}
