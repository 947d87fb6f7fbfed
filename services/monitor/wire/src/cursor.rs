//! Budgeted report writing with back-patched record lengths.
//!
//! A record's one-byte length field precedes a payload whose size is only
//! known once the payload has been written. [`ReportCursor::begin_record`]
//! reserves the slot and returns a [`LenSlot`] handle; closing the record
//! patches the real length in, instead of call sites juggling raw buffer
//! positions.
//!
//! The cursor tracks a byte budget but does not police it on every write:
//! builders check [`ReportCursor::fits`] against a record's worst-case size
//! before opening it, which is what keeps partially written records out of
//! the buffer.

use crate::{mbi, WireError};
use bytes::{BufMut, Bytes, BytesMut};

/// Bytes a record's id and length fields occupy for single-byte ids.
pub const RECORD_OVERHEAD: usize = 2;

/// Write cursor for one report datagram.
#[derive(Debug)]
pub struct ReportCursor {
    buf: BytesMut,
    max_len: usize,
}

/// Handle to a reserved record-length byte.
///
/// Returned by [`ReportCursor::begin_record`] and consumed by
/// [`ReportCursor::end_record`]; holding it open across another record is
/// not possible because the slot index is tied to the write position.
#[derive(Debug)]
#[must_use = "an open record must be closed with end_record"]
pub struct LenSlot {
    at: usize,
}

impl ReportCursor {
    /// Create a cursor with a total byte budget.
    pub fn new(max_len: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(max_len),
            max_len,
        }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Bytes left in the budget.
    pub fn remaining(&self) -> usize {
        self.max_len.saturating_sub(self.buf.len())
    }

    /// True if `extra` more bytes fit in the budget.
    pub fn fits(&self, extra: usize) -> bool {
        extra <= self.remaining()
    }

    /// Append a single byte.
    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// Append a `u16` little-endian.
    pub fn put_u16_le(&mut self, value: u16) {
        self.buf.put_u16_le(value);
    }

    /// Append an `i16` little-endian.
    pub fn put_i16_le(&mut self, value: i16) {
        self.buf.put_i16_le(value);
    }

    /// Append raw bytes.
    pub fn put_slice(&mut self, data: &[u8]) {
        self.buf.put_slice(data);
    }

    /// Append an MBI-encoded value.
    pub fn put_mbi(&mut self, value: u32) {
        mbi::encode_into(&mut self.buf, value);
    }

    /// Open a record: write its id and reserve the length byte.
    pub fn begin_record(&mut self, id: u8) -> LenSlot {
        self.put_mbi(u32::from(id));
        let at = self.buf.len();
        self.buf.put_u8(0);
        LenSlot { at }
    }

    /// Close a record by patching its reserved length byte.
    ///
    /// Fails with [`WireError::Oversize`] if the payload grew past what one
    /// length byte can describe; the record is left in place and the caller
    /// is expected to roll back via a checkpoint.
    pub fn end_record(&mut self, slot: LenSlot) -> Result<(), WireError> {
        let payload_len = self.buf.len() - slot.at - 1;
        if payload_len > u8::MAX as usize {
            return Err(WireError::Oversize(payload_len));
        }
        self.buf[slot.at] = payload_len as u8;
        Ok(())
    }

    /// Current write position, for rolling back an abandoned record.
    pub fn checkpoint(&self) -> usize {
        self.buf.len()
    }

    /// Drop everything written after `checkpoint`.
    pub fn truncate_to(&mut self, checkpoint: usize) {
        self.buf.truncate(checkpoint);
    }

    /// Finish writing and hand the datagram over.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backpatch_length() {
        let mut cur = ReportCursor::new(64);
        let slot = cur.begin_record(2);
        cur.put_mbi(0x7FF);
        cur.put_u16_le(0x0201);
        cur.end_record(slot).unwrap();

        let bytes = cur.freeze();
        // id, patched length, two-byte mask varint, one u16 field
        assert_eq!(bytes.as_ref(), &[0x02, 0x04, 0x8F, 0x7F, 0x01, 0x02]);
    }

    #[test]
    fn test_oversize_record_refused() {
        let mut cur = ReportCursor::new(512);
        let checkpoint = cur.checkpoint();
        let slot = cur.begin_record(2);
        cur.put_slice(&[0u8; 256]);
        assert_eq!(cur.end_record(slot), Err(WireError::Oversize(256)));

        cur.truncate_to(checkpoint);
        assert!(cur.is_empty());
    }

    #[test]
    fn test_budget_tracking() {
        let mut cur = ReportCursor::new(4);
        assert!(cur.fits(4));
        cur.put_u16_le(7);
        assert_eq!(cur.remaining(), 2);
        assert!(cur.fits(2));
        assert!(!cur.fits(3));
    }

    #[test]
    fn test_exact_255_byte_payload() {
        let mut cur = ReportCursor::new(512);
        let slot = cur.begin_record(4);
        cur.put_slice(&[0xAAu8; 255]);
        cur.end_record(slot).unwrap();
        assert_eq!(cur.freeze()[1], 255);
    }
}
