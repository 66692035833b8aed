//! Bounds-checked binary cursor for codec code.
//!
//! [`Cursor`] is the only interface the codecs use to read raw buffers:
//! a sequential reader over a borrowed byte slice where every failed read
//! is a [`Truncated`](Error::Truncated) error rather than a panic or a
//! silent wraparound. [`Writer`] is its serialization counterpart.

use crate::error::{Error, Result};

/// Sequential bounds-checked reader over a byte slice.
///
/// All read methods advance the position on success and leave it
/// untouched on failure. Dispatch code rewinds a shared cursor with
/// [`seek_to_start`](Cursor::seek_to_start) between parse attempts.
#[derive(Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the start of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    /// Read the next byte.
    pub fn next_byte(&mut self) -> Result<u8> {
        match self.buf.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Ok(b)
            }
            None => Err(Error::Truncated {
                needed: 1,
                remaining: 0,
            }),
        }
    }

    /// Read the next `n` bytes as a slice.
    pub fn next_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(Error::Truncated {
                needed: n,
                remaining,
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read the next two bytes as a little-endian `u16`.
    pub fn next_u16_le(&mut self) -> Result<u16> {
        let bytes = self.next_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Advance the position by `n` bytes without yielding them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.next_bytes(n).map(|_| ())
    }

    /// Number of unread bytes left in the buffer.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// `true` if every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Current read position from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewind to the start of the buffer.
    pub fn seek_to_start(&mut self) {
        self.pos = 0;
    }
}

/// Growable byte writer mirroring [`Cursor`].
///
/// Serialization in this library is infallible once the values exist,
/// so the write methods do not return `Result`.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Create an empty writer.
    pub fn new() -> Self {
        Writer { buf: Vec::new() }
    }

    /// Create a writer with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Writer {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append a single byte.
    pub fn write_byte(&mut self, b: u8) {
        self.buf.push(b);
    }

    /// Append a slice of bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Append a boolean as `0x01`/`0x00`.
    pub fn write_bool(&mut self, on: bool) {
        self.buf.push(u8::from(on));
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the writer and return the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reads_bytes_in_order() {
        let mut cur = Cursor::new(&[0x10, 0x20, 0x30]);
        assert_eq!(cur.next_byte().unwrap(), 0x10);
        assert_eq!(cur.next_byte().unwrap(), 0x20);
        assert_eq!(cur.next_byte().unwrap(), 0x30);
        assert!(cur.is_empty());
    }

    #[test]
    fn cursor_next_byte_past_end() {
        let mut cur = Cursor::new(&[0x01]);
        cur.next_byte().unwrap();
        match cur.next_byte() {
            Err(Error::Truncated { needed, remaining }) => {
                assert_eq!(needed, 1);
                assert_eq!(remaining, 0);
            }
            other => panic!("expected Truncated, got {other:?}"),
        }
    }

    #[test]
    fn cursor_next_bytes_slice() {
        let mut cur = Cursor::new(&[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(cur.next_bytes(3).unwrap(), &[0x01, 0x02, 0x03]);
        assert_eq!(cur.remaining(), 1);
    }

    #[test]
    fn cursor_next_bytes_short_reports_both_counts() {
        let mut cur = Cursor::new(&[0x01, 0x02]);
        match cur.next_bytes(5) {
            Err(Error::Truncated { needed, remaining }) => {
                assert_eq!(needed, 5);
                assert_eq!(remaining, 2);
            }
            other => panic!("expected Truncated, got {other:?}"),
        }
        // Position must be unchanged by the failed read.
        assert_eq!(cur.position(), 0);
        assert_eq!(cur.next_bytes(2).unwrap(), &[0x01, 0x02]);
    }

    #[test]
    fn cursor_next_u16_le() {
        let mut cur = Cursor::new(&[0x34, 0x12, 0xFF]);
        assert_eq!(cur.next_u16_le().unwrap(), 0x1234);
        assert_eq!(cur.remaining(), 1);
        match cur.next_u16_le() {
            Err(Error::Truncated { needed, remaining }) => {
                assert_eq!(needed, 2);
                assert_eq!(remaining, 1);
            }
            other => panic!("expected Truncated, got {other:?}"),
        }
        // Position unchanged by the failed read.
        assert_eq!(cur.next_byte().unwrap(), 0xFF);
    }

    #[test]
    fn cursor_skip() {
        let mut cur = Cursor::new(&[0x01, 0x02, 0x03]);
        cur.skip(2).unwrap();
        assert_eq!(cur.next_byte().unwrap(), 0x03);
        assert!(cur.skip(1).is_err());
    }

    #[test]
    fn cursor_seek_to_start_allows_reparse() {
        let mut cur = Cursor::new(&[0xAA, 0xBB]);
        cur.next_byte().unwrap();
        cur.next_byte().unwrap();
        cur.seek_to_start();
        assert_eq!(cur.position(), 0);
        assert_eq!(cur.next_byte().unwrap(), 0xAA);
    }

    #[test]
    fn cursor_empty_buffer() {
        let mut cur = Cursor::new(&[]);
        assert!(cur.is_empty());
        assert_eq!(cur.remaining(), 0);
        assert!(cur.next_byte().is_err());
        assert!(cur.next_bytes(1).is_err());
        // Zero-length reads always succeed.
        assert_eq!(cur.next_bytes(0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn writer_accumulates() {
        let mut w = Writer::new();
        w.write_byte(0x30);
        w.write_bytes(&[0x00, 0x01, 0x34]);
        w.write_bool(true);
        w.write_bool(false);
        assert_eq!(w.len(), 6);
        assert_eq!(w.into_bytes(), vec![0x30, 0x00, 0x01, 0x34, 0x01, 0x00]);
    }

    #[test]
    fn writer_with_capacity_starts_empty() {
        let w = Writer::with_capacity(64);
        assert!(w.is_empty());
        assert_eq!(w.into_bytes(), Vec::<u8>::new());
    }
}
