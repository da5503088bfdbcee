//! Growable little-endian byte writer.

use crate::BufferError;

/// Position of a reserved 4-byte length prefix inside a [`Writer`].
///
/// Returned by [`Writer::reserve_len`] and consumed by
/// [`Writer::backfill_len`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LenSlot(usize);

impl LenSlot {
    /// Offset of the slot from the start of the buffer.
    pub fn offset(&self) -> usize {
        self.0
    }
}

/// A binary buffer writer that grows automatically as needed.
///
/// All multi-byte integers are little-endian unless the method name says
/// otherwise (`*_be`).
///
/// # Example
///
/// ```
/// use schematic_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.i32_le(2);
/// assert_eq!(writer.flush(), [0x01, 0x02, 0x00, 0x00, 0x00]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a writer with the given initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// View of everything written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Takes the written data, leaving the writer empty and reusable.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    #[inline]
    pub fn i32_le(&mut self, val: i32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    #[inline]
    pub fn i64_le(&mut self, val: i64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    #[inline]
    pub fn f64_le(&mut self, val: f64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes the low `width` bytes of `val` in big-endian order.
    ///
    /// Used for the packed 12-byte object identifier, whose 3- and 2-byte
    /// components are stored most significant byte first.
    pub fn uint_be(&mut self, val: u32, width: usize) {
        debug_assert!(width <= 4);
        let bytes = val.to_be_bytes();
        self.buf.extend_from_slice(&bytes[4 - width..]);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn bytes(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Writes a zero-terminated string. A string holding a zero byte cannot
    /// be framed this way and is rejected with nothing written.
    pub fn cstring(&mut self, s: &str) -> Result<(), BufferError> {
        let bytes = s.as_bytes();
        if bytes.contains(&0) {
            return Err(BufferError::InteriorNul);
        }
        self.buf.extend_from_slice(bytes);
        self.buf.push(0);
        Ok(())
    }

    /// Writes a length-prefixed string: `i32(byte_len + 1)`, the UTF-8 bytes,
    /// then a zero terminator.
    pub fn string(&mut self, s: &str) {
        let bytes = s.as_bytes();
        self.i32_le(bytes.len() as i32 + 1);
        self.buf.extend_from_slice(bytes);
        self.buf.push(0);
    }

    /// Reserves four bytes for a length prefix that is filled in later.
    pub fn reserve_len(&mut self) -> LenSlot {
        let slot = LenSlot(self.buf.len());
        self.buf.extend_from_slice(&[0u8; 4]);
        slot
    }

    /// Fills a reserved slot with the number of bytes written since (and
    /// including) the slot itself.
    pub fn backfill_len(&mut self, slot: LenSlot) {
        let len = (self.buf.len() - slot.0) as i32;
        self.buf[slot.0..slot.0 + 4].copy_from_slice(&len.to_le_bytes());
    }
}
