//! Bounds-checked binary reader with cursor tracking.

use std::str;

use crate::BufferError;

/// A binary reader over a byte slice.
///
/// Every read checks the remaining length first, so malformed or truncated
/// input surfaces as [`BufferError::UnexpectedEof`] rather than a panic.
///
/// # Example
///
/// ```
/// use schematic_buffers::Reader;
///
/// let data = [0x05, 0x00, 0x00, 0x00, b'x', 0x00];
/// let mut reader = Reader::new(&data);
/// assert_eq!(reader.i32_le().unwrap(), 5);
/// assert_eq!(reader.cstring().unwrap(), "x");
/// assert!(reader.u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    x: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, x: 0 }
    }

    /// Current cursor position.
    pub fn position(&self) -> usize {
        self.x
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.x
    }

    #[inline]
    fn check(&self, needed: usize) -> Result<(), BufferError> {
        let remaining = self.remaining();
        if needed > remaining {
            Err(BufferError::UnexpectedEof { needed, remaining })
        } else {
            Ok(())
        }
    }

    /// Moves the cursor to an absolute position inside the buffer.
    pub fn seek(&mut self, pos: usize) -> Result<(), BufferError> {
        if pos > self.data.len() {
            return Err(BufferError::UnexpectedEof {
                needed: pos - self.x.min(pos),
                remaining: self.remaining(),
            });
        }
        self.x = pos;
        Ok(())
    }

    /// Advances the cursor by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), BufferError> {
        self.check(n)?;
        self.x += n;
        Ok(())
    }

    /// Returns the next `n` bytes and advances past them.
    pub fn buf(&mut self, n: usize) -> Result<&'a [u8], BufferError> {
        self.check(n)?;
        let out = &self.data[self.x..self.x + n];
        self.x += n;
        Ok(out)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.data[self.x];
        self.x += 1;
        Ok(val)
    }

    #[inline]
    pub fn i32_le(&mut self) -> Result<i32, BufferError> {
        let b = self.buf(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    #[inline]
    pub fn i64_le(&mut self) -> Result<i64, BufferError> {
        let b = self.buf(8)?;
        Ok(i64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    #[inline]
    pub fn f64_le(&mut self) -> Result<f64, BufferError> {
        let b = self.buf(8)?;
        Ok(f64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Reads a `width`-byte big-endian unsigned integer (`width <= 4`).
    pub fn uint_be(&mut self, width: usize) -> Result<u32, BufferError> {
        debug_assert!(width <= 4);
        let b = self.buf(width)?;
        Ok(b.iter().fold(0u32, |acc, &byte| (acc << 8) | byte as u32))
    }

    /// Reads `n` bytes as UTF-8.
    pub fn utf8(&mut self, n: usize) -> Result<&'a str, BufferError> {
        let bytes = self.buf(n)?;
        str::from_utf8(bytes).map_err(|_| BufferError::InvalidUtf8)
    }

    /// Reads a zero-terminated UTF-8 string and skips the terminator.
    pub fn cstring(&mut self) -> Result<&'a str, BufferError> {
        let rest = &self.data[self.x..];
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(BufferError::UnterminatedCString)?;
        let s = str::from_utf8(&rest[..len]).map_err(|_| BufferError::InvalidUtf8)?;
        self.x += len + 1;
        Ok(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_read_reports_sizes() {
        let mut r = Reader::new(&[1, 2]);
        assert_eq!(
            r.i32_le(),
            Err(BufferError::UnexpectedEof {
                needed: 4,
                remaining: 2
            })
        );
        // A failed read leaves the cursor untouched.
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn unterminated_cstring() {
        let mut r = Reader::new(b"abc");
        assert_eq!(r.cstring(), Err(BufferError::UnterminatedCString));
    }

    #[test]
    fn uint_be_round_trip() {
        let mut r = Reader::new(&[0x00, 0x00, 0x01, 0x00, 0x02]);
        assert_eq!(r.uint_be(3).unwrap(), 1);
        assert_eq!(r.uint_be(2).unwrap(), 2);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn invalid_utf8() {
        let mut r = Reader::new(&[0xff, 0xfe, 0x00]);
        assert_eq!(r.cstring(), Err(BufferError::InvalidUtf8));
    }
}
