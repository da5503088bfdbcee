//! Byte buffer utilities for the schematic binary codec.
//!
//! # Overview
//!
//! - [`Writer`] - appends little-endian scalars, C-strings and length-prefixed
//!   strings to a growing buffer, and can reserve a 4-byte length slot that is
//!   backfilled once the body behind it has been written.
//! - [`Reader`] - reads the same primitives back from a byte slice, reporting
//!   truncation as a [`BufferError`] instead of panicking.
//!
//! # Example
//!
//! ```
//! use schematic_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! let slot = writer.reserve_len();
//! writer.cstring("name").unwrap();
//! writer.i32_le(42);
//! writer.u8(0);
//! writer.backfill_len(slot);
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.i32_le().unwrap() as usize, data.len());
//! assert_eq!(reader.cstring().unwrap(), "name");
//! assert_eq!(reader.i32_le().unwrap(), 42);
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::{LenSlot, Writer};

use thiserror::Error;

/// Error type for buffer reads, and for C-strings that cannot be written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    #[error("unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },
    /// A C-string ran to the end of the buffer without its terminator.
    #[error("unterminated C-string")]
    UnterminatedCString,
    /// Invalid UTF-8 sequence.
    #[error("invalid UTF-8 sequence")]
    InvalidUtf8,
    /// A C-string to be written contains a zero byte.
    #[error("C-string contains an interior NUL byte")]
    InteriorNul,
}
