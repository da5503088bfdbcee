//! Binary decoder error type.

use schematic_buffers::BufferError;
use thiserror::Error;

/// Error type for the binary codec. Decoding never returns a partial
/// document, and a failed encode returns no bytes.
#[derive(Debug, Error)]
pub enum BsonError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("invalid document length: {0}")]
    InvalidLength(i64),
    #[error("unsupported element type: 0x{0:02x}")]
    UnsupportedType(u8),
    #[error("documents nested deeper than {0} levels")]
    TooDeep(usize),
    #[error("field name or regex contains a NUL byte")]
    InteriorNul,
}

impl From<BufferError> for BsonError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::UnexpectedEof { .. } | BufferError::UnterminatedCString => {
                BsonError::UnexpectedEof
            }
            BufferError::InvalidUtf8 => BsonError::InvalidUtf8,
            BufferError::InteriorNul => BsonError::InteriorNul,
        }
    }
}
