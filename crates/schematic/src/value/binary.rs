//! Binary blobs with a one-byte subtype.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Well-known binary subtypes.
pub struct BinaryType;

impl BinaryType {
    pub const GENERAL: u8 = 0x00;
    pub const FUNCTION: u8 = 0x01;
    pub const BINARY: u8 = 0x02;
    /// Reserved for 128-bit unique ids; decoded as [`Value::Uuid`](super::Value::Uuid).
    pub const UUID: u8 = 0x03;
    pub const MD5: u8 = 0x05;
    pub const USER_DEFINED: u8 = 0x80;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binary {
    subtype: u8,
    bytes: Arc<[u8]>,
}

impl Binary {
    pub fn new(subtype: u8, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            subtype,
            bytes: bytes.into(),
        }
    }

    pub fn subtype(&self) -> u8 {
        self.subtype
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard (padded) base64 form of the bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binary({:#04x}, {})", self.subtype, self.to_base64())
    }
}
