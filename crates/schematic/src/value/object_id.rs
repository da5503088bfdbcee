//! 12-byte unique identifier.
//!
//! Wire layout (big-endian): 4-byte time in epoch seconds, 3-byte machine id,
//! 2-byte process id, 3-byte counter.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI32, Ordering};

use once_cell::sync::Lazy;
use rand::Rng;

use super::ValueError;

const MASK_24: i32 = 0x00ff_ffff;
const MASK_16: i32 = 0x0000_ffff;

static MACHINE_ID: Lazy<i32> = Lazy::new(|| rand::thread_rng().gen::<i32>() & MASK_24);
static COUNTER: Lazy<AtomicI32> = Lazy::new(|| AtomicI32::new(rand::thread_rng().gen::<i32>() & MASK_24));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    time: i32,
    machine: i32,
    process: i32,
    inc: i32,
}

impl ObjectId {
    /// Builds an id from its components. Machine and counter keep their low
    /// 24 bits, the process id its low 16 bits.
    pub fn from_parts(time: i32, machine: i32, process: i32, inc: i32) -> Self {
        Self {
            time,
            machine: machine & MASK_24,
            process: process & MASK_16,
            inc: inc & MASK_24,
        }
    }

    /// Generates a fresh id for this process.
    pub fn generate() -> Self {
        let time = chrono::Utc::now().timestamp() as i32;
        let process = std::process::id() as i32;
        let inc = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self::from_parts(time, *MACHINE_ID, process, inc)
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        let be = |range: std::ops::Range<usize>| {
            bytes[range]
                .iter()
                .fold(0u32, |acc, &b| (acc << 8) | b as u32) as i32
        };
        Self {
            time: be(0..4),
            machine: be(4..7),
            process: be(7..9),
            inc: be(9..12),
        }
    }

    pub fn to_bytes(&self) -> [u8; 12] {
        let t = self.time.to_be_bytes();
        let m = self.machine.to_be_bytes();
        let p = self.process.to_be_bytes();
        let i = self.inc.to_be_bytes();
        [
            t[0], t[1], t[2], t[3], m[1], m[2], m[3], p[2], p[3], i[1], i[2], i[3],
        ]
    }

    /// Parses the 24-character hexadecimal form.
    pub fn from_hex(hex_str: &str) -> Result<Self, ValueError> {
        let invalid = || ValueError::InvalidObjectId(hex_str.to_string());
        if hex_str.len() != 24 {
            return Err(invalid());
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(hex_str, &mut bytes).map_err(|_| invalid())?;
        Ok(Self::from_bytes(bytes))
    }

    /// Lowercase 24-character hexadecimal form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn time(&self) -> i32 {
        self.time
    }

    pub fn machine(&self) -> i32 {
        self.machine
    }

    pub fn process(&self) -> i32 {
        self.process
    }

    pub fn inc(&self) -> i32 {
        self.inc
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_id() {
        let id = ObjectId::from_hex("4e2064df0000010002000003").unwrap();
        assert_eq!(id.time(), 1310745823);
        assert_eq!(id.machine(), 1);
        assert_eq!(id.process(), 2);
        assert_eq!(id.inc(), 3);
        assert_eq!(id.to_hex(), "4e2064df0000010002000003");
    }

    #[test]
    fn bytes_are_big_endian() {
        let id = ObjectId::from_parts(0x01020304, 0x050607, 0x0809, 0x0a0b0c);
        assert_eq!(id.to_bytes(), [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        assert_eq!(ObjectId::from_bytes(id.to_bytes()), id);
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(ObjectId::from_hex("4e2064df").is_err());
        assert!(ObjectId::from_hex("zz2064df0000010002000003").is_err());
    }

    #[test]
    fn generated_ids_differ() {
        let a = ObjectId::generate();
        let b = ObjectId::generate();
        assert_ne!(a, b);
        assert_eq!(a.machine(), b.machine());
    }

    #[test]
    fn parts_are_masked() {
        let id = ObjectId::from_parts(-1, -1, -1, -1);
        assert_eq!(id.machine(), 0xffffff);
        assert_eq!(id.process(), 0xffff);
        assert_eq!(id.inc(), 0xffffff);
        assert_eq!(id.to_hex(), "ffffffffffffffffffffffff");
        assert_eq!(ObjectId::from_hex(&id.to_hex()).unwrap(), id);
    }
}
