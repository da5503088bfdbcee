//! Process-wide sentinel markers.
//!
//! `Null`, `MinKey` and `MaxKey` are stateless. Each has exactly one shared
//! instance behind a static accessor; the corresponding [`Value`] variants are
//! unit variants, so decoding or cloning a sentinel never allocates.
//!
//! [`Value`]: super::Value

use std::fmt;

/// The explicit null marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Null;

/// Sorts before every other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MinKey;

/// Sorts after every other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaxKey;

static NULL: Null = Null;
static MIN_KEY: MinKey = MinKey;
static MAX_KEY: MaxKey = MaxKey;

impl Null {
    pub fn instance() -> &'static Null {
        &NULL
    }
}

impl MinKey {
    pub fn instance() -> &'static MinKey {
        &MIN_KEY
    }
}

impl MaxKey {
    pub fn instance() -> &'static MaxKey {
        &MAX_KEY
    }
}

impl fmt::Display for Null {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null")
    }
}

impl fmt::Display for MinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MinKey")
    }
}

impl fmt::Display for MaxKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MaxKey")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_share_one_instance() {
        assert!(std::ptr::eq(Null::instance(), Null::instance()));
        assert!(std::ptr::eq(MinKey::instance(), MinKey::instance()));
        assert!(std::ptr::eq(MaxKey::instance(), MaxKey::instance()));
    }
}
