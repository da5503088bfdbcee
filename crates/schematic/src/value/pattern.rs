//! Regular-expression values: pattern text plus a flag bitmask.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::sync::Arc;

/// Regex option bitmask.
///
/// Bit values match the conventional platform regex flag constants, so a
/// numeric mask received from elsewhere can be wrapped directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RegexFlags(u32);

impl RegexFlags {
    pub const NONE: RegexFlags = RegexFlags(0);
    pub const UNIX_LINES: RegexFlags = RegexFlags(0x01);
    pub const CASE_INSENSITIVE: RegexFlags = RegexFlags(0x02);
    pub const COMMENTS: RegexFlags = RegexFlags(0x04);
    pub const MULTILINE: RegexFlags = RegexFlags(0x08);
    pub const LITERAL: RegexFlags = RegexFlags(0x10);
    pub const DOTALL: RegexFlags = RegexFlags(0x20);
    pub const UNICODE_CASE: RegexFlags = RegexFlags(0x40);
    pub const CANON_EQ: RegexFlags = RegexFlags(0x80);

    /// Flag characters in their canonical rendering order.
    const CHARS: [(char, RegexFlags); 8] = [
        ('c', Self::CANON_EQ),
        ('d', Self::UNIX_LINES),
        ('i', Self::CASE_INSENSITIVE),
        ('m', Self::MULTILINE),
        ('s', Self::DOTALL),
        ('t', Self::LITERAL),
        ('u', Self::UNICODE_CASE),
        ('x', Self::COMMENTS),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        RegexFlags(bits & 0xff)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn contains(&self, other: RegexFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Parses a flag string such as `"im"`. Unknown characters are ignored.
    pub fn parse(flags: &str) -> Self {
        flags.chars().fold(Self::NONE, |acc, c| {
            match Self::CHARS.iter().find(|(ch, _)| *ch == c) {
                Some((_, flag)) => acc | *flag,
                None => acc,
            }
        })
    }

    /// Renders the set flags in `c,d,i,m,s,t,u,x` order.
    pub fn to_flag_string(&self) -> String {
        Self::CHARS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(c, _)| *c)
            .collect()
    }
}

impl BitOr for RegexFlags {
    type Output = RegexFlags;

    fn bitor(self, rhs: RegexFlags) -> RegexFlags {
        RegexFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for RegexFlags {
    fn bitor_assign(&mut self, rhs: RegexFlags) {
        self.0 |= rhs.0;
    }
}

/// A regular expression value. Two regexes are equal when their pattern text
/// and flag sets match, regardless of the order flags were written in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Regex {
    pattern: Arc<str>,
    flags: RegexFlags,
}

impl Regex {
    pub fn new(pattern: impl Into<Arc<str>>, flags: RegexFlags) -> Self {
        Self {
            pattern: pattern.into(),
            flags,
        }
    }

    /// Builds a regex from a flag string (`"im"`, `"mi"`, ...).
    pub fn with_flag_str(pattern: impl Into<Arc<str>>, flags: &str) -> Self {
        Self::new(pattern, RegexFlags::parse(flags))
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> RegexFlags {
        self.flags
    }

    pub fn flag_string(&self) -> String {
        self.flags.to_flag_string()
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.pattern, self.flag_string())
    }
}
