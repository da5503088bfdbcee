//! Field-name paths from a root document to a nested location.
//!
//! A [`Path`] renders as a JSON Pointer (RFC 6901): `/a/b~1c` addresses field
//! `b/c` of field `a`, and the empty string is the root.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Immutable sequence of field names. Array positions are their decimal form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.segments.iter()
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Child path one level below this one.
    pub fn with(&self, name: impl Into<String>) -> Path {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(name.into());
        Path { segments }
    }

    /// `None` for the root.
    pub fn parent(&self) -> Option<Path> {
        let (_, head) = self.segments.split_last()?;
        Some(Path {
            segments: head.to_vec(),
        })
    }

    /// True when `self` equals `other` or is one of its ancestors.
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// True when `self` is a strict ancestor of `other`.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.segments.len() < other.segments.len() && self.is_prefix_of(other)
    }
}

fn escape_segment(segment: &str) -> std::borrow::Cow<'_, str> {
    if !segment.contains(['/', '~']) {
        return segment.into();
    }
    segment.replace('~', "~0").replace('/', "~1").into()
}

fn unescape_segment(segment: &str) -> String {
    if !segment.contains('~') {
        return segment.to_string();
    }
    segment.replace("~1", "/").replace("~0", "~")
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", escape_segment(segment))?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = Infallible;

    /// The leading `/` is optional, so `a/b` and `/a/b` parse alike.
    fn from_str(pointer: &str) -> Result<Self, Self::Err> {
        if pointer.is_empty() {
            return Ok(Path::root());
        }
        let body = pointer.strip_prefix('/').unwrap_or(pointer);
        Ok(Path {
            segments: body.split('/').map(unescape_segment).collect(),
        })
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Path::new(iter)
    }
}
