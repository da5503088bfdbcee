use std::borrow::Cow;

use crate::value::Value;

/// A `(name, value)` pair yielded while iterating a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    name: Cow<'a, str>,
    value: &'a Value,
}

impl<'a> Field<'a> {
    pub(crate) fn new(name: impl Into<Cow<'a, str>>, value: &'a Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }
}

/// An `(index, value)` pair yielded while iterating an array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<'a> {
    index: usize,
    value: &'a Value,
}

impl<'a> Entry<'a> {
    pub(crate) fn new(index: usize, value: &'a Value) -> Self {
        Self { index, value }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }
}
