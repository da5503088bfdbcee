use std::borrow::Cow;
use std::fmt;

use super::transform::{self, ValueTransformer};
use super::{DocumentView, Entry, Field};
use crate::value::Value;

/// Positional sequence of values. As a [`DocumentView`] its field names are
/// `"0"`, `"1"`, ... in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Array {
    values: Vec<Value>,
}

/// Parses a canonical decimal index (`"0"`, `"17"`, but not `"01"` or `"+1"`).
pub(crate) fn parse_index(name: &str) -> Option<usize> {
    if name.is_empty() || (name.len() > 1 && name.starts_with('0')) {
        return None;
    }
    if !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| Entry::new(i, value))
    }

    /// Entries presented as named fields.
    pub fn fields(&self) -> impl Iterator<Item = Field<'_>> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| Field::new(Cow::Owned(i.to_string()), value))
    }

    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    pub fn contains_value(&self, value: &Value) -> bool {
        self.index_of(value).is_some()
    }

    pub fn with_transformed<T>(&self, transformer: &T) -> Cow<'_, Array>
    where
        T: ValueTransformer + ?Sized,
    {
        let mut changed: Option<Vec<Value>> = None;
        for (i, value) in self.values.iter().enumerate() {
            match transform::transform_value(value, transformer) {
                Some(new_value) => changed
                    .get_or_insert_with(|| self.values[..i].to_vec())
                    .push(new_value),
                None => {
                    if let Some(values) = changed.as_mut() {
                        values.push(value.clone());
                    }
                }
            }
        }
        match changed {
            Some(values) => Cow::Owned(Array { values }),
            None => Cow::Borrowed(self),
        }
    }

    pub(crate) fn get_at_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.values.get_mut(index)
    }

    /// Replaces the value at `index`, or appends when `index == len`.
    /// Returns the replaced value; `None` means appended.
    pub(crate) fn set(&mut self, index: usize, value: Value) -> Option<Value> {
        match self.values.get_mut(index) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.values.push(value);
                None
            }
        }
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub(crate) fn insert(&mut self, index: usize, value: Value) {
        self.values.insert(index, value);
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Value {
        self.values.remove(index)
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&Value) -> bool) {
        self.values.retain(keep);
    }
}

impl DocumentView for Array {
    fn get(&self, name: &str) -> Option<&Value> {
        parse_index(name).and_then(|i| self.values.get(i))
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}

impl<V: Into<Value>> FromIterator<V> for Array {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Array {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Vec<Value>> for Array {
    fn from(values: Vec<Value>) -> Self {
        Array { values }
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl IntoIterator for Array {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::json::array_to_string(self))
    }
}
