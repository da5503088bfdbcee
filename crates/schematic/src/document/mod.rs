//! Ordered documents and index-addressed arrays.
//!
//! A [`Document`] maps field names to [`Value`]s and iterates in insertion
//! order. An [`Array`] is the positional variant: it exposes the same
//! [`DocumentView`] read API with the decimal form of each index as its field
//! name, which is also how arrays travel through the codecs.
//!
//! Both types are read-only outside this crate. Mutation goes through the
//! editors in [`crate::editor`], which keep the change log in step with the
//! data.

mod array;
mod field;
mod interop;
pub mod transform;
mod view;

use std::borrow::Cow;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

pub use array::Array;
pub(crate) use array::parse_index;
pub use field::{Entry, Field};
pub use transform::ValueTransformer;
pub use view::DocumentView;

use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: IndexMap<String, Value>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: IndexMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.fields.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    /// Field snapshots in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = Field<'_>> + '_ {
        self.fields
            .iter()
            .map(|(name, value)| Field::new(name.as_str(), value))
    }

    /// True when every field of `other` is present here with an equal value.
    pub fn contains_all(&self, other: &Document) -> bool {
        other
            .fields
            .iter()
            .all(|(name, value)| self.fields.get(name) == Some(value))
    }

    /// Copy of this document with one field replaced (or appended).
    pub fn with_field(&self, name: impl Into<String>, value: impl Into<Value>) -> Document {
        let mut copy = self.clone();
        copy.fields.insert(name.into(), value.into());
        copy
    }

    /// Copy of this document with each named field replaced (or appended).
    /// Always a new document, even when `changes` is empty.
    pub fn with<I, K>(&self, changes: I) -> Document
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let mut copy = self.clone();
        for (name, value) in changes {
            copy.fields.insert(name.into(), value);
        }
        copy
    }

    /// Rewrites every leaf through `transformer`, descending into nested
    /// documents, arrays and code scopes.
    ///
    /// Returns `Cow::Borrowed(self)` when the transformer changed nothing.
    pub fn with_transformed<T>(&self, transformer: &T) -> Cow<'_, Document>
    where
        T: ValueTransformer + ?Sized,
    {
        let mut changed: Option<Document> = None;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            match transform::transform_value(value, transformer) {
                Some(new_value) => {
                    let doc = changed.get_or_insert_with(|| Document {
                        fields: self
                            .fields
                            .iter()
                            .take(i)
                            .map(|(k, v)| (k.clone(), v.clone()))
                            .collect(),
                    });
                    doc.fields.insert(name.clone(), new_value);
                }
                None => {
                    if let Some(doc) = changed.as_mut() {
                        doc.fields.insert(name.clone(), value.clone());
                    }
                }
            }
        }
        match changed {
            Some(doc) => Cow::Owned(doc),
            None => Cow::Borrowed(self),
        }
    }

    /// Nested document under `name`, borrowed. Shadows the
    /// [`DocumentView`] method, which may hand back an owned merge.
    pub fn get_document(&self, name: &str) -> Option<&Document> {
        self.fields.get(name).and_then(Value::as_document)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.fields.get_mut(name)
    }

    /// Sets a field, returning the value it replaced. New names go last.
    pub(crate) fn put(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(name.into(), value)
    }

    /// Like [`put`](Self::put), also handing back the stored slot.
    pub(crate) fn put_slot(&mut self, name: String, value: Value) -> (Option<Value>, &mut Value) {
        match self.fields.entry(name) {
            indexmap::map::Entry::Occupied(mut entry) => {
                let old = entry.insert(value);
                (Some(old), entry.into_mut())
            }
            indexmap::map::Entry::Vacant(entry) => (None, entry.insert(value)),
        }
    }

    /// Removes a field, keeping the order of the rest.
    pub(crate) fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    pub(crate) fn clear(&mut self) {
        self.fields.clear();
    }
}

impl DocumentView for Document {
    fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    fn len(&self) -> usize {
        self.fields.len()
    }
}

impl Eq for Document {}

/// Combines per-field hashes commutatively so the result ignores field
/// order, matching `PartialEq`.
impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let combined = self.fields.iter().fold(0u64, |acc, (name, value)| {
            let mut h = DefaultHasher::new();
            name.hash(&mut h);
            value.hash(&mut h);
            acc.wrapping_add(h.finish())
        });
        state.write_usize(self.fields.len());
        state.write_u64(combined);
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Document {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::json::document_to_string(self))
    }
}
