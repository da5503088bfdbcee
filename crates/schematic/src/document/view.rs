//! Read access shared by documents, arrays and overlays.

use std::borrow::Cow;

use uuid::Uuid;

use super::{Array, Document};
use crate::value::{Binary, Code, CodeWithScope, Date, ObjectId, Regex, Timestamp, Value};

/// Typed, read-only field access.
///
/// Each typed getter returns the value only when the stored variant matches
/// exactly. The exceptions are [`get_long`](Self::get_long) and
/// [`get_number`](Self::get_number), which widen narrower numbers,
/// [`get_string`](Self::get_string), which also returns symbol text, and
/// [`get_uuid`](Self::get_uuid), which parses strings. A wrong
/// kind and a missing field both read as `None`.
///
/// [`get_document`](Self::get_document) hands back a [`Cow`] so overlays can
/// return a nested document built from several layers. Plain documents
/// borrow.
pub trait DocumentView {
    fn get(&self, name: &str) -> Option<&Value>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_field(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// True only for an explicit null entry.
    fn is_null(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Value::Null))
    }

    fn is_null_or_missing(&self, name: &str) -> bool {
        matches!(self.get(name), None | Some(Value::Null))
    }

    fn get_boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    fn get_boolean_or(&self, name: &str, default: bool) -> bool {
        self.get_boolean(name).unwrap_or(default)
    }

    fn get_integer(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(Value::as_i32)
    }

    fn get_integer_or(&self, name: &str, default: i32) -> i32 {
        self.get_integer(name).unwrap_or(default)
    }

    fn get_long(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    fn get_long_or(&self, name: &str, default: i64) -> i64 {
        self.get_long(name).unwrap_or(default)
    }

    fn get_double(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_double)
    }

    fn get_double_or(&self, name: &str, default: f64) -> f64 {
        self.get_double(name).unwrap_or(default)
    }

    fn get_number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    fn get_string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    fn get_string_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get_string(name).unwrap_or(default)
    }

    fn get_symbol(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Symbol(s)) => Some(s),
            _ => None,
        }
    }

    fn get_document(&self, name: &str) -> Option<Cow<'_, Document>> {
        self.get(name).and_then(Value::as_document).map(Cow::Borrowed)
    }

    fn get_array(&self, name: &str) -> Option<&Array> {
        self.get(name).and_then(Value::as_array)
    }

    fn get_date(&self, name: &str) -> Option<Date> {
        self.get(name).and_then(Value::as_date)
    }

    fn get_timestamp(&self, name: &str) -> Option<Timestamp> {
        self.get(name).and_then(Value::as_timestamp)
    }

    fn get_object_id(&self, name: &str) -> Option<ObjectId> {
        self.get(name).and_then(Value::as_object_id)
    }

    fn get_binary(&self, name: &str) -> Option<&Binary> {
        self.get(name).and_then(Value::as_binary)
    }

    /// A unique-id value, or a string holding one.
    ///
    /// This is the one getter that converts text: a string field is run
    /// through [`Uuid::parse_str`], so hyphenated, simple, braced and URN
    /// forms all read as an id. Any other string reads as `None`.
    fn get_uuid(&self, name: &str) -> Option<Uuid> {
        match self.get(name)? {
            Value::Uuid(id) => Some(*id),
            Value::String(s) => Uuid::parse_str(s).ok(),
            _ => None,
        }
    }

    fn get_regex(&self, name: &str) -> Option<&Regex> {
        self.get(name).and_then(Value::as_regex)
    }

    /// Plain code, or the code half of a code-with-scope.
    fn get_code(&self, name: &str) -> Option<&Code> {
        self.get(name).and_then(Value::as_code)
    }

    fn get_code_with_scope(&self, name: &str) -> Option<&CodeWithScope> {
        self.get(name).and_then(Value::as_code_with_scope)
    }

    fn is_min_key(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Value::MinKey))
    }

    fn is_max_key(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Value::MaxKey))
    }
}
