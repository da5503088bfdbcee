use uuid::Uuid;

use super::factory::{DefaultValueFactory, Number, ValueFactory};
use super::{array_in, document_in, emit, reborrow, DocumentEditor, Sink};
use crate::changes::{ChangeError, ChangeOperation, ChangeSink};
use crate::document::{Array, Document, DocumentView};
use crate::path::Path;
use crate::value::{RegexFlags, Value, ValueError};

/// Edits one array in place.
///
/// Indexed writes fail with [`ChangeError::IndexOutOfBounds`] rather than
/// panicking. Writing at `len()` appends.
pub struct ArrayEditor<'a> {
    arr: &'a mut Array,
    path: Path,
    factory: &'a dyn ValueFactory,
    sink: Sink<'a>,
}

/// Typed `set_*` (by index) and `add_*` (append) pairs that build their value
/// through the factory.
macro_rules! typed_values {
    ($($(#[$meta:meta])* $set:ident / $add:ident ($($arg:ident: $ty:ty),*) => $create:ident;)*) => {
        $(
            $(#[$meta])*
            pub fn $set(&mut self, index: usize, $($arg: $ty),*) -> Result<&mut Self, ChangeError> {
                let value = self.factory.$create($($arg),*);
                self.set(index, value)
            }

            $(#[$meta])*
            pub fn $add(&mut self, $($arg: $ty),*) -> &mut Self {
                let value = self.factory.$create($($arg),*);
                self.add(value)
            }
        )*
    };
}

impl<'a> ArrayEditor<'a> {
    pub fn new(arr: &'a mut Array) -> Self {
        Self::with_factory(arr, &DefaultValueFactory)
    }

    pub fn with_factory(arr: &'a mut Array, factory: &'a dyn ValueFactory) -> Self {
        Self {
            arr,
            path: Path::root(),
            factory,
            sink: None,
        }
    }

    pub fn observed(arr: &'a mut Array, sink: &'a mut dyn ChangeSink) -> Self {
        Self {
            arr,
            path: Path::root(),
            factory: &DefaultValueFactory,
            sink: Some(sink),
        }
    }

    pub(super) fn child(
        arr: &'a mut Array,
        path: Path,
        factory: &'a dyn ValueFactory,
        sink: Sink<'a>,
    ) -> Self {
        Self {
            arr,
            path,
            factory,
            sink,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn as_array(&self) -> &Array {
        self.arr
    }

    pub fn get_at(&self, index: usize) -> Option<&Value> {
        self.arr.get_at(index)
    }

    fn out_of_bounds(&self, index: usize) -> ChangeError {
        ChangeError::IndexOutOfBounds {
            path: self.path.clone(),
            index,
            len: self.arr.len(),
        }
    }

    // ── Primitive mutations ───────────────────────────────────────────────

    /// Replaces the value at `index` (or appends at `len()`), returning the
    /// replaced value.
    pub fn set_value(&mut self, index: usize, value: Value) -> Result<Option<Value>, ChangeError> {
        let len = self.arr.len();
        if index > len {
            return Err(self.out_of_bounds(index));
        }
        let old = self.arr.set(index, value);
        emit(&mut self.sink, || {
            let new = self.arr.get_at(index).cloned().unwrap_or_default();
            match &old {
                Some(old) => ChangeOperation::SetValue {
                    path: self.path.clone(),
                    index,
                    old: old.clone(),
                    new,
                },
                None => ChangeOperation::AddValue {
                    path: self.path.clone(),
                    index: None,
                    value: new,
                },
            }
        });
        Ok(old)
    }

    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<&mut Self, ChangeError> {
        self.set_value(index, value.into())?;
        Ok(self)
    }

    /// Appends a value.
    pub fn add(&mut self, value: impl Into<Value>) -> &mut Self {
        self.arr.push(value.into());
        let index = self.arr.len() - 1;
        emit(&mut self.sink, || ChangeOperation::AddValue {
            path: self.path.clone(),
            index: None,
            value: self.arr.get_at(index).cloned().unwrap_or_default(),
        });
        self
    }

    /// Inserts a value at `index`, shifting later values up.
    pub fn add_at(&mut self, index: usize, value: impl Into<Value>) -> Result<&mut Self, ChangeError> {
        if index > self.arr.len() {
            return Err(self.out_of_bounds(index));
        }
        self.arr.insert(index, value.into());
        emit(&mut self.sink, || ChangeOperation::AddValue {
            path: self.path.clone(),
            index: Some(index),
            value: self.arr.get_at(index).cloned().unwrap_or_default(),
        });
        Ok(self)
    }

    /// Appends `value` unless an equal value is present. Returns whether it
    /// was added.
    pub fn add_value_if_absent(&mut self, value: impl Into<Value>) -> bool {
        let value = value.into();
        if self.arr.contains_value(&value) {
            return false;
        }
        emit(&mut self.sink, || ChangeOperation::AddValueIfAbsent {
            path: self.path.clone(),
            value: value.clone(),
        });
        self.arr.push(value);
        true
    }

    /// Removes the first value equal to `value`.
    pub fn remove_value(&mut self, value: &Value) -> bool {
        match self.arr.index_of(value) {
            Some(index) => {
                self.remove_at_index(index);
                true
            }
            None => false,
        }
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Value, ChangeError> {
        if index >= self.arr.len() {
            return Err(self.out_of_bounds(index));
        }
        Ok(self.remove_at_index(index))
    }

    fn remove_at_index(&mut self, index: usize) -> Value {
        let removed = self.arr.remove_at(index);
        emit(&mut self.sink, || ChangeOperation::RemoveValue {
            path: self.path.clone(),
            index,
            value: removed.clone(),
        });
        removed
    }

    pub fn add_all<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Array = values.into_iter().collect();
        for value in &values {
            self.arr.push(value.clone());
        }
        emit(&mut self.sink, || ChangeOperation::AddAllValues {
            path: self.path.clone(),
            index: None,
            values,
        });
        self
    }

    pub fn add_all_at<I, V>(&mut self, index: usize, values: I) -> Result<&mut Self, ChangeError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if index > self.arr.len() {
            return Err(self.out_of_bounds(index));
        }
        let values: Array = values.into_iter().collect();
        for (offset, value) in values.iter().enumerate() {
            self.arr.insert(index + offset, value.clone());
        }
        emit(&mut self.sink, || ChangeOperation::AddAllValues {
            path: self.path.clone(),
            index: Some(index),
            values,
        });
        Ok(self)
    }

    /// Removes every value equal to one of `values`. Returns whether anything
    /// was removed.
    pub fn remove_all_values(&mut self, values: &[Value]) -> bool {
        let before = self.arr.len();
        self.arr.retain(|v| !values.contains(v));
        let changed = self.arr.len() != before;
        if changed {
            emit(&mut self.sink, || ChangeOperation::RemoveAllValues {
                path: self.path.clone(),
                values: values.to_vec().into(),
            });
        }
        changed
    }

    /// Removes every value not equal to one of `values`. Returns whether
    /// anything was removed.
    pub fn retain_all_values(&mut self, values: &[Value]) -> bool {
        let before = self.arr.len();
        self.arr.retain(|v| values.contains(v));
        let changed = self.arr.len() != before;
        if changed {
            emit(&mut self.sink, || ChangeOperation::RetainAllValues {
                path: self.path.clone(),
                values: values.to_vec().into(),
            });
        }
        changed
    }

    pub fn clear(&mut self) {
        self.arr.clear();
        emit(&mut self.sink, || ChangeOperation::Clear {
            path: self.path.clone(),
        });
    }

    // ── Typed values ──────────────────────────────────────────────────────

    typed_values! {
        set_boolean / add_boolean (value: bool) => create_boolean;
        set_string / add_string (value: &str) => create_string;
        set_symbol / add_symbol (value: &str) => create_symbol;
        set_null / add_null () => create_null;
        /// Epoch milliseconds.
        set_date / add_date (millis: i64) => create_date;
        set_timestamp / add_timestamp (time: i32, inc: i32) => create_timestamp;
        set_object_id / add_object_id (time: i32, machine: i32, process: i32, inc: i32) => create_object_id;
        set_object_id_bytes / add_object_id_bytes (bytes: [u8; 12]) => create_object_id_from_bytes;
        /// `flags` is a flag string such as `"im"`.
        set_regex / add_regex (pattern: &str, flags: &str) => create_regex;
        set_regex_flags / add_regex_flags (pattern: &str, flags: RegexFlags) => create_regex_with_flags;
        set_binary / add_binary (subtype: u8, bytes: &[u8]) => create_binary;
        set_uuid / add_uuid (id: Uuid) => create_uuid;
        set_code / add_code (source: &str) => create_code;
    }

    pub fn set_number<N: Number>(&mut self, index: usize, value: N) -> Result<&mut Self, ChangeError> {
        let value = value.create(self.factory);
        self.set(index, value)
    }

    pub fn add_number<N: Number>(&mut self, value: N) -> &mut Self {
        let value = value.create(self.factory);
        self.add(value)
    }

    /// Appends a date parsed from ISO-8601 text.
    pub fn add_date_iso(&mut self, iso: &str) -> Result<&mut Self, ValueError> {
        let value = self.factory.parse_date(iso)?;
        Ok(self.add(value))
    }

    pub fn add_object_id_hex(&mut self, hex: &str) -> Result<&mut Self, ValueError> {
        let value = self.factory.parse_object_id(hex)?;
        Ok(self.add(value))
    }

    // ── Nested containers ─────────────────────────────────────────────────

    fn child_path(&self, index: usize) -> Path {
        self.path.with(index.to_string())
    }

    /// Appends an empty document and edits it.
    pub fn add_document(&mut self) -> DocumentEditor<'_> {
        self.add(Document::new());
        let index = self.arr.len() - 1;
        let path = self.child_path(index);
        let nested = document_in(self.arr.get_at_mut(index));
        DocumentEditor::child(nested, path, self.factory, reborrow(&mut self.sink))
    }

    pub fn add_array(&mut self) -> ArrayEditor<'_> {
        self.add(Array::new());
        let index = self.arr.len() - 1;
        let path = self.child_path(index);
        let nested = array_in(self.arr.get_at_mut(index));
        ArrayEditor::child(nested, path, self.factory, reborrow(&mut self.sink))
    }

    /// Stores an empty document at `index` and edits it.
    pub fn set_document(&mut self, index: usize) -> Result<DocumentEditor<'_>, ChangeError> {
        self.set_value(index, Value::Document(Document::new()))?;
        let path = self.child_path(index);
        let nested = document_in(self.arr.get_at_mut(index));
        Ok(DocumentEditor::child(nested, path, self.factory, reborrow(&mut self.sink)))
    }

    pub fn set_array(&mut self, index: usize) -> Result<ArrayEditor<'_>, ChangeError> {
        self.set_value(index, Value::Array(Array::new()))?;
        let path = self.child_path(index);
        let nested = array_in(self.arr.get_at_mut(index));
        Ok(ArrayEditor::child(nested, path, self.factory, reborrow(&mut self.sink)))
    }

    pub fn get_document(&mut self, index: usize) -> Option<DocumentEditor<'_>> {
        let path = self.child_path(index);
        match self.arr.get_at_mut(index) {
            Some(Value::Document(nested)) => Some(DocumentEditor::child(
                nested,
                path,
                self.factory,
                reborrow(&mut self.sink),
            )),
            _ => None,
        }
    }

    pub fn get_array(&mut self, index: usize) -> Option<ArrayEditor<'_>> {
        let path = self.child_path(index);
        match self.arr.get_at_mut(index) {
            Some(Value::Array(nested)) => Some(ArrayEditor::child(
                nested,
                path,
                self.factory,
                reborrow(&mut self.sink),
            )),
            _ => None,
        }
    }
}

impl DocumentView for ArrayEditor<'_> {
    fn get(&self, name: &str) -> Option<&Value> {
        self.arr.get(name)
    }

    fn len(&self) -> usize {
        self.arr.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i32]) -> Array {
        values.iter().copied().collect()
    }

    #[test]
    fn indexed_writes_check_bounds() {
        let mut arr = ints(&[1, 2]);
        let mut editor = ArrayEditor::new(&mut arr);
        editor.set_number(0, 10).unwrap();
        editor.set_number(2, 30).unwrap();
        let err = editor.set_number(5, 0).err().unwrap();
        assert_eq!(
            err,
            ChangeError::IndexOutOfBounds {
                path: Path::root(),
                index: 5,
                len: 3
            }
        );
        assert!(editor.remove_at(3).is_err());
        assert_eq!(arr, ints(&[10, 2, 30]));
    }

    #[test]
    fn value_based_operations() {
        let mut arr = ints(&[1, 2, 3, 2]);
        let mut editor = ArrayEditor::new(&mut arr);
        assert!(!editor.add_value_if_absent(3));
        assert!(editor.add_value_if_absent(4));
        assert!(editor.remove_value(&Value::Int32(2)));
        assert!(editor.remove_all_values(&[Value::Int32(2)]));
        assert!(!editor.remove_all_values(&[Value::Int32(9)]));
        assert!(editor.retain_all_values(&[Value::Int32(3), Value::Int32(4)]));
        assert_eq!(arr, ints(&[3, 4]));
    }

    #[test]
    fn bulk_inserts() {
        let mut arr = ints(&[1, 4]);
        let mut editor = ArrayEditor::new(&mut arr);
        editor.add_all_at(1, [2, 3]).unwrap();
        editor.add_all([5]);
        assert!(editor.add_all_at(9, [0]).is_err());
        assert_eq!(arr, ints(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn nested_editors_use_index_paths() {
        let mut doc = Document::new();
        let mut root = DocumentEditor::new(&mut doc);
        let mut list = root.set_array("list");
        list.add_number(1);
        let mut child = list.add_document();
        assert_eq!(child.path().to_string(), "/list/1");
        child.set_string("name", "x");
        assert!(ArrayEditor::get_document(&mut list, 0).is_none());
        assert!(ArrayEditor::get_document(&mut list, 1).is_some());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn observed_array_records_appends_and_replacements() {
        let mut arr = ints(&[1]);
        let mut log: Vec<ChangeOperation> = Vec::new();
        let mut editor = ArrayEditor::observed(&mut arr, &mut log);
        editor.set_number(0, 5).unwrap();
        editor.set_number(1, 6).unwrap();
        editor.add_string("s");
        editor.remove_at(0).unwrap();
        let names: Vec<_> = log.iter().map(ChangeOperation::name).collect();
        assert_eq!(names, ["set_value", "add_value", "add_value", "remove_value"]);
        assert_eq!(
            log[3],
            ChangeOperation::RemoveValue {
                path: Path::root(),
                index: 0,
                value: Value::Int32(5)
            }
        );
    }
}
