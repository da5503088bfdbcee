use uuid::Uuid;

use super::factory::{DefaultValueFactory, Number, ValueFactory};
use super::{array_in, document_in, emit, reborrow, scope_in, ArrayEditor, Sink};
use crate::changes::{ChangeOperation, ChangeSink};
use crate::document::{Array, Document, DocumentView};
use crate::path::Path;
use crate::value::{RegexFlags, Value, ValueError};

/// Edits one document in place.
pub struct DocumentEditor<'a> {
    doc: &'a mut Document,
    path: Path,
    factory: &'a dyn ValueFactory,
    sink: Sink<'a>,
}

impl<'a> DocumentEditor<'a> {
    pub fn new(doc: &'a mut Document) -> Self {
        Self::with_factory(doc, &DefaultValueFactory)
    }

    pub fn with_factory(doc: &'a mut Document, factory: &'a dyn ValueFactory) -> Self {
        Self {
            doc,
            path: Path::root(),
            factory,
            sink: None,
        }
    }

    /// Editor that records every mutation into `sink`.
    pub fn observed(doc: &'a mut Document, sink: &'a mut dyn ChangeSink) -> Self {
        Self::observed_with_factory(doc, &DefaultValueFactory, sink)
    }

    pub fn observed_with_factory(
        doc: &'a mut Document,
        factory: &'a dyn ValueFactory,
        sink: &'a mut dyn ChangeSink,
    ) -> Self {
        Self {
            doc,
            path: Path::root(),
            factory,
            sink: Some(sink),
        }
    }

    pub(super) fn child(
        doc: &'a mut Document,
        path: Path,
        factory: &'a dyn ValueFactory,
        sink: Sink<'a>,
    ) -> Self {
        Self {
            doc,
            path,
            factory,
            sink,
        }
    }

    /// Location of the edited document relative to the root.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_observed(&self) -> bool {
        self.sink.is_some()
    }

    pub fn as_document(&self) -> &Document {
        self.doc
    }

    // ── Primitive mutations ───────────────────────────────────────────────

    fn put_value(&mut self, name: &str, value: Value) -> Option<Value> {
        let (old, slot) = self.doc.put_slot(name.to_string(), value);
        emit(&mut self.sink, || ChangeOperation::Put {
            parent: self.path.clone(),
            field: name.to_string(),
            old: old.clone(),
            new: slot.clone(),
        });
        old
    }

    /// Sets a field, returning the value it replaced.
    pub fn put(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.put_value(name, value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let old = self.doc.remove(name)?;
        emit(&mut self.sink, || ChangeOperation::Remove {
            parent: self.path.clone(),
            field: name.to_string(),
            old: old.clone(),
        });
        Some(old)
    }

    /// Removes every field.
    pub fn remove_all(&mut self) {
        self.doc.clear();
        emit(&mut self.sink, || ChangeOperation::Clear {
            path: self.path.clone(),
        });
    }

    /// Sets every field of `fields`, in order.
    pub fn put_all(&mut self, fields: Document) {
        for (name, value) in &fields {
            self.doc.put(name.clone(), value.clone());
        }
        emit(&mut self.sink, || ChangeOperation::PutAll {
            parent: self.path.clone(),
            fields,
        });
    }

    // ── Typed setters ─────────────────────────────────────────────────────

    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.put_value(name, value.into());
        self
    }

    pub fn set_boolean(&mut self, name: &str, value: bool) -> &mut Self {
        let value = self.factory.create_boolean(value);
        self.set(name, value)
    }

    /// Stores an `i32`, `i64` or `f64` without changing its width.
    pub fn set_number<N: Number>(&mut self, name: &str, value: N) -> &mut Self {
        let value = value.create(self.factory);
        self.set(name, value)
    }

    pub fn set_string(&mut self, name: &str, value: &str) -> &mut Self {
        let value = self.factory.create_string(value);
        self.set(name, value)
    }

    pub fn set_symbol(&mut self, name: &str, value: &str) -> &mut Self {
        let value = self.factory.create_symbol(value);
        self.set(name, value)
    }

    pub fn set_null(&mut self, name: &str) -> &mut Self {
        let value = self.factory.create_null();
        self.set(name, value)
    }

    pub fn set_date(&mut self, name: &str, millis: i64) -> &mut Self {
        let value = self.factory.create_date(millis);
        self.set(name, value)
    }

    pub fn set_date_iso(&mut self, name: &str, iso: &str) -> Result<&mut Self, ValueError> {
        let value = self.factory.parse_date(iso)?;
        Ok(self.set(name, value))
    }

    pub fn set_timestamp(&mut self, name: &str, time: i32, inc: i32) -> &mut Self {
        let value = self.factory.create_timestamp(time, inc);
        self.set(name, value)
    }

    pub fn set_object_id(
        &mut self,
        name: &str,
        time: i32,
        machine: i32,
        process: i32,
        inc: i32,
    ) -> &mut Self {
        let value = self.factory.create_object_id(time, machine, process, inc);
        self.set(name, value)
    }

    pub fn set_object_id_bytes(&mut self, name: &str, bytes: [u8; 12]) -> &mut Self {
        let value = self.factory.create_object_id_from_bytes(bytes);
        self.set(name, value)
    }

    pub fn set_object_id_hex(&mut self, name: &str, hex: &str) -> Result<&mut Self, ValueError> {
        let value = self.factory.parse_object_id(hex)?;
        Ok(self.set(name, value))
    }

    pub fn set_regex(&mut self, name: &str, pattern: &str, flags: &str) -> &mut Self {
        let value = self.factory.create_regex(pattern, flags);
        self.set(name, value)
    }

    pub fn set_regex_flags(&mut self, name: &str, pattern: &str, flags: RegexFlags) -> &mut Self {
        let value = self.factory.create_regex_with_flags(pattern, flags);
        self.set(name, value)
    }

    pub fn set_binary(&mut self, name: &str, subtype: u8, bytes: &[u8]) -> &mut Self {
        let value = self.factory.create_binary(subtype, bytes);
        self.set(name, value)
    }

    pub fn set_uuid(&mut self, name: &str, id: Uuid) -> &mut Self {
        let value = self.factory.create_uuid(id);
        self.set(name, value)
    }

    // ── Nested containers ─────────────────────────────────────────────────

    /// Stores code. With `include_scope`, the code gets an empty scope and an
    /// editor over that scope is returned.
    pub fn set_code(&mut self, name: &str, source: &str, include_scope: bool) -> Option<DocumentEditor<'_>> {
        if include_scope {
            return Some(self.set_code_with_scope(name, source, Document::new()));
        }
        let value = self.factory.create_code(source);
        self.put_value(name, value);
        None
    }

    pub fn set_code_with_scope(&mut self, name: &str, source: &str, scope: Document) -> DocumentEditor<'_> {
        let code = self.factory.create_code_with_scope(source, scope);
        self.put_value(name, Value::CodeWithScope(code));
        let scope = scope_in(self.doc.get_mut(name));
        DocumentEditor::child(scope, self.path.with(name), self.factory, reborrow(&mut self.sink))
    }

    /// Replaces the field with a new empty document and edits it.
    pub fn set_document(&mut self, name: &str) -> DocumentEditor<'_> {
        self.set_document_from(name, Document::new())
    }

    pub fn set_document_from(&mut self, name: &str, doc: Document) -> DocumentEditor<'_> {
        self.put_value(name, Value::Document(doc));
        let nested = document_in(self.doc.get_mut(name));
        DocumentEditor::child(nested, self.path.with(name), self.factory, reborrow(&mut self.sink))
    }

    pub fn set_array(&mut self, name: &str) -> ArrayEditor<'_> {
        self.set_array_from(name, Array::new())
    }

    pub fn set_array_from(&mut self, name: &str, arr: Array) -> ArrayEditor<'_> {
        self.put_value(name, Value::Array(arr));
        let nested = array_in(self.doc.get_mut(name));
        ArrayEditor::child(nested, self.path.with(name), self.factory, reborrow(&mut self.sink))
    }

    /// Editor over an existing nested document; `None` if the field is absent
    /// or holds something else.
    pub fn get_document(&mut self, name: &str) -> Option<DocumentEditor<'_>> {
        let path = self.path.with(name);
        match self.doc.get_mut(name) {
            Some(Value::Document(nested)) => Some(DocumentEditor::child(
                nested,
                path,
                self.factory,
                reborrow(&mut self.sink),
            )),
            _ => None,
        }
    }

    pub fn get_array(&mut self, name: &str) -> Option<ArrayEditor<'_>> {
        let path = self.path.with(name);
        match self.doc.get_mut(name) {
            Some(Value::Array(nested)) => Some(ArrayEditor::child(
                nested,
                path,
                self.factory,
                reborrow(&mut self.sink),
            )),
            _ => None,
        }
    }

    /// Editor over the nested document, first storing an empty one when the
    /// field is absent or holds something else.
    pub fn get_or_create_document(&mut self, name: &str) -> DocumentEditor<'_> {
        if !matches!(self.doc.get(name), Some(Value::Document(_))) {
            return self.set_document(name);
        }
        let nested = document_in(self.doc.get_mut(name));
        DocumentEditor::child(nested, self.path.with(name), self.factory, reborrow(&mut self.sink))
    }

    pub fn get_or_create_array(&mut self, name: &str) -> ArrayEditor<'_> {
        if !matches!(self.doc.get(name), Some(Value::Array(_))) {
            return self.set_array(name);
        }
        let nested = array_in(self.doc.get_mut(name));
        ArrayEditor::child(nested, self.path.with(name), self.factory, reborrow(&mut self.sink))
    }
}

impl DocumentView for DocumentEditor<'_> {
    fn get(&self, name: &str) -> Option<&Value> {
        self.doc.get(name)
    }

    fn len(&self) -> usize {
        self.doc.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{CodeWithScope, ObjectId, Regex};

    #[test]
    fn typed_setters_store_expected_kinds() {
        let mut doc = Document::new();
        let mut editor = DocumentEditor::new(&mut doc);
        editor
            .set_boolean("b", true)
            .set_number("i", 7)
            .set_number("l", 7i64)
            .set_number("d", 7.5)
            .set_string("s", "text")
            .set_symbol("sym", "text")
            .set_null("n")
            .set_date("at", 1000)
            .set_timestamp("ts", 100, 1)
            .set_object_id("id", 1310745823, 1, 2, 3)
            .set_regex("re", "a+", "mi")
            .set_binary("bin", 0, &[1, 2, 3]);
        editor.set_date_iso("iso", "1970-01-01T00:00:02Z").unwrap();
        assert!(editor.set_object_id_hex("bad", "xyz").is_err());

        assert_eq!(doc.get("i"), Some(&Value::Int32(7)));
        assert!(matches!(doc.get("l"), Some(Value::Int64(7))));
        assert_eq!(doc.get_double("d"), Some(7.5));
        assert_eq!(doc.get_symbol("sym"), Some("text"));
        assert!(doc.is_null("n"));
        assert_eq!(doc.get_date("iso").map(|d| d.millis()), Some(2000));
        assert_eq!(
            doc.get_object_id("id"),
            Some(ObjectId::from_hex("4e2064df0000010002000003").unwrap())
        );
        assert_eq!(doc.get_regex("re"), Some(&Regex::with_flag_str("a+", "im")));
        assert!(!doc.contains_field("bad"));
    }

    #[test]
    fn child_editors_carry_paths() {
        let mut doc = Document::new();
        let mut editor = DocumentEditor::new(&mut doc);
        let mut outer = editor.set_document("outer");
        assert_eq!(outer.path(), &Path::new(["outer"]));
        let list = outer.set_array("list");
        assert_eq!(list.path().to_string(), "/outer/list");
    }

    #[test]
    fn get_or_create_replaces_scalars() {
        let mut doc: Document = [("x", 1)].into_iter().collect();
        let mut editor = DocumentEditor::new(&mut doc);
        editor.get_or_create_document("x").set_number("y", 2);
        editor.get_or_create_document("x").set_number("z", 3);
        let x = doc.get_document("x").unwrap();
        assert_eq!((x.get_integer("y"), x.get_integer("z")), (Some(2), Some(3)));
    }

    #[test]
    fn missing_children_are_none() {
        let mut doc: Document = [("x", 1)].into_iter().collect();
        let mut editor = DocumentEditor::new(&mut doc);
        assert!(editor.get_document("x").is_none());
        assert!(editor.get_array("nope").is_none());
    }

    #[test]
    fn observed_editor_records_each_mutation() {
        let mut doc: Document = [("keep", 1), ("drop", 2)].into_iter().collect();
        let mut log: Vec<ChangeOperation> = Vec::new();
        let mut editor = DocumentEditor::observed(&mut doc, &mut log);
        editor.set_number("keep", 10);
        editor.remove("drop");
        editor.remove("never-there");
        editor.set_document("nested").set_boolean("flag", true);

        let names: Vec<_> = log.iter().map(ChangeOperation::name).collect();
        assert_eq!(names, ["put", "remove", "put", "put"]);
        assert_eq!(
            log[0],
            ChangeOperation::Put {
                parent: Path::root(),
                field: "keep".into(),
                old: Some(Value::Int32(1)),
                new: Value::Int32(10),
            }
        );
        assert_eq!(log[3].target(), &Path::new(["nested"]));
    }

    #[test]
    fn recorded_containers_are_snapshots() {
        let mut doc = Document::new();
        let mut log: Vec<ChangeOperation> = Vec::new();
        let mut editor = DocumentEditor::observed(&mut doc, &mut log);
        editor.set_document("nested").set_number("later", 1);
        match &log[0] {
            ChangeOperation::Put { new: Value::Document(recorded), .. } => assert!(recorded.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn code_scope_is_editable() {
        let mut doc = Document::new();
        let mut editor = DocumentEditor::new(&mut doc);
        assert!(editor.set_code("plain", "f()", false).is_none());
        if let Some(mut scope) = editor.set_code("scoped", "g(x)", true) {
            scope.set_number("x", 1);
        }
        assert_eq!(doc.get_code("plain").map(|c| c.source()), Some("f()"));
        let scoped = doc.get_code_with_scope("scoped").unwrap();
        assert_eq!(scoped.scope().get_integer("x"), Some(1));
    }

    /// Stores code as text and tags every scope it builds.
    struct CustomCode;

    impl ValueFactory for CustomCode {
        fn create_code(&self, source: &str) -> Value {
            Value::string(source)
        }

        fn create_code_with_scope(&self, source: &str, mut scope: Document) -> CodeWithScope {
            scope.put("tagged", Value::Boolean(true));
            CodeWithScope::new(source.trim(), scope)
        }
    }

    #[test]
    fn custom_factory_code_keeps_a_scope_editor() {
        let mut doc = Document::new();
        let mut log: Vec<ChangeOperation> = Vec::new();
        let mut editor = DocumentEditor::observed_with_factory(&mut doc, &CustomCode, &mut log);
        assert!(editor.set_code("plain", "f()", false).is_none());
        let mut scope = editor.set_code("scoped", " g(x) ", true).unwrap();
        scope.set_number("x", 1);
        assert_eq!(scope.path().to_string(), "/scoped");

        assert_eq!(doc.get("plain"), Some(&Value::string("f()")));
        let scoped = doc.get_code_with_scope("scoped").unwrap();
        assert_eq!(scoped.source(), "g(x)");
        assert_eq!(scoped.scope().get_boolean("tagged"), Some(true));
        assert_eq!(scoped.scope().get_integer("x"), Some(1));

        let mut replica = Document::new();
        crate::changes::apply_changes(&mut replica, &log).unwrap();
        assert_eq!(replica, doc);
    }
}
