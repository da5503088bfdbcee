mod common;

use common::documents::{doc, document, field_name, leaf, value};
use proptest::prelude::*;
use schematic::{
    apply_changes, bson, ArrayEditor, ChangeError, ChangeOperation, Document, DocumentEditor,
    Path, Value,
};

#[derive(Debug, Clone)]
enum Edit {
    Put(String, Value),
    Remove(String),
    NestedPut(String, Value),
    NestedClear,
    ListAdd(Value),
    ListAddAt(usize, Value),
    ListAddIfAbsent(Value),
    ListRemoveAt(usize),
    ListRemoveValue(Value),
    ListRetain(Vec<Value>),
    ListSet(usize, Value),
    ScopeSet(String, Value),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (field_name(), value()).prop_map(|(n, v)| Edit::Put(n, v)),
        field_name().prop_map(Edit::Remove),
        (field_name(), leaf()).prop_map(|(n, v)| Edit::NestedPut(n, v)),
        Just(Edit::NestedClear),
        leaf().prop_map(Edit::ListAdd),
        (0usize..6, leaf()).prop_map(|(i, v)| Edit::ListAddAt(i, v)),
        leaf().prop_map(Edit::ListAddIfAbsent),
        (0usize..6).prop_map(Edit::ListRemoveAt),
        leaf().prop_map(Edit::ListRemoveValue),
        proptest::collection::vec(leaf(), 0..3).prop_map(Edit::ListRetain),
        (0usize..6, leaf()).prop_map(|(i, v)| Edit::ListSet(i, v)),
        (field_name(), leaf()).prop_map(|(n, v)| Edit::ScopeSet(n, v)),
    ]
}

/// Runs `edits` through an observed editor. Out-of-range indexes are
/// rejected by the editor and leave nothing in the log.
fn perform(target: &mut Document, edits: &[Edit]) -> Vec<ChangeOperation> {
    let mut log: Vec<ChangeOperation> = Vec::new();
    let mut editor = DocumentEditor::observed(target, &mut log);
    for edit in edits {
        match edit {
            Edit::Put(name, value) => {
                editor.put(name, value.clone());
            }
            Edit::Remove(name) => {
                editor.remove(name);
            }
            Edit::NestedPut(name, value) => {
                editor.get_or_create_document("nested").set(name, value.clone());
            }
            Edit::NestedClear => editor.get_or_create_document("nested").remove_all(),
            Edit::ListAdd(value) => {
                editor.get_or_create_array("list").add(value.clone());
            }
            Edit::ListAddAt(index, value) => {
                let _ = editor.get_or_create_array("list").add_at(*index, value.clone());
            }
            Edit::ListAddIfAbsent(value) => {
                editor.get_or_create_array("list").add_value_if_absent(value.clone());
            }
            Edit::ListRemoveAt(index) => {
                let _ = editor.get_or_create_array("list").remove_at(*index);
            }
            Edit::ListRemoveValue(value) => {
                editor.get_or_create_array("list").remove_value(value);
            }
            Edit::ListRetain(values) => {
                editor.get_or_create_array("list").retain_all_values(values);
            }
            Edit::ListSet(index, value) => {
                let _ = editor.get_or_create_array("list").set_value(*index, value.clone());
            }
            Edit::ScopeSet(name, value) => {
                if let Some(mut scope) = editor.set_code("fn", "return x;", true) {
                    scope.set(name, value.clone());
                }
            }
        }
    }
    log
}

fn shipped(log: &[ChangeOperation]) -> Vec<ChangeOperation> {
    log.iter()
        .map(|op| {
            let bytes = bson::encode_document(&op.to_document()).unwrap();
            let decoded = bson::decode_document(&bytes).unwrap();
            ChangeOperation::from_document(&decoded).unwrap()
        })
        .collect()
}

#[test]
fn nested_edits_replay_matrix() {
    let mut original = doc("{ keep: 1, drop: 2, items: [1, 2, 3], n: { a: { b: 1 } } }");
    let mut replica = original.clone();

    let mut log: Vec<ChangeOperation> = Vec::new();
    {
        let mut editor = DocumentEditor::observed(&mut original, &mut log);
        editor.remove("drop");
        editor
            .get_document("n")
            .unwrap()
            .get_document("a")
            .unwrap()
            .set_string("c", "deep");
        let mut items = editor.get_array("items").unwrap();
        items.remove_at(0).unwrap();
        items.add_document().set_boolean("flag", true);
        items.add_all([Value::Int32(7), Value::Int32(8)]);
        items.remove_all_values(&[Value::Int32(7)]);
    }

    let names: Vec<_> = log.iter().map(ChangeOperation::name).collect();
    assert_eq!(
        names,
        ["remove", "put", "remove_value", "add_value", "put", "add_all_values", "remove_all_values"]
    );
    assert_eq!(log[1].target(), &Path::new(["n", "a"]));

    apply_changes(&mut replica, &log).unwrap();
    assert_eq!(replica, original);
    assert_eq!(
        original,
        doc("{ keep: 1, items: [2, 3, { flag: true }, 8], n: { a: { b: 1, c: 'deep' } } }")
    );
}

#[test]
fn unobserved_editor_records_nothing() {
    let mut target = doc("{ a: 1 }");
    let mut editor = DocumentEditor::new(&mut target);
    assert!(!editor.is_observed());
    editor.set_number("b", 2i64).set_null("c");
    assert_eq!(target, doc("{ a: 1, b: 2, c: null }"));
}

#[test]
fn array_editor_alone_replays_from_root() {
    let mut root = doc("{ }");
    let mut list = schematic::Array::new();
    let mut log: Vec<ChangeOperation> = Vec::new();
    {
        let mut editor = ArrayEditor::observed(&mut list, &mut log);
        editor.add_string("x").add_boolean(false);
        editor.set_string(0, "y").unwrap();
    }
    assert_eq!(log.len(), 3);
    assert!(log.iter().all(|op| op.target().is_root()));
    // Root-level array edits do not resolve inside a document.
    assert!(matches!(
        apply_changes(&mut root, &log),
        Err(ChangeError::NotAContainer(_))
    ));
}

fn error_kind(err: &ChangeError) -> &'static str {
    match err {
        ChangeError::PathNotFound(_) => "path_not_found",
        ChangeError::NotAContainer(_) => "not_a_container",
        ChangeError::IndexOutOfBounds { .. } => "index_out_of_bounds",
        ChangeError::MissingField { .. } => "missing_field",
        ChangeError::Malformed(_) => "malformed",
    }
}

#[test]
fn replay_failure_matrix() {
    let cases = [
        (
            ChangeOperation::Put {
                parent: Path::new(["missing"]),
                field: "x".into(),
                old: None,
                new: Value::Int32(1),
            },
            "path_not_found",
        ),
        (
            ChangeOperation::Clear {
                path: Path::new(["leaf"]),
            },
            "not_a_container",
        ),
        (
            ChangeOperation::SetValue {
                path: Path::new(["list"]),
                index: 9,
                old: Value::Null,
                new: Value::Null,
            },
            "index_out_of_bounds",
        ),
        (
            ChangeOperation::Remove {
                parent: Path::root(),
                field: "absent".into(),
                old: Value::Null,
            },
            "missing_field",
        ),
    ];
    for (op, expected) in cases {
        let mut target = doc("{ leaf: 1, list: [0] }");
        let before = target.clone();
        let err = op.apply(&mut target).err().unwrap_or_else(|| panic!("{op} applied"));
        assert_eq!(error_kind(&err), expected, "{op} failed with {err:?}");
        assert_eq!(target, before);
    }
}

proptest! {
    #[test]
    fn recorded_edits_replay_to_the_same_document(
        start in document(),
        edits in proptest::collection::vec(edit(), 0..16),
    ) {
        let mut edited = start.clone();
        let mut replica = start.clone();
        let log = perform(&mut edited, &edits);
        apply_changes(&mut replica, &log).unwrap();
        prop_assert_eq!(replica, edited);
    }

    #[test]
    fn shipped_logs_replay_to_the_same_document(
        start in document(),
        edits in proptest::collection::vec(edit(), 0..16),
    ) {
        let mut edited = start.clone();
        let mut replica = start;
        let log = perform(&mut edited, &edits);
        apply_changes(&mut replica, &shipped(&log)).unwrap();
        prop_assert_eq!(replica, edited);
    }
}
