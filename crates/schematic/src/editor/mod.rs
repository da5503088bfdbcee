//! Path-tracking editors over documents and arrays.
//!
//! An editor borrows the container it edits and knows the [`Path`] from the
//! root document down to it. Descending (`get_document`, `set_array`, ...)
//! hands out a child editor that borrows the nested container and carries the
//! extended path.
//!
//! When a [`ChangeSink`] is attached, every primitive mutation also records
//! one [`ChangeOperation`](crate::changes::ChangeOperation). Child editors
//! share the parent's sink, so one log covers edits at any depth:
//!
//! ```
//! use schematic::{apply_changes, ChangeOperation, Document, DocumentEditor, DocumentView};
//!
//! let mut original = Document::new();
//! let mut replica = original.clone();
//!
//! let mut log: Vec<ChangeOperation> = Vec::new();
//! let mut editor = DocumentEditor::observed(&mut original, &mut log);
//! editor.set_string("name", "widget");
//! editor.set_document("dims").set_number("w", 3).set_number("h", 4.5);
//!
//! apply_changes(&mut replica, &log).unwrap();
//! assert_eq!(replica, original);
//! assert_eq!(replica.get_document("dims").unwrap().get_integer("w"), Some(3));
//! ```
//!
//! [`Path`]: crate::path::Path

mod array_editor;
mod document_editor;
mod factory;

pub use array_editor::ArrayEditor;
pub use document_editor::DocumentEditor;
pub use factory::{DefaultValueFactory, Number, ValueFactory};

use crate::changes::{ChangeOperation, ChangeSink};
use crate::document::{Array, Document};
use crate::value::Value;

type Sink<'a> = Option<&'a mut dyn ChangeSink>;

/// Records the operation built by `operation` when a sink is attached.
fn emit(sink: &mut Sink<'_>, operation: impl FnOnce() -> ChangeOperation) {
    if let Some(sink) = sink.as_deref_mut() {
        sink.record(operation());
    }
}

/// Shares a parent's sink with a child editor.
fn reborrow<'b>(sink: &'b mut Sink<'_>) -> Sink<'b> {
    match sink {
        Some(sink) => Some(&mut **sink),
        None => None,
    }
}

fn document_in(slot: Option<&mut Value>) -> &mut Document {
    match slot {
        Some(Value::Document(doc)) => doc,
        _ => unreachable!("slot holds a document"),
    }
}

fn array_in(slot: Option<&mut Value>) -> &mut Array {
    match slot {
        Some(Value::Array(arr)) => arr,
        _ => unreachable!("slot holds an array"),
    }
}

fn scope_in(slot: Option<&mut Value>) -> &mut Document {
    match slot {
        Some(Value::CodeWithScope(code)) => code.scope_mut(),
        _ => unreachable!("slot holds code with a scope"),
    }
}
