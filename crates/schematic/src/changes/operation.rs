use std::fmt;

use crate::document::{Array, Document};
use crate::path::Path;
use crate::value::Value;

/// One structural edit.
///
/// `parent` / `path` always address a container (document or array) from the
/// root of the edited document. Values held here are owned copies taken at
/// the time of the edit, so later changes to the live document do not leak
/// into the record.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOperation {
    /// A document field was set. `old` is `None` when the field was new.
    Put {
        parent: Path,
        field: String,
        old: Option<Value>,
        new: Value,
    },
    Remove {
        parent: Path,
        field: String,
        old: Value,
    },
    /// An existing array slot was overwritten.
    SetValue {
        path: Path,
        index: usize,
        old: Value,
        new: Value,
    },
    /// A value was inserted at `index`, or appended when `index` is `None`.
    AddValue {
        path: Path,
        index: Option<usize>,
        value: Value,
    },
    AddValueIfAbsent { path: Path, value: Value },
    /// The value at `index` was removed.
    RemoveValue {
        path: Path,
        index: usize,
        value: Value,
    },
    /// Every field or element of the container was removed.
    Clear { path: Path },
    PutAll { parent: Path, fields: Document },
    AddAllValues {
        path: Path,
        index: Option<usize>,
        values: Array,
    },
    /// Every element equal to one of `values` was removed.
    RemoveAllValues { path: Path, values: Array },
    /// Every element not equal to one of `values` was removed.
    RetainAllValues { path: Path, values: Array },
}

impl ChangeOperation {
    /// Path of the container the operation edits.
    pub fn target(&self) -> &Path {
        match self {
            ChangeOperation::Put { parent, .. }
            | ChangeOperation::Remove { parent, .. }
            | ChangeOperation::PutAll { parent, .. } => parent,
            ChangeOperation::SetValue { path, .. }
            | ChangeOperation::AddValue { path, .. }
            | ChangeOperation::AddValueIfAbsent { path, .. }
            | ChangeOperation::RemoveValue { path, .. }
            | ChangeOperation::Clear { path }
            | ChangeOperation::AddAllValues { path, .. }
            | ChangeOperation::RemoveAllValues { path, .. }
            | ChangeOperation::RetainAllValues { path, .. } => path,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChangeOperation::Put { .. } => "put",
            ChangeOperation::Remove { .. } => "remove",
            ChangeOperation::SetValue { .. } => "set_value",
            ChangeOperation::AddValue { .. } => "add_value",
            ChangeOperation::AddValueIfAbsent { .. } => "add_value_if_absent",
            ChangeOperation::RemoveValue { .. } => "remove_value",
            ChangeOperation::Clear { .. } => "clear",
            ChangeOperation::PutAll { .. } => "put_all",
            ChangeOperation::AddAllValues { .. } => "add_all_values",
            ChangeOperation::RemoveAllValues { .. } => "remove_all_values",
            ChangeOperation::RetainAllValues { .. } => "retain_all_values",
        }
    }
}

impl fmt::Display for ChangeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeOperation::Put { parent, field, new, .. } => {
                write!(f, "put {} = {new}", parent.with(field.as_str()))
            }
            ChangeOperation::Remove { parent, field, .. } => {
                write!(f, "remove {}", parent.with(field.as_str()))
            }
            ChangeOperation::SetValue { path, index, new, .. } => {
                write!(f, "set {} = {new}", path.with(index.to_string()))
            }
            ChangeOperation::AddValue { path, index: Some(i), value } => {
                write!(f, "add {value} at {path}[{i}]")
            }
            ChangeOperation::AddValue { path, index: None, value } => {
                write!(f, "add {value} to {path}")
            }
            ChangeOperation::AddValueIfAbsent { path, value } => {
                write!(f, "add {value} to {path} if absent")
            }
            ChangeOperation::RemoveValue { path, index, .. } => {
                write!(f, "remove {path}[{index}]")
            }
            ChangeOperation::Clear { path } => write!(f, "clear {path}"),
            ChangeOperation::PutAll { parent, fields } => write!(f, "put all {fields} into {parent}"),
            ChangeOperation::AddAllValues { path, values, .. } => write!(f, "add all {values} to {path}"),
            ChangeOperation::RemoveAllValues { path, values } => {
                write!(f, "remove all {values} from {path}")
            }
            ChangeOperation::RetainAllValues { path, values } => {
                write!(f, "retain only {values} in {path}")
            }
        }
    }
}
