//! Replay of recorded operations.

use tracing::debug;

use super::{ChangeError, ChangeOperation};
use crate::document::{parse_index, Array, Document};
use crate::path::Path;
use crate::value::Value;

// ── Path navigation ───────────────────────────────────────────────────────

enum Target<'a> {
    Document(&'a mut Document),
    Array(&'a mut Array),
}

/// Mutable navigation to the container at `path` (must exist). A code value
/// with a scope is addressed through its scope document.
fn resolve<'a>(root: &'a mut Document, path: &Path) -> Result<Target<'a>, ChangeError> {
    let mut current = Target::Document(root);
    for (depth, segment) in path.iter().enumerate() {
        let here = || Path::new(path.segments()[..=depth].iter().cloned());
        let child = match current {
            Target::Document(doc) => doc.get_mut(segment),
            Target::Array(arr) => parse_index(segment).and_then(|i| arr.get_at_mut(i)),
        };
        current = match child {
            Some(Value::Document(doc)) => Target::Document(doc),
            Some(Value::Array(arr)) => Target::Array(arr),
            Some(Value::CodeWithScope(code)) => Target::Document(code.scope_mut()),
            Some(_) => return Err(ChangeError::NotAContainer(here())),
            None => return Err(ChangeError::PathNotFound(here())),
        };
    }
    Ok(current)
}

fn resolve_document<'a>(root: &'a mut Document, path: &Path) -> Result<&'a mut Document, ChangeError> {
    match resolve(root, path)? {
        Target::Document(doc) => Ok(doc),
        Target::Array(_) => Err(ChangeError::NotAContainer(path.clone())),
    }
}

fn resolve_array<'a>(root: &'a mut Document, path: &Path) -> Result<&'a mut Array, ChangeError> {
    match resolve(root, path)? {
        Target::Array(arr) => Ok(arr),
        Target::Document(_) => Err(ChangeError::NotAContainer(path.clone())),
    }
}

fn check_index(path: &Path, index: usize, len: usize) -> Result<(), ChangeError> {
    if index < len {
        Ok(())
    } else {
        Err(ChangeError::IndexOutOfBounds {
            path: path.clone(),
            index,
            len,
        })
    }
}

// ── Apply ─────────────────────────────────────────────────────────────────

impl ChangeOperation {
    /// Performs this operation on `doc`. Fails without modifying anything
    /// when the addressed container or element does not exist.
    pub fn apply(&self, doc: &mut Document) -> Result<(), ChangeError> {
        debug!(op = self.name(), target = %self.target(), "apply change");
        match self {
            ChangeOperation::Put { parent, field, new, .. } => {
                resolve_document(doc, parent)?.put(field.clone(), new.clone());
            }
            ChangeOperation::Remove { parent, field, .. } => {
                if resolve_document(doc, parent)?.remove(field).is_none() {
                    return Err(ChangeError::MissingField {
                        parent: parent.clone(),
                        field: field.clone(),
                    });
                }
            }
            ChangeOperation::SetValue { path, index, new, .. } => {
                let arr = resolve_array(doc, path)?;
                check_index(path, *index, arr.len())?;
                arr.set(*index, new.clone());
            }
            ChangeOperation::AddValue { path, index, value } => {
                let arr = resolve_array(doc, path)?;
                match *index {
                    Some(i) => {
                        check_index(path, i, arr.len() + 1)?;
                        arr.insert(i, value.clone());
                    }
                    None => arr.push(value.clone()),
                }
            }
            ChangeOperation::AddValueIfAbsent { path, value } => {
                let arr = resolve_array(doc, path)?;
                if !arr.contains_value(value) {
                    arr.push(value.clone());
                }
            }
            ChangeOperation::RemoveValue { path, index, .. } => {
                let arr = resolve_array(doc, path)?;
                check_index(path, *index, arr.len())?;
                arr.remove_at(*index);
            }
            ChangeOperation::Clear { path } => match resolve(doc, path)? {
                Target::Document(d) => d.clear(),
                Target::Array(a) => a.clear(),
            },
            ChangeOperation::PutAll { parent, fields } => {
                let target = resolve_document(doc, parent)?;
                for (name, value) in fields {
                    target.put(name.clone(), value.clone());
                }
            }
            ChangeOperation::AddAllValues { path, index, values } => {
                let arr = resolve_array(doc, path)?;
                match *index {
                    Some(start) => {
                        check_index(path, start, arr.len() + 1)?;
                        for (offset, value) in values.iter().enumerate() {
                            arr.insert(start + offset, value.clone());
                        }
                    }
                    None => {
                        for value in values {
                            arr.push(value.clone());
                        }
                    }
                }
            }
            ChangeOperation::RemoveAllValues { path, values } => {
                resolve_array(doc, path)?.retain(|v| !values.contains_value(v));
            }
            ChangeOperation::RetainAllValues { path, values } => {
                resolve_array(doc, path)?.retain(|v| values.contains_value(v));
            }
        }
        Ok(())
    }
}

/// Applies `operations` in order, stopping at the first failure. Operations
/// before the failing one stay applied.
pub fn apply_changes<'a, I>(doc: &mut Document, operations: I) -> Result<(), ChangeError>
where
    I: IntoIterator<Item = &'a ChangeOperation>,
{
    for operation in operations {
        operation.apply(doc)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentView;

    fn nested() -> Document {
        let list: Array = [1, 2, 3].into_iter().collect();
        let inner: Document = [("list", Value::Array(list))].into_iter().collect();
        [("inner", Value::Document(inner)), ("n", Value::Int32(5))]
            .into_iter()
            .collect()
    }

    #[test]
    fn put_into_nested_document() {
        let mut doc = nested();
        let op = ChangeOperation::Put {
            parent: Path::new(["inner"]),
            field: "x".into(),
            old: None,
            new: Value::Boolean(true),
        };
        op.apply(&mut doc).unwrap();
        assert_eq!(doc.get_document("inner").unwrap().get_boolean("x"), Some(true));
    }

    #[test]
    fn missing_parent_fails_fast() {
        let mut doc = nested();
        let op = ChangeOperation::Put {
            parent: Path::new(["inner", "deeper"]),
            field: "x".into(),
            old: None,
            new: Value::Null,
        };
        assert_eq!(
            op.apply(&mut doc),
            Err(ChangeError::PathNotFound(Path::new(["inner", "deeper"])))
        );
    }

    #[test]
    fn scalar_in_path_is_not_a_container() {
        let mut doc = nested();
        let op = ChangeOperation::Clear { path: Path::new(["n"]) };
        assert_eq!(op.apply(&mut doc), Err(ChangeError::NotAContainer(Path::new(["n"]))));
    }

    #[test]
    fn array_ops_check_bounds() {
        let mut doc = nested();
        let path = Path::new(["inner", "list"]);
        let op = ChangeOperation::SetValue {
            path: path.clone(),
            index: 3,
            old: Value::Null,
            new: Value::Int32(9),
        };
        assert_eq!(
            op.apply(&mut doc),
            Err(ChangeError::IndexOutOfBounds { path: path.clone(), index: 3, len: 3 })
        );
        let append_at_end = ChangeOperation::AddValue {
            path: path.clone(),
            index: Some(3),
            value: Value::Int32(4),
        };
        append_at_end.apply(&mut doc).unwrap();
        let list = doc.get_document("inner").unwrap().get_array("list").unwrap();
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn bulk_array_ops() {
        let mut doc = nested();
        let path = Path::new(["inner", "list"]);
        let ops = [
            ChangeOperation::AddAllValues {
                path: path.clone(),
                index: Some(1),
                values: [7, 8].into_iter().collect(),
            },
            ChangeOperation::RemoveAllValues {
                path: path.clone(),
                values: [1].into_iter().collect(),
            },
            ChangeOperation::RetainAllValues {
                path: path.clone(),
                values: [7, 3].into_iter().collect(),
            },
        ];
        apply_changes(&mut doc, &ops).unwrap();
        let list = doc.get_document("inner").unwrap().get_array("list").unwrap();
        assert_eq!(list, &[7, 3].into_iter().collect::<Array>());
    }

    #[test]
    fn remove_of_absent_field_is_reported() {
        let mut doc = nested();
        let op = ChangeOperation::Remove {
            parent: Path::root(),
            field: "ghost".into(),
            old: Value::Null,
        };
        assert!(matches!(op.apply(&mut doc), Err(ChangeError::MissingField { .. })));
    }
}
