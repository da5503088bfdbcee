//! Document form of an operation, so a change log can travel through either
//! codec.
//!
//! ```text
//! {"op": "put", "parent": "/a", "field": "b", "old": 1, "new": 2}
//! {"op": "add_value", "path": "/a/list", "index": 0, "value": "x"}
//! {"op": "clear", "path": ""}
//! ```

use crate::document::{Array, Document, DocumentView};
use crate::path::Path;
use crate::value::Value;

use super::{ChangeError, ChangeOperation};

const OP: &str = "op";
const PARENT: &str = "parent";
const PATH: &str = "path";
const FIELD: &str = "field";
const INDEX: &str = "index";
const OLD: &str = "old";
const NEW: &str = "new";
const VALUE: &str = "value";
const VALUES: &str = "values";
const FIELDS: &str = "fields";

fn path_value(path: &Path) -> Value {
    Value::string(path.to_string())
}

fn index_value(index: usize) -> Value {
    Value::Int64(index as i64)
}

impl ChangeOperation {
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.put(OP, Value::string(self.name()));
        match self {
            ChangeOperation::Put { parent, field, old, new } => {
                doc.put(PARENT, path_value(parent));
                doc.put(FIELD, Value::string(field.as_str()));
                if let Some(old) = old {
                    doc.put(OLD, old.clone());
                }
                doc.put(NEW, new.clone());
            }
            ChangeOperation::Remove { parent, field, old } => {
                doc.put(PARENT, path_value(parent));
                doc.put(FIELD, Value::string(field.as_str()));
                doc.put(OLD, old.clone());
            }
            ChangeOperation::SetValue { path, index, old, new } => {
                doc.put(PATH, path_value(path));
                doc.put(INDEX, index_value(*index));
                doc.put(OLD, old.clone());
                doc.put(NEW, new.clone());
            }
            ChangeOperation::AddValue { path, index, value } => {
                doc.put(PATH, path_value(path));
                if let Some(index) = index {
                    doc.put(INDEX, index_value(*index));
                }
                doc.put(VALUE, value.clone());
            }
            ChangeOperation::AddValueIfAbsent { path, value } => {
                doc.put(PATH, path_value(path));
                doc.put(VALUE, value.clone());
            }
            ChangeOperation::RemoveValue { path, index, value } => {
                doc.put(PATH, path_value(path));
                doc.put(INDEX, index_value(*index));
                doc.put(VALUE, value.clone());
            }
            ChangeOperation::Clear { path } => {
                doc.put(PATH, path_value(path));
            }
            ChangeOperation::PutAll { parent, fields } => {
                doc.put(PARENT, path_value(parent));
                doc.put(FIELDS, Value::Document(fields.clone()));
            }
            ChangeOperation::AddAllValues { path, index, values } => {
                doc.put(PATH, path_value(path));
                if let Some(index) = index {
                    doc.put(INDEX, index_value(*index));
                }
                doc.put(VALUES, Value::Array(values.clone()));
            }
            ChangeOperation::RemoveAllValues { path, values }
            | ChangeOperation::RetainAllValues { path, values } => {
                doc.put(PATH, path_value(path));
                doc.put(VALUES, Value::Array(values.clone()));
            }
        }
        doc
    }

    pub fn from_document(doc: &Document) -> Result<ChangeOperation, ChangeError> {
        let reader = Fields(doc);
        let op = reader.string(OP)?;
        let operation = match op {
            "put" => ChangeOperation::Put {
                parent: reader.path(PARENT)?,
                field: reader.string(FIELD)?.to_string(),
                old: doc.get(OLD).cloned(),
                new: reader.value(NEW)?,
            },
            "remove" => ChangeOperation::Remove {
                parent: reader.path(PARENT)?,
                field: reader.string(FIELD)?.to_string(),
                old: reader.value(OLD)?,
            },
            "set_value" => ChangeOperation::SetValue {
                path: reader.path(PATH)?,
                index: reader.index(INDEX)?,
                old: reader.value(OLD)?,
                new: reader.value(NEW)?,
            },
            "add_value" => ChangeOperation::AddValue {
                path: reader.path(PATH)?,
                index: reader.optional_index(INDEX)?,
                value: reader.value(VALUE)?,
            },
            "add_value_if_absent" => ChangeOperation::AddValueIfAbsent {
                path: reader.path(PATH)?,
                value: reader.value(VALUE)?,
            },
            "remove_value" => ChangeOperation::RemoveValue {
                path: reader.path(PATH)?,
                index: reader.index(INDEX)?,
                value: reader.value(VALUE)?,
            },
            "clear" => ChangeOperation::Clear {
                path: reader.path(PATH)?,
            },
            "put_all" => ChangeOperation::PutAll {
                parent: reader.path(PARENT)?,
                fields: reader.document(FIELDS)?,
            },
            "add_all_values" => ChangeOperation::AddAllValues {
                path: reader.path(PATH)?,
                index: reader.optional_index(INDEX)?,
                values: reader.array(VALUES)?,
            },
            "remove_all_values" => ChangeOperation::RemoveAllValues {
                path: reader.path(PATH)?,
                values: reader.array(VALUES)?,
            },
            "retain_all_values" => ChangeOperation::RetainAllValues {
                path: reader.path(PATH)?,
                values: reader.array(VALUES)?,
            },
            other => return Err(malformed(format!("unknown operation \"{other}\""))),
        };
        Ok(operation)
    }
}

fn malformed(message: String) -> ChangeError {
    ChangeError::Malformed(message)
}

/// Required-field reads that report which field was missing.
struct Fields<'a>(&'a Document);

impl<'a> Fields<'a> {
    fn value(&self, name: &str) -> Result<Value, ChangeError> {
        self.0
            .get(name)
            .cloned()
            .ok_or_else(|| malformed(format!("missing \"{name}\"")))
    }

    fn string(&self, name: &str) -> Result<&'a str, ChangeError> {
        self.0
            .get_string(name)
            .ok_or_else(|| malformed(format!("\"{name}\" must be a string")))
    }

    fn path(&self, name: &str) -> Result<Path, ChangeError> {
        let text = self.string(name)?;
        text.parse::<Path>()
            .map_err(|_| malformed(format!("\"{name}\" is not a path")))
    }

    fn index(&self, name: &str) -> Result<usize, ChangeError> {
        self.optional_index(name)?
            .ok_or_else(|| malformed(format!("missing \"{name}\"")))
    }

    fn optional_index(&self, name: &str) -> Result<Option<usize>, ChangeError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(_) => self
                .0
                .get_long(name)
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| malformed(format!("\"{name}\" must be a non-negative integer"))),
        }
    }

    fn document(&self, name: &str) -> Result<Document, ChangeError> {
        self.0
            .get_document(name)
            .cloned()
            .ok_or_else(|| malformed(format!("\"{name}\" must be a document")))
    }

    fn array(&self, name: &str) -> Result<Array, ChangeError> {
        self.0
            .get_array(name)
            .cloned()
            .ok_or_else(|| malformed(format!("\"{name}\" must be an array")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bson;

    fn samples() -> Vec<ChangeOperation> {
        let list = Path::new(["list"]);
        vec![
            ChangeOperation::Put {
                parent: Path::new(["a", "b/c"]),
                field: "x".into(),
                old: None,
                new: Value::Int32(1),
            },
            ChangeOperation::Put {
                parent: Path::root(),
                field: "y".into(),
                old: Some(Value::string("before")),
                new: Value::Null,
            },
            ChangeOperation::Remove {
                parent: Path::root(),
                field: "y".into(),
                old: Value::Boolean(false),
            },
            ChangeOperation::SetValue {
                path: list.clone(),
                index: 2,
                old: Value::Int32(1),
                new: Value::Int32(2),
            },
            ChangeOperation::AddValue {
                path: list.clone(),
                index: None,
                value: Value::MinKey,
            },
            ChangeOperation::AddValue {
                path: list.clone(),
                index: Some(0),
                value: Value::Double(0.5),
            },
            ChangeOperation::Clear { path: Path::root() },
            ChangeOperation::PutAll {
                parent: Path::root(),
                fields: [("k", 1)].into_iter().collect(),
            },
            ChangeOperation::RetainAllValues {
                path: list,
                values: ["a", "b"].into_iter().collect(),
            },
        ]
    }

    #[test]
    fn document_form_reads_back() {
        for op in samples() {
            let doc = op.to_document();
            assert_eq!(ChangeOperation::from_document(&doc).unwrap(), op, "{doc}");
        }
    }

    #[test]
    fn log_survives_the_binary_codec() {
        let log: crate::document::Array = samples().iter().map(|op| Value::Document(op.to_document())).collect();
        let shipped: Document = [("log", Value::Array(log))].into_iter().collect();
        let bytes = bson::encode_document(&shipped).unwrap();
        let received = bson::decode_document(&bytes).unwrap();
        let ops: Vec<_> = received
            .get_array("log")
            .unwrap()
            .iter()
            .map(|v| ChangeOperation::from_document(v.as_document().unwrap()).unwrap())
            .collect();
        assert_eq!(ops, samples());
    }

    #[test]
    fn rejects_malformed_records() {
        let unknown: Document = [("op", "teleport")].into_iter().collect();
        assert!(matches!(
            ChangeOperation::from_document(&unknown),
            Err(ChangeError::Malformed(_))
        ));
        let negative: Document = [
            ("op", Value::string("remove_value")),
            ("path", Value::string("")),
            ("index", Value::Int32(-1)),
            ("value", Value::Null),
        ]
        .into_iter()
        .collect();
        assert!(ChangeOperation::from_document(&negative).is_err());
    }
}
