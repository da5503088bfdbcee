//! schematic: a schema-less document model.
//!
//! Documents are ordered maps from field names to [`Value`]s, with arrays as
//! their positional variant. They travel in two forms: a length-prefixed
//! binary form ([`bson`]) and a lenient JSON superset ([`json`]) that spells
//! the extra value kinds with `$`-prefixed fields.
//!
//! Edits go through [`editor`]s. An editor with a change sink attached
//! records every edit as a [`ChangeOperation`], and the recorded log can be
//! replayed on another copy of the document with [`apply_changes`].
//! [`overlay`] reads several documents as one, in precedence order.
//!
//! ```
//! use schematic::{bson, json, DocumentView};
//!
//! let doc = json::from_str(r#"{"a":1,"b":[true,null]}"#).unwrap();
//! let decoded = bson::decode_document(&bson::encode_document(&doc).unwrap()).unwrap();
//! assert_eq!(decoded.get_integer("a"), Some(1));
//! assert_eq!(decoded.get_array("b").map(|b| b.len()), Some(2));
//! ```

pub mod bson;
pub mod changes;
pub mod cli;
pub mod document;
pub mod editor;
pub mod json;
pub mod overlay;
pub mod path;
pub mod value;

pub use changes::{apply_changes, ChangeError, ChangeOperation, ChangeSink};
pub use document::{Array, Document, DocumentView, Entry, Field, ValueTransformer};
pub use editor::{ArrayEditor, DefaultValueFactory, DocumentEditor, ValueFactory};
pub use overlay::{merge, merge3, DocumentLayer, MergedDocument};
pub use path::Path;
pub use value::{
    Binary, BinaryType, Code, CodeWithScope, Date, MaxKey, MinKey, Null, ObjectId, Regex,
    RegexFlags, Timestamp, Value, ValueError,
};
