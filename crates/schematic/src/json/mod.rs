//! Textual codec: a lenient JSON superset with `$`-field encodings for the
//! extended value kinds.
//!
//! # Example
//!
//! ```
//! use schematic::json;
//! use schematic::DocumentView;
//!
//! let doc = json::from_str("{ name = 'widget'; _id : { $oid: '4e2064df0000010002000003' } }").unwrap();
//! assert_eq!(doc.get_string("name"), Some("widget"));
//! assert_eq!(doc.get_object_id("_id").map(|id| id.time()), Some(1310745823));
//! assert_eq!(
//!     json::document_to_string(&doc),
//!     r#"{"name":"widget","_id":{"$oid":"4e2064df0000010002000003"}}"#
//! );
//! ```

mod dates;
mod error;
mod parser;
pub mod reserved;
mod tokenizer;
mod writer;

use std::io::{Read, Write};
use std::path::Path;

pub use error::ParseError;
pub use parser::{parse_number, JsonReaderOptions};
pub use writer::{JsonWriter, JsonWriterOptions};

use crate::document::{Array, Document};
use crate::value::Value;
use parser::Parser;
use tokenizer::Mark;

/// Reads documents from text, streams, files and `file:` URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReader {
    options: JsonReaderOptions,
}

impl JsonReader {
    pub fn new(options: JsonReaderOptions) -> Self {
        Self { options }
    }

    /// Reader that turns date-like string literals into dates.
    pub fn introspecting() -> Self {
        Self::new(JsonReaderOptions {
            introspect_dates: true,
            ..Default::default()
        })
    }

    pub fn read_str(&self, text: &str) -> Result<Document, ParseError> {
        Parser::new(text, self.options).parse_document()
    }

    pub fn read_value(&self, text: &str) -> Result<Value, ParseError> {
        Parser::new(text, self.options).parse_complete_value()
    }

    pub fn read<R: Read>(&self, mut input: R) -> Result<Document, ParseError> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        self.read_str(&text)
    }

    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Document, ParseError> {
        let text = std::fs::read_to_string(path)?;
        self.read_str(&text)
    }

    /// Only `file:` URLs are supported.
    pub fn read_url(&self, url: &str) -> Result<Document, ParseError> {
        let path = url
            .strip_prefix("file://")
            .or_else(|| url.strip_prefix("file:"))
            .ok_or_else(|| ParseError::new(format!("unsupported URL scheme in \"{url}\""), 0, 0))?;
        self.read_file(path)
    }

    /// Iterates over the documents in `text`, one after another.
    pub fn read_multiple(&self, text: impl Into<String>) -> DocumentSequence {
        DocumentSequence {
            input: text.into(),
            mark: Mark::default(),
            options: self.options,
            failed: false,
        }
    }

    pub fn read_multiple_from<R: Read>(&self, mut input: R) -> Result<DocumentSequence, ParseError> {
        let mut text = String::new();
        input.read_to_string(&mut text)?;
        Ok(self.read_multiple(text))
    }
}

/// Documents pulled one at a time from a single input. Iteration stops
/// after the first error.
#[derive(Debug, Clone)]
pub struct DocumentSequence {
    input: String,
    mark: Mark,
    options: JsonReaderOptions,
    failed: bool,
}

impl DocumentSequence {
    pub fn next_document(&mut self) -> Option<Result<Document, ParseError>> {
        if self.failed {
            return None;
        }
        let mut parser = Parser::resume(&self.input, self.mark, self.options);
        if parser.is_finished() {
            return None;
        }
        let result = parser.parse_document();
        self.mark = parser.mark();
        self.failed = result.is_err();
        Some(result)
    }
}

impl Iterator for DocumentSequence {
    type Item = Result<Document, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_document()
    }
}

pub fn from_str(text: &str) -> Result<Document, ParseError> {
    JsonReader::default().read_str(text)
}

pub fn from_reader<R: Read>(input: R) -> Result<Document, ParseError> {
    JsonReader::default().read(input)
}

pub fn parse_value(text: &str) -> Result<Value, ParseError> {
    JsonReader::default().read_value(text)
}

/// Compact text form of any value.
pub fn to_string(value: &Value) -> String {
    JsonWriter::default().write_value(value)
}

pub fn to_string_pretty(value: &Value) -> String {
    JsonWriter::new(JsonWriterOptions::pretty()).write_value(value)
}

pub fn document_to_string(doc: &Document) -> String {
    JsonWriter::default().write_document(doc)
}

pub fn document_to_string_pretty(doc: &Document) -> String {
    JsonWriter::new(JsonWriterOptions::pretty()).write_document(doc)
}

pub fn array_to_string(arr: &Array) -> String {
    JsonWriter::default().write_array(arr)
}

pub fn write_document<W: Write + ?Sized>(
    doc: &Document,
    out: &mut W,
    options: JsonWriterOptions,
) -> std::io::Result<()> {
    out.write_all(JsonWriter::new(options).write_document(doc).as_bytes())
}

impl std::str::FromStr for Document {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        from_str(text)
    }
}
