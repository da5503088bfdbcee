//! Compact and pretty text writers.
//!
//! Extended kinds are written with the reserved-field shapes the parser
//! recognises, so anything written here reads back to an equal document.

use super::reserved;
use crate::document::{Array, Document};
use crate::value::Value;

/// Writer settings. The default is compact output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonWriterOptions {
    pub pretty: bool,
    /// Spaces per nesting level when `pretty` is set.
    pub indent: usize,
}

impl JsonWriterOptions {
    pub fn compact() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}

impl Default for JsonWriterOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonWriter {
    options: JsonWriterOptions,
    out: String,
    depth: usize,
}

impl JsonWriter {
    pub fn new(options: JsonWriterOptions) -> Self {
        Self {
            options,
            out: String::new(),
            depth: 0,
        }
    }

    pub fn write_document(&mut self, doc: &Document) -> String {
        self.document(doc);
        self.finish()
    }

    pub fn write_array(&mut self, arr: &Array) -> String {
        self.array(arr);
        self.finish()
    }

    pub fn write_value(&mut self, value: &Value) -> String {
        self.value(value);
        self.finish()
    }

    fn finish(&mut self) -> String {
        self.depth = 0;
        std::mem::take(&mut self.out)
    }

    fn value(&mut self, value: &Value) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Boolean(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Int32(n) => self.out.push_str(&n.to_string()),
            Value::Int64(n) => self.out.push_str(&n.to_string()),
            Value::Double(d) => self.double(*d),
            Value::String(s) | Value::Symbol(s) => self.string(s),
            Value::MinKey => self.out.push_str("MinKey"),
            Value::MaxKey => self.out.push_str("MaxKey"),
            Value::Document(doc) => self.document(doc),
            Value::Array(arr) => self.array(arr),
            extended => match reserved::encode(extended) {
                Some(doc) => self.document(&doc),
                None => self.out.push_str("null"),
            },
        }
    }

    fn double(&mut self, d: f64) {
        if d.is_nan() {
            self.out.push_str("NaN");
        } else if d.is_infinite() {
            self.out.push_str(if d > 0.0 { "Infinity" } else { "-Infinity" });
        } else {
            // Debug keeps a `.0` or exponent, so the text parses back as a double.
            self.out.push_str(&format!("{d:?}"));
        }
    }

    fn string(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                '\u{8}' => self.out.push_str("\\b"),
                '\u{c}' => self.out.push_str("\\f"),
                c if (c as u32) < 0x20 => self.out.push_str(&format!("\\u{:04x}", c as u32)),
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn document(&mut self, doc: &Document) {
        if doc.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push('{');
        self.depth += 1;
        for (i, (name, value)) in doc.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline();
            self.string(name);
            self.out.push_str(if self.options.pretty { ": " } else { ":" });
            self.value(value);
        }
        self.depth -= 1;
        self.newline();
        self.out.push('}');
    }

    fn array(&mut self, arr: &Array) {
        if arr.is_empty() {
            self.out.push_str("[]");
            return;
        }
        self.out.push('[');
        self.depth += 1;
        for (i, value) in arr.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline();
            self.value(value);
        }
        self.depth -= 1;
        self.newline();
        self.out.push(']');
    }

    fn newline(&mut self) {
        if self.options.pretty {
            self.out.push('\n');
            let width = self.depth * self.options.indent;
            self.out.extend(std::iter::repeat(' ').take(width));
        }
    }
}
