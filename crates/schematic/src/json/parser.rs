//! Recursive-descent parser for the lenient textual form.
//!
//! Beyond strict JSON it accepts single-quoted strings, `=` and `=>` as field
//! delimiters, `;` as a pair delimiter, repeated and trailing delimiters,
//! unquoted field names, hexadecimal integers, `NaN`/`Infinity`, the bare
//! words `MinKey`/`MaxKey`, and `new Date(...)` / `Date(...)` calls.

use tracing::debug;

use super::dates;
use super::error::ParseError;
use super::reserved;
use super::tokenizer::{Mark, Tokenizer};
use crate::document::{Array, Document};
use crate::value::{Date, Value};

/// Reader settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonReaderOptions {
    /// Turn string literals that look like dates into date values.
    pub introspect_dates: bool,
    /// Deepest allowed nesting of documents and arrays. The outermost
    /// container is level 1.
    pub max_depth: usize,
}

impl JsonReaderOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 256;
}

impl Default for JsonReaderOptions {
    fn default() -> Self {
        Self {
            introspect_dates: false,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

pub(crate) struct Parser<'a> {
    tokens: Tokenizer<'a>,
    options: JsonReaderOptions,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, options: JsonReaderOptions) -> Self {
        Self {
            tokens: Tokenizer::new(input),
            options,
            depth: 0,
        }
    }

    pub fn resume(input: &'a str, mark: Mark, options: JsonReaderOptions) -> Self {
        Self {
            tokens: Tokenizer::resume(input, mark),
            options,
            depth: 0,
        }
    }

    pub fn mark(&self) -> Mark {
        self.tokens.mark()
    }

    pub fn is_finished(&mut self) -> bool {
        self.tokens.is_finished()
    }

    /// Parses one top-level document and returns it as-is, even if its
    /// fields happen to form a reserved shape.
    pub fn parse_document(&mut self) -> Result<Document, ParseError> {
        match self.tokens.next_useful() {
            Some('{') => self.nested(Self::document_body),
            _ => Err(self.tokens.error("documents must begin with a '{' character")),
        }
    }

    /// Parses one value and requires nothing but whitespace after it.
    pub fn parse_complete_value(&mut self) -> Result<Value, ParseError> {
        let value = self.parse_value()?;
        if !self.tokens.is_finished() {
            return Err(self.tokens.error("unexpected content after the value"));
        }
        Ok(value)
    }

    pub fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.tokens.peek_useful() {
            None => Err(self.tokens.error("expected a value but reached the end of input")),
            Some('{') => {
                self.tokens.next();
                let doc = self.nested(Self::document_body)?;
                if doc.keys().any(reserved::is_reserved_name) {
                    Ok(reserved::decode(doc))
                } else {
                    Ok(Value::Document(doc))
                }
            }
            Some('[') => {
                self.tokens.next();
                self.nested(Self::array_body).map(Value::Array)
            }
            Some(quote @ ('"' | '\'')) => {
                self.tokens.next();
                let literal = self.tokens.quoted(quote)?;
                if self.options.introspect_dates {
                    if let Some(date) = dates::from_literal(&literal) {
                        return Ok(Value::Date(date));
                    }
                }
                Ok(Value::string(literal))
            }
            Some(_) => self.bare_value(),
        }
    }

    /// Runs `body` one container level deeper, failing at the position of
    /// the opening bracket once the depth limit is passed.
    fn nested<T>(
        &mut self,
        body: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.options.max_depth {
            return Err(self.tokens.error(format!(
                "containers nested deeper than {} levels",
                self.options.max_depth
            )));
        }
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    fn document_body(&mut self) -> Result<Document, ParseError> {
        let mut doc = Document::new();
        loop {
            let name = match self.tokens.peek_useful() {
                None => return Err(self.tokens.error("documents must end with a '}' character")),
                Some('}') => {
                    self.tokens.next();
                    return Ok(doc);
                }
                Some(quote @ ('"' | '\'')) => {
                    self.tokens.next();
                    self.tokens.quoted(quote)?
                }
                Some(_) => {
                    let word = self.tokens.bare();
                    if word.is_empty() {
                        return Err(self
                            .tokens
                            .error("expected a field name; check for a missing comma"));
                    }
                    word.to_string()
                }
            };
            self.tokens.field_delimiter()?;
            let value = self.parse_value()?;
            doc.put(name, value);
            if self.pair_delimiter('}')? {
                return Ok(doc);
            }
        }
    }

    fn array_body(&mut self) -> Result<Array, ParseError> {
        let mut arr = Array::new();
        loop {
            match self.tokens.peek_useful() {
                None => return Err(self.tokens.error("arrays must end with a ']' character")),
                Some(']') => {
                    self.tokens.next();
                    return Ok(arr);
                }
                Some(',' | ';') => {
                    self.tokens.next();
                }
                Some(_) => {
                    let value = self.parse_value()?;
                    arr.push(value);
                    match self.tokens.peek_useful() {
                        Some(',' | ';' | ']') => {}
                        _ => return Err(self.tokens.error("expected ',' or ']' after an array value")),
                    }
                }
            }
        }
    }

    /// Consumes the delimiter after a field. Returns true when `close` was
    /// consumed. Repeated and trailing delimiters are tolerated.
    fn pair_delimiter(&mut self, close: char) -> Result<bool, ParseError> {
        match self.tokens.next_useful() {
            Some(',' | ';') => loop {
                match self.tokens.peek_useful() {
                    Some(',' | ';') => {
                        self.tokens.next();
                    }
                    Some(c) if c == close => {
                        self.tokens.next();
                        return Ok(true);
                    }
                    _ => return Ok(false),
                }
            },
            Some(c) if c == close => Ok(true),
            _ => Err(self
                .tokens
                .error(format!("expected ',' or '{close}' after a field value"))),
        }
    }

    fn bare_value(&mut self) -> Result<Value, ParseError> {
        let start = self.tokens.mark();
        let word = self.tokens.bare();
        if word.is_empty() {
            let found = self.tokens.peek().unwrap_or(' ');
            return Err(self.tokens.error(format!("unexpected character '{found}'")));
        }
        if word.eq_ignore_ascii_case("new") {
            let name = self.tokens.bare();
            if name.is_empty() {
                return Err(self.tokens.error("expected a function name after 'new'"));
            }
            return self.function_call(name, start);
        }
        if self.tokens.peek_useful() == Some('(') {
            return self.function_call(word, start);
        }
        Ok(keyword(word)
            .or_else(|| parse_number(word))
            .unwrap_or_else(|| Value::string(word)))
    }

    fn function_call(&mut self, name: &str, start: Mark) -> Result<Value, ParseError> {
        if self.tokens.next_useful() != Some('(') {
            return Err(self
                .tokens
                .error(format!("expected '(' after function name \"{name}\"")));
        }
        let mut args = Vec::new();
        loop {
            match self.tokens.peek_useful() {
                None => return Err(self.tokens.error("function call must end with ')'")),
                Some(')') => {
                    self.tokens.next();
                    break;
                }
                Some(',') => {
                    self.tokens.next();
                }
                Some(_) => args.push(self.parse_value()?),
            }
        }
        if name.eq_ignore_ascii_case("date") {
            let at = |msg: String| ParseError::new(msg, start.line, start.column + 1);
            return match args.first() {
                Some(Value::Int32(_) | Value::Int64(_)) => Ok(Value::Date(Date::from_millis(
                    args[0].as_i64().unwrap_or_default(),
                ))),
                Some(Value::String(text)) => Date::parse_iso(text).map(Value::Date).map_err(|_| {
                    at(format!(
                        "expected the Date(...) argument to be milliseconds or an ISO-8601 date, found \"{text}\""
                    ))
                }),
                Some(Value::Date(d)) => Ok(Value::Date(*d)),
                _ => Err(at("the Date function requires one argument".to_string())),
            };
        }
        debug!(function = name, "unknown function call kept as text");
        let rendered: Vec<String> = args.iter().map(super::to_string).collect();
        Ok(Value::string(format!("{name}({})", rendered.join(", "))))
    }
}

fn keyword(word: &str) -> Option<Value> {
    let value = match word {
        w if w.eq_ignore_ascii_case("true") => Value::Boolean(true),
        w if w.eq_ignore_ascii_case("false") => Value::Boolean(false),
        w if w.eq_ignore_ascii_case("null") => Value::Null,
        "NaN" => Value::Double(f64::NAN),
        "Infinity" | "+Infinity" => Value::Double(f64::INFINITY),
        "-Infinity" => Value::Double(f64::NEG_INFINITY),
        "MinKey" => Value::MinKey,
        "MaxKey" => Value::MaxKey,
        _ => return None,
    };
    Some(value)
}

/// Parses an unquoted numeric literal.
///
/// `0x`-prefixed text is a 32-bit hexadecimal integer. Text containing `.`,
/// `e` or `E` is a double. Anything else is an integer: 32-bit when it fits,
/// 64-bit otherwise. Returns `None` when the text is not a number.
pub fn parse_number(text: &str) -> Option<Value> {
    let first = text.chars().next()?;
    if !(first.is_ascii_digit() || matches!(first, '.' | '-' | '+')) {
        return None;
    }
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        if let Ok(n) = i32::from_str_radix(hex, 16) {
            return Some(Value::Int32(n));
        }
    }
    if text.contains(['.', 'e', 'E']) {
        return text.parse::<f64>().ok().map(Value::Double);
    }
    let n = text.parse::<i64>().ok()?;
    Some(match i32::try_from(n) {
        Ok(small) => Value::Int32(small),
        Err(_) => Value::Int64(n),
    })
}
