//! Textual decoder error type.

use thiserror::Error;

/// A textual input could not be parsed. `line` and `column` are 1-based and
/// point at the character where parsing stopped; I/O failures while reading
/// the input report `0:0`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message} (line {line}, column {column})")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::new(format!("error reading input: {err}"), 0, 0)
    }
}
