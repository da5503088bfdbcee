//! Character-level scanner with line and column tracking.

use super::error::ParseError;

/// Characters that end a bare (unquoted) token.
const BARE_TERMINATORS: &str = "{}[]:\"'=,;()";

/// Position snapshot, used to resume scanning a multi-document input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mark {
    pub pos: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Mark {
    fn default() -> Self {
        Self {
            pos: 0,
            line: 1,
            column: 0,
        }
    }
}

pub(crate) struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    previous: Option<char>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::resume(input, Mark::default())
    }

    pub fn resume(input: &'a str, mark: Mark) -> Self {
        Self {
            input,
            pos: mark.pos,
            line: mark.line,
            column: mark.column,
            previous: None,
        }
    }

    pub fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.line, self.column)
    }

    /// Next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Consumes one character, updating line and column. `\r\n`, `\r` and
    /// `\n` each count as one line break.
    pub fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        match c {
            '\n' if self.previous == Some('\r') => {}
            '\n' | '\r' => {
                self.line += 1;
                self.column = 0;
            }
            _ => self.column += 1,
        }
        self.previous = Some(c);
        Some(c)
    }

    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.next();
        }
    }

    /// Next non-whitespace character without consuming it.
    pub fn peek_useful(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.peek()
    }

    pub fn next_useful(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.next()
    }

    pub fn is_finished(&mut self) -> bool {
        self.peek_useful().is_none()
    }

    /// Reads a quoted string whose opening quote has already been consumed.
    pub fn quoted(&mut self, quote: char) -> Result<String, ParseError> {
        let mut out = String::new();
        loop {
            match self.next() {
                None | Some('\n') | Some('\r') => {
                    return Err(self.error(
                        "the string was not terminated before the end of the line or input",
                    ))
                }
                Some('\\') => self.escape(&mut out)?,
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        match self.next() {
            Some(c @ ('\'' | '"' | '\\' | '/')) => out.push(c),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let high = self.hex4()?;
                let code = if (0xd800..0xdc00).contains(&high) && self.input[self.pos..].starts_with("\\u") {
                    self.next();
                    self.next();
                    let low = self.hex4()?;
                    if (0xdc00..0xe000).contains(&low) {
                        0x10000 + ((high - 0xd800) << 10) + (low - 0xdc00)
                    } else {
                        out.push(char::REPLACEMENT_CHARACTER);
                        low
                    }
                } else {
                    high
                };
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            // Not an escape after all: keep the backslash.
            Some(c) => {
                out.push('\\');
                out.push(c);
            }
            None => return Err(self.error("unexpected end of input after '\\'")),
        }
        Ok(())
    }

    fn hex4(&mut self) -> Result<u32, ParseError> {
        let start = self.pos;
        for _ in 0..4 {
            self.next();
        }
        let digits = self.input.get(start..self.pos).unwrap_or_default();
        if digits.len() != 4 {
            return Err(self.error(format!("expected 4 hex digits after \\u, found '{digits}'")));
        }
        u32::from_str_radix(digits, 16)
            .map_err(|_| self.error(format!("expected 4 hex digits after \\u, found '{digits}'")))
    }

    /// Reads an unquoted token: a number, keyword or function name.
    pub fn bare(&mut self) -> &'a str {
        self.skip_whitespace();
        let start = self.pos;
        while matches!(self.peek(), Some(c) if !c.is_whitespace() && !BARE_TERMINATORS.contains(c))
        {
            self.next();
        }
        &self.input[start..self.pos]
    }

    /// Consumes `:`, `=` or `=>`.
    pub fn field_delimiter(&mut self) -> Result<(), ParseError> {
        match self.next_useful() {
            Some(':') => Ok(()),
            Some('=') => {
                if self.peek() == Some('>') {
                    self.next();
                }
                Ok(())
            }
            _ => Err(self.error("expected a field delimiter (':', '=' or '=>')")),
        }
    }
}
