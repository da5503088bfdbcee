//! Source-code values, with or without a scope document.

use std::fmt;
use std::sync::Arc;

use crate::document::Document;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code {
    source: Arc<str>,
}

impl Code {
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Code bound to a document of variable bindings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeWithScope {
    code: Code,
    scope: Document,
}

impl CodeWithScope {
    pub fn new(source: impl Into<Arc<str>>, scope: Document) -> Self {
        Self {
            code: Code::new(source),
            scope,
        }
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn source(&self) -> &str {
        self.code.source()
    }

    pub fn scope(&self) -> &Document {
        &self.scope
    }

    pub(crate) fn scope_mut(&mut self) -> &mut Document {
        &mut self.scope
    }

    pub fn into_parts(self) -> (Code, Document) {
        (self.code, self.scope)
    }
}

impl fmt::Display for CodeWithScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with scope {}", self.code, self.scope)
    }
}
