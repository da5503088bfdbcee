//! Leaf rewriting for [`Document::with_transformed`](super::Document::with_transformed).
//!
//! Two substitutions ship with the crate: [`PropertySubstitution`] fills
//! `${name}` placeholders in string values from a property table, and
//! [`EnvironmentSubstitution`] does the same from the process environment.
//! Both accept `${name:default}` and leave unknown placeholders untouched.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::value::{CodeWithScope, Value};

/// Rewrites one leaf value. `None` means "unchanged".
pub trait ValueTransformer {
    fn transform(&self, value: &Value) -> Option<Value>;
}

impl<F> ValueTransformer for F
where
    F: Fn(&Value) -> Option<Value>,
{
    fn transform(&self, value: &Value) -> Option<Value> {
        self(value)
    }
}

/// Applies `transformer` to `value`, descending into containers. Returns
/// `None` when nothing below `value` changed.
pub(crate) fn transform_value<T>(value: &Value, transformer: &T) -> Option<Value>
where
    T: ValueTransformer + ?Sized,
{
    match value {
        Value::Document(doc) => match doc.with_transformed(transformer) {
            Cow::Owned(doc) => Some(Value::Document(doc)),
            Cow::Borrowed(_) => None,
        },
        Value::Array(arr) => match arr.with_transformed(transformer) {
            Cow::Owned(arr) => Some(Value::Array(arr)),
            Cow::Borrowed(_) => None,
        },
        Value::CodeWithScope(cws) => match cws.scope().with_transformed(transformer) {
            Cow::Owned(scope) => Some(Value::CodeWithScope(CodeWithScope::new(
                cws.source(),
                scope,
            ))),
            Cow::Borrowed(_) => None,
        },
        leaf => transformer.transform(leaf),
    }
}

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([^}:]+)(?::([^}]*))?\}").expect("placeholder pattern is valid")
});

/// Replaces `${name}` placeholders using `lookup`. Returns `None` when the
/// text has no placeholder that resolves.
fn substitute(text: &str, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    let mut replaced = false;
    let out = PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
        let name = caps[1].trim();
        match lookup(name).or_else(|| caps.get(2).map(|d| d.as_str().to_string())) {
            Some(found) => {
                replaced = true;
                found
            }
            None => caps[0].to_string(),
        }
    });
    if replaced {
        Some(out.into_owned())
    } else {
        None
    }
}

fn substitute_string<F>(value: &Value, lookup: F) -> Option<Value>
where
    F: Fn(&str) -> Option<String>,
{
    match value {
        Value::String(s) if s.contains("${") => {
            substitute(s, lookup).filter(|new| new.as_str() != &**s).map(Value::string)
        }
        _ => None,
    }
}

/// Fills `${name}` placeholders from a property table.
#[derive(Debug, Clone, Default)]
pub struct PropertySubstitution {
    properties: HashMap<String, String>,
}

impl PropertySubstitution {
    pub fn new<I, K, V>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl ValueTransformer for PropertySubstitution {
    fn transform(&self, value: &Value) -> Option<Value> {
        substitute_string(value, |name| self.properties.get(name).cloned())
    }
}

/// Fills `${NAME}` placeholders from environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentSubstitution;

impl ValueTransformer for EnvironmentSubstitution {
    fn transform(&self, value: &Value) -> Option<Value> {
        substitute_string(value, |name| std::env::var(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, DocumentView};

    #[test]
    fn substitutes_known_properties() {
        let props = PropertySubstitution::new([("host", "example.org"), ("port", "8080")]);
        let v = props.transform(&Value::string("http://${host}:${port}/"));
        assert_eq!(v, Some(Value::string("http://example.org:8080/")));
    }

    #[test]
    fn keeps_unknown_placeholders_and_uses_defaults() {
        let props = PropertySubstitution::new([("a", "1")]);
        assert_eq!(props.transform(&Value::string("${b}")), None);
        assert_eq!(
            props.transform(&Value::string("${a}-${b}")),
            Some(Value::string("1-${b}"))
        );
        assert_eq!(
            props.transform(&Value::string("${b:fallback}")),
            Some(Value::string("fallback"))
        );
        assert_eq!(props.transform(&Value::Int32(1)), None);
    }

    #[test]
    fn unchanged_document_is_returned_as_is() {
        let doc: Document = [("a", Value::string("plain")), ("b", Value::Int32(2))]
            .into_iter()
            .collect();
        let props = PropertySubstitution::new([("x", "y")]);
        assert!(matches!(doc.with_transformed(&props), Cow::Borrowed(d) if std::ptr::eq(d, &doc)));
    }

    #[test]
    fn nested_leaves_are_rewritten() {
        let inner: Document = [("url", Value::string("${host}"))].into_iter().collect();
        let arr: crate::document::Array = [Value::string("${host}"), Value::Int32(1)]
            .into_iter()
            .collect();
        let doc: Document = [
            ("inner", Value::Document(inner)),
            ("list", Value::Array(arr)),
            ("same", Value::string("plain")),
        ]
        .into_iter()
        .collect();
        let props = PropertySubstitution::new([("host", "h")]);
        let out = doc.with_transformed(&props).into_owned();
        assert_eq!(out.get_document("inner").and_then(|d| d.get_string("url")), Some("h"));
        assert_eq!(out.get_array("list").and_then(|a| a.get_string("0")), Some("h"));
        assert_eq!(out.get_string("same"), Some("plain"));
        assert_eq!(out.keys().collect::<Vec<_>>(), ["inner", "list", "same"]);
    }

    #[test]
    fn environment_lookup() {
        std::env::set_var("SCHEMATIC_TRANSFORM_TEST", "from-env");
        let v = EnvironmentSubstitution.transform(&Value::string("${SCHEMATIC_TRANSFORM_TEST}"));
        assert_eq!(v, Some(Value::string("from-env")));
    }

    #[test]
    fn closures_are_transformers() {
        let double = |v: &Value| v.as_i32().map(|n| Value::Int32(n * 2));
        let doc: Document = [("a", 1), ("b", 2)].into_iter().collect();
        let out = doc.with_transformed(&double);
        assert_eq!(out.get_integer("b"), Some(4));
    }
}
