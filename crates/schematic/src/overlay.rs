//! Read-only precedence view over several documents.
//!
//! `merge(a, b)` reads each field from `a` and falls back to `b`. Nested
//! documents present on both sides are overlaid recursively, so precedence
//! holds at every depth:
//!
//! ```
//! use schematic::{json, overlay, DocumentView};
//!
//! let defaults = json::from_str("{ port: 80, tls: { enabled: false, cert: 'none' } }").unwrap();
//! let site = json::from_str("{ tls: { enabled: true } }").unwrap();
//!
//! let merged = overlay::merge(&site, &defaults);
//! assert_eq!(merged.get_integer("port"), Some(80));
//! let tls = merged.get_document("tls").unwrap();
//! assert_eq!(tls.get_boolean("enabled"), Some(true));
//! assert_eq!(tls.get_string("cert"), Some("none"));
//! ```

use std::borrow::Cow;

use indexmap::IndexSet;

use crate::document::{Document, DocumentView, Field};
use crate::value::Value;

/// One side of an overlay: a plain document or another overlay.
#[derive(Debug, Clone)]
pub enum DocumentLayer<'a> {
    Plain(&'a Document),
    Merged(Box<MergedDocument<'a>>),
}

impl<'a> DocumentLayer<'a> {
    /// Nested document under `name`, itself overlaid when this layer is.
    pub fn get_document(&self, name: &str) -> Option<DocumentLayer<'a>> {
        match *self {
            DocumentLayer::Plain(doc) => match doc.get(name) {
                Some(Value::Document(nested)) => Some(DocumentLayer::Plain(nested)),
                _ => None,
            },
            DocumentLayer::Merged(ref merged) => merged.get_document(name),
        }
    }

    pub fn fields(&self) -> Box<dyn Iterator<Item = Field<'a>> + 'a> {
        match *self {
            DocumentLayer::Plain(doc) => Box::new(doc.fields()),
            DocumentLayer::Merged(ref merged) => merged.fields(),
        }
    }

    /// Field names without repeats, in first-seen order.
    pub fn keys(&self) -> IndexSet<&'a str> {
        match *self {
            DocumentLayer::Plain(doc) => doc.keys().collect(),
            DocumentLayer::Merged(ref merged) => merged.keys(),
        }
    }

    pub fn to_document(&self) -> Document {
        match *self {
            DocumentLayer::Plain(doc) => doc.clone(),
            DocumentLayer::Merged(ref merged) => merged.to_document(),
        }
    }

    /// Borrows a plain layer; materialises a merged one.
    pub fn into_cow(self) -> Cow<'a, Document> {
        match self {
            DocumentLayer::Plain(doc) => Cow::Borrowed(doc),
            DocumentLayer::Merged(merged) => Cow::Owned(merged.to_document()),
        }
    }

    fn lookup(&self, name: &str) -> Option<&'a Value> {
        match *self {
            DocumentLayer::Plain(doc) => doc.get(name),
            DocumentLayer::Merged(ref merged) => merged.lookup(name),
        }
    }
}

impl DocumentView for DocumentLayer<'_> {
    fn get(&self, name: &str) -> Option<&Value> {
        self.lookup(name)
    }

    fn len(&self) -> usize {
        match self {
            DocumentLayer::Plain(doc) => doc.len(),
            DocumentLayer::Merged(merged) => merged.len(),
        }
    }

    fn get_document(&self, name: &str) -> Option<Cow<'_, Document>> {
        DocumentLayer::get_document(self, name).map(DocumentLayer::into_cow)
    }
}

/// Two layers read as one, `first` taking precedence.
///
/// [`fields`](Self::fields) yields the first layer's fields followed by the
/// second's, so a name defined on both sides appears twice. Use
/// [`keys`](Self::keys) or [`to_document`](Self::to_document) for a
/// de-duplicated view.
#[derive(Debug, Clone)]
pub struct MergedDocument<'a> {
    first: DocumentLayer<'a>,
    second: DocumentLayer<'a>,
}

impl<'a> MergedDocument<'a> {
    pub fn new(first: &'a Document, second: &'a Document) -> Self {
        Self::from_layers(DocumentLayer::Plain(first), DocumentLayer::Plain(second))
    }

    pub fn from_layers(first: DocumentLayer<'a>, second: DocumentLayer<'a>) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> &DocumentLayer<'a> {
        &self.first
    }

    pub fn second(&self) -> &DocumentLayer<'a> {
        &self.second
    }

    fn lookup(&self, name: &str) -> Option<&'a Value> {
        self.first.lookup(name).or_else(|| self.second.lookup(name))
    }

    /// Overlaid nested document.
    ///
    /// Overlays the two sides when both hold a document under `name`, and
    /// returns the one side's document unchanged otherwise. The
    /// [`DocumentView::get_document`] impl gives the same answer as a
    /// [`Cow`], materialising the merge.
    pub fn get_document(&self, name: &str) -> Option<DocumentLayer<'a>> {
        match (self.first.get_document(name), self.second.get_document(name)) {
            (Some(first), Some(second)) => Some(DocumentLayer::Merged(Box::new(
                MergedDocument::from_layers(first, second),
            ))),
            (Some(only), None) | (None, Some(only)) => Some(only),
            (None, None) => None,
        }
    }

    /// Every field of the first layer, then every field of the second.
    pub fn fields(&self) -> Box<dyn Iterator<Item = Field<'a>> + 'a> {
        Box::new(self.first.fields().chain(self.second.fields()))
    }

    pub fn keys(&self) -> IndexSet<&'a str> {
        let mut keys = self.first.keys();
        keys.extend(self.second.keys());
        keys
    }

    /// Materialises the view. Fields keep first-seen order; values follow
    /// precedence, and nested documents on both sides are merged.
    pub fn to_document(&self) -> Document {
        let mut out = Document::new();
        for name in self.keys() {
            let value = match self.first.lookup(name) {
                Some(Value::Document(_)) | None => match self.get_document(name) {
                    Some(layer) => Value::Document(layer.to_document()),
                    None => match self.second.lookup(name) {
                        Some(value) => value.clone(),
                        None => continue,
                    },
                },
                Some(value) => value.clone(),
            };
            out.put(name, value);
        }
        out
    }
}

impl DocumentView for MergedDocument<'_> {
    fn get(&self, name: &str) -> Option<&Value> {
        self.lookup(name)
    }

    /// Number of distinct field names.
    fn len(&self) -> usize {
        self.keys().len()
    }

    fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty()
    }

    fn is_null(&self, name: &str) -> bool {
        self.first.is_null(name) && self.second.is_null(name)
    }

    fn is_null_or_missing(&self, name: &str) -> bool {
        self.first.is_null_or_missing(name) && self.second.is_null_or_missing(name)
    }

    fn get_document(&self, name: &str) -> Option<Cow<'_, Document>> {
        MergedDocument::get_document(self, name).map(DocumentLayer::into_cow)
    }
}

pub fn merge<'a>(first: &'a Document, second: &'a Document) -> MergedDocument<'a> {
    MergedDocument::new(first, second)
}

/// `merge(first, merge(second, third))`.
pub fn merge3<'a>(first: &'a Document, second: &'a Document, third: &'a Document) -> MergedDocument<'a> {
    MergedDocument::from_layers(
        DocumentLayer::Plain(first),
        DocumentLayer::Merged(Box::new(merge(second, third))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json;

    fn doc(text: &str) -> Document {
        json::from_str(text).unwrap()
    }

    #[test]
    fn first_layer_wins() {
        let a = doc("{ x: 1, y: null }");
        let b = doc("{ x: 2, z: 3 }");
        let m = merge(&a, &b);
        assert_eq!(m.get_integer("x"), Some(1));
        assert_eq!(m.get_integer("z"), Some(3));
        assert!(m.get("y").is_some_and(Value::is_null));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn null_checks_need_both_sides() {
        let a = doc("{ y: null, w: null }");
        let b = doc("{ y: 1 }");
        let m = merge(&a, &b);
        assert!(!m.is_null("y"));
        assert!(!m.is_null_or_missing("y"));
        assert!(m.is_null_or_missing("w"));
        assert!(m.is_null_or_missing("absent"));
        assert!(!m.is_empty());
        let empty = Document::new();
        assert!(merge(&empty, &empty).is_empty());
    }

    #[test]
    fn nested_documents_overlay_recursively() {
        let a = doc("{ n: { a: 1, deep: { p: 1 } } }");
        let b = doc("{ n: { a: 2, b: 2, deep: { q: 2 } } }");
        let m = merge(&a, &b);
        let n = m.get_document("n").unwrap();
        assert_eq!(n.get_integer("a"), Some(1));
        assert_eq!(n.get_integer("b"), Some(2));
        let deep = n.get_document("deep").unwrap();
        assert_eq!((deep.get_integer("p"), deep.get_integer("q")), (Some(1), Some(2)));
    }

    #[test]
    fn one_sided_documents_are_returned_as_is() {
        let a = doc("{ only: { k: 1 } }");
        let b = doc("{ }");
        let m = merge(&a, &b);
        assert!(matches!(m.get_document("only"), Some(DocumentLayer::Plain(_))));
    }

    #[test]
    fn trait_reads_see_the_nested_merge() {
        let a = doc("{ n: { a: 1 } }");
        let b = doc("{ n: { b: 2 }, p: { c: 3 } }");
        let m = merge(&a, &b);
        let n = DocumentView::get_document(&m, "n").unwrap();
        assert!(matches!(n, Cow::Owned(_)));
        assert_eq!((n.get_integer("a"), n.get_integer("b")), (Some(1), Some(2)));
        let p = DocumentView::get_document(&m, "p").unwrap();
        assert!(matches!(p, Cow::Borrowed(_)));
        assert_eq!(p.get_integer("c"), Some(3));
    }

    #[test]
    fn fields_repeat_shared_names() {
        let a = doc("{ x: 1 }");
        let b = doc("{ x: 2, y: 3 }");
        let names: Vec<_> = merge(&a, &b).fields().map(|f| f.name().to_string()).collect();
        assert_eq!(names, ["x", "x", "y"]);
    }

    #[test]
    fn three_way_precedence() {
        let a = doc("{ a: 1 }");
        let b = doc("{ a: 2, b: 2 }");
        let c = doc("{ a: 3, b: 3, c: 3, n: { k: 3 } }");
        let m = merge3(&a, &b, &c);
        assert_eq!(
            (m.get_integer("a"), m.get_integer("b"), m.get_integer("c")),
            (Some(1), Some(2), Some(3))
        );
        assert_eq!(m.to_document(), doc("{ a: 1, b: 2, c: 3, n: { k: 3 } }"));
    }

    #[test]
    fn to_document_merges_nested() {
        let a = doc("{ s: 'top', n: { a: 1 } }");
        let b = doc("{ n: { b: 2 }, s: { ignored: true } }");
        let merged = merge(&a, &b).to_document();
        assert_eq!(merged, doc("{ s: 'top', n: { a: 1, b: 2 } }"));
    }
}
