//! The closed set of value kinds a document can hold.
//!
//! Every kind is a variant of [`Value`], so codecs and writers dispatch with
//! an exhaustive `match`. Scalars are immutable; strings and blobs sit behind
//! `Arc`, so cloning a document shares them and only copies the nested
//! containers.
//!
//! Equality is structural with a few deliberate widenings:
//!
//! - `Int32`, `Int64` and `Double` compare by numeric value, so
//!   `Int32(3) == Int64(3) == Double(3.0)`. `NaN` equals `NaN`.
//! - `Symbol` and `String` compare by text.
//! - Documents compare field sets, ignoring insertion order.
//!
//! `Hash` agrees with all of the above.

mod binary;
mod code;
mod error;
mod object_id;
mod pattern;
mod sentinel;
mod time;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use uuid::Uuid;

pub use binary::{Binary, BinaryType};
pub use code::{Code, CodeWithScope};
pub use error::ValueError;
pub use object_id::ObjectId;
pub use pattern::{Regex, RegexFlags};
pub use sentinel::{MaxKey, MinKey, Null};
pub use time::{Date, Timestamp};

use crate::bson::tag;
use crate::document::{Array, Document};

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(Arc<str>),
    Symbol(Arc<str>),
    Binary(Binary),
    ObjectId(ObjectId),
    Date(Date),
    Timestamp(Timestamp),
    Regex(Regex),
    Code(Code),
    CodeWithScope(CodeWithScope),
    Uuid(Uuid),
    MinKey,
    MaxKey,
    Document(Document),
    Array(Array),
}

impl Value {
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn symbol(s: impl Into<Arc<str>>) -> Self {
        Value::Symbol(s.into())
    }

    /// Binary element tag this value is written with.
    pub fn type_tag(&self) -> u8 {
        match self {
            Value::Null => tag::NULL,
            Value::Boolean(_) => tag::BOOLEAN,
            Value::Int32(_) => tag::INT32,
            Value::Int64(_) => tag::INT64,
            Value::Double(_) => tag::DOUBLE,
            Value::String(_) => tag::STRING,
            Value::Symbol(_) => tag::SYMBOL,
            Value::Binary(_) | Value::Uuid(_) => tag::BINARY,
            Value::ObjectId(_) => tag::OBJECT_ID,
            Value::Date(_) => tag::DATE_TIME,
            Value::Timestamp(_) => tag::TIMESTAMP,
            Value::Regex(_) => tag::REGEX,
            Value::Code(_) => tag::CODE,
            Value::CodeWithScope(_) => tag::CODE_WITH_SCOPE,
            Value::MinKey => tag::MIN_KEY,
            Value::MaxKey => tag::MAX_KEY,
            Value::Document(_) => tag::DOCUMENT,
            Value::Array(_) => tag::ARRAY,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Binary(_) => "binary",
            Value::ObjectId(_) => "objectId",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::Regex(_) => "regex",
            Value::Code(_) => "code",
            Value::CodeWithScope(_) => "codeWithScope",
            Value::Uuid(_) => "uuid",
            Value::MinKey => "minKey",
            Value::MaxKey => "maxKey",
            Value::Document(_) => "document",
            Value::Array(_) => "array",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int32(_) | Value::Int64(_) | Value::Double(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Value::Document(_) | Value::Array(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(n) => Some(*n),
            _ => None,
        }
    }

    /// `Int64`, or an `Int32` widened.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int32(n) => Some(i64::from(*n)),
            Value::Int64(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Any numeric variant as a double.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int32(n) => Some(f64::from(*n)),
            Value::Int64(n) => Some(*n as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Text of a `String` or `Symbol`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match self {
            Value::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&Binary> {
        match self {
            Value::Binary(bin) => Some(bin),
            _ => None,
        }
    }

    pub fn as_object_id(&self) -> Option<ObjectId> {
        match self {
            Value::ObjectId(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<Date> {
        match self {
            Value::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_regex(&self) -> Option<&Regex> {
        match self {
            Value::Regex(re) => Some(re),
            _ => None,
        }
    }

    /// Plain code, or the code half of a code-with-scope.
    pub fn as_code(&self) -> Option<&Code> {
        match self {
            Value::Code(code) => Some(code),
            Value::CodeWithScope(cws) => Some(cws.code()),
            _ => None,
        }
    }

    pub fn as_code_with_scope(&self) -> Option<&CodeWithScope> {
        match self {
            Value::CodeWithScope(cws) => Some(cws),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Value::Uuid(id) => Some(*id),
            _ => None,
        }
    }
}

/// Integral doubles inside the `i64` range collapse onto the integer they
/// represent; everything else keeps its bit pattern.
fn integral(d: f64) -> Option<i64> {
    if d.fract() == 0.0 && d >= i64::MIN as f64 && d < i64::MAX as f64 {
        Some(d as i64)
    } else {
        None
    }
}

fn numbers_eq(a: &Value, b: &Value) -> Option<bool> {
    use Value as V;
    let eq = match (a, b) {
        (V::Int32(x), V::Int32(y)) => x == y,
        (V::Int32(x), V::Int64(y)) | (V::Int64(y), V::Int32(x)) => i64::from(*x) == *y,
        (V::Int64(x), V::Int64(y)) => x == y,
        (V::Int32(x), V::Double(d)) | (V::Double(d), V::Int32(x)) => f64::from(*x) == *d,
        (V::Int64(x), V::Double(d)) | (V::Double(d), V::Int64(x)) => integral(*d) == Some(*x),
        (V::Double(x), V::Double(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => return None,
    };
    Some(eq)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value as V;
        if let Some(eq) = numbers_eq(self, other) {
            return eq;
        }
        match (self, other) {
            (V::Null, V::Null) | (V::MinKey, V::MinKey) | (V::MaxKey, V::MaxKey) => true,
            (V::Boolean(a), V::Boolean(b)) => a == b,
            (V::String(a) | V::Symbol(a), V::String(b) | V::Symbol(b)) => a == b,
            (V::Binary(a), V::Binary(b)) => a == b,
            (V::ObjectId(a), V::ObjectId(b)) => a == b,
            (V::Date(a), V::Date(b)) => a == b,
            (V::Timestamp(a), V::Timestamp(b)) => a == b,
            (V::Regex(a), V::Regex(b)) => a == b,
            (V::Code(a), V::Code(b)) => a == b,
            (V::CodeWithScope(a), V::CodeWithScope(b)) => a == b,
            (V::Uuid(a), V::Uuid(b)) => a == b,
            (V::Document(a), V::Document(b)) => a == b,
            (V::Array(a), V::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Int32(n) => {
                state.write_u8(tag::INT64);
                i64::from(*n).hash(state);
            }
            Value::Int64(n) => {
                state.write_u8(tag::INT64);
                n.hash(state);
            }
            Value::Double(d) => match integral(*d) {
                Some(n) => {
                    state.write_u8(tag::INT64);
                    n.hash(state);
                }
                None if d.is_nan() => {
                    state.write_u8(tag::DOUBLE);
                    f64::NAN.to_bits().hash(state);
                }
                None => {
                    state.write_u8(tag::DOUBLE);
                    d.to_bits().hash(state);
                }
            },
            Value::String(s) | Value::Symbol(s) => {
                state.write_u8(tag::STRING);
                s.hash(state);
            }
            other => {
                state.write_u8(other.type_tag());
                match other {
                    Value::Boolean(b) => b.hash(state),
                    Value::Binary(bin) => bin.hash(state),
                    Value::ObjectId(id) => id.hash(state),
                    Value::Date(date) => date.hash(state),
                    Value::Timestamp(ts) => ts.hash(state),
                    Value::Regex(re) => re.hash(state),
                    Value::Code(code) => code.hash(state),
                    Value::CodeWithScope(cws) => cws.hash(state),
                    Value::Uuid(id) => id.hash(state),
                    Value::Document(doc) => doc.hash(state),
                    Value::Array(arr) => arr.hash(state),
                    _ => {}
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::json::to_string(self))
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v.into())
                }
            }
        )*
    };
}

impl_from! {
    bool => Boolean,
    i32 => Int32,
    i64 => Int64,
    f64 => Double,
    &str => String,
    String => String,
    Arc<str> => String,
    Binary => Binary,
    ObjectId => ObjectId,
    Date => Date,
    Timestamp => Timestamp,
    Regex => Regex,
    Code => Code,
    CodeWithScope => CodeWithScope,
    Uuid => Uuid,
    Document => Document,
    Array => Array,
}

impl From<Null> for Value {
    fn from(_: Null) -> Self {
        Value::Null
    }
}

impl From<MinKey> for Value {
    fn from(_: MinKey) -> Self {
        Value::MinKey
    }
}

impl From<MaxKey> for Value {
    fn from(_: MaxKey) -> Self {
        Value::MaxKey
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}
