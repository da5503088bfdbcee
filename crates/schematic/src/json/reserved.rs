//! `$`-prefixed field encodings for value kinds JSON cannot spell.
//!
//! | shape                                 | value            |
//! |---------------------------------------|------------------|
//! | `{"$oid": "<24 hex>"}`                | object id        |
//! | `{"$date": "<ISO-8601>" \| millis}`   | date             |
//! | `{"$ts": n, "$inc": n}`               | timestamp        |
//! | `{"$regex": "p"[, "$options": "f"]}`  | regex            |
//! | `{"$type": n, "$base64": "data"}`     | binary           |
//! | `{"$uuid": "<uuid>"}`                 | unique id        |
//! | `{"$code": "src"[, "$scope": {..}]}`  | code             |
//!
//! Shapes match on the exact field count and names. Anything else stays a
//! plain document.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;
use uuid::Uuid;

use crate::document::{Document, DocumentView};
use crate::value::{
    Binary, Code, CodeWithScope, Date, ObjectId, Regex, RegexFlags, Timestamp, Value,
};

pub const OBJECT_ID: &str = "$oid";
pub const DATE: &str = "$date";
pub const TIMESTAMP: &str = "$ts";
pub const INCREMENT: &str = "$inc";
pub const REGEX_PATTERN: &str = "$regex";
pub const REGEX_OPTIONS: &str = "$options";
pub const BINARY_TYPE: &str = "$type";
pub const BASE_64: &str = "$base64";
pub const UUID: &str = "$uuid";
pub const CODE: &str = "$code";
pub const SCOPE: &str = "$scope";

pub fn is_reserved_name(name: &str) -> bool {
    name.starts_with('$')
}

/// Reinterprets a parsed document as an extended value when its fields form
/// one of the reserved shapes.
pub fn decode(doc: Document) -> Value {
    match decode_shape(&doc) {
        Some(value) => value,
        None => {
            debug!(fields = doc.len(), "reserved field names without a matching shape");
            Value::Document(doc)
        }
    }
}

fn decode_shape(doc: &Document) -> Option<Value> {
    let has = |a: &str, b: &str| doc.contains_field(a) && doc.contains_field(b);
    match doc.len() {
        1 => {
            if let Some(hex) = doc.get_string(OBJECT_ID) {
                return ObjectId::from_hex(hex).ok().map(Value::ObjectId);
            }
            if let Some(value) = doc.get(DATE) {
                return date(value).map(Value::Date);
            }
            if let Some(pattern) = doc.get_string(REGEX_PATTERN) {
                return Some(Value::Regex(Regex::new(pattern, RegexFlags::NONE)));
            }
            if let Some(text) = doc.get_string(UUID) {
                return Uuid::parse_str(text).ok().map(Value::Uuid);
            }
            if let Some(source) = doc.get_string(CODE) {
                return Some(Value::Code(Code::new(source)));
            }
            None
        }
        2 => {
            if has(TIMESTAMP, INCREMENT) {
                let time = doc.get_integer(TIMESTAMP)?;
                let inc = doc.get_integer(INCREMENT)?;
                return Some(Value::Timestamp(Timestamp::new(time, inc)));
            }
            if has(REGEX_PATTERN, REGEX_OPTIONS) {
                let pattern = doc.get_string(REGEX_PATTERN)?;
                let options = doc.get_string(REGEX_OPTIONS)?;
                return Some(Value::Regex(Regex::with_flag_str(pattern, options)));
            }
            if has(CODE, SCOPE) {
                let source = doc.get_string(CODE)?;
                // A scope that is not a document is dropped.
                return Some(match doc.get_document(SCOPE) {
                    Some(scope) => Value::CodeWithScope(CodeWithScope::new(source, scope.clone())),
                    None => Value::Code(Code::new(source)),
                });
            }
            if has(BINARY_TYPE, BASE_64) {
                let subtype = binary_subtype(doc.get(BINARY_TYPE)?)?;
                let bytes = STANDARD.decode(doc.get_string(BASE_64)?).ok()?;
                return Some(Value::Binary(Binary::new(subtype, bytes)));
            }
            None
        }
        _ => None,
    }
}

fn date(value: &Value) -> Option<Date> {
    match value {
        Value::Date(d) => Some(*d),
        Value::Int32(_) | Value::Int64(_) => value.as_i64().map(Date::from_millis),
        Value::String(text) => Date::parse_iso(text)
            .ok()
            .or_else(|| text.trim().parse::<i64>().ok().map(Date::from_millis)),
        _ => None,
    }
}

/// Integer subtype, or its hexadecimal text form (`"0"`, `"05"`, `"80"`).
fn binary_subtype(value: &Value) -> Option<u8> {
    match value {
        Value::Int32(n) => u8::try_from(*n).ok(),
        Value::String(text) => u8::from_str_radix(text, 16).ok(),
        _ => None,
    }
}

/// Reserved-field document for extended kinds; `None` for kinds JSON
/// already spells.
pub fn encode(value: &Value) -> Option<Document> {
    let doc: Document = match value {
        Value::ObjectId(id) => [(OBJECT_ID, Value::string(id.to_hex()))].into_iter().collect(),
        Value::Date(date) => {
            let v = match date.to_iso() {
                Some(iso) => Value::string(iso),
                None => Value::Int64(date.millis()),
            };
            [(DATE, v)].into_iter().collect()
        }
        Value::Timestamp(ts) => [
            (TIMESTAMP, Value::Int32(ts.time())),
            (INCREMENT, Value::Int32(ts.inc())),
        ]
        .into_iter()
        .collect(),
        Value::Regex(re) if re.flags().is_empty() => {
            [(REGEX_PATTERN, Value::string(re.pattern()))].into_iter().collect()
        }
        Value::Regex(re) => [
            (REGEX_PATTERN, Value::string(re.pattern())),
            (REGEX_OPTIONS, Value::string(re.flag_string())),
        ]
        .into_iter()
        .collect(),
        Value::Binary(bin) => [
            (BINARY_TYPE, Value::Int32(i32::from(bin.subtype()))),
            (BASE_64, Value::string(bin.to_base64())),
        ]
        .into_iter()
        .collect(),
        Value::Uuid(id) => [(UUID, Value::string(id.hyphenated().to_string()))]
            .into_iter()
            .collect(),
        Value::Code(code) => [(CODE, Value::string(code.source()))].into_iter().collect(),
        Value::CodeWithScope(cws) => [
            (CODE, Value::string(cws.source())),
            (SCOPE, Value::Document(cws.scope().clone())),
        ]
        .into_iter()
        .collect(),
        _ => return None,
    };
    Some(doc)
}
