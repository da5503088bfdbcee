#![allow(dead_code)]

use proptest::prelude::*;
use schematic::{
    Array, Binary, Code, CodeWithScope, Date, Document, ObjectId, Regex, Timestamp, Value,
};
use uuid::Uuid;

pub fn doc(text: &str) -> Document {
    schematic::json::from_str(text).unwrap_or_else(|e| panic!("bad fixture {text:?}: {e}"))
}

/// Plain names, for tests that build paths from them.
pub fn field_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

/// Any name both codecs carry: no NUL byte, and no leading `$` so the text
/// reader never sees a reserved shape.
pub fn wide_field_name() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => field_name(),
        1 => "[^$\\x00][^\\x00]{0,7}",
    ]
}

/// Arbitrary text, including quotes, escapes, control characters, NUL and
/// characters outside the basic plane.
fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9 ]{0,12}",
        any::<String>(),
        "[\"\\\\\\x00-\\x1f\u{7f}\u{2028}\u{1F600}\u{10FFFF}a]{0,8}",
    ]
}

fn double() -> impl Strategy<Value = f64> {
    prop_oneof![
        4 => any::<f64>(),
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(f64::NEG_INFINITY),
        1 => Just(-0.0),
    ]
}

/// Millis across the ISO-representable range and beyond it, where the text
/// form falls back to a plain number.
fn date() -> impl Strategy<Value = Date> {
    prop_oneof![
        (-62_135_596_800_000i64..253_402_300_799_999).prop_map(Date::from_millis),
        any::<i64>().prop_map(Date::from_millis),
    ]
}

/// Scalars that survive both the binary and the text form. Subtype 3 binary
/// is left out: the binary reader turns 16-byte subtype 3 into a uuid.
pub fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Boolean),
        any::<i32>().prop_map(Value::Int32),
        any::<i64>().prop_map(Value::Int64),
        double().prop_map(Value::Double),
        text().prop_map(Value::string),
        text().prop_map(Value::symbol),
        date().prop_map(Value::Date),
        (any::<i32>(), any::<i32>()).prop_map(|(t, i)| Value::Timestamp(Timestamp::new(t, i))),
        any::<[u8; 12]>().prop_map(|b| Value::ObjectId(ObjectId::from_bytes(b))),
        (any::<u8>().prop_filter("legacy uuid subtype", |t| *t != 3),
            proptest::collection::vec(any::<u8>(), 0..16))
            .prop_map(|(t, b)| Value::Binary(Binary::new(t, b))),
        any::<u128>().prop_map(|n| Value::Uuid(Uuid::from_u128(n))),
        ("[^\\x00]{0,6}", "[imsx]{0,3}")
            .prop_map(|(p, f)| Value::Regex(Regex::with_flag_str(p, &f))),
        text().prop_map(|s| Value::Code(Code::new(s))),
        (text(), proptest::collection::vec((field_name(), any::<i32>()), 0..3)).prop_map(
            |(s, vars)| {
                let scope: Document = vars.into_iter().collect();
                Value::CodeWithScope(CodeWithScope::new(s, scope))
            }
        ),
        Just(Value::MinKey),
        Just(Value::MaxKey),
    ]
}

pub fn value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4)
                .prop_map(|items| Value::Array(items.into_iter().collect::<Array>())),
            proptest::collection::vec((wide_field_name(), inner), 0..4)
                .prop_map(|fields| Value::Document(fields.into_iter().collect())),
        ]
    })
}

pub fn document() -> impl Strategy<Value = Document> {
    proptest::collection::vec((wide_field_name(), value()), 0..6)
        .prop_map(|fields| fields.into_iter().collect())
}
