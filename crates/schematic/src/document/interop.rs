//! Conversions to and from `serde_json::Value`.
//!
//! Plain JSON maps onto the value union losslessly. Going the other way,
//! extended kinds become their `$`-field encodings and non-finite doubles
//! become `null`, since JSON has no spelling for them.

use serde_json::{Map, Number, Value as Json};

use super::{Array, Document};
use crate::json::reserved;
use crate::value::Value;

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(b),
            Json::Number(n) => number_value(&n),
            Json::String(s) => Value::string(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Document(map.into_iter().collect()),
        }
    }
}

fn number_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        return match i32::try_from(i) {
            Ok(small) => Value::Int32(small),
            Err(_) => Value::Int64(i),
        };
    }
    Value::Double(n.as_f64().unwrap_or(f64::NAN))
}

impl From<Json> for Document {
    /// Non-object JSON lands under a single `"value"` field.
    fn from(json: Json) -> Self {
        match json {
            Json::Object(map) => map.into_iter().collect(),
            other => [("value", Value::from(other))].into_iter().collect(),
        }
    }
}

impl Value {
    pub fn to_json_value(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Boolean(b) => Json::Bool(*b),
            Value::Int32(n) => Json::from(*n),
            Value::Int64(n) => Json::from(*n),
            Value::Double(d) => Number::from_f64(*d).map_or(Json::Null, Json::Number),
            Value::String(s) | Value::Symbol(s) => Json::String(s.to_string()),
            Value::MinKey => Json::String("MinKey".into()),
            Value::MaxKey => Json::String("MaxKey".into()),
            Value::Document(doc) => doc.to_json_value(),
            Value::Array(arr) => arr.to_json_value(),
            extended => match reserved::encode(extended) {
                Some(doc) => doc.to_json_value(),
                None => Json::Null,
            },
        }
    }
}

impl Document {
    pub fn to_json_value(&self) -> Json {
        let map: Map<String, Json> = self
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json_value()))
            .collect();
        Json::Object(map)
    }
}

impl Array {
    pub fn to_json_value(&self) -> Json {
        Json::Array(self.iter().map(Value::to_json_value).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentView;
    use crate::value::ObjectId;
    use serde_json::json;

    #[test]
    fn from_plain_json() {
        let doc = Document::from(json!({"a": 1, "b": [true, null], "c": 5_000_000_000i64, "d": 1.5}));
        assert_eq!(doc.get_integer("a"), Some(1));
        assert_eq!(doc.get_array("b").map(|a| a.len()), Some(2));
        assert_eq!(doc.get("c"), Some(&Value::Int64(5_000_000_000)));
        assert_eq!(doc.get_double("d"), Some(1.5));
        assert_eq!(doc.keys().collect::<Vec<_>>(), ["a", "b", "c", "d"]);
    }

    #[test]
    fn extended_kinds_use_reserved_fields() {
        let id = ObjectId::from_hex("4e2064df0000010002000003").unwrap();
        let doc: Document = [("_id", Value::ObjectId(id)), ("nan", Value::Double(f64::NAN))]
            .into_iter()
            .collect();
        assert_eq!(
            doc.to_json_value(),
            json!({"_id": {"$oid": "4e2064df0000010002000003"}, "nan": null})
        );
    }
}
