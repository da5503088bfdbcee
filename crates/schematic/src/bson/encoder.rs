//! Binary document encoder.
//!
//! One depth-first walk over the tree. Nested documents, arrays and
//! code-with-scope values reserve their 4-byte length prefix, write the body,
//! then backfill the prefix. All integers are little-endian except inside the
//! object id.
//!
//! Field names and regex text travel as zero-terminated strings, so a NUL
//! byte inside either fails the encode with [`BsonError::InteriorNul`].

use schematic_buffers::Writer;
use tracing::trace;

use super::BsonError;
use crate::document::{Array, Document};
use crate::value::{BinaryType, ObjectId, Value};

/// Encodes documents, arrays and bare values to bytes.
///
/// The encoder owns its output buffer and can be reused; each `encode_*`
/// call returns the finished bytes, or the error, and leaves the buffer
/// empty either way.
#[derive(Debug, Default)]
pub struct BsonEncoder {
    writer: Writer,
}

impl BsonEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode_document(&mut self, doc: &Document) -> Result<Vec<u8>, BsonError> {
        let written = self.write_document(doc);
        self.finish(written)
    }

    /// Encodes an array as a document whose field names are `"0"`, `"1"`, ...
    pub fn encode_array(&mut self, arr: &Array) -> Result<Vec<u8>, BsonError> {
        let written = self.write_array(arr);
        self.finish(written)
    }

    /// Encodes a single value as its tag byte followed by its payload.
    pub fn encode_value(&mut self, value: &Value) -> Result<Vec<u8>, BsonError> {
        self.writer.u8(value.type_tag());
        let written = self.write_payload(value);
        self.finish(written)
    }

    fn finish(&mut self, written: Result<(), BsonError>) -> Result<Vec<u8>, BsonError> {
        let bytes = self.writer.flush();
        written.map(|()| bytes)
    }

    fn write_document(&mut self, doc: &Document) -> Result<(), BsonError> {
        let slot = self.writer.reserve_len();
        for (name, value) in doc {
            self.write_element(name, value)?;
        }
        self.writer.u8(0);
        self.writer.backfill_len(slot);
        Ok(())
    }

    fn write_array(&mut self, arr: &Array) -> Result<(), BsonError> {
        let slot = self.writer.reserve_len();
        for (i, value) in arr.iter().enumerate() {
            self.write_element(&i.to_string(), value)?;
        }
        self.writer.u8(0);
        self.writer.backfill_len(slot);
        Ok(())
    }

    fn write_element(&mut self, name: &str, value: &Value) -> Result<(), BsonError> {
        trace!(field = name, kind = value.kind_name(), "write element");
        self.writer.u8(value.type_tag());
        self.writer.cstring(name)?;
        self.write_payload(value)
    }

    fn write_payload(&mut self, value: &Value) -> Result<(), BsonError> {
        match value {
            Value::Null | Value::MinKey | Value::MaxKey => {}
            Value::Boolean(b) => self.writer.u8(u8::from(*b)),
            Value::Int32(n) => self.writer.i32_le(*n),
            Value::Int64(n) => self.writer.i64_le(*n),
            Value::Double(d) => self.writer.f64_le(*d),
            Value::String(s) | Value::Symbol(s) => self.writer.string(s),
            Value::Binary(bin) => {
                self.writer.i32_le(bin.len() as i32);
                self.writer.u8(bin.subtype());
                self.writer.bytes(bin.bytes());
            }
            Value::Uuid(id) => {
                let bits = id.as_u128();
                self.writer.i32_le(16);
                self.writer.u8(BinaryType::UUID);
                self.writer.i64_le((bits >> 64) as i64);
                self.writer.i64_le(bits as i64);
            }
            Value::ObjectId(id) => self.write_object_id(id),
            Value::Date(date) => self.writer.i64_le(date.millis()),
            Value::Timestamp(ts) => {
                self.writer.i32_le(ts.inc());
                self.writer.i32_le(ts.time());
            }
            Value::Regex(re) => {
                self.writer.cstring(re.pattern())?;
                self.writer.cstring(&re.flag_string())?;
            }
            Value::Code(code) => self.writer.string(code.source()),
            Value::CodeWithScope(cws) => {
                let slot = self.writer.reserve_len();
                self.writer.string(cws.source());
                self.write_document(cws.scope())?;
                self.writer.backfill_len(slot);
            }
            Value::Document(doc) => return self.write_document(doc),
            Value::Array(arr) => return self.write_array(arr),
        }
        Ok(())
    }

    fn write_object_id(&mut self, id: &ObjectId) {
        self.writer.uint_be(id.time() as u32, 4);
        self.writer.uint_be(id.machine() as u32, 3);
        self.writer.uint_be(id.process() as u32, 2);
        self.writer.uint_be(id.inc() as u32, 3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bson::tag;
    use crate::value::Regex;

    #[test]
    fn empty_document() {
        let bytes = BsonEncoder::new().encode_document(&Document::new()).unwrap();
        assert_eq!(bytes, vec![5, 0, 0, 0, 0]);
    }

    #[test]
    fn int32_field() {
        let doc: Document = [("a", 1)].into_iter().collect();
        let bytes = BsonEncoder::new().encode_document(&doc).unwrap();
        assert_eq!(
            bytes,
            vec![12, 0, 0, 0, tag::INT32, b'a', 0, 1, 0, 0, 0, 0]
        );
    }

    #[test]
    fn object_id_is_big_endian() {
        let id = ObjectId::from_parts(0x01020304, 0x050607, 0x0809, 0x0a0b0c);
        let bytes = BsonEncoder::new().encode_value(&Value::ObjectId(id)).unwrap();
        assert_eq!(bytes, vec![tag::OBJECT_ID, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn code_with_scope_length_covers_whole_value() {
        let scope: Document = [("x", 1)].into_iter().collect();
        let cws = crate::value::CodeWithScope::new("x", scope);
        let bytes = BsonEncoder::new().encode_value(&Value::CodeWithScope(cws)).unwrap();
        let declared = i32::from_le_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
        assert_eq!(declared as usize, bytes.len() - 1);
    }

    #[test]
    fn encoder_is_reusable() {
        let mut enc = BsonEncoder::new();
        let doc: Document = [("a", "b")].into_iter().collect();
        let first = enc.encode_document(&doc).unwrap();
        let second = enc.encode_document(&doc).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn nul_in_names_and_regex_is_rejected() {
        let mut enc = BsonEncoder::new();
        let bad_name: Document = [("a\0b", 1)].into_iter().collect();
        assert!(matches!(enc.encode_document(&bad_name), Err(BsonError::InteriorNul)));

        let mut nested = Document::new();
        nested.put("ok", Value::Document(bad_name));
        assert!(matches!(enc.encode_document(&nested), Err(BsonError::InteriorNul)));

        let pattern = Value::Regex(Regex::with_flag_str("a\0b", "i"));
        assert!(matches!(enc.encode_value(&pattern), Err(BsonError::InteriorNul)));

        // A failed encode leaves nothing behind for the next call.
        let good: Document = [("a", 1)].into_iter().collect();
        assert_eq!(enc.encode_document(&good).unwrap().len(), 12);
    }

    #[test]
    fn nul_in_string_values_is_kept() {
        let doc: Document = [("s", "a\0b")].into_iter().collect();
        let bytes = BsonEncoder::new().encode_document(&doc).unwrap();
        assert_eq!(crate::bson::decode_document(&bytes).unwrap(), doc);
    }
}
