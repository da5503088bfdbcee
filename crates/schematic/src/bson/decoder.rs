//! Binary document decoder.
//!
//! A single forward pass: read the declared length, then tag, name and
//! payload repeatedly until the terminator, which must sit exactly at the
//! declared end. Deprecated element kinds are consumed and dropped.
//!
//! Binary of subtype 3 with a 16-byte body always decodes as
//! [`Value::Uuid`], whether it was written from a uuid or from plain binary,
//! so legacy-uuid binary does not come back as [`Value::Binary`].

use schematic_buffers::Reader;
use tracing::{debug, trace};
use uuid::Uuid;

use super::error::BsonError;
use super::tag;
use crate::document::{Array, Document};
use crate::value::{
    Binary, BinaryType, Code, CodeWithScope, Date, ObjectId, Regex, RegexFlags, Timestamp, Value,
};

/// Decoder limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BsonDecoderOptions {
    /// Upper bound on any declared document length, in bytes.
    pub max_document_size: usize,
    /// Deepest allowed nesting of documents, arrays and scopes. The
    /// outermost document is level 1.
    pub max_depth: usize,
}

impl BsonDecoderOptions {
    pub const DEFAULT_MAX_DOCUMENT_SIZE: usize = 16 * 1024 * 1024 * 16;
    pub const DEFAULT_MAX_DEPTH: usize = 256;
}

impl Default for BsonDecoderOptions {
    fn default() -> Self {
        Self {
            max_document_size: Self::DEFAULT_MAX_DOCUMENT_SIZE,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Decodes one buffer. Create a fresh decoder per input.
pub struct BsonDecoder<'a> {
    reader: Reader<'a>,
    options: BsonDecoderOptions,
    depth: usize,
}

impl<'a> BsonDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_options(data, BsonDecoderOptions::default())
    }

    pub fn with_options(data: &'a [u8], options: BsonDecoderOptions) -> Self {
        Self {
            reader: Reader::new(data),
            options,
            depth: 0,
        }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    /// Decodes one document. See the module docs for how subtype 3 binary
    /// reads back.
    pub fn decode_document(&mut self) -> Result<Document, BsonError> {
        let mut doc = Document::new();
        self.read_elements(|name, value| {
            doc.put(name, value);
        })?;
        Ok(doc)
    }

    /// Decodes an array body. Element names are not checked; values are kept
    /// in the order they appear.
    pub fn decode_array(&mut self) -> Result<Array, BsonError> {
        let mut arr = Array::new();
        self.read_elements(|_, value| arr.push(value))?;
        Ok(arr)
    }

    /// Decodes a bare value: one tag byte and its payload. A deprecated tag
    /// decodes as null.
    pub fn decode_value(&mut self) -> Result<Value, BsonError> {
        let element_type = self.reader.u8()?;
        Ok(self.read_payload(element_type)?.unwrap_or(Value::Null))
    }

    fn read_elements(&mut self, sink: impl FnMut(String, Value)) -> Result<(), BsonError> {
        if self.depth >= self.options.max_depth {
            return Err(BsonError::TooDeep(self.options.max_depth));
        }
        self.depth += 1;
        let result = self.read_element_list(sink);
        self.depth -= 1;
        result
    }

    fn read_element_list(&mut self, mut sink: impl FnMut(String, Value)) -> Result<(), BsonError> {
        let start = self.reader.position();
        let declared = self.reader.i32_le()?;
        if declared < 5 || declared as usize > self.options.max_document_size {
            return Err(BsonError::InvalidLength(i64::from(declared)));
        }
        let end = start + declared as usize;
        if end > start + 4 + self.reader.remaining() {
            return Err(BsonError::UnexpectedEof);
        }
        loop {
            let element_type = self.reader.u8()?;
            if element_type == 0 {
                break;
            }
            // The last declared byte has to be the terminator.
            if self.reader.position() >= end {
                return Err(BsonError::InvalidLength(i64::from(declared)));
            }
            let name = self.reader.cstring()?.to_string();
            trace!(field = name.as_str(), element_type, "read element");
            if let Some(value) = self.read_payload(element_type)? {
                sink(name, value);
            }
        }
        if self.reader.position() != end {
            return Err(BsonError::InvalidLength(i64::from(declared)));
        }
        Ok(())
    }

    fn read_payload(&mut self, element_type: u8) -> Result<Option<Value>, BsonError> {
        let value = match element_type {
            tag::DOUBLE => Value::Double(self.reader.f64_le()?),
            tag::STRING => Value::string(self.read_string()?),
            tag::DOCUMENT => Value::Document(self.decode_document()?),
            tag::ARRAY => Value::Array(self.decode_array()?),
            tag::BINARY => self.read_binary()?,
            tag::OBJECT_ID => Value::ObjectId(self.read_object_id()?),
            tag::BOOLEAN => Value::Boolean(self.reader.u8()? != 0),
            tag::DATE_TIME => Value::Date(Date::from_millis(self.reader.i64_le()?)),
            tag::NULL => Value::Null,
            tag::REGEX => {
                let pattern = self.reader.cstring()?;
                let flags = self.reader.cstring()?;
                Value::Regex(Regex::new(pattern, RegexFlags::parse(flags)))
            }
            tag::CODE => Value::Code(Code::new(self.read_string()?)),
            tag::SYMBOL => Value::symbol(self.read_string()?),
            tag::CODE_WITH_SCOPE => {
                let start = self.reader.position();
                let total = self.reader.i32_le()?;
                let source = self.read_string()?;
                let scope = self.decode_document()?;
                if i64::try_from(self.reader.position() - start).ok() != Some(i64::from(total)) {
                    return Err(BsonError::InvalidLength(i64::from(total)));
                }
                Value::CodeWithScope(CodeWithScope::new(source, scope))
            }
            tag::INT32 => Value::Int32(self.reader.i32_le()?),
            tag::TIMESTAMP => {
                let inc = self.reader.i32_le()?;
                let time = self.reader.i32_le()?;
                Value::Timestamp(Timestamp::new(time, inc))
            }
            tag::INT64 => Value::Int64(self.reader.i64_le()?),
            tag::MIN_KEY => Value::MinKey,
            tag::MAX_KEY => Value::MaxKey,
            tag::UNDEFINED => {
                debug!("skipping deprecated undefined element");
                return Ok(None);
            }
            tag::DB_POINTER => {
                let _namespace = self.read_string()?;
                self.reader.skip(12)?;
                debug!("skipping deprecated db-pointer element");
                return Ok(None);
            }
            tag::DECIMAL128 => {
                self.reader.skip(16)?;
                debug!("skipping decimal128 element");
                return Ok(None);
            }
            other => return Err(BsonError::UnsupportedType(other)),
        };
        Ok(Some(value))
    }

    fn read_string(&mut self) -> Result<&'a str, BsonError> {
        let len = self.reader.i32_le()?;
        if len < 1 {
            return Err(BsonError::InvalidLength(i64::from(len)));
        }
        let s = self.reader.utf8(len as usize - 1)?;
        if self.reader.u8()? != 0 {
            return Err(BsonError::InvalidLength(i64::from(len)));
        }
        Ok(s)
    }

    /// Subtype 3 with exactly 16 bytes becomes a uuid; everything else stays
    /// binary.
    fn read_binary(&mut self) -> Result<Value, BsonError> {
        let len = self.reader.i32_le()?;
        if len < 0 {
            return Err(BsonError::InvalidLength(i64::from(len)));
        }
        let subtype = self.reader.u8()?;
        if subtype == BinaryType::UUID && len == 16 {
            let msb = self.reader.i64_le()? as u64;
            let lsb = self.reader.i64_le()? as u64;
            let bits = (u128::from(msb) << 64) | u128::from(lsb);
            return Ok(Value::Uuid(Uuid::from_u128(bits)));
        }
        let bytes = self.reader.buf(len as usize)?;
        Ok(Value::Binary(Binary::new(subtype, bytes)))
    }

    fn read_object_id(&mut self) -> Result<ObjectId, BsonError> {
        let time = self.reader.uint_be(4)? as i32;
        let machine = self.reader.uint_be(3)? as i32;
        let process = self.reader.uint_be(2)? as i32;
        let inc = self.reader.uint_be(3)? as i32;
        Ok(ObjectId::from_parts(time, machine, process, inc))
    }
}
