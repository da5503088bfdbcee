//! Binary wire codec.
//!
//! ```text
//! document := i32(total_len) element* 0x00
//! element  := u8(tag) cstring(name) payload
//! string   := i32(byte_len + 1) utf8 0x00
//! ```
//!
//! Every call builds its own encoder or decoder state, so the entry points
//! here can be used from any number of threads at once.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod tag;

use std::io::{Read, Write};

pub use decoder::{BsonDecoder, BsonDecoderOptions};
pub use encoder::BsonEncoder;
pub use error::BsonError;

use crate::document::{Array, Document};
use crate::value::Value;

/// Fails only when a field name or regex holds a NUL byte.
pub fn encode_document(doc: &Document) -> Result<Vec<u8>, BsonError> {
    BsonEncoder::new().encode_document(doc)
}

pub fn encode_array(arr: &Array) -> Result<Vec<u8>, BsonError> {
    BsonEncoder::new().encode_array(arr)
}

pub fn encode_value(value: &Value) -> Result<Vec<u8>, BsonError> {
    BsonEncoder::new().encode_value(value)
}

pub fn decode_document(data: &[u8]) -> Result<Document, BsonError> {
    BsonDecoder::new(data).decode_document()
}

pub fn decode_array(data: &[u8]) -> Result<Array, BsonError> {
    BsonDecoder::new(data).decode_array()
}

pub fn decode_value(data: &[u8]) -> Result<Value, BsonError> {
    BsonDecoder::new(data).decode_value()
}

/// Writes one encoded document to `out`. Nothing is written when encoding
/// fails.
pub fn write_document<W: Write + ?Sized>(doc: &Document, out: &mut W) -> Result<(), BsonError> {
    out.write_all(&encode_document(doc)?)?;
    Ok(())
}

pub fn write_array<W: Write + ?Sized>(arr: &Array, out: &mut W) -> Result<(), BsonError> {
    out.write_all(&encode_array(arr)?)?;
    Ok(())
}

/// Reads exactly one document from `input`: the length prefix, then that
/// many bytes. Input after the document is left unread.
pub fn read_document<R: Read + ?Sized>(input: &mut R) -> Result<Document, BsonError> {
    read_document_with(input, BsonDecoderOptions::default())
}

pub fn read_document_with<R: Read + ?Sized>(
    input: &mut R,
    options: BsonDecoderOptions,
) -> Result<Document, BsonError> {
    let data = read_frame(input, options)?;
    BsonDecoder::with_options(&data, options).decode_document()
}

pub fn read_array<R: Read + ?Sized>(input: &mut R) -> Result<Array, BsonError> {
    let options = BsonDecoderOptions::default();
    let data = read_frame(input, options)?;
    BsonDecoder::with_options(&data, options).decode_array()
}

fn read_frame<R: Read + ?Sized>(
    input: &mut R,
    options: BsonDecoderOptions,
) -> Result<Vec<u8>, BsonError> {
    let mut prefix = [0u8; 4];
    input.read_exact(&mut prefix)?;
    let declared = i32::from_le_bytes(prefix);
    if declared < 5 || declared as usize > options.max_document_size {
        return Err(BsonError::InvalidLength(i64::from(declared)));
    }
    let mut data = vec![0u8; declared as usize];
    data[..4].copy_from_slice(&prefix);
    input.read_exact(&mut data[4..])?;
    Ok(data)
}
