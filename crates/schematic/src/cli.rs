//! Logic behind the `doc-pack` and `doc-unpack` binaries.
//!
//! - `doc-pack`:   lenient JSON text → binary documents
//! - `doc-unpack`: binary documents → JSON text

use std::io::Cursor;

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::bson::{self, BsonError};
use crate::json::{JsonReader, JsonWriter, JsonWriterOptions, ParseError};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid JSON input: {0}")]
    Parse(#[from] ParseError),
    #[error("invalid binary input: {0}")]
    Binary(#[from] BsonError),
}

// ── Logging ───────────────────────────────────────────────────────────────

/// Installs a stderr subscriber. `RUST_LOG` wins over `verbose`; otherwise
/// the level is `debug` when verbose and `warn` when not.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

// ── doc-pack ──────────────────────────────────────────────────────────────

/// Encodes every document in `text` and concatenates the binary forms.
pub fn pack(text: &str) -> Result<Vec<u8>, CliError> {
    let mut out = Vec::new();
    for doc in JsonReader::default().read_multiple(text) {
        let doc = doc?;
        out.extend_from_slice(&bson::encode_document(&doc)?);
    }
    debug!(bytes = out.len(), "packed input");
    Ok(out)
}

// ── doc-unpack ────────────────────────────────────────────────────────────

/// Decodes concatenated binary documents, one text document per line.
pub fn unpack(bytes: &[u8], pretty: bool) -> Result<String, CliError> {
    let options = if pretty {
        JsonWriterOptions::pretty()
    } else {
        JsonWriterOptions::compact()
    };
    let mut writer = JsonWriter::new(options);
    let mut input = Cursor::new(bytes);
    let mut out = String::new();
    let mut count = 0usize;
    while (input.position() as usize) < bytes.len() {
        let doc = bson::read_document(&mut input)?;
        out.push_str(&writer.write_document(&doc));
        out.push('\n');
        count += 1;
    }
    debug!(documents = count, "unpacked input");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_then_unpack() {
        let bytes = pack("{ a: 1 }\n{ b: [true, null] }").unwrap();
        let text = unpack(&bytes, false).unwrap();
        assert_eq!(text, "{\"a\":1}\n{\"b\":[true,null]}\n");
    }

    #[test]
    fn pretty_unpack() {
        let bytes = pack("{ a: 1 }").unwrap();
        assert_eq!(unpack(&bytes, true).unwrap(), "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn errors_are_reported() {
        assert!(matches!(pack("{ a: "), Err(CliError::Parse(_))));
        assert!(matches!(unpack(&[9, 0, 0], false), Err(CliError::Binary(_))));
    }
}
