//! Errors raised while constructing values from text or raw parts.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("invalid object id \"{0}\": expected 24 hexadecimal characters")]
    InvalidObjectId(String),
    #[error("invalid date \"{0}\": expected epoch milliseconds or an ISO-8601 date-time")]
    InvalidDate(String),
    #[error("invalid UUID \"{0}\"")]
    InvalidUuid(String),
    #[error("invalid base64 data")]
    InvalidBase64,
}
