//! Recorded edits and their replay.
//!
//! An editor with a [`ChangeSink`] attached appends one [`ChangeOperation`]
//! per primitive mutation. The recorded list can be shipped (see
//! [`ChangeOperation::to_document`]) and replayed with [`apply_changes`]
//! against another copy of the document it was recorded on.

mod apply;
mod codec;
mod operation;

use thiserror::Error;

pub use apply::apply_changes;
pub use operation::ChangeOperation;

use crate::path::Path;

// ── Error ─────────────────────────────────────────────────────────────────

/// Replay contract violations. None of these are retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChangeError {
    #[error("no container at path \"{0}\"")]
    PathNotFound(Path),
    #[error("value at path \"{0}\" is not the expected container")]
    NotAContainer(Path),
    #[error("index {index} out of bounds for array of length {len} at \"{path}\"")]
    IndexOutOfBounds { path: Path, index: usize, len: usize },
    #[error("no field \"{field}\" in document at \"{parent}\"")]
    MissingField { parent: Path, field: String },
    #[error("malformed change operation: {0}")]
    Malformed(String),
}

// ── Sink ──────────────────────────────────────────────────────────────────

/// Receives operations as an editor performs them.
pub trait ChangeSink {
    fn record(&mut self, operation: ChangeOperation);
}

impl ChangeSink for Vec<ChangeOperation> {
    fn record(&mut self, operation: ChangeOperation) {
        self.push(operation);
    }
}

impl<S: ChangeSink + ?Sized> ChangeSink for &mut S {
    fn record(&mut self, operation: ChangeOperation) {
        (**self).record(operation);
    }
}
