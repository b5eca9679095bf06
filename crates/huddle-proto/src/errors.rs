//! Protocol error types.

use thiserror::Error;

/// Errors produced while decoding an inbound frame.
///
/// A decode error is always recoverable: the frame is discarded and the
/// connection that carried it stays usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Frame is not JSON, carries an unknown `type`, or lacks a field required
    /// by its declared type.
    #[error("unknown or malformed frame: {0}")]
    UnknownOrMalformed(String),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::UnknownOrMalformed(err.to_string())
    }
}
