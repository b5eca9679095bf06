//! Session-level errors.

use huddle_client::ConnectionError;
use thiserror::Error;

/// Errors returned synchronously by the session controller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Username is empty after trimming, or is `.` or `..`.
    #[error("username must not be empty, `.` or `..`")]
    InvalidUsername,

    /// Connection state machine rejected an operation.
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}
