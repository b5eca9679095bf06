//! Error types for the connection manager.
//!
//! Only programming errors and configuration errors are represented here.
//! Transport failures never surface as `Err`: they become
//! [`crate::ConnectionAction::Closed`] transitions.

use thiserror::Error;

use crate::ConnectionState;

/// Errors from connection state machine operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Operation is not valid in the current state.
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidState {
        /// Current state when error occurred.
        state: ConnectionState,
        /// Operation that was attempted.
        operation: &'static str,
    },
}

/// Errors from parsing a server address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// Address is not a URL.
    #[error("invalid server address: {0}")]
    Invalid(String),

    /// Address uses a scheme other than `ws` or `wss`.
    #[error("unsupported scheme {0:?}, expected ws or wss")]
    UnsupportedScheme(String),
}
