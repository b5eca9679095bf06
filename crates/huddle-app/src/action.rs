//! Side effects requested by the session controller.
//!
//! [`SessionAction`]s are instructions for the runtime's driver. Each one is
//! tagged with the [`ConnectionId`] it concerns.

use huddle_client::{ConnectionId, Endpoint};

/// Transport operations produced by [`crate::SessionController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Open a WebSocket to `endpoint` and report its events as `id`.
    Dial {
        /// Connection the transport belongs to.
        id: ConnectionId,
        /// Per-user endpoint.
        endpoint: Endpoint,
    },

    /// Send an encoded frame on connection `id`.
    Transmit {
        /// Target connection.
        id: ConnectionId,
        /// Encoded JSON frame.
        frame: String,
    },

    /// Tear down connection `id`.
    Release {
        /// Connection to drop.
        id: ConnectionId,
    },
}

impl SessionAction {
    /// Connection this action targets.
    pub fn id(&self) -> ConnectionId {
        match self {
            Self::Dial { id, .. } | Self::Transmit { id, .. } | Self::Release { id } => *id,
        }
    }
}
