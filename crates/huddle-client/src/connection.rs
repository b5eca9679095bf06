//! Connection lifecycle state machine.
//!
//! Uses the action pattern: methods take transport notifications as input and
//! return actions for the driver to execute. The state machine performs no
//! I/O, which keeps it deterministic and straightforward to test.
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐  open   ┌────────────┐  HandshakeCompleted  ┌──────┐
//! │ Idle │────────>│ Connecting │─────────────────────>│ Open │
//! └──────┘         └────────────┘                      └──────┘
//!    │                   │ HandshakeFailed/Failed/        │ Failed/Disconnected
//!    │ close             │ Disconnected/close             │ close
//!    ↓                   ↓                                ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Closed                           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! `Closed` is terminal. Once closed, a connection ignores every further
//! notification, which is what cancels an in-flight handshake on `close()`.

use std::fmt;

use huddle_proto::{ChatEvent, OutboundMessage};

use crate::{Endpoint, error::ConnectionError};

/// Generation tag for one connection instance.
///
/// The driver tags every transport notification with the id of the
/// connection it belongs to, so notifications from a torn-down connection
/// can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wrap a raw generation number.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw generation number.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The following generation.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Created, nothing dialed yet.
    Idle,
    /// Dial requested, waiting for the transport handshake.
    Connecting,
    /// Handshake complete, frames flow both ways.
    Open,
    /// Closed locally or by the transport. Terminal.
    Closed,
}

/// Why a connection closed without being asked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// The transport failed (I/O or protocol error).
    Error,
    /// The server could not be reached or went away.
    Unavailable,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("connection error"),
            Self::Unavailable => f.write_str("server unavailable"),
        }
    }
}

/// Notifications the driver feeds into the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Transport handshake succeeded.
    HandshakeCompleted,

    /// Transport handshake failed (refused, timed out, rejected).
    HandshakeFailed {
        /// Human-readable cause, for logs.
        reason: String,
    },

    /// Text frame received from the server.
    FrameReceived(String),

    /// Transport failed after or during the handshake.
    Failed {
        /// Human-readable cause, for logs.
        reason: String,
    },

    /// Server closed the connection.
    Disconnected,
}

/// Actions the connection produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Start the transport handshake towards this endpoint.
    Dial(Endpoint),

    /// Send this encoded frame to the server.
    Transmit(String),

    /// Drop the transport and everything attached to it.
    Release,

    /// Handshake completed; the connection is open.
    Opened,

    /// A decoded inbound event, in arrival order.
    Deliver(ChatEvent),

    /// The connection closed without being asked to.
    Closed {
        /// Why it closed.
        reason: CloseReason,
    },
}

/// Connection state machine.
///
/// Manages one logical connection from dial to close. A closed instance is
/// never reopened; a new join builds a new `Connection` with the next
/// [`ConnectionId`].
#[derive(Debug, Clone)]
pub struct Connection {
    /// Generation tag.
    id: ConnectionId,
    /// Current state.
    state: ConnectionState,
    /// Endpoint being dialed or connected. `None` while idle.
    endpoint: Option<Endpoint>,
}

impl Connection {
    /// Create a new connection in [`ConnectionState::Idle`].
    pub fn new(id: ConnectionId) -> Self {
        Self { id, state: ConnectionState::Idle, endpoint: None }
    }

    /// Generation tag.
    #[must_use]
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Endpoint dialed by this connection. `None` if never opened.
    #[must_use]
    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// Begin the transport handshake.
    ///
    /// Transitions `Idle -> Connecting` and returns `Dial`. No data is
    /// delivered until the handshake completes.
    ///
    /// # Errors
    ///
    /// - `ConnectionError::InvalidState` if not in `Idle`
    pub fn open(&mut self, endpoint: Endpoint) -> Result<Vec<ConnectionAction>, ConnectionError> {
        if self.state != ConnectionState::Idle {
            return Err(ConnectionError::InvalidState { state: self.state, operation: "open" });
        }

        tracing::debug!(id = %self.id, %endpoint, "dialing");
        self.state = ConnectionState::Connecting;
        self.endpoint = Some(endpoint.clone());
        Ok(vec![ConnectionAction::Dial(endpoint)])
    }

    /// Process a transport notification.
    ///
    /// Notifications that make no sense in the current state, and every
    /// notification after `Closed`, are ignored.
    pub fn handle(&mut self, event: TransportEvent) -> Vec<ConnectionAction> {
        match (self.state, event) {
            (ConnectionState::Connecting, TransportEvent::HandshakeCompleted) => {
                tracing::debug!(id = %self.id, "connection open");
                self.state = ConnectionState::Open;
                vec![ConnectionAction::Opened]
            },
            (ConnectionState::Open, TransportEvent::FrameReceived(raw)) => {
                match huddle_proto::decode(&raw) {
                    Ok(event) => vec![ConnectionAction::Deliver(event)],
                    Err(error) => {
                        tracing::warn!(id = %self.id, %error, "dropping malformed frame");
                        vec![]
                    },
                }
            },
            (ConnectionState::Connecting, TransportEvent::HandshakeFailed { reason }) => {
                tracing::warn!(id = %self.id, %reason, "handshake failed");
                self.fail(CloseReason::Unavailable)
            },
            (
                ConnectionState::Connecting | ConnectionState::Open,
                TransportEvent::Failed { reason },
            ) => {
                tracing::warn!(id = %self.id, %reason, "transport failed");
                self.fail(CloseReason::Error)
            },
            (ConnectionState::Connecting | ConnectionState::Open, TransportEvent::Disconnected) => {
                tracing::debug!(id = %self.id, "server closed connection");
                self.fail(CloseReason::Unavailable)
            },
            (state, event) => {
                tracing::debug!(id = %self.id, ?state, ?event, "ignoring transport event");
                vec![]
            },
        }
    }

    /// Send a message body to the server.
    ///
    /// Only valid while `Open`. In any other state this is a no-op: the UI
    /// may race teardown with user input.
    pub fn send(&mut self, text: &str) -> Vec<ConnectionAction> {
        if self.state != ConnectionState::Open {
            tracing::trace!(id = %self.id, state = ?self.state, "send while not open ignored");
            return vec![];
        }

        let frame = huddle_proto::encode(&OutboundMessage::new(text));
        vec![ConnectionAction::Transmit(frame)]
    }

    /// Close the connection from any state.
    ///
    /// Returns `Release` if a transport may exist. Idempotent: closing a
    /// closed connection returns nothing.
    pub fn close(&mut self) -> Vec<ConnectionAction> {
        let previous = std::mem::replace(&mut self.state, ConnectionState::Closed);
        match previous {
            ConnectionState::Connecting | ConnectionState::Open => {
                tracing::debug!(id = %self.id, ?previous, "closing connection");
                vec![ConnectionAction::Release]
            },
            ConnectionState::Idle | ConnectionState::Closed => vec![],
        }
    }

    fn fail(&mut self, reason: CloseReason) -> Vec<ConnectionAction> {
        self.state = ConnectionState::Closed;
        vec![ConnectionAction::Release, ConnectionAction::Closed { reason }]
    }
}
