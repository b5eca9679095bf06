//! Client
//!
//! Connection manager for the Huddle chat protocol. Owns the lifecycle of one
//! logical connection per join and interprets inbound frames through the
//! [`huddle_proto`] codec.
//!
//! # Architecture
//!
//! [`Connection`] is a Sans-IO state machine. It receives
//! [`TransportEvent`]s, processes them through pure state transitions, and
//! returns [`ConnectionAction`]s for the caller to execute. The caller owns
//! the socket; the state machine owns the rules.
//!
//! # Components
//!
//! - [`Connection`]: `Idle -> Connecting -> Open -> Closed` lifecycle
//! - [`ConnectionId`]: generation tag for discarding stale notifications
//! - [`Endpoint`] / [`ServerAddress`]: per-user connection address
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::spawn`]: run one WebSocket connection in a background task
//! - [`transport::ConnectionHandle`]: outbound channel and task ownership

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod connection;
mod endpoint;
mod error;

#[cfg(feature = "transport")]
pub mod transport;

pub use connection::{
    CloseReason, Connection, ConnectionAction, ConnectionId, ConnectionState, TransportEvent,
};
pub use endpoint::{DEFAULT_SERVER_ADDRESS, Endpoint, ServerAddress};
pub use error::{ConnectionError, EndpointError};
pub use huddle_proto::{ChatEvent, Message, MessageId, PresenceKind, Timestamp};
