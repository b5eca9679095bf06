//! Driver trait for abstracting transport I/O.
//!
//! The [`Driver`] trait decouples the session runtime from a specific
//! transport. The WebSocket driver and the in-memory drivers used in tests
//! implement it, while the generic [`crate::Runtime`] handles all
//! orchestration.

use std::future::Future;

use huddle_client::{ConnectionId, Endpoint, TransportEvent};

/// Abstracts transport operations for the session runtime.
///
/// Every notification a driver reports must carry the [`ConnectionId`] of
/// the dial that produced it, and notifications for one connection must be
/// reported in the order they happened.
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Start connecting to `endpoint` as connection `id`.
    ///
    /// Returns once the attempt has started; the outcome is reported through
    /// [`next_event`](Driver::next_event).
    ///
    /// # Errors
    ///
    /// Returns an error if the attempt cannot even be started.
    fn dial(
        &mut self,
        id: ConnectionId,
        endpoint: Endpoint,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Send an encoded frame on connection `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is gone or the send fails.
    fn transmit(
        &mut self,
        id: ConnectionId,
        frame: String,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Drop connection `id`. Unknown ids are ignored.
    fn release(&mut self, id: ConnectionId);

    /// Wait for the next tagged transport notification.
    ///
    /// Returns `None` when no connection can produce anything until the next
    /// [`dial`](Driver::dial).
    fn next_event(&mut self) -> impl Future<Output = Option<(ConnectionId, TransportEvent)>> + Send;
}
