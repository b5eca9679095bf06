//! WebSocket implementation of [`Driver`].

use huddle_client::{
    ConnectionId, Endpoint, TransportEvent,
    transport::{self, ConnectionHandle, TransportConfig, TransportError},
};
use tokio::sync::mpsc;

use crate::Driver;

/// Driver backed by `huddle_client::transport`.
///
/// Holds at most one connection. Dialing replaces (and thereby stops) the
/// previous one.
#[derive(Debug)]
pub struct WebSocketDriver {
    config: TransportConfig,
    connection: Option<ConnectionHandle>,
    events_tx: mpsc::Sender<(ConnectionId, TransportEvent)>,
    events_rx: mpsc::Receiver<(ConnectionId, TransportEvent)>,
}

impl WebSocketDriver {
    /// Create a driver with the given transport settings.
    pub fn new(config: TransportConfig) -> Self {
        let (events_tx, events_rx) = mpsc::channel(config.channel_capacity.max(1));
        Self { config, connection: None, events_tx, events_rx }
    }

    /// Id of the live connection, if any.
    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.connection.as_ref().map(ConnectionHandle::id)
    }
}

impl Default for WebSocketDriver {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl Driver for WebSocketDriver {
    type Error = TransportError;

    async fn dial(&mut self, id: ConnectionId, endpoint: Endpoint) -> Result<(), Self::Error> {
        tracing::debug!(%id, %endpoint, "spawning websocket connection");
        let handle = transport::spawn(id, &endpoint, &self.config, self.events_tx.clone());
        self.connection = Some(handle);
        Ok(())
    }

    async fn transmit(&mut self, id: ConnectionId, frame: String) -> Result<(), Self::Error> {
        match &self.connection {
            Some(handle) if handle.id() == id => handle.send(frame).await,
            _ => Err(TransportError::Closed),
        }
    }

    fn release(&mut self, id: ConnectionId) {
        if self.connection_id() == Some(id) {
            self.connection = None;
        }
    }

    async fn next_event(&mut self) -> Option<(ConnectionId, TransportEvent)> {
        self.events_rx.recv().await
    }
}
