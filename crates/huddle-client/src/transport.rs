//! WebSocket transport for the client.
//!
//! Provides [`spawn`], which runs one WebSocket connection in a background
//! task and reports everything that happens to it as tagged
//! [`TransportEvent`]s. This is a thin layer that just moves text frames;
//! protocol rules remain in the Sans-IO [`crate::Connection`].

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{sync::mpsc, task::AbortHandle};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use crate::{ConnectionId, Endpoint, TransportEvent};

/// Time allowed for the TCP + WebSocket handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Capacity of the per-connection outbound frame queue.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Handshake failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Handshake did not complete in time.
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),

    /// Socket error after the handshake.
    #[error("stream error: {0}")]
    Stream(String),

    /// Connection task is gone.
    #[error("connection closed")]
    Closed,
}

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Time allowed for the handshake before reporting `HandshakeFailed`.
    pub connect_timeout: Duration,
    /// Outbound queue capacity per connection.
    pub channel_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { connect_timeout: DEFAULT_CONNECT_TIMEOUT, channel_capacity: DEFAULT_CHANNEL_CAPACITY }
    }
}

/// Handle to one running WebSocket connection.
///
/// Dropping the handle stops the connection task, so releasing a connection
/// is simply dropping its handle.
#[derive(Debug)]
pub struct ConnectionHandle {
    id: ConnectionId,
    to_server: mpsc::Sender<String>,
    abort_handle: AbortHandle,
}

impl ConnectionHandle {
    /// Connection this handle belongs to.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a text frame for the server.
    ///
    /// # Errors
    ///
    /// `TransportError::Closed` if the connection task has stopped.
    pub async fn send(&self, frame: String) -> Result<(), TransportError> {
        self.to_server.send(frame).await.map_err(|_| TransportError::Closed)
    }

    /// Stop the connection task.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

impl Drop for ConnectionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start a WebSocket connection to `endpoint` in a background task.
///
/// Returns immediately. The handshake outcome, every inbound text frame, and
/// the eventual close are reported on `events`, tagged with `id`, in the
/// order they happen.
pub fn spawn(
    id: ConnectionId,
    endpoint: &Endpoint,
    config: &TransportConfig,
    events: mpsc::Sender<(ConnectionId, TransportEvent)>,
) -> ConnectionHandle {
    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(config.channel_capacity.max(1));
    let url = endpoint.url().to_string();
    let timeout = config.connect_timeout;

    let handle = tokio::spawn(run_connection(id, url, timeout, to_server_rx, events));

    ConnectionHandle { id, to_server: to_server_tx, abort_handle: handle.abort_handle() }
}

/// Dial, then bridge between the outbound channel and the socket.
async fn run_connection(
    id: ConnectionId,
    url: String,
    timeout: Duration,
    mut to_server: mpsc::Receiver<String>,
    events: mpsc::Sender<(ConnectionId, TransportEvent)>,
) {
    let socket = match dial(&url, timeout).await {
        Ok(socket) => socket,
        Err(error) => {
            tracing::debug!(%id, %url, %error, "dial failed");
            let _ = events
                .send((id, TransportEvent::HandshakeFailed { reason: error.to_string() }))
                .await;
            return;
        },
    };

    if events.send((id, TransportEvent::HandshakeCompleted)).await.is_err() {
        return;
    }

    let (mut ws_tx, mut ws_rx) = socket.split();

    let terminal = loop {
        tokio::select! {
            outbound = to_server.recv() => {
                let Some(frame) = outbound else {
                    // Handle dropped: close politely and stop reporting.
                    let _ = ws_tx.send(WsMessage::Close(None)).await;
                    return;
                };
                if let Err(e) = ws_tx.send(WsMessage::Text(frame.into())).await {
                    break TransportEvent::Failed { reason: TransportError::Stream(e.to_string()).to_string() };
                }
            }
            inbound = ws_rx.next() => {
                match inbound {
                    Some(Ok(WsMessage::Text(text))) => {
                        let event = TransportEvent::FrameReceived(text.as_str().to_owned());
                        if events.send((id, event)).await.is_err() {
                            return;
                        }
                    },
                    Some(Ok(WsMessage::Close(_))) | None => break TransportEvent::Disconnected,
                    Some(Ok(_)) => {},
                    Some(Err(e)) => {
                        break TransportEvent::Failed { reason: TransportError::Stream(e.to_string()).to_string() };
                    },
                }
            }
        }
    };

    let _ = events.send((id, terminal)).await;
}

type Socket = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

async fn dial(url: &str, timeout: Duration) -> Result<Socket, TransportError> {
    match tokio::time::timeout(timeout, connect_async(url)).await {
        Ok(Ok((socket, _response))) => Ok(socket),
        Ok(Err(e)) => Err(TransportError::Connect(e.to_string())),
        Err(_) => Err(TransportError::Timeout(timeout)),
    }
}
