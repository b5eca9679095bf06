//! Session controller.
//!
//! The [`SessionController`] is the entry point the presentation layer talks
//! to. It owns at most one live [`Connection`] and the [`Store`], feeds
//! transport notifications through the connection, and applies the results
//! to the session.
//!
//! Like [`Connection`], it performs no I/O. Every method returns the
//! [`SessionAction`]s a driver must execute, in order.

use huddle_client::{
    Connection, ConnectionAction, ConnectionId, Endpoint, Message, ServerAddress, TransportEvent,
};
use tokio::sync::watch;

use crate::{
    SessionAction, SessionError,
    state::{ConnectionState, Session},
    store::Store,
};

/// Check a username and return it trimmed.
///
/// # Errors
///
/// - `SessionError::InvalidUsername` if nothing is left after trimming, or
///   if the name is `.` or `..`, which a URL path cannot carry as a segment
pub fn validate_username(raw: &str) -> Result<&str, SessionError> {
    let username = raw.trim();
    if matches!(username, "" | "." | "..") {
        return Err(SessionError::InvalidUsername);
    }
    Ok(username)
}

/// Orchestrates one user's chat session.
#[derive(Debug)]
pub struct SessionController {
    server: ServerAddress,
    store: Store,
    connection: Option<Connection>,
    next_id: ConnectionId,
}

impl SessionController {
    /// Create a controller that will connect to `server`.
    pub fn new(server: ServerAddress) -> Self {
        Self {
            server,
            store: Store::new(),
            connection: None,
            next_id: ConnectionId::new(1),
        }
    }

    /// Configured server address.
    pub fn server(&self) -> &ServerAddress {
        &self.server
    }

    /// Id of the current connection, if any.
    pub fn connection_id(&self) -> Option<ConnectionId> {
        self.connection.as_ref().map(Connection::id)
    }

    /// Start a session as `username`.
    ///
    /// Any active connection is torn down first, so its `Release` precedes
    /// the new `Dial` in the returned actions.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidUsername` if [`validate_username`] rejects the
    ///   name. Nothing changes and no action is produced.
    pub fn join(&mut self, username: &str) -> Result<Vec<SessionAction>, SessionError> {
        let username = validate_username(username)?;

        let mut actions = self.teardown();
        self.store.begin(username);

        let id = self.next_id;
        self.next_id = id.next();

        let mut connection = Connection::new(id);
        let opened = connection.open(Endpoint::new(&self.server, username))?;
        self.connection = Some(connection);

        tracing::debug!(%id, username, "joining");
        actions.extend(self.process(id, opened));
        Ok(actions)
    }

    /// Send a chat message.
    ///
    /// Blank text, or a session that is not open, produces nothing. The text
    /// is sent exactly as typed.
    pub fn send(&mut self, text: &str) -> Vec<SessionAction> {
        if text.trim().is_empty() || !self.store.snapshot().is_open() {
            return vec![];
        }

        let Some(connection) = self.connection.as_mut() else {
            return vec![];
        };
        let id = connection.id();
        let actions = connection.send(text);
        self.process(id, actions)
    }

    /// End the session and return to the empty state. Idempotent.
    pub fn leave(&mut self) -> Vec<SessionAction> {
        let actions = self.teardown();
        self.store.reset();
        actions
    }

    /// Process a transport notification for connection `id`.
    ///
    /// Notifications for any connection other than the current one are
    /// discarded.
    pub fn handle(&mut self, id: ConnectionId, event: TransportEvent) -> Vec<SessionAction> {
        let Some(connection) = self.connection.as_mut().filter(|c| c.id() == id) else {
            tracing::debug!(%id, ?event, "discarding event for stale connection");
            return vec![];
        };

        let actions = connection.handle(event);
        self.process(id, actions)
    }

    /// Borrow the current session.
    pub fn snapshot(&self) -> watch::Ref<'_, Session> {
        self.store.snapshot()
    }

    /// Receiver notified after every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.store.subscribe()
    }

    /// Whether `message` was written by the joined user.
    pub fn is_own(&self, message: &Message) -> bool {
        self.store.snapshot().is_own(message)
    }

    fn teardown(&mut self) -> Vec<SessionAction> {
        let Some(mut connection) = self.connection.take() else {
            return vec![];
        };
        let id = connection.id();
        let actions = connection.close();
        self.process(id, actions)
    }

    /// Apply state outputs to the store and collect the driver actions.
    fn process(&self, id: ConnectionId, actions: Vec<ConnectionAction>) -> Vec<SessionAction> {
        let mut out = Vec::new();
        for action in actions {
            match action {
                ConnectionAction::Dial(endpoint) => out.push(SessionAction::Dial { id, endpoint }),
                ConnectionAction::Transmit(frame) => out.push(SessionAction::Transmit { id, frame }),
                ConnectionAction::Release => out.push(SessionAction::Release { id }),
                ConnectionAction::Opened => self.store.set_connection_state(ConnectionState::Open),
                ConnectionAction::Deliver(event) => self.store.apply(event),
                ConnectionAction::Closed { reason } => {
                    self.store.set_connection_state(ConnectionState::Closed { reason: Some(reason) });
                },
            }
        }
        out
    }
}
