//! Single-writer owner of the observable [`Session`].
//!
//! The [`Store`] keeps the session inside a [`tokio::sync::watch`] channel.
//! Only the store mutates it; readers get a borrowed snapshot or a
//! subscription that is notified after every change.

use huddle_proto::ChatEvent;
use tokio::sync::watch;

use crate::state::{ConnectionState, Session};

/// Owner of the session state.
#[derive(Debug)]
pub struct Store {
    tx: watch::Sender<Session>,
}

impl Store {
    /// Store holding an empty, closed session.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::default());
        Self { tx }
    }

    /// Apply a decoded server event.
    pub fn apply(&self, event: ChatEvent) {
        self.tx.send_modify(|session| session.apply_mut(event));
    }

    /// Update the connection state. Subscribers are only notified on change.
    pub fn set_connection_state(&self, state: ConnectionState) {
        self.tx.send_if_modified(|session| {
            if session.connection_state == state {
                return false;
            }
            session.connection_state = state;
            true
        });
    }

    /// Replace the session with a fresh one connecting as `username`.
    pub fn begin(&self, username: &str) {
        self.tx.send_replace(Session::connecting(username));
    }

    /// Return to the empty, closed session.
    pub fn reset(&self) {
        self.tx.send_if_modified(|session| {
            if *session == Session::default() {
                return false;
            }
            *session = Session::default();
            true
        });
    }

    /// Borrow the current session.
    ///
    /// Holding the guard blocks writers; clone what you need and drop it.
    pub fn snapshot(&self) -> watch::Ref<'_, Session> {
        self.tx.borrow()
    }

    /// Receiver notified after every change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use huddle_client::CloseReason;
    use huddle_proto::Message;

    use super::*;

    #[test]
    fn apply_notifies_subscribers() {
        let store = Store::new();
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        store.apply(ChatEvent::MessagePosted { message: Message::new("alice", "hi", "t") });

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().timeline.len(), 1);
    }

    #[test]
    fn unchanged_connection_state_does_not_notify() {
        let store = Store::new();
        store.begin("alice");
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        store.set_connection_state(ConnectionState::Connecting);
        assert!(!rx.has_changed().unwrap());

        store.set_connection_state(ConnectionState::Open);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn begin_starts_fresh() {
        let store = Store::new();
        store.begin("alice");
        store.apply(ChatEvent::MessagePosted { message: Message::new("alice", "hi", "t") });
        store.set_connection_state(ConnectionState::Closed { reason: Some(CloseReason::Error) });

        store.begin("bob");

        let session = store.snapshot();
        assert_eq!(session.username, "bob");
        assert_eq!(session.connection_state, ConnectionState::Connecting);
        assert!(session.timeline.is_empty());
    }

    #[test]
    fn reset_twice_notifies_once() {
        let store = Store::new();
        store.begin("alice");
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        store.reset();
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();

        store.reset();
        assert!(!rx.has_changed().unwrap());
        assert_eq!(*store.snapshot(), Session::default());
    }
}
