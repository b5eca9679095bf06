//! Observable session state.
//!
//! This module defines the data structures that represent the client's
//! current view of the chat: the [`Session`] with its [`Timeline`] and
//! [`Roster`]. They serve as the view model for the presentation layer.
//!
//! [`Session::apply`] is the reconciliation function. It is total: no event,
//! and no field value inside an event, can make it fail.

use std::collections::{BTreeSet, btree_set};

use huddle_client::CloseReason;
use huddle_proto::{ChatEvent, Message, PresenceKind, Timestamp};

/// Connection state as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Handshake in progress.
    Connecting,
    /// Connected; sending is possible.
    Open,
    /// Not connected.
    Closed {
        /// Why the transport closed. `None` if closed locally or never joined.
        reason: Option<CloseReason>,
    },
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::Closed { reason: None }
    }
}

/// A rendering-only notice synthesised by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemNotice {
    /// Notice text.
    pub text: String,
    /// Server timestamp of the event that produced the notice.
    pub timestamp: Timestamp,
}

/// One displayable timeline entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineEntry {
    /// A user message.
    Message(Message),
    /// A system notice.
    Notice(SystemNotice),
}

impl TimelineEntry {
    /// Timestamp of the entry.
    pub fn timestamp(&self) -> &Timestamp {
        match self {
            Self::Message(message) => &message.timestamp,
            Self::Notice(notice) => &notice.timestamp,
        }
    }
}

/// Entries in arrival order. Never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline(Vec<TimelineEntry>);

impl Timeline {
    /// Entries in arrival order.
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.0
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the timeline is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in arrival order.
    pub fn iter(&self) -> std::slice::Iter<'_, TimelineEntry> {
        self.0.iter()
    }

    fn push(&mut self, entry: TimelineEntry) {
        self.0.push(entry);
    }

    fn replace(&mut self, messages: Vec<Message>) {
        self.0 = messages.into_iter().map(TimelineEntry::Message).collect();
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a TimelineEntry;
    type IntoIter = std::slice::Iter<'a, TimelineEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Online usernames, exactly as last asserted by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster(BTreeSet<String>);

impl Roster {
    /// Whether `username` is online.
    pub fn contains(&self, username: &str) -> bool {
        self.0.contains(username)
    }

    /// Number of online users.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nobody is online.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Usernames in sorted order.
    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.0.iter()
    }

    /// Usernames as a set.
    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.0
    }
}

impl From<BTreeSet<String>> for Roster {
    fn from(users: BTreeSet<String>) -> Self {
        Self(users)
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Full client-side state for one joined user.
///
/// The default value is the empty, closed session shown before `join` and
/// after `leave`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Joined username. Empty when no session is active.
    pub username: String,
    /// Connection state.
    pub connection_state: ConnectionState,
    /// Messages and notices in arrival order.
    pub timeline: Timeline,
    /// Online users.
    pub roster: Roster,
}

impl Session {
    /// Fresh session for `username`, connecting, with nothing received yet.
    pub fn connecting(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            connection_state: ConnectionState::Connecting,
            ..Self::default()
        }
    }

    /// Apply one event and return the resulting session.
    #[must_use]
    pub fn apply(mut self, event: ChatEvent) -> Self {
        self.apply_mut(event);
        self
    }

    /// Apply one event in place.
    ///
    /// - `HistorySnapshot` replaces the timeline wholesale.
    /// - `MessagePosted` appends.
    /// - `PresenceChanged` replaces the roster and appends a notice.
    pub fn apply_mut(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::HistorySnapshot { messages } => self.timeline.replace(messages),
            ChatEvent::MessagePosted { message } => {
                self.timeline.push(TimelineEntry::Message(message));
            },
            ChatEvent::PresenceChanged { kind, username, online_users, timestamp } => {
                self.roster = Roster::from(online_users);
                self.timeline.push(TimelineEntry::Notice(SystemNotice {
                    text: render_presence_text(kind, &username),
                    timestamp,
                }));
            },
        }
    }

    /// Whether sending is currently possible.
    pub fn is_open(&self) -> bool {
        self.connection_state == ConnectionState::Open
    }

    /// Whether `message` was written by the joined user.
    pub fn is_own(&self, message: &Message) -> bool {
        !self.username.is_empty() && message.username == self.username
    }
}

/// Notice text for a presence change.
pub fn render_presence_text(kind: PresenceKind, username: &str) -> String {
    match kind {
        PresenceKind::Joined => format!("{username} joined the chat"),
        PresenceKind::Left => format!("{username} left the chat"),
    }
}
