//! Typed protocol events.
//!
//! [`ChatEvent`] is what the rest of the client sees of the wire. The server
//! is authoritative for every field: the client never fills in identities,
//! timestamps, or membership on its own.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Deserializer, Serialize};

use crate::Timestamp;

/// One inbound unit of meaning from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Full message history. Replaces whatever the client has.
    HistorySnapshot {
        /// Messages in server order.
        messages: Vec<Message>,
    },

    /// A message was posted (including our own, echoed back).
    MessagePosted {
        /// The posted message.
        message: Message,
    },

    /// A user joined or left.
    PresenceChanged {
        /// Whether the user joined or left.
        kind: PresenceKind,
        /// User whose presence changed.
        username: String,
        /// Authoritative set of online users after the change.
        online_users: BTreeSet<String>,
        /// When the server observed the change.
        timestamp: Timestamp,
    },
}

/// Direction of a presence change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresenceKind {
    /// User connected.
    Joined,
    /// User disconnected.
    Left,
}

/// A chat message as asserted by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Server-assigned identifier, absent when the server did not supply one.
    pub id: Option<MessageId>,
    /// Author.
    pub username: String,
    /// Message body.
    pub text: String,
    /// When the server accepted the message.
    pub timestamp: Timestamp,
}

impl Message {
    /// Create a message without an identifier.
    pub fn new(
        username: impl Into<String>,
        text: impl Into<String>,
        timestamp: impl Into<Timestamp>,
    ) -> Self {
        Self { id: None, username: username.into(), text: text.into(), timestamp: timestamp.into() }
    }

    /// Attach a server identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<MessageId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Opaque message identifier.
///
/// Servers may send it as a JSON string or a JSON integer; both forms are
/// kept as text and compare by that text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Identifier as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for MessageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for MessageId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

/// The only frame the client sends.
///
/// Carries no identity and no timestamp; the server asserts both on receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Message body, sent as typed.
    pub message: String,
}

impl OutboundMessage {
    /// Wrap a message body.
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
