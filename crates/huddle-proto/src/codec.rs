//! Frame codec.
//!
//! Inbound frames are JSON objects discriminated by `type`. Each recognised
//! type maps onto exactly one [`ChatEvent`] variant (enforced by match
//! exhaustiveness in the `From` impl below). The wire names differ from the
//! typed names: the body is `message` on the wire and `text` in [`Message`].
//!
//! The outbound direction has a single shape with no discriminator.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::{ChatEvent, DecodeError, Message, MessageId, OutboundMessage, PresenceKind, Timestamp};

/// Inbound frame as it appears on the wire.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum InboundFrame {
    History { messages: Vec<WireMessage> },
    Message(WireMessage),
    UserJoined(WirePresence),
    UserLeft(WirePresence),
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    id: Option<MessageId>,
    username: String,
    message: String,
    timestamp: Timestamp,
}

#[derive(Debug, Deserialize)]
struct WirePresence {
    username: String,
    online_users: Vec<String>,
    timestamp: Timestamp,
}

impl From<WireMessage> for Message {
    fn from(wire: WireMessage) -> Self {
        Self { id: wire.id, username: wire.username, text: wire.message, timestamp: wire.timestamp }
    }
}

impl WirePresence {
    fn into_event(self, kind: PresenceKind) -> ChatEvent {
        ChatEvent::PresenceChanged {
            kind,
            username: self.username,
            online_users: self.online_users.into_iter().collect::<BTreeSet<_>>(),
            timestamp: self.timestamp,
        }
    }
}

impl From<InboundFrame> for ChatEvent {
    fn from(frame: InboundFrame) -> Self {
        match frame {
            InboundFrame::History { messages } => {
                ChatEvent::HistorySnapshot { messages: messages.into_iter().map(Into::into).collect() }
            },
            InboundFrame::Message(message) => ChatEvent::MessagePosted { message: message.into() },
            InboundFrame::UserJoined(presence) => presence.into_event(PresenceKind::Joined),
            InboundFrame::UserLeft(presence) => presence.into_event(PresenceKind::Left),
        }
    }
}

/// Decode one raw inbound frame.
///
/// # Errors
///
/// [`DecodeError::UnknownOrMalformed`] if the text is not JSON, has a missing
/// or unknown `type`, or lacks a field its type requires. Never panics.
pub fn decode(raw: &str) -> Result<ChatEvent, DecodeError> {
    let frame: InboundFrame = serde_json::from_str(raw)?;
    Ok(frame.into())
}

/// Encode the outbound message shape, `{"message": <text>}`.
pub fn encode(outbound: &OutboundMessage) -> String {
    serde_json::json!({ "message": outbound.message }).to_string()
}
