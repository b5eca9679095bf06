//! Property-based tests for the frame codec.
//!
//! Decoding must be total over arbitrary text, and well-formed frames must
//! decode to exactly the fields the server asserted.

use std::collections::BTreeSet;

use huddle_proto::{ChatEvent, DecodeError, OutboundMessage, PresenceKind, decode, encode};
use proptest::prelude::*;
use serde_json::json;

/// Strategy for usernames, including whitespace and non-ASCII.
fn arbitrary_username() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _\\-\u{e9}\u{4e16}]{1,16}"
}

/// Strategy for discriminators the protocol does not define.
fn unknown_discriminator() -> impl Strategy<Value = String> {
    "[a-z_]{1,12}".prop_filter("must not be a known type", |t| {
        !matches!(t.as_str(), "history" | "message" | "user_joined" | "user_left")
    })
}

proptest! {
    #[test]
    fn decode_never_panics(raw in any::<String>()) {
        let _ = decode(&raw);
    }

    #[test]
    fn decode_never_panics_on_json_objects(
        kind in prop_oneof![Just("history"), Just("message"), Just("user_joined"), Just("user_left")],
        field in "[a-z_]{1,10}",
        value in any::<i64>(),
    ) {
        let raw = json!({ "type": kind, field: value }).to_string();
        let _ = decode(&raw);
    }

    #[test]
    fn unknown_discriminator_is_rejected(kind in unknown_discriminator()) {
        let raw = json!({
            "type": kind,
            "username": "alice",
            "message": "hi",
            "timestamp": "t",
        })
        .to_string();

        prop_assert!(matches!(decode(&raw), Err(DecodeError::UnknownOrMalformed(_))));
    }

    #[test]
    fn message_frame_preserves_fields(
        username in arbitrary_username(),
        text in any::<String>(),
        id in any::<u32>(),
    ) {
        let raw = json!({
            "type": "message",
            "id": id,
            "username": username,
            "message": text,
            "timestamp": "2024-01-01T00:00:00",
        })
        .to_string();

        let ChatEvent::MessagePosted { message } = decode(&raw).unwrap() else {
            return Err(TestCaseError::fail("expected MessagePosted"));
        };
        prop_assert_eq!(message.username, username);
        prop_assert_eq!(message.text, text);
        prop_assert_eq!(message.id.map(|i| i.to_string()), Some(id.to_string()));
    }

    #[test]
    fn presence_roster_is_exactly_online_users(
        username in arbitrary_username(),
        online in prop::collection::vec(arbitrary_username(), 0..10),
        joined in any::<bool>(),
    ) {
        let kind = if joined { "user_joined" } else { "user_left" };
        let raw = json!({
            "type": kind,
            "username": username,
            "online_users": online,
            "timestamp": "t",
        })
        .to_string();

        let ChatEvent::PresenceChanged { kind, online_users, .. } = decode(&raw).unwrap() else {
            return Err(TestCaseError::fail("expected PresenceChanged"));
        };
        let expected_kind = if joined { PresenceKind::Joined } else { PresenceKind::Left };
        prop_assert_eq!(kind, expected_kind);
        prop_assert_eq!(online_users, online.into_iter().collect::<BTreeSet<_>>());
    }

    #[test]
    fn encode_is_single_message_field(text in any::<String>()) {
        let encoded = encode(&OutboundMessage::new(text.clone()));
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();

        prop_assert_eq!(value, json!({ "message": text }));
    }
}
