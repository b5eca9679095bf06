//! Fuzz target for frame decoding
//!
//! Feeds arbitrary text, and structurally plausible JSON built from
//! arbitrary parts, to the inbound frame decoder.
//!
//! # Invariants
//!
//! - `decode` NEVER panics; invalid input returns an error
//! - A decoded presence event's roster has no duplicates and only contains
//!   names from the frame's `online_users`

#![no_main]

use arbitrary::Arbitrary;
use huddle_proto::{ChatEvent, decode};
use libfuzzer_sys::fuzz_target;
use serde_json::{Value, json};

#[derive(Debug, Arbitrary)]
enum Input {
    Raw(String),
    Shaped { kind: Kind, username: Field, text: Field, timestamp: Field, users: Vec<String> },
}

#[derive(Debug, Arbitrary)]
enum Kind {
    History,
    Message,
    UserJoined,
    UserLeft,
    Other(String),
}

#[derive(Debug, Arbitrary)]
enum Field {
    Text(String),
    Number(i64),
    Null,
    Missing,
}

impl Field {
    fn into_value(self) -> Option<Value> {
        match self {
            Field::Text(s) => Some(Value::String(s)),
            Field::Number(n) => Some(json!(n)),
            Field::Null => Some(Value::Null),
            Field::Missing => None,
        }
    }
}

fn shaped(kind: Kind, username: Field, text: Field, timestamp: Field, users: &[String]) -> String {
    let kind = match kind {
        Kind::History => "history".to_owned(),
        Kind::Message => "message".to_owned(),
        Kind::UserJoined => "user_joined".to_owned(),
        Kind::UserLeft => "user_left".to_owned(),
        Kind::Other(other) => other,
    };

    let mut object = serde_json::Map::new();
    object.insert("type".into(), Value::String(kind));
    for (key, field) in [("username", username), ("message", text), ("timestamp", timestamp)] {
        if let Some(value) = field.into_value() {
            object.insert(key.into(), value);
        }
    }
    object.insert("online_users".into(), json!(users));
    object.insert("messages".into(), Value::Array(vec![Value::Object(object.clone())]));
    Value::Object(object).to_string()
}

fuzz_target!(|input: Input| {
    let (raw, users) = match input {
        Input::Raw(raw) => (raw, Vec::new()),
        Input::Shaped { kind, username, text, timestamp, users } => {
            (shaped(kind, username, text, timestamp, &users), users)
        },
    };

    if let Ok(ChatEvent::PresenceChanged { online_users, .. }) = decode(&raw) {
        assert!(online_users.iter().all(|user| users.contains(user)) || users.is_empty());
    }
});
