//! Property-based tests for session reconciliation.
//!
//! Arbitrary event sequences are applied to a session and checked against
//! the reconciliation rules: history replaces, posts and presence changes
//! append, and the roster is exactly what the server last asserted.

use std::collections::BTreeSet;

use huddle_app::{
    ConnectionState, Session, SessionAction, SessionController, TimelineEntry,
};
use huddle_client::{ConnectionId, ServerAddress, TransportEvent};
use huddle_proto::{ChatEvent, Message, PresenceKind, Timestamp};
use proptest::prelude::*;

fn message() -> impl Strategy<Value = Message> {
    ("[a-z]{1,6}", ".{0,20}", "[0-9T:-]{0,19}")
        .prop_map(|(username, text, timestamp)| Message::new(username, text, timestamp))
}

fn presence() -> impl Strategy<Value = ChatEvent> {
    (
        prop_oneof![Just(PresenceKind::Joined), Just(PresenceKind::Left)],
        "[a-z]{1,6}",
        prop::collection::btree_set("[a-z]{1,6}", 0..6),
    )
        .prop_map(|(kind, username, online_users)| ChatEvent::PresenceChanged {
            kind,
            username,
            online_users,
            timestamp: Timestamp::new("T"),
        })
}

fn live_event() -> impl Strategy<Value = ChatEvent> {
    prop_oneof![
        3 => message().prop_map(|message| ChatEvent::MessagePosted { message }),
        1 => presence(),
    ]
}

fn any_event() -> impl Strategy<Value = ChatEvent> {
    prop_oneof![
        4 => live_event(),
        1 => prop::collection::vec(message(), 0..5)
            .prop_map(|messages| ChatEvent::HistorySnapshot { messages }),
    ]
}

proptest! {
    #[test]
    fn prop_timeline_length_counts_history_posts_and_presence(
        history in prop::collection::vec(message(), 0..10),
        events in prop::collection::vec(live_event(), 0..30),
    ) {
        let expected = history.len() + events.len();

        let session = events.into_iter().fold(
            Session::default().apply(ChatEvent::HistorySnapshot { messages: history }),
            Session::apply,
        );

        prop_assert_eq!(session.timeline.len(), expected);
    }

    #[test]
    fn prop_later_history_replaces_timeline(
        events in prop::collection::vec(any_event(), 0..30),
        history in prop::collection::vec(message(), 0..10),
    ) {
        let session = events
            .into_iter()
            .fold(Session::default(), Session::apply)
            .apply(ChatEvent::HistorySnapshot { messages: history.clone() });

        let expected: Vec<_> = history.into_iter().map(TimelineEntry::Message).collect();
        prop_assert_eq!(session.timeline.entries(), expected.as_slice());
    }

    #[test]
    fn prop_roster_equals_last_presence_list(events in prop::collection::vec(any_event(), 1..30)) {
        let last_roster: Option<BTreeSet<String>> = events.iter().rev().find_map(|event| match event {
            ChatEvent::PresenceChanged { online_users, .. } => Some(online_users.clone()),
            _ => None,
        });

        let session = events.into_iter().fold(Session::default(), Session::apply);

        prop_assert_eq!(session.roster.as_set(), &last_roster.unwrap_or_default());
    }

    #[test]
    fn prop_blank_text_is_never_transmitted(text in "[ \t\n]{0,8}") {
        let mut controller = SessionController::new(ServerAddress::parse("ws://localhost:8000").unwrap());
        controller.join("alice").unwrap();
        let id = controller.connection_id().unwrap();
        controller.handle(id, TransportEvent::HandshakeCompleted);

        prop_assert!(controller.send(&text).is_empty());
    }

    #[test]
    fn prop_stale_events_never_change_session(
        frames in prop::collection::vec(".{0,40}", 0..10),
        fail in any::<bool>(),
    ) {
        let mut controller = SessionController::new(ServerAddress::parse("ws://localhost:8000").unwrap());
        controller.join("alice").unwrap();
        let stale = controller.connection_id().unwrap();
        controller.join("bob").unwrap();
        let before = controller.snapshot().clone();

        let mut events: Vec<_> = frames.into_iter().map(TransportEvent::FrameReceived).collect();
        events.insert(0, TransportEvent::HandshakeCompleted);
        if fail {
            events.push(TransportEvent::Failed { reason: "late".into() });
        }

        for event in events {
            prop_assert!(controller.handle(stale, event).is_empty());
        }
        prop_assert_eq!(&*controller.snapshot(), &before);
        prop_assert_eq!(before.connection_state, ConnectionState::Connecting);
    }

    #[test]
    fn prop_every_action_targets_live_or_released_connection(usernames in prop::collection::vec("[a-z]{1,6}", 1..6)) {
        let mut controller = SessionController::new(ServerAddress::parse("ws://localhost:8000").unwrap());
        let mut last: Option<ConnectionId> = None;

        for username in usernames {
            let actions = controller.join(&username).unwrap();
            let current = controller.connection_id().unwrap();

            match last {
                Some(previous) => {
                    prop_assert_eq!(actions.first(), Some(&SessionAction::Release { id: previous }));
                },
                None => prop_assert_eq!(actions.len(), 1),
            }
            let dials_current = matches!(actions.last(), Some(SessionAction::Dial { id, .. }) if *id == current);
            prop_assert!(dials_current);
            last = Some(current);
        }
    }
}
