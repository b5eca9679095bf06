//! Fuzz target for the session controller
//!
//! Drives a controller with arbitrary joins, sends, leaves and transport
//! notifications (including ones tagged with stale connection ids).
//!
//! # Invariants
//!
//! - Nothing panics
//! - Every `Transmit` targets the live connection while the session is open
//! - A stale notification never produces actions or changes the session
//! - After `leave`, the session is the empty default

#![no_main]

use arbitrary::Arbitrary;
use huddle_app::{ConnectionState, Session, SessionAction, SessionController};
use huddle_client::{ConnectionId, ServerAddress, TransportEvent};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Join(String),
    Send(String),
    Leave,
    Handshake { stale: bool },
    HandshakeFailed { stale: bool },
    Frame { stale: bool, raw: String },
    Failed { stale: bool },
    Disconnected { stale: bool },
}

fuzz_target!(|ops: Vec<Op>| {
    let Ok(server) = ServerAddress::parse("ws://localhost:8000") else { return };
    let mut controller = SessionController::new(server);

    for op in ops {
        let live = controller.connection_id();
        let target = |stale: bool| match live {
            Some(id) if stale => ConnectionId::new(id.get().wrapping_sub(1)),
            Some(id) => id,
            None => ConnectionId::new(0),
        };

        let (is_stale, actions) = match op {
            Op::Join(username) => (false, controller.join(&username).unwrap_or_default()),
            Op::Send(text) => {
                let open = controller.snapshot().connection_state == ConnectionState::Open;
                let actions = controller.send(&text);
                for action in &actions {
                    assert!(open);
                    assert!(matches!(action, SessionAction::Transmit { id, .. } if Some(*id) == live));
                }
                (false, actions)
            },
            Op::Leave => {
                let actions = controller.leave();
                assert_eq!(*controller.snapshot(), Session::default());
                (false, actions)
            },
            Op::Handshake { stale } => {
                (stale, controller.handle(target(stale), TransportEvent::HandshakeCompleted))
            },
            Op::HandshakeFailed { stale } => (
                stale,
                controller.handle(target(stale), TransportEvent::HandshakeFailed {
                    reason: "refused".into(),
                }),
            ),
            Op::Frame { stale, raw } => {
                let before = stale.then(|| controller.snapshot().clone());
                let actions = controller.handle(target(stale), TransportEvent::FrameReceived(raw));
                if let Some(before) = before {
                    assert_eq!(*controller.snapshot(), before);
                }
                (stale, actions)
            },
            Op::Failed { stale } => (
                stale,
                controller.handle(target(stale), TransportEvent::Failed { reason: "reset".into() }),
            ),
            Op::Disconnected { stale } => {
                (stale, controller.handle(target(stale), TransportEvent::Disconnected))
            },
        };

        if is_stale {
            assert!(actions.is_empty());
        }
    }
});
