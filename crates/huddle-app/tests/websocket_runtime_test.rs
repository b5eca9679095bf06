//! End-to-end tests for the runtime over a real WebSocket.
//!
//! An in-process server speaks the chat protocol: on connect it announces
//! the user, sends history, and then echoes every posted message.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use huddle_app::{Command, ConnectionState, Runtime, Session, TimelineEntry, WebSocketDriver};
use huddle_client::{CloseReason, ServerAddress, transport::TransportConfig};
use serde_json::json;
use tokio::{net::TcpListener, sync::mpsc, time::timeout};
use tokio_tungstenite::{accept_async, tungstenite::Message as WsMessage};

/// Start a chat server on an ephemeral port and return its address.
async fn start_server() -> ServerAddress {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let Ok(mut ws) = accept_async(stream).await else { return };

                let joined = json!({
                    "type": "user_joined",
                    "username": "alice",
                    "online_users": ["alice", "bob"],
                    "timestamp": "2024-01-01T09:00:00",
                });
                let history = json!({
                    "type": "history",
                    "messages": [{
                        "id": 1,
                        "username": "bob",
                        "message": "morning",
                        "timestamp": "2024-01-01T08:59:00",
                    }],
                });
                for frame in [joined, history] {
                    if ws.send(WsMessage::Text(frame.to_string().into())).await.is_err() {
                        return;
                    }
                }

                let mut next_id = 2u64;
                while let Some(Ok(msg)) = ws.next().await {
                    let WsMessage::Text(text) = msg else { continue };
                    let body: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
                    let echo = json!({
                        "type": "message",
                        "id": next_id,
                        "username": "alice",
                        "message": body["message"],
                        "timestamp": "2024-01-01T09:01:00",
                    });
                    next_id += 1;
                    if ws.send(WsMessage::Text(echo.to_string().into())).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    ServerAddress::parse(&format!("ws://{addr}")).unwrap()
}

/// Step the runtime until `done` holds for the session.
async fn step_until(runtime: &mut Runtime<WebSocketDriver>, done: impl Fn(&Session) -> bool) {
    timeout(Duration::from_secs(5), async {
        while !done(&runtime.snapshot()) {
            assert!(runtime.step().await, "driver stopped reporting");
        }
    })
    .await
    .expect("session condition within timeout");
}

#[tokio::test]
async fn join_receives_presence_then_history() {
    let server = start_server().await;
    let mut runtime = Runtime::new(WebSocketDriver::default(), server);

    runtime.join("alice").await.unwrap();
    step_until(&mut runtime, |s| s.is_open() && !s.timeline.is_empty() && !s.roster.is_empty())
        .await;
    step_until(&mut runtime, |s| {
        matches!(s.timeline.entries(), [TimelineEntry::Message(m)] if m.text == "morning")
    })
    .await;

    let session = runtime.snapshot();
    assert!(session.roster.contains("alice"));
    assert!(session.roster.contains("bob"));
}

#[tokio::test]
async fn sent_message_comes_back_as_own() {
    let server = start_server().await;
    let mut runtime = Runtime::new(WebSocketDriver::default(), server);

    runtime.join("alice").await.unwrap();
    step_until(&mut runtime, |s| s.timeline.len() == 1 && s.is_open()).await;

    runtime.send("hello there").await;
    step_until(&mut runtime, |s| s.timeline.len() == 2).await;

    let session = runtime.snapshot();
    let Some(TimelineEntry::Message(echo)) = session.timeline.entries().last() else {
        panic!("expected the echoed message last");
    };
    assert_eq!(echo.text, "hello there");
    assert_eq!(echo.timestamp.display_time(), "09:01");
    assert!(session.is_own(echo));
}

#[tokio::test]
async fn unreachable_server_closes_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let server = ServerAddress::parse(&format!("ws://{addr}")).unwrap();
    let config = TransportConfig { connect_timeout: Duration::from_millis(500), ..Default::default() };
    let mut runtime = Runtime::new(WebSocketDriver::new(config), server);

    runtime.join("alice").await.unwrap();
    step_until(&mut runtime, |s| matches!(s.connection_state, ConnectionState::Closed { .. }))
        .await;

    assert_eq!(runtime.snapshot().connection_state, ConnectionState::Closed {
        reason: Some(CloseReason::Unavailable)
    });
}

#[tokio::test]
async fn run_loop_drives_session_from_commands() {
    let server = start_server().await;
    let runtime = Runtime::new(WebSocketDriver::default(), server);
    let mut session = runtime.subscribe();
    let (tx, rx) = mpsc::channel(8);
    let handle = tokio::spawn(runtime.run(rx));

    tx.send(Command::Join { username: "alice".into() }).await.unwrap();
    timeout(Duration::from_secs(5), session.wait_for(|s| s.is_open() && s.timeline.len() == 1))
        .await
        .unwrap()
        .unwrap();

    tx.send(Command::Send { text: "ping".into() }).await.unwrap();
    timeout(Duration::from_secs(5), session.wait_for(|s| s.timeline.len() == 2))
        .await
        .unwrap()
        .unwrap();

    tx.send(Command::Leave).await.unwrap();
    timeout(Duration::from_secs(5), session.wait_for(|s| *s == Session::default()))
        .await
        .unwrap()
        .unwrap();

    drop(tx);
    timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
}
