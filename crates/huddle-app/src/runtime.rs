//! Generic runtime for session orchestration.
//!
//! The Runtime drives the client event loop, coordinating between:
//! - [`SessionController`]: session state machine
//! - [`Driver`]: transport I/O
//! - the presentation layer, through a channel of [`Command`]s

use huddle_client::{ServerAddress, TransportEvent};
use tokio::sync::{
    mpsc::{self, error::TryRecvError},
    watch,
};

use crate::{Driver, Session, SessionAction, SessionController, SessionError};

/// Transport notifications [`Runtime::run`] applies in a row before it takes
/// a queued command.
pub const EVENT_BURST: usize = 64;

/// Requests from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a session as `username`.
    Join {
        /// Requested username, untrimmed.
        username: String,
    },
    /// Send a chat message.
    Send {
        /// Message text as typed.
        text: String,
    },
    /// End the session.
    Leave,
    /// Leave and stop the runtime.
    Quit,
}

/// Generic runtime that orchestrates the controller and a driver.
pub struct Runtime<D: Driver> {
    driver: D,
    controller: SessionController,
    /// Set when the driver has nothing left to report until the next dial.
    idle: bool,
}

impl<D: Driver> Runtime<D> {
    /// Create a runtime connecting to `server` through `driver`.
    pub fn new(driver: D, server: ServerAddress) -> Self {
        Self { driver, controller: SessionController::new(server), idle: false }
    }

    /// Session controller.
    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Borrow the current session.
    pub fn snapshot(&self) -> watch::Ref<'_, Session> {
        self.controller.snapshot()
    }

    /// Receiver notified after every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.controller.subscribe()
    }

    /// Start a session as `username`.
    ///
    /// # Errors
    ///
    /// - `SessionError::InvalidUsername` if the username fails
    ///   [`validate_username`](crate::validate_username)
    pub async fn join(&mut self, username: &str) -> Result<(), SessionError> {
        let actions = self.controller.join(username)?;
        self.execute(actions).await;
        Ok(())
    }

    /// Send a chat message. Ignored unless the session is open.
    pub async fn send(&mut self, text: &str) {
        let actions = self.controller.send(text);
        self.execute(actions).await;
    }

    /// End the session.
    pub async fn leave(&mut self) {
        let actions = self.controller.leave();
        self.execute(actions).await;
    }

    /// Wait for one transport notification and apply it.
    ///
    /// Returns `false` if the driver had nothing to report.
    pub async fn step(&mut self) -> bool {
        let Some((id, event)) = self.driver.next_event().await else {
            return false;
        };
        let actions = self.controller.handle(id, event);
        self.execute(actions).await;
        true
    }

    /// Run until [`Command::Quit`] or until the command channel closes.
    ///
    /// Pending transport notifications are applied before the next command,
    /// so every command sees the state produced by everything that arrived
    /// before it. At most [`EVENT_BURST`] notifications are applied in a row
    /// before a queued command is taken, so a busy connection cannot hold off
    /// `Leave` or `Quit`. The session is left on exit.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        let mut burst = 0;

        loop {
            tokio::select! {
                biased;

                event = self.driver.next_event(), if !self.idle => {
                    match event {
                        Some((id, event)) => {
                            let actions = self.controller.handle(id, event);
                            self.execute(actions).await;

                            burst += 1;
                            if burst == EVENT_BURST {
                                burst = 0;
                                match commands.try_recv() {
                                    Ok(command) => {
                                        if !self.apply(command).await {
                                            break;
                                        }
                                    },
                                    Err(TryRecvError::Empty) => {},
                                    Err(TryRecvError::Disconnected) => break,
                                }
                            }
                        },
                        None => self.idle = true,
                    }
                }
                command = commands.recv() => {
                    burst = 0;
                    let Some(command) = command else { break };
                    if !self.apply(command).await {
                        break;
                    }
                }
            }
        }

        self.leave().await;
        tracing::debug!("runtime stopped");
    }

    /// Apply one command. Returns `false` once the runtime should stop.
    async fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Join { username } => {
                if let Err(error) = self.join(&username).await {
                    tracing::warn!(%error, "join rejected");
                }
            },
            Command::Send { text } => self.send(&text).await,
            Command::Leave => self.leave().await,
            Command::Quit => return false,
        }
        true
    }

    /// Execute controller actions against the driver.
    ///
    /// A failed dial is fed back as a handshake failure, which may produce
    /// further actions; those are executed in the same pass.
    async fn execute(&mut self, initial_actions: Vec<SessionAction>) {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    SessionAction::Dial { id, endpoint } => {
                        if let Err(error) = self.driver.dial(id, endpoint).await {
                            let reason = error.to_string();
                            pending_actions.extend(
                                self.controller.handle(id, TransportEvent::HandshakeFailed { reason }),
                            );
                        }
                    },
                    SessionAction::Transmit { id, frame } => {
                        if let Err(error) = self.driver.transmit(id, frame).await {
                            tracing::warn!(%id, %error, "transmit failed");
                        }
                    },
                    SessionAction::Release { id } => self.driver.release(id),
                }
            }
        }

        self.idle = false;
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, convert::Infallible, time::Duration};

    use huddle_client::{CloseReason, ConnectionId, Endpoint};

    use super::*;
    use crate::{ConnectionState, TimelineEntry};

    const CHATTER: &str =
        r#"{"type":"message","username":"bob","message":"again","timestamp":"t2"}"#;

    const HISTORY: &str = r#"{"type":"history","messages":[{"id":1,"username":"bob","message":"earlier","timestamp":"t0"}]}"#;

    /// In-memory driver that plays a well-behaved server.
    ///
    /// A dial completes immediately and delivers history; every transmitted
    /// frame is echoed back as a `message` from the dialing user.
    #[derive(Default)]
    struct SimDriver {
        queue: VecDeque<(ConnectionId, TransportEvent)>,
        dialed: Vec<(ConnectionId, String)>,
        transmitted: Vec<(ConnectionId, String)>,
        released: Vec<ConnectionId>,
        refuse: bool,
        /// Never run dry: once the queue is empty, keep delivering chatter.
        flood: bool,
    }

    impl Driver for SimDriver {
        type Error = Infallible;

        async fn dial(&mut self, id: ConnectionId, endpoint: Endpoint) -> Result<(), Self::Error> {
            self.dialed.push((id, endpoint.username().to_owned()));
            if self.refuse {
                self.queue.push_back((id, TransportEvent::HandshakeFailed { reason: "refused".into() }));
            } else {
                self.queue.push_back((id, TransportEvent::HandshakeCompleted));
                self.queue.push_back((id, TransportEvent::FrameReceived(HISTORY.into())));
            }
            Ok(())
        }

        async fn transmit(&mut self, id: ConnectionId, frame: String) -> Result<(), Self::Error> {
            let username = self.dialed.last().map(|(_, name)| name.clone()).unwrap_or_default();
            let body = frame
                .strip_prefix(r#"{"message":"#)
                .and_then(|rest| rest.strip_suffix('}'))
                .unwrap_or("\"\"")
                .to_owned();
            let echo = format!(
                r#"{{"type":"message","username":"{username}","message":{body},"timestamp":"t1"}}"#
            );
            self.transmitted.push((id, frame));
            self.queue.push_back((id, TransportEvent::FrameReceived(echo)));
            Ok(())
        }

        fn release(&mut self, id: ConnectionId) {
            self.released.push(id);
        }

        async fn next_event(&mut self) -> Option<(ConnectionId, TransportEvent)> {
            if let Some(event) = self.queue.pop_front() {
                return Some(event);
            }
            if !self.flood {
                return None;
            }
            tokio::task::yield_now().await;
            let id = self.dialed.last().map_or(ConnectionId::new(1), |(id, _)| *id);
            Some((id, TransportEvent::FrameReceived(CHATTER.into())))
        }
    }

    fn runtime(driver: SimDriver) -> Runtime<SimDriver> {
        Runtime::new(driver, ServerAddress::parse("ws://localhost:8000").unwrap())
    }

    async fn drain(runtime: &mut Runtime<SimDriver>) {
        while runtime.step().await {}
    }

    #[tokio::test]
    async fn join_opens_and_loads_history() {
        let mut runtime = runtime(SimDriver::default());

        runtime.join("alice").await.unwrap();
        assert_eq!(runtime.snapshot().connection_state, ConnectionState::Connecting);

        drain(&mut runtime).await;

        let session = runtime.snapshot();
        assert!(session.is_open());
        assert_eq!(session.timeline.len(), 1);
        assert_eq!(runtime.driver().dialed, vec![(ConnectionId::new(1), "alice".to_owned())]);
    }

    #[tokio::test]
    async fn send_is_echoed_into_timeline() {
        let mut runtime = runtime(SimDriver::default());
        runtime.join("alice").await.unwrap();
        drain(&mut runtime).await;

        runtime.send("hello").await;
        drain(&mut runtime).await;

        let session = runtime.snapshot();
        let Some(TimelineEntry::Message(last)) = session.timeline.entries().last() else {
            panic!("expected a message at the end of the timeline");
        };
        assert_eq!(last.text, "hello");
        assert!(session.is_own(last));
    }

    #[tokio::test]
    async fn refused_dial_closes_unavailable() {
        let mut runtime = runtime(SimDriver { refuse: true, ..SimDriver::default() });

        runtime.join("alice").await.unwrap();
        drain(&mut runtime).await;

        assert_eq!(runtime.snapshot().connection_state, ConnectionState::Closed {
            reason: Some(CloseReason::Unavailable)
        });
        assert_eq!(runtime.driver().released, vec![ConnectionId::new(1)]);
    }

    #[tokio::test]
    async fn rejoin_releases_previous_connection() {
        let mut runtime = runtime(SimDriver::default());
        runtime.join("alice").await.unwrap();
        drain(&mut runtime).await;

        runtime.join("bob").await.unwrap();
        drain(&mut runtime).await;

        assert_eq!(runtime.driver().released, vec![ConnectionId::new(1)]);
        assert_eq!(runtime.snapshot().username, "bob");
        assert!(runtime.snapshot().is_open());
    }

    #[tokio::test]
    async fn blank_join_touches_nothing() {
        let mut runtime = runtime(SimDriver::default());

        assert_eq!(runtime.join("  ").await, Err(SessionError::InvalidUsername));
        assert!(runtime.driver().dialed.is_empty());
    }

    #[tokio::test]
    async fn run_processes_commands_in_order() {
        let runtime = runtime(SimDriver::default());
        let mut session = runtime.subscribe();
        let (tx, rx) = mpsc::channel(8);

        let handle = tokio::spawn(runtime.run(rx));
        tx.send(Command::Join { username: "alice".into() }).await.unwrap();
        tx.send(Command::Send { text: "hi".into() }).await.unwrap();

        session
            .wait_for(|s| {
                s.timeline.iter().any(|e| matches!(e, TimelineEntry::Message(m) if m.text == "hi"))
            })
            .await
            .unwrap();

        tx.send(Command::Quit).await.unwrap();
        handle.await.unwrap();

        assert_eq!(*session.borrow(), Session::default());
    }

    #[tokio::test]
    async fn run_takes_commands_while_events_keep_arriving() {
        let runtime = runtime(SimDriver { flood: true, ..SimDriver::default() });
        let mut session = runtime.subscribe();
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(runtime.run(rx));

        let scenario = async {
            tx.send(Command::Join { username: "alice".into() }).await.unwrap();
            session.wait_for(Session::is_open).await.unwrap();

            tx.send(Command::Leave).await.unwrap();
            session.wait_for(|s| *s == Session::default()).await.unwrap();

            tx.send(Command::Quit).await.unwrap();
            handle.await.unwrap();
        };

        tokio::time::timeout(Duration::from_secs(5), scenario)
            .await
            .expect("commands were starved by transport events");
    }
}
