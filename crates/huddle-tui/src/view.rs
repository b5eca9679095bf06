//! Presentation state that lives outside the session.
//!
//! The [`View`] owns the input line and a one-line status message. It turns
//! submitted lines into runtime [`Command`]s; session state itself is only
//! ever read from the runtime's subscription.

use huddle_app::{Command, Session, validate_username};

use crate::{
    commands::{self, Input},
    input::{InputAction, InputState, KeyInput},
};

/// What the terminal loop should do after a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Redraw.
    Render,
    /// Forward to the runtime, then redraw.
    Command(Command),
    /// Leave the terminal loop.
    Quit,
}

/// Terminal-side presentation state.
#[derive(Debug)]
pub struct View {
    server: String,
    input: InputState,
    status: Option<String>,
}

impl View {
    /// View for a client configured with `server`.
    pub fn new(server: impl Into<String>) -> Self {
        Self { server: server.into(), input: InputState::new(), status: None }
    }

    /// Configured server, for display.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Input line.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// One-line status message, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Replace the status message.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Handle a key given the current session.
    pub fn handle_key(&mut self, key: KeyInput, session: &Session) -> Vec<ViewAction> {
        match self.input.handle_key(key) {
            InputAction::Render => vec![ViewAction::Render],
            InputAction::None => vec![],
            InputAction::Quit => vec![ViewAction::Quit],
            InputAction::Submit(line) => self.submit(&line, session),
        }
    }

    fn submit(&mut self, line: &str, session: &Session) -> Vec<ViewAction> {
        self.status = None;

        match commands::parse(line) {
            Input::Join { username } => match validate_username(&username) {
                Ok(username) => {
                    vec![ViewAction::Command(Command::Join { username: username.to_owned() })]
                },
                Err(error) => {
                    self.set_status(format!("{error}. Usage: /join <name>"));
                    vec![ViewAction::Render]
                },
            },
            Input::Leave => vec![ViewAction::Command(Command::Leave)],
            Input::Quit => vec![ViewAction::Quit],
            Input::Unknown { command } => {
                self.set_status(format!("unknown command {command}"));
                vec![ViewAction::Render]
            },
            Input::Message { text } => {
                if session.username.is_empty() {
                    self.set_status("not joined. Use /join <name> first");
                    vec![ViewAction::Render]
                } else if !session.is_open() {
                    self.set_status("not connected");
                    vec![ViewAction::Render]
                } else {
                    vec![ViewAction::Command(Command::Send { text })]
                }
            },
        }
    }
}
