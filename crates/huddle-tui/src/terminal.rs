//! Terminal front end.
//!
//! Owns the terminal (raw mode, alternate screen), reads keys with
//! crossterm, renders with ratatui, and talks to the session runtime only
//! through [`Command`]s and the session subscription.

use std::io::{self, Stdout, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use huddle_app::{Command, Session};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::sync::{mpsc, watch};

use crate::{KeyInput, View, ViewAction, ui};

/// Terminal front end errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The session runtime is no longer accepting commands.
    #[error("session runtime stopped")]
    RuntimeStopped,
}

/// Terminal front end.
///
/// Restores the terminal when dropped.
pub struct TerminalUi {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    view: View,
}

impl TerminalUi {
    /// Enter raw mode and the alternate screen.
    ///
    /// If any step after enabling raw mode fails, the terminal is restored
    /// before the error is returned.
    pub fn new(view: View) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        let guard = RestoreGuard::new(restore_terminal);

        stdout().execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        guard.disarm();
        Ok(Self { terminal, event_stream: EventStream::new(), view })
    }

    /// Run until the user quits or the runtime goes away.
    pub async fn run(
        mut self,
        commands: mpsc::Sender<Command>,
        mut session: watch::Receiver<Session>,
    ) -> Result<(), TerminalError> {
        let snapshot = session.borrow_and_update().clone();
        self.render(&snapshot)?;

        loop {
            tokio::select! {
                maybe_event = self.event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key_event))) if key_event.kind == KeyEventKind::Press => {
                            let Some(key) = convert_key(key_event) else { continue };
                            let snapshot = session.borrow().clone();
                            for action in self.view.handle_key(key, &snapshot) {
                                match action {
                                    ViewAction::Render => {},
                                    ViewAction::Command(command) => {
                                        commands
                                            .send(command)
                                            .await
                                            .map_err(|_| TerminalError::RuntimeStopped)?;
                                    },
                                    ViewAction::Quit => return Ok(()),
                                }
                            }
                        },
                        Some(Ok(Event::Resize(..))) => {},
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => return Err(TerminalError::Io(e)),
                        None => return Ok(()),
                    }
                }

                changed = session.changed() => {
                    if changed.is_err() {
                        return Err(TerminalError::RuntimeStopped);
                    }
                }
            }

            let snapshot = session.borrow_and_update().clone();
            self.render(&snapshot)?;
        }
    }

    fn render(&mut self, session: &Session) -> Result<(), TerminalError> {
        self.terminal.draw(|frame| ui::render(frame, session, &self.view))?;
        Ok(())
    }
}

impl Drop for TerminalUi {
    fn drop(&mut self) {
        restore_terminal();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
}

/// Runs `restore` on drop unless disarmed.
struct RestoreGuard<F: FnOnce()> {
    restore: Option<F>,
}

impl<F: FnOnce()> RestoreGuard<F> {
    fn new(restore: F) -> Self {
        Self { restore: Some(restore) }
    }

    fn disarm(mut self) {
        self.restore = None;
    }
}

impl<F: FnOnce()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

/// Convert a crossterm key event to `KeyInput`. Ctrl-C maps to `Esc`.
fn convert_key(event: KeyEvent) -> Option<KeyInput> {
    match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Some(KeyInput::Esc),
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}
