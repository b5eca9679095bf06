//! UI rendering
//!
//! Rendering functions that convert session and view state into terminal
//! output using ratatui widgets. All functions are pure (no I/O).

mod chat;
mod input;
mod roster;
mod status;

use huddle_app::Session;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
};

use crate::View;

/// Render the entire UI.
pub fn render(frame: &mut Frame, session: &Session, view: &View) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, session, *main_area);
    input::render(frame, view.input(), *input_area);
    status::render(frame, session, view, *status_area);
}

/// Render the main area (chat + roster sidebar).
fn render_main_area(frame: &mut Frame, session: &Session, area: Rect) {
    const ROSTER_SIDEBAR_WIDTH: u16 = 18;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(CHAT_AREA_MIN_WIDTH), Constraint::Length(ROSTER_SIDEBAR_WIDTH)])
        .split(area);

    let [chat_area, roster_area] = chunks.as_ref() else {
        return;
    };

    chat::render(frame, session, *chat_area);
    roster::render(frame, session, *roster_area);
}
