//! Status bar
//!
//! Displays connection state, server, and the latest status message.

use huddle_app::{ConnectionState, Session};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::View;

/// Render the status bar.
pub fn render(frame: &mut Frame, session: &Session, view: &View, area: Rect) {
    let connection_status = match session.connection_state {
        ConnectionState::Closed { reason: None } => {
            Span::styled("Disconnected", Style::default().fg(Color::Red))
        },
        ConnectionState::Closed { reason: Some(reason) } => {
            Span::styled(format!("Disconnected: {reason}"), Style::default().fg(Color::Red))
        },
        ConnectionState::Connecting => {
            Span::styled("Connecting...", Style::default().fg(Color::Yellow))
        },
        ConnectionState::Open => Span::styled(
            "Connected",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    };

    let mut info = format!(" | {}", view.server());
    if !session.username.is_empty() {
        info.push_str(&format!(" | {}", session.username));
    }
    if let Some(status) = view.status() {
        info.push_str(&format!(" | {status}"));
    }

    let status_line = Line::from(vec![
        Span::raw(" "),
        connection_status,
        Span::styled(info, Style::default().fg(Color::Gray)),
    ]);

    let paragraph =
        Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
