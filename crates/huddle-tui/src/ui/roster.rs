//! Roster sidebar
//!
//! Lists online users, highlighting the joined user.

use huddle_app::Session;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

/// Render the roster sidebar.
pub fn render(frame: &mut Frame, session: &Session, area: Rect) {
    let items: Vec<ListItem> = session
        .roster
        .iter()
        .map(|username| {
            let style = if *username == session.username {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(username.as_str(), style)))
        })
        .collect();

    let title = format!(" Online ({}) ", session.roster.len());
    let block = Block::default().borders(Borders::ALL).title(title);
    let list = List::new(items).block(block);

    frame.render_widget(list, area);
}
