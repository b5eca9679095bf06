//! Chat area
//!
//! Displays the timeline: messages and system notices, newest at the bottom.

use huddle_app::{Session, TimelineEntry};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, session: &Session, area: Rect) {
    let title = if session.username.is_empty() {
        " Huddle ".to_string()
    } else {
        format!(" Huddle: {} ", session.username)
    };

    let block = Block::default().borders(Borders::ALL).title(title);

    let items: Vec<ListItem> = if session.timeline.is_empty() {
        let hint = if session.username.is_empty() {
            "Type /join <name> to start chatting"
        } else {
            "No messages yet"
        };
        vec![ListItem::new(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))))]
    } else {
        session.timeline.iter().map(|entry| ListItem::new(entry_line(session, entry))).collect()
    };

    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = items.len().saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    let list = List::new(visible_items).block(block);

    frame.render_widget(list, area);
}

fn entry_line<'a>(session: &Session, entry: &'a TimelineEntry) -> Line<'a> {
    let time = Span::styled(
        format!("[{}] ", entry.timestamp().display_time()),
        Style::default().fg(Color::DarkGray),
    );

    match entry {
        TimelineEntry::Message(message) => {
            let sender_style = if session.is_own(message) {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            };

            Line::from(vec![
                time,
                Span::styled(format!("<{}>", message.username), sender_style),
                Span::raw(" "),
                Span::raw(message.text.as_str()),
            ])
        },
        TimelineEntry::Notice(notice) => Line::from(vec![
            time,
            Span::styled(
                format!("* {}", notice.text),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ),
        ]),
    }
}
