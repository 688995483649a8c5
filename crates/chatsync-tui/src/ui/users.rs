//! Users sidebar
//!
//! Lists online users with the selection and keyboard highlight.

use chatsync_app::view::{NO_USERS, UserListView, View};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

const HIGHLIGHT_PREFIX: &str = ">";
const PLAIN_PREFIX: &str = " ";

/// Render the users sidebar.
pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let items: Vec<ListItem> = match &view.users {
        UserListView::Empty => vec![ListItem::new(Line::from(Span::styled(
            NO_USERS,
            Style::default().fg(Color::DarkGray),
        )))],
        UserListView::Entries(entries) => entries
            .iter()
            .map(|entry| {
                let prefix = if entry.highlighted { HIGHLIGHT_PREFIX } else { PLAIN_PREFIX };
                let style = if entry.active {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };

                let mut spans =
                    vec![Span::raw(prefix), Span::styled(entry.username.clone(), style)];
                if let Some(ip) = &entry.ip {
                    spans.push(Span::styled(format!(" {ip}"), Style::default().fg(Color::DarkGray)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect(),
    };

    let border = if view.compose.focused { Color::Reset } else { Color::Cyan };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Online ")
        .border_style(Style::default().fg(border));

    frame.render_widget(List::new(items).block(block), area);
}
