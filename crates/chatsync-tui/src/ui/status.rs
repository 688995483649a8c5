//! Status bar
//!
//! Displays the local identity, the transient status message and key hints.

use chatsync_app::view::View;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

const KEY_HINTS: &str = " | Tab: switch pane  Enter: select/send  Esc: quit";

/// Render the status bar.
pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let identity = Span::styled(
        format!("Logged in as {}", view.identity),
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    );

    let mut spans = vec![Span::raw(" "), identity];
    if let Some(status) = &view.status {
        spans.push(Span::styled(format!(" | {status}"), Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::raw(KEY_HINTS));

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
