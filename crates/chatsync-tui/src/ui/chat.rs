//! Chat area
//!
//! Displays the conversation with the selected peer and the typing line.

use chatsync_app::view::{BubbleKind, ConversationView, View};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

const BORDER_SIZE: u16 = 2;

/// Render the chat area.
pub fn render(frame: &mut Frame, view: &View, area: Rect) {
    let title = view.header.as_deref().map_or_else(|| " Chat ".to_string(), |h| format!(" {h} "));
    let block = Block::default().borders(Borders::ALL).title(title);

    let placeholder = |text: String| {
        vec![ListItem::new(Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))))]
    };

    let (items, scroll_to) = match &view.conversation {
        ConversationView::Messages { bubbles, scroll_to } => {
            let items = bubbles
                .iter()
                .map(|bubble| {
                    let (name_color, align) = match bubble.kind {
                        BubbleKind::Sent => (Color::Blue, "  "),
                        BubbleKind::Received => (Color::Green, ""),
                    };
                    let mut spans = vec![
                        Span::raw(align),
                        Span::styled(bubble.time.clone(), Style::default().fg(Color::DarkGray)),
                        Span::raw(" "),
                        Span::styled(
                            format!("{}:", bubble.sender),
                            Style::default().fg(name_color).add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(" "),
                        Span::raw(bubble.text.clone()),
                    ];
                    if let Some(status) = bubble.status {
                        spans.push(Span::styled(
                            format!(" ({status})"),
                            Style::default().fg(Color::DarkGray),
                        ));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect();
            (items, *scroll_to)
        },
        other => (placeholder(other.to_string()), 0),
    };

    // Keep the scroll target on screen.
    let visible_height = area.height.saturating_sub(BORDER_SIZE) as usize;
    let skip = (scroll_to + 1).saturating_sub(visible_height);
    let visible_items: Vec<_> = items.into_iter().skip(skip).collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

/// Render the peer typing line.
pub fn render_typing(frame: &mut Frame, view: &View, area: Rect) {
    let text = view.typing.as_deref().unwrap_or_default();
    let paragraph = Paragraph::new(format!(" {text}"))
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
    frame.render_widget(paragraph, area);
}
