//! UI rendering
//!
//! Drawing functions that turn a [`View`] into terminal output using ratatui
//! widgets. All functions are pure (no I/O); every decision about what to
//! show was already made by [`chatsync_app::view::render`].

mod chat;
mod compose;
mod status;
mod users;

use chatsync_app::view::View;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Render the entire UI.
pub fn render(frame: &mut Frame, view: &View) {
    const MAIN_AREA_MIN_HEIGHT: u16 = 3;
    const TYPING_HEIGHT: u16 = 1;
    const INPUT_HEIGHT: u16 = 3;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(TYPING_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [main_area, typing_area, input_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_main_area(frame, view, *main_area);
    chat::render_typing(frame, view, *typing_area);
    compose::render(frame, view, *input_area);
    status::render(frame, view, *status_area);

    if let Some(alert) = &view.alert {
        render_alert(frame, alert);
    }
}

/// Render the main area (users sidebar + conversation).
fn render_main_area(frame: &mut Frame, view: &View, area: Rect) {
    const USER_SIDEBAR_WIDTH: u16 = 24;
    const CHAT_AREA_MIN_WIDTH: u16 = 20;

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(USER_SIDEBAR_WIDTH), Constraint::Min(CHAT_AREA_MIN_WIDTH)])
        .split(area);

    let [users_area, chat_area] = chunks.as_ref() else {
        return;
    };

    users::render(frame, view, *users_area);
    chat::render(frame, view, *chat_area);
}

/// Modal alert centered over everything; dismissed by any key.
fn render_alert(frame: &mut Frame, alert: &str) {
    const ALERT_WIDTH: u16 = 44;
    const ALERT_HEIGHT: u16 = 5;

    let [row] = Layout::vertical([Constraint::Length(ALERT_HEIGHT)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] =
        Layout::horizontal([Constraint::Length(ALERT_WIDTH)]).flex(Flex::Center).areas(row);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Alert ")
        .title_bottom(" any key to dismiss ")
        .border_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    let paragraph = Paragraph::new(alert).wrap(Wrap { trim: true }).block(block);

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
