//! Application input events.
//!
//! This module defines [`AppEvent`], the comprehensive set of inputs that drive
//! the [`crate::App`] state machine.
//!
//! Events originate from three distinct sources:
//! - User interactions (keyboard) and idle ticks from the driver.
//! - Deadlines expiring in the [`crate::Schedule`].
//! - Completions of API calls, translated by the [`crate::Bridge`].

use chatsync_client::ApiError;

use crate::{ApiReply, ApiRequest};

/// Events processed by the App state machine.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Keyboard input.
    Key(KeyInput),

    /// Periodic tick with no other input.
    Tick,

    /// Presence poll interval elapsed.
    PresenceDue,

    /// Conversation and typing poll interval elapsed.
    ConversationDue,

    /// Typing debounce elapsed without further input.
    TypingIdle,

    /// An API call completed.
    Response {
        /// The request as it was issued.
        request: ApiRequest,
        /// Server reply or failure.
        result: Result<ApiReply, ApiError>,
    },
}

/// A key press, already translated out of the terminal library's types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character typed into the compose box.
    Char(char),
    /// Select the highlighted user, or send the compose text.
    Enter,
    /// Delete before the cursor.
    Backspace,
    /// Delete at the cursor.
    Delete,
    /// Switch focus between user list and compose box.
    Tab,
    /// Dismiss the alert, or quit.
    Esc,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Previous user.
    Up,
    /// Next user.
    Down,
    /// Cursor to start of line.
    Home,
    /// Cursor to end of line.
    End,
}
