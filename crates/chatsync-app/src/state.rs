//! Observable application state types.
//!
//! These are the view-model pieces the [`crate::App`] owns and the
//! [`crate::view`] renderer reads: the compose box, the conversation currently
//! on screen, which pane has focus, and the zone timestamps are shown in.

use chatsync_proto::{Message, Timestamp, Username};
use chrono::{FixedOffset, Local, Offset, Utc};

use crate::LoadToken;

/// Which pane receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The online user list.
    #[default]
    Users,
    /// The message input.
    Compose,
}

/// Single-line text input with a cursor.
///
/// The cursor is a character index, never a byte index, so multi-byte input
/// edits cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeState {
    buffer: String,
    cursor: usize,
    sending: bool,
}

impl ComposeState {
    /// Current text.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether a send is in flight.
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Mark the send control busy or idle.
    pub fn set_sending(&mut self, sending: bool) {
        self.sending = sending;
    }

    /// Insert `c` at the cursor.
    pub fn insert(&mut self, c: char) -> bool {
        let at = self.byte_offset(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
        true
    }

    /// Delete the character before the cursor. Returns whether text changed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.buffer.remove(at);
        true
    }

    /// Delete the character at the cursor. Returns whether text changed.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.buffer.remove(at);
        true
    }

    /// Move the cursor one character left.
    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the cursor one character right.
    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    /// Move the cursor to the start.
    pub fn home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the end.
    pub fn end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Empty the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.buffer.char_indices().nth(chars).map_or(self.buffer.len(), |(i, _)| i)
    }
}

/// The conversation currently applied to the screen.
///
/// Replaced wholesale on every applied fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    /// Peer the messages belong to. `None` until the first fetch lands.
    pub peer: Option<Username>,
    /// Messages in server order.
    pub messages: Vec<Message>,
    /// Token of the load that produced `messages`.
    pub applied: Option<LoadToken>,
}

impl ConversationState {
    /// Whether a fetch has been applied since the last reset.
    pub fn is_loaded(&self) -> bool {
        self.applied.is_some()
    }
}

/// Time zone message timestamps are displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayZone {
    /// The machine's local zone.
    #[default]
    Local,
    /// A fixed offset; keeps rendering deterministic in tests.
    Fixed(FixedOffset),
}

impl DisplayZone {
    /// UTC.
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// `HH:MM:SS` for `timestamp` in this zone.
    pub fn time_of_day(&self, timestamp: &Timestamp) -> String {
        match self {
            Self::Local => timestamp.time_of_day(&Local),
            Self::Fixed(offset) => timestamp.time_of_day(offset),
        }
    }
}
