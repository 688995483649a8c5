//! Pure renderer from [`App`] state to a view tree.
//!
//! Nothing here touches a terminal. A frontend walks the [`View`] and draws it;
//! tests compare it directly. Rendering the same state twice yields equal
//! trees.

use std::fmt;

use chatsync_proto::{Message, Username};

use crate::{App, DisplayZone, Focus};

/// Shown in place of the user list when nobody is online.
pub const NO_USERS: &str = "No users online";
/// Shown in place of an empty conversation.
pub const NO_MESSAGES: &str = "No messages yet";
/// Shown between selecting a peer and the first applied fetch.
pub const LOADING: &str = "Loading messages...";
/// Shown in the conversation pane before any peer is selected.
pub const NO_SELECTION: &str = "Select a user to start chatting";

/// Everything on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Local user.
    pub identity: String,
    /// Online users pane.
    pub users: UserListView,
    /// `Chat with <name>` once a peer is selected.
    pub header: Option<String>,
    /// Conversation pane.
    pub conversation: ConversationView,
    /// Peer typing line.
    pub typing: Option<String>,
    /// Message input.
    pub compose: ComposeView,
    /// Transient status line.
    pub status: Option<String>,
    /// Blocking alert.
    pub alert: Option<String>,
}

/// Online users pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserListView {
    /// Nobody online; render [`NO_USERS`].
    Empty,
    /// One entry per user, in server order.
    Entries(Vec<UserEntry>),
}

/// One row of the user list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    /// Name as sent by the server.
    pub username: String,
    /// Address, when the server reports one.
    pub ip: Option<String>,
    /// This is the selected peer.
    pub active: bool,
    /// The keyboard highlight is on this row.
    pub highlighted: bool,
}

/// Conversation pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationView {
    /// No peer selected; render [`NO_SELECTION`].
    NoSelection,
    /// Peer selected, nothing fetched yet; render [`LOADING`].
    Loading,
    /// Fetched and empty; render [`NO_MESSAGES`].
    Empty,
    /// Message bubbles, oldest first.
    Messages {
        /// One bubble per message.
        bubbles: Vec<Bubble>,
        /// Index of the newest bubble; the pane scrolls to it.
        scroll_to: usize,
    },
}

/// Which side of the conversation a bubble is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleKind {
    /// Written by the local user.
    Sent,
    /// Written by the peer.
    Received,
}

/// A rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    /// Side.
    pub kind: BubbleKind,
    /// Message text.
    pub text: String,
    /// `HH:MM:SS` in the display zone, or the raw timestamp.
    pub time: String,
    /// Author as sent by the server.
    pub sender: String,
    /// Delivery label; only sent bubbles carry one.
    pub status: Option<&'static str>,
}

/// Message input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeView {
    /// Current text.
    pub text: String,
    /// Cursor position in characters.
    pub cursor: usize,
    /// Input accepts text (a peer is selected).
    pub enabled: bool,
    /// A send is in flight.
    pub sending: bool,
    /// Keyboard focus is here.
    pub focused: bool,
}

/// Render the whole screen.
pub fn render(app: &App) -> View {
    let selected = app.selected().map(|u| u.identity());

    let users = if app.users().is_empty() {
        UserListView::Empty
    } else {
        UserListView::Entries(
            app.users()
                .iter()
                .enumerate()
                .map(|(i, user)| UserEntry {
                    username: user.username.clone(),
                    ip: user.ip.clone(),
                    active: selected.as_ref().is_some_and(|s| *s == user.identity()),
                    highlighted: i == app.highlighted(),
                })
                .collect(),
        )
    };

    let conversation = match app.selected() {
        None => ConversationView::NoSelection,
        Some(_) if !app.conversation().is_loaded() => ConversationView::Loading,
        Some(_) => render_messages(&app.conversation().messages, app.identity(), app.display_zone()),
    };

    let compose = app.compose();
    View {
        identity: app.identity().to_string(),
        users,
        header: app.selected().map(|u| format!("Chat with {}", u.username)),
        conversation,
        typing: app.typing_indicator().map(str::to_string),
        compose: ComposeView {
            text: compose.text().to_string(),
            cursor: compose.cursor(),
            enabled: app.selected().is_some(),
            sending: compose.is_sending(),
            focused: app.focus() == Focus::Compose,
        },
        status: app.status_message().map(str::to_string),
        alert: app.alert().map(str::to_string),
    }
}

/// Render a conversation.
///
/// Sent versus received is decided by comparing the sender with `identity`
/// after trimming and lowercasing.
pub fn render_messages(
    messages: &[Message],
    identity: &Username,
    zone: &DisplayZone,
) -> ConversationView {
    if messages.is_empty() {
        return ConversationView::Empty;
    }

    let bubbles: Vec<Bubble> = messages
        .iter()
        .map(|m| {
            let kind = if m.is_sent_by(identity) { BubbleKind::Sent } else { BubbleKind::Received };
            Bubble {
                kind,
                text: m.message.clone(),
                time: zone.time_of_day(&m.timestamp),
                sender: m.sender.clone(),
                status: (kind == BubbleKind::Sent).then(|| m.status.label()),
            }
        })
        .collect();
    let scroll_to = bubbles.len() - 1;
    ConversationView::Messages { bubbles, scroll_to }
}

impl fmt::Display for Bubble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.kind {
            BubbleKind::Sent => "sent",
            BubbleKind::Received => "received",
        };
        write!(f, "[{side}] {} • {}: {}", self.time, self.sender, self.text)?;
        if let Some(status) = self.status {
            write!(f, " ({status})")?;
        }
        Ok(())
    }
}

impl fmt::Display for ConversationView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSelection => f.write_str(NO_SELECTION),
            Self::Loading => f.write_str(LOADING),
            Self::Empty => f.write_str(NO_MESSAGES),
            Self::Messages { bubbles, .. } => {
                for (i, bubble) in bubbles.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{bubble}")?;
                }
                Ok(())
            },
        }
    }
}
