//! API calls as data.
//!
//! The [`crate::App`] never performs I/O. It describes each call as an
//! [`ApiRequest`]; the runtime hands it to the driver, and the completion comes
//! back carrying the same request so the App knows what it answers.

use std::fmt;

use chatsync_proto::{Endpoint, Message, MessageId, TypingAction, User};

/// Monotonically increasing tag attached to every conversation load.
///
/// Lets the App tell a late response to an old load apart from the newest
/// one when completions arrive out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadToken(pub u64);

impl fmt::Display for LoadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A call to one of the server endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// Fetch users currently online.
    ListUsers,

    /// Fetch the conversation with a peer.
    LoadConversation {
        /// Peer username as shown in the user list.
        with: String,
        /// Load ordering tag.
        token: LoadToken,
    },

    /// Send a message.
    SendMessage {
        /// Peer username.
        recipient: String,
        /// Trimmed message text.
        message: String,
    },

    /// Start or stop the local typing signal.
    SetTyping {
        /// Peer being typed to.
        recipient: String,
        /// Start or stop.
        action: TypingAction,
    },

    /// Fetch users currently typing to the local user.
    GetTyping,

    /// Mark a received message as read.
    MarkRead {
        /// Message to mark.
        message_id: MessageId,
    },
}

impl ApiRequest {
    /// Endpoint this request targets.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::ListUsers => Endpoint::Users,
            Self::LoadConversation { .. } => Endpoint::Conversation,
            Self::SendMessage { .. } => Endpoint::SendMessage,
            Self::SetTyping { .. } => Endpoint::Typing,
            Self::GetTyping => Endpoint::TypingUsers,
            Self::MarkRead { .. } => Endpoint::UpdateStatus,
        }
    }
}

/// Successful reply to an [`ApiRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiReply {
    /// Reply to [`ApiRequest::ListUsers`].
    Users(Vec<User>),
    /// Reply to [`ApiRequest::LoadConversation`].
    Messages(Vec<Message>),
    /// Reply to [`ApiRequest::SendMessage`].
    Sent {
        /// Identifier of the stored message, when the server reports one.
        message_id: Option<MessageId>,
    },
    /// Reply to [`ApiRequest::GetTyping`].
    Typing(Vec<String>),
    /// Reply to calls whose body is ignored ([`ApiRequest::SetTyping`],
    /// [`ApiRequest::MarkRead`]).
    Acknowledged,
}
