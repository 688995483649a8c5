//! Request and response bodies, one pair per endpoint.
//!
//! Response types are lenient: a missing list field decodes as empty, and
//! unknown fields are ignored. Request types serialize exactly the fields the
//! server reads.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Message, MessageId, MessageStatus, User};

/// Body of `GET /api/users`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersResponse {
    /// Online users in server order.
    #[serde(default, deserialize_with = "user_list")]
    pub users: Vec<User>,
}

/// Presence tables come either as a list or keyed by peer id.
#[derive(Deserialize)]
#[serde(untagged)]
enum UserList {
    List(Vec<User>),
    Keyed(BTreeMap<String, User>),
}

fn user_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<User>, D::Error> {
    let users = Option::<UserList>::deserialize(deserializer)?;
    Ok(match users {
        Some(UserList::List(users)) => users,
        Some(UserList::Keyed(users)) => users.into_values().collect(),
        None => Vec::new(),
    })
}

/// Body of `GET /api/messages?with=<recipient>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesResponse {
    /// Conversation history in server order (oldest first).
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Body of `POST /api/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Addressee's username.
    pub recipient: String,
    /// Message text.
    pub message: String,
}

/// Success body of `POST /api/messages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    /// Server acknowledgement flag, when present.
    #[serde(default)]
    pub success: Option<bool>,
    /// Identifier of the stored message, when present.
    #[serde(default)]
    pub message_id: Option<MessageId>,
}

/// Error body returned with a non-success status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Server-provided reason.
    #[serde(default)]
    pub error: Option<String>,
}

/// Typing signal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypingAction {
    /// The local user started typing.
    Start,
    /// The local user went quiet.
    Stop,
}

/// Body of `POST /api/typing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingRequest {
    /// Peer being typed to.
    pub recipient: String,
    /// Start or stop.
    pub action: TypingAction,
}

/// Body of `GET /api/get_typing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingResponse {
    /// Users currently typing to the local user.
    #[serde(default)]
    pub typing: Vec<String>,
}

/// Body of `POST /api/update_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    /// Message to update.
    pub message_id: MessageId,
    /// New status.
    pub status: MessageStatus,
}
