//! In-memory chat server for simulation.
//!
//! `SimServer` holds the same state the HTTP server keeps (online users, the
//! message table, the typing set) and answers the six endpoints with the same
//! rules, including the error bodies. Each logged-in user talks to it through a
//! [`SimSession`], which implements [`ChatApi`] so the production
//! [`chatsync_app::Bridge`] runs against it unchanged.
//!
//! Failure injection: a recipient can be blocked (sends to it are rejected with
//! `{"error":"blocked"}`), the next send can be forced to fail with any
//! [`ApiError`], and the whole server can be taken offline so every call
//! fails as a network error.

use std::{
    collections::BTreeSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use chatsync_client::{ApiError, ChatApi};
use chatsync_proto::{
    Endpoint, Message, MessageId, MessageStatus, Timestamp, TypingAction, User,
    payloads::{SendMessageRequest, SendMessageResponse, StatusUpdateRequest, TypingRequest},
};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

/// Conversation fetches return at most this many messages, oldest first.
pub const CONVERSATION_LIMIT: usize = 50;

/// One endpoint call as the server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimCall {
    /// Session user that made the call.
    pub user: String,
    /// Endpoint hit.
    pub endpoint: Endpoint,
}

/// One typing signal as the server saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingSignal {
    /// User typing.
    pub user: String,
    /// Peer typed to.
    pub recipient: String,
    /// Start or stop.
    pub action: TypingAction,
}

#[derive(Debug)]
struct ServerState {
    online: Vec<User>,
    messages: Vec<Message>,
    next_id: u64,
    typing: BTreeSet<(String, String)>,
    blocked: BTreeSet<String>,
    next_send_failure: Option<ApiError>,
    offline: bool,
    epoch: DateTime<Utc>,
    calls: Vec<SimCall>,
    typing_log: Vec<TypingSignal>,
}

/// Shared in-memory server. Clones share state.
#[derive(Debug, Clone)]
pub struct SimServer {
    state: Arc<Mutex<ServerState>>,
}

impl Default for SimServer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimServer {
    /// Empty server with nobody online.
    pub fn new() -> Self {
        let epoch = DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
            .map(|at| at.with_timezone(&Utc))
            .unwrap_or_default();
        Self {
            state: Arc::new(Mutex::new(ServerState {
                online: Vec::new(),
                messages: Vec::new(),
                next_id: 1,
                typing: BTreeSet::new(),
                blocked: BTreeSet::new(),
                next_send_failure: None,
                offline: false,
                epoch,
                calls: Vec::new(),
                typing_log: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark `username` online. Hosts get sequential loopback addresses.
    pub fn connect(&self, username: &str) {
        let mut state = self.lock();
        if state.online.iter().any(|u| u.username == username) {
            return;
        }
        let ip = format!("127.0.0.{}", state.online.len() + 1);
        state.online.push(User::new(username).with_ip(ip));
    }

    /// Mark `username` offline.
    pub fn disconnect(&self, username: &str) {
        self.lock().online.retain(|u| u.username != username);
    }

    /// Session for `username`. Does not mark the user online.
    pub fn session(&self, username: &str) -> SimSession {
        SimSession { server: self.clone(), user: username.to_string() }
    }

    /// Store a message as if `sender` had posted it.
    pub fn post(&self, sender: &str, recipient: &str, text: &str) -> MessageId {
        self.lock().store(sender, recipient, text)
    }

    /// Set or clear the server-side typing flag for `user` towards `recipient`.
    pub fn set_typing(&self, user: &str, recipient: &str, typing: bool) {
        let key = (user.to_string(), recipient.to_string());
        let mut state = self.lock();
        if typing {
            state.typing.insert(key);
        } else {
            state.typing.remove(&key);
        }
    }

    /// Reject every send to `recipient` with `403 {"error":"blocked"}`.
    pub fn block(&self, recipient: &str) {
        self.lock().blocked.insert(recipient.to_string());
    }

    /// Fail the next send with `error`, regardless of content.
    pub fn fail_next_send(&self, error: ApiError) {
        self.lock().next_send_failure = Some(error);
    }

    /// Take the server off the network, or bring it back.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Every stored message, in insertion order.
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    /// Current status of message `id`.
    pub fn status_of(&self, id: MessageId) -> Option<MessageStatus> {
        self.lock().messages.iter().find(|m| m.id == id).map(|m| m.status)
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<SimCall> {
        self.lock().calls.clone()
    }

    /// Number of calls made to `endpoint`.
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.lock().calls.iter().filter(|c| c.endpoint == endpoint).count()
    }

    /// Every typing signal received, in order.
    pub fn typing_signals(&self) -> Vec<TypingSignal> {
        self.lock().typing_log.clone()
    }
}

impl ServerState {
    fn admit(&mut self, user: &str, endpoint: Endpoint) -> Result<(), ApiError> {
        if self.offline {
            return Err(ApiError::Network("simulated outage".to_string()));
        }
        self.calls.push(SimCall { user: user.to_string(), endpoint });
        Ok(())
    }

    fn store(&mut self, sender: &str, recipient: &str, text: &str) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        let seconds = i64::try_from(id.0).unwrap_or(i64::MAX);
        let at = self.epoch + TimeDelta::try_seconds(seconds).unwrap_or_default();
        self.messages.push(Message {
            id,
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            message: text.to_string(),
            timestamp: Timestamp::from_datetime(&at),
            status: MessageStatus::Sent,
        });
        id
    }
}

/// One user's logged-in session against a [`SimServer`].
#[derive(Debug, Clone)]
pub struct SimSession {
    server: SimServer,
    user: String,
}

fn bad_request(message: &str) -> ApiError {
    ApiError::Rejected { status: 400, message: message.to_string() }
}

#[async_trait]
impl ChatApi for SimSession {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let mut state = self.server.lock();
        state.admit(&self.user, Endpoint::Users)?;
        Ok(state.online.clone())
    }

    async fn fetch_messages(&self, with: &str) -> Result<Vec<Message>, ApiError> {
        let mut state = self.server.lock();
        state.admit(&self.user, Endpoint::Conversation)?;
        let with = with.trim();
        if with.is_empty() {
            return Err(bad_request("Recipient required"));
        }

        let me = self.user.as_str();
        let mut fetched = Vec::new();
        for message in state
            .messages
            .iter_mut()
            .filter(|m| {
                (m.sender == me && m.recipient == with) || (m.sender == with && m.recipient == me)
            })
            .take(CONVERSATION_LIMIT)
        {
            if message.recipient == me && message.status == MessageStatus::Sent {
                message.status = MessageStatus::Delivered;
            }
            fetched.push(message.clone());
        }
        Ok(fetched)
    }

    async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ApiError> {
        let mut state = self.server.lock();
        state.admit(&self.user, Endpoint::SendMessage)?;
        if let Some(error) = state.next_send_failure.take() {
            return Err(error);
        }

        let recipient = request.recipient.trim();
        let text = request.message.trim();
        if recipient.is_empty() || text.is_empty() {
            return Err(bad_request("Recipient and message required"));
        }
        if state.blocked.contains(recipient) {
            return Err(ApiError::Rejected { status: 403, message: "blocked".to_string() });
        }

        let id = state.store(&self.user, recipient, text);
        debug!(user = %self.user, recipient, %id, "stored message");
        Ok(SendMessageResponse { success: Some(true), message_id: Some(id) })
    }

    async fn set_typing(&self, request: &TypingRequest) -> Result<(), ApiError> {
        let mut state = self.server.lock();
        state.admit(&self.user, Endpoint::Typing)?;
        let recipient = request.recipient.trim();
        if recipient.is_empty() {
            return Err(bad_request("Invalid parameters"));
        }

        let key = (self.user.clone(), recipient.to_string());
        match request.action {
            TypingAction::Start => state.typing.insert(key),
            TypingAction::Stop => state.typing.remove(&key),
        };
        state.typing_log.push(TypingSignal {
            user: self.user.clone(),
            recipient: recipient.to_string(),
            action: request.action,
        });
        Ok(())
    }

    async fn typing_users(&self) -> Result<Vec<String>, ApiError> {
        let mut state = self.server.lock();
        state.admit(&self.user, Endpoint::TypingUsers)?;
        Ok(state
            .typing
            .iter()
            .filter(|(_, recipient)| *recipient == self.user)
            .map(|(user, _)| user.clone())
            .collect())
    }

    async fn update_status(&self, request: &StatusUpdateRequest) -> Result<(), ApiError> {
        let mut state = self.server.lock();
        state.admit(&self.user, Endpoint::UpdateStatus)?;
        if request.message_id.0 == 0 {
            return Err(bad_request("Invalid parameters"));
        }
        if let Some(message) = state.messages.iter_mut().find(|m| m.id == request.message_id) {
            message.status = message.status.advance(request.status);
        }
        Ok(())
    }
}
