//! The endpoint trait.

use async_trait::async_trait;
use chatsync_proto::{
    Message, User,
    payloads::{SendMessageRequest, SendMessageResponse, StatusUpdateRequest, TypingRequest},
};

use crate::ApiError;

/// One async method per server endpoint.
///
/// Implementations are shared across concurrently running requests, so they
/// take `&self` and must be `Send + Sync`.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// `GET /api/users`: users currently online.
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;

    /// `GET /api/messages?with=<with>`: conversation history, oldest first.
    async fn fetch_messages(&self, with: &str) -> Result<Vec<Message>, ApiError>;

    /// `POST /api/messages`: store and deliver a message.
    async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ApiError>;

    /// `POST /api/typing`: start or stop the local typing signal.
    async fn set_typing(&self, request: &TypingRequest) -> Result<(), ApiError>;

    /// `GET /api/get_typing`: users currently typing to the local user.
    async fn typing_users(&self) -> Result<Vec<String>, ApiError>;

    /// `POST /api/update_status`: move a message's delivery status.
    async fn update_status(&self, request: &StatusUpdateRequest) -> Result<(), ApiError>;
}
