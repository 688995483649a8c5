//! Request-to-endpoint translation layer.
//!
//! The [`Bridge`] wraps a [`ChatApi`] and turns each [`ApiRequest`] into the
//! matching endpoint call, then wraps the outcome as an
//! [`AppEvent::Response`] carrying the original request.
//!
//! Drivers clone the bridge into every spawned request, so it holds the API
//! behind an [`Arc`].

use std::sync::Arc;

use chatsync_client::{ApiError, ChatApi};
use chatsync_proto::{
    MessageStatus,
    payloads::{SendMessageRequest, StatusUpdateRequest, TypingRequest},
};

use crate::{ApiReply, ApiRequest, AppEvent};

/// Executes [`ApiRequest`]s against a [`ChatApi`].
pub struct Bridge<A: ?Sized> {
    api: Arc<A>,
}

impl<A: ?Sized> Clone for Bridge<A> {
    fn clone(&self) -> Self {
        Self { api: Arc::clone(&self.api) }
    }
}

impl<A: ChatApi + ?Sized> Bridge<A> {
    /// Wrap a shared API client.
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Run `request` to completion and describe the outcome as an event.
    pub async fn execute(&self, request: ApiRequest) -> AppEvent {
        let result = self.call(&request).await;
        AppEvent::Response { request, result }
    }

    async fn call(&self, request: &ApiRequest) -> Result<ApiReply, ApiError> {
        match request {
            ApiRequest::ListUsers => self.api.list_users().await.map(ApiReply::Users),
            ApiRequest::LoadConversation { with, .. } => {
                self.api.fetch_messages(with).await.map(ApiReply::Messages)
            },
            ApiRequest::SendMessage { recipient, message } => {
                let body =
                    SendMessageRequest { recipient: recipient.clone(), message: message.clone() };
                let response = self.api.send_message(&body).await?;
                Ok(ApiReply::Sent { message_id: response.message_id })
            },
            ApiRequest::SetTyping { recipient, action } => {
                let body = TypingRequest { recipient: recipient.clone(), action: *action };
                self.api.set_typing(&body).await.map(|()| ApiReply::Acknowledged)
            },
            ApiRequest::GetTyping => self.api.typing_users().await.map(ApiReply::Typing),
            ApiRequest::MarkRead { message_id } => {
                let body = StatusUpdateRequest { message_id: *message_id, status: MessageStatus::Read };
                self.api.update_status(&body).await.map(|()| ApiReply::Acknowledged)
            },
        }
    }
}
