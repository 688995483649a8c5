//! HTTP transport for the client.
//!
//! Provides [`HttpClient`], a [`ChatApi`] implementation over reqwest. This is
//! a thin layer that just maps endpoints to requests and bodies to types -
//! sync logic remains in the sans-IO `App`.
//!
//! Non-success responses are classified with [`ApiError::from_response`];
//! any failure before a status line arrives (refused, reset, timeout) is
//! [`ApiError::Network`].

use std::time::Duration;

use async_trait::async_trait;
use chatsync_proto::{
    Endpoint, Message, Method, User,
    payloads::{
        MessagesResponse, SendMessageRequest, SendMessageResponse, StatusUpdateRequest,
        TypingRequest, TypingResponse, UsersResponse,
    },
};
use reqwest::{
    Client, RequestBuilder, Response,
    header::{COOKIE, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{ApiError, ChatApi};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Server root, e.g. `http://localhost:5000`.
    pub base_url: String,
    /// Raw `Cookie` header value carrying the server session.
    pub session_cookie: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpConfig {
    /// Settings for `base_url` with no session and the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), session_cookie: None, timeout: DEFAULT_TIMEOUT }
    }
}

/// reqwest-backed [`ChatApi`].
///
/// Cheap to share behind an `Arc`; reqwest pools connections internally.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: Client,
    base_url: String,
}

impl HttpClient {
    /// Build a client from `config`.
    pub fn new(config: &HttpConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "server URL must start with http:// or https://, got '{}'",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        if let Some(cookie) = &config.session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| ApiError::Config(format!("invalid session cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    /// Server root without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    fn request(&self, endpoint: Endpoint) -> RequestBuilder {
        let url = self.url(endpoint);
        tracing::debug!(method = ?endpoint.method(), path = endpoint.path(), "request");
        match endpoint.method() {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self.request(endpoint).query(query).send().await.map_err(network)?;
        let body = success_body(response).await?;
        decode(&body)
    }

    async fn post<B: Serialize + Sync>(
        &self,
        endpoint: Endpoint,
        payload: &B,
    ) -> Result<Vec<u8>, ApiError> {
        let response = self.request(endpoint).json(payload).send().await.map_err(network)?;
        success_body(response).await
    }
}

#[async_trait]
impl ChatApi for HttpClient {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let body: UsersResponse = self.get(Endpoint::Users, &[]).await?;
        Ok(body.users)
    }

    async fn fetch_messages(&self, with: &str) -> Result<Vec<Message>, ApiError> {
        let body: MessagesResponse = self.get(Endpoint::Conversation, &[("with", with)]).await?;
        Ok(body.messages)
    }

    async fn send_message(
        &self,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, ApiError> {
        let body = self.post(Endpoint::SendMessage, request).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(SendMessageResponse::default());
        }
        decode(&body)
    }

    async fn set_typing(&self, request: &TypingRequest) -> Result<(), ApiError> {
        self.post(Endpoint::Typing, request).await.map(drop)
    }

    async fn typing_users(&self) -> Result<Vec<String>, ApiError> {
        let body: TypingResponse = self.get(Endpoint::TypingUsers, &[]).await?;
        Ok(body.typing)
    }

    async fn update_status(&self, request: &StatusUpdateRequest) -> Result<(), ApiError> {
        self.post(Endpoint::UpdateStatus, request).await.map(drop)
    }
}

/// Read the body, turning a non-success status into an [`ApiError`].
async fn success_body(response: Response) -> Result<Vec<u8>, ApiError> {
    let status = response.status();
    let body = response.bytes().await.map_err(network)?;
    if !status.is_success() {
        return Err(ApiError::from_response(status.as_u16(), &body));
    }
    Ok(body.to_vec())
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn network(err: reqwest::Error) -> ApiError {
    ApiError::Network(err.to_string())
}
