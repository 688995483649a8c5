//! API error taxonomy.

use chatsync_proto::payloads::ErrorBody;
use thiserror::Error;

/// Failure of a single API call.
///
/// Every variant is recoverable: callers log it and keep their last good
/// state. Only the send path turns one into a user-visible alert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, reset, or timed out.
    #[error("network error: {0}")]
    Network(String),

    /// Non-success status with a server-provided `error` string.
    #[error("server rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Server-provided reason.
        message: String,
    },

    /// Non-success status without a usable error payload.
    #[error("server returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Success status but the body did not match the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Client could not be constructed from its configuration.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Classify a non-success response by its body.
    ///
    /// A JSON object carrying a non-empty `error` string is
    /// [`ApiError::Rejected`]; anything else is [`ApiError::Status`].
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(ErrorBody { error: Some(message) }) if !message.trim().is_empty() => {
                Self::Rejected { status, message }
            },
            _ => Self::Status { status },
        }
    }

    /// Server-provided reason, if the server gave one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            Self::Network(_) | Self::Status { .. } | Self::Decode(_) | Self::Config(_) => None,
        }
    }

    /// Whether the request never produced an HTTP status.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
