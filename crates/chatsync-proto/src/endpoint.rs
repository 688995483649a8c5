//! Endpoint table.

/// HTTP method used by an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Query endpoint.
    Get,
    /// Write endpoint with a JSON body.
    Post,
}

/// Server endpoints used by the sync loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /api/users`
    Users,
    /// `GET /api/messages?with=<recipient>`
    Conversation,
    /// `POST /api/messages`
    SendMessage,
    /// `POST /api/typing`
    Typing,
    /// `GET /api/get_typing`
    TypingUsers,
    /// `POST /api/update_status`
    UpdateStatus,
}

impl Endpoint {
    /// Path relative to the server root.
    pub fn path(self) -> &'static str {
        match self {
            Self::Users => "/api/users",
            Self::Conversation | Self::SendMessage => "/api/messages",
            Self::Typing => "/api/typing",
            Self::TypingUsers => "/api/get_typing",
            Self::UpdateStatus => "/api/update_status",
        }
    }

    /// HTTP method.
    pub fn method(self) -> Method {
        match self {
            Self::Users | Self::Conversation | Self::TypingUsers => Method::Get,
            Self::SendMessage | Self::Typing | Self::UpdateStatus => Method::Post,
        }
    }
}
