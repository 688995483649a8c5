//! Online user records.

use serde::{Deserialize, Serialize};

use crate::Username;

/// A user currently reported online by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name as the server reports it.
    pub username: String,

    /// Peer address, when the server exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl User {
    /// User without an address.
    pub fn new(username: impl Into<String>) -> Self {
        Self { username: username.into(), ip: None }
    }

    /// Attach a peer address.
    #[must_use]
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Normalized identity of this user.
    pub fn identity(&self) -> Username {
        Username::new(&self.username)
    }
}
