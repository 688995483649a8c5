//! Username normalization.

use std::fmt;

/// A username in its comparison form: trimmed and lowercased.
///
/// The server echoes usernames with whatever casing the sender typed, so every
/// identity check (sent vs. received, read-receipt eligibility, typing
/// lookup) goes through this type rather than raw string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Username(String);

impl Username {
    /// Normalize a raw username.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Normalized form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `raw` names this user after normalization.
    pub fn matches(&self, raw: &str) -> bool {
        let trimmed = raw.trim();
        // Fast path avoids an allocation for already-normalized input.
        trimmed == self.0 || trimmed.to_lowercase() == self.0
    }

    /// Whether the normalized name is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Username {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}
