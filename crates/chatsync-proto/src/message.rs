//! Message records and their delivery state.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone};
use serde::{Deserialize, Serialize};

use crate::Username;

/// Server-assigned message identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery state of a message.
///
/// Ordered `Sent < Delivered < Read`. A message only ever moves forward through
/// these states; [`MessageStatus::advance`] never regresses.
///
/// Unknown or missing values decode as [`MessageStatus::Sent`], matching how
/// the server defaults the column for rows written before it existed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum MessageStatus {
    /// Stored by the server, not yet fetched by the recipient.
    #[default]
    Sent,
    /// Fetched by the recipient's client.
    Delivered,
    /// Displayed to the recipient.
    Read,
}

impl MessageStatus {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Read => "read",
        }
    }

    /// Human-readable label shown under sent messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sent => "Sent",
            Self::Delivered => "Delivered",
            Self::Read => "Read",
        }
    }

    /// Move to `next` if it is further along; otherwise stay.
    #[must_use]
    pub fn advance(self, next: Self) -> Self {
        self.max(next)
    }
}

impl From<Option<String>> for MessageStatus {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("read") => Self::Read,
            Some(s) if s.eq_ignore_ascii_case("delivered") => Self::Delivered,
            _ => Self::Sent,
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Naive formats emitted by servers that store local wall-clock time.
const WALL_CLOCK_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Raw server timestamp.
///
/// Kept verbatim so nothing is lost on a format the client does not
/// understand. Two forms are interpreted:
///
/// - RFC 3339 with an offset: converted into the caller's display zone.
/// - Naive `YYYY-MM-DD HH:MM:SS`: already wall-clock time in the server's zone,
///   displayed as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// Wrap a raw timestamp string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// RFC 3339 timestamp (second precision, `Z` for UTC) for `at`.
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self(at.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Raw string as received.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Time of day (`HH:MM:SS`) in `zone`.
    ///
    /// Falls back to the raw string when the timestamp cannot be parsed.
    pub fn time_of_day<Tz: TimeZone>(&self, zone: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        let raw = self.0.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return at.with_timezone(zone).format("%H:%M:%S").to_string();
        }
        WALL_CLOCK_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map_or_else(|| self.0.clone(), |at| at.format("%H:%M:%S").to_string())
    }
}

/// A message between two users.
///
/// Immutable once created except for `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned identifier.
    pub id: MessageId,
    /// Author's username as stored by the server.
    pub sender: String,
    /// Addressee's username as stored by the server.
    pub recipient: String,
    /// Message text.
    pub message: String,
    /// Creation time.
    #[serde(default)]
    pub timestamp: Timestamp,
    /// Delivery state.
    #[serde(default)]
    pub status: MessageStatus,
}

impl Message {
    /// Whether `identity` wrote this message.
    pub fn is_sent_by(&self, identity: &Username) -> bool {
        identity.matches(&self.sender)
    }

    /// Whether this message is addressed to `identity`.
    pub fn is_addressed_to(&self, identity: &Username) -> bool {
        identity.matches(&self.recipient)
    }

    /// Whether `identity` should mark this message as read.
    ///
    /// True only for messages addressed to `identity` that are not already
    /// [`MessageStatus::Read`].
    pub fn needs_read_receipt(&self, identity: &Username) -> bool {
        self.is_addressed_to(identity) && self.status != MessageStatus::Read
    }
}
