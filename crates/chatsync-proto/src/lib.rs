//! Wire types for the chatsync HTTP API
//!
//! Every endpoint speaks JSON. This crate owns the request and response
//! bodies, the user and message records they carry, and the normalization
//! rule for usernames. It performs no I/O.
//!
//! # Components
//!
//! - [`User`], [`Message`]: records returned by the server
//! - [`MessageStatus`]: forward-only delivery state
//! - [`Timestamp`]: raw server timestamp with display helpers
//! - [`Username`]: trimmed, lowercased identity used for all comparisons
//! - [`payloads`]: request and response bodies per endpoint
//! - [`Endpoint`]: method and path table

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod endpoint;
mod identity;
mod message;
pub mod payloads;
mod user;

pub use endpoint::{Endpoint, Method};
pub use identity::Username;
pub use message::{Message, MessageId, MessageStatus, Timestamp};
pub use payloads::TypingAction;
pub use user::User;
