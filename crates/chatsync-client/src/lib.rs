//! Client
//!
//! Typed access to the chat server's six JSON endpoints. The sync loop in
//! `chatsync-app` only sees the [`ChatApi`] trait, so the same orchestration
//! runs against the real server and against the in-memory simulation.
//!
//! # Components
//!
//! - [`ChatApi`]: async trait, one method per endpoint
//! - [`ApiError`]: failure taxonomy (network, rejected, bare status, decode)
//!
//! # Transport (optional)
//!
//! With the `http` feature enabled, this crate also provides:
//! - [`http::HttpClient`]: reqwest-backed [`ChatApi`]
//! - [`http::HttpConfig`]: base URL, session cookie and timeout

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
mod error;

#[cfg(feature = "http")]
pub mod http;

pub use api::ChatApi;
pub use error::ApiError;
