//! Deterministic simulation harness for the chatsync sync loop.
//!
//! An in-memory [`SimServer`] answers the chat endpoints with the same rules
//! as the HTTP server, and a [`SimDriver`] runs the production
//! [`chatsync_app::Runtime`] on a virtual clock. Requests can be held and
//! released in any order, which makes out-of-order responses reproducible.
//!
//! # Failure injection
//!
//! - [`SimServer::block`]: sends to a recipient are rejected with an error body
//! - [`SimServer::fail_next_send`]: next send fails with a chosen error
//! - [`SimServer::set_offline`]: every call fails as a network error

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod sim_driver;
pub mod sim_server;

pub use sim_driver::{SimDriver, SimDriverError, SimHandle, SimInstant, run_for, settle};
pub use sim_server::{SimCall, SimServer, SimSession, TypingSignal};
