//! Application layer for chatsync
//!
//! Pure state machines and generic runtime for the chat sync loop, enabling
//! deterministic simulation testing with the same code that runs in
//! production.
//!
//! # Components
//!
//! - [`App`]: view-model state machine (presence, selection, conversation,
//!   compose box, typing, read receipts)
//! - [`view`]: pure renderer from [`App`] to a [`view::View`] tree
//! - [`Bridge`]: executes [`ApiRequest`]s against a
//!   [`chatsync_client::ChatApi`]
//! - [`Schedule`]: poll timers and the typing debounce deadline
//! - [`Driver`]: trait for platform-specific I/O abstraction
//! - [`Runtime`]: generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod config;
mod driver;
mod event;
mod receipts;
mod request;
mod runtime;
mod schedule;
mod state;
pub mod view;

pub use action::AppAction;
pub use app::App;
pub use bridge::Bridge;
pub use config::SyncConfig;
pub use driver::Driver;
pub use event::{AppEvent, KeyInput};
pub use receipts::ReceiptQueue;
pub use request::{ApiReply, ApiRequest, LoadToken};
pub use runtime::Runtime;
pub use schedule::Schedule;
pub use state::{ComposeState, ConversationState, DisplayZone, Focus};
