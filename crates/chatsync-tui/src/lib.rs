//! Terminal UI for chatsync
//!
//! A thin shell over [`chatsync_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`chatsync_app::Runtime`].
//!
//! This crate only handles terminal rendering, key input, request execution
//! on tokio tasks, and loading the config file.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod terminal;
pub mod ui;

pub use chatsync_app::{App, AppAction, AppEvent, Driver, KeyInput, Runtime};
pub use config::{ClientConfig, ConfigError};
pub use terminal::{TerminalDriver, TerminalError};
