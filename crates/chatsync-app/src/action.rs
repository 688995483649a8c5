//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

use crate::ApiRequest;

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Issue an API call. The completion comes back as
    /// [`crate::AppEvent::Response`].
    Request(ApiRequest),

    /// Restart the typing debounce timer, cancelling any pending deadline.
    RestartTypingTimer,
}
