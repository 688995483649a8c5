//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the sync loop from specific I/O
//! implementations. Each frontend implements the trait to provide input,
//! request execution, clock and drawing, while the generic [`crate::Runtime`]
//! handles all orchestration.

use std::{future::Future, ops::Add, time::Duration};

use crate::{ApiRequest, App, AppEvent};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in the terminal client and simulation.
///
/// # Implementations
///
/// - **TUI**: crossterm key events, HTTP requests spawned onto tokio tasks
/// - **Simulation**: in-memory server, virtual clock, scripted completion order
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): Platform-specific error type
/// - [`Instant`](Driver::Instant): Time representation (real or virtual)
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Add<Duration, Output = Self::Instant>;

    /// Wait for the next input event.
    ///
    /// Returns a key press, a completed request or a tick. Implementations
    /// must return within a bounded time (a tick at the latest) so the
    /// runtime can check timer deadlines.
    fn poll_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Start executing `request`.
    ///
    /// Must not block: the completion is delivered later through
    /// [`Driver::poll_event`] as [`AppEvent::Response`].
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be scheduled at all.
    fn dispatch(&mut self, request: ApiRequest) -> Result<(), Self::Error>;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Abort in-flight requests and clean up resources.
    fn stop(&mut self);
}
