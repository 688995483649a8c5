//! Generic runtime for application orchestration.
//!
//! The Runtime drives the sync loop, coordinating between:
//! - [`App`]: view-model state machine
//! - [`Schedule`]: poll timers and typing debounce
//! - [`Driver`]: Platform-specific I/O
//!
//! One cycle polls the driver for at most one event, feeds it to the App,
//! executes the resulting actions, then fires every expired timer.

use tracing::debug;

use crate::{App, AppAction, AppEvent, Driver, Schedule, SyncConfig};

/// Generic runtime that orchestrates App, Schedule, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D>
where
    D: Driver,
{
    driver: D,
    app: App,
    schedule: Schedule<D::Instant>,
}

impl<D> Runtime<D>
where
    D: Driver,
{
    /// Create a new runtime; timers are configured from `config`.
    pub fn new(driver: D, app: App, config: &SyncConfig) -> Self {
        Self { driver, app, schedule: Schedule::new(config) }
    }

    /// Run the main event loop until the App asks to quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error. Timers are
    /// cancelled and the driver stopped on both paths.
    pub async fn run(mut self) -> Result<(), D::Error> {
        let result = self.run_loop().await;
        self.shutdown();
        result
    }

    async fn run_loop(&mut self) -> Result<(), D::Error> {
        self.start()?;
        while !self.step().await? {}
        Ok(())
    }

    /// Draw the initial screen and arm the poll timers.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial render fails.
    pub fn start(&mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;
        self.schedule.start(self.driver.now());
        Ok(())
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to poll, dispatch or render.
    pub async fn step(&mut self) -> Result<bool, D::Error> {
        if let Some(event) = self.driver.poll_event().await?
            && self.feed(event)?
        {
            return Ok(true);
        }

        let now = self.driver.now();
        for event in self.schedule.due(now) {
            if self.feed(event)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Cancel every timer and stop the driver.
    pub fn shutdown(&mut self) {
        self.schedule.cancel_all();
        self.driver.stop();
    }

    fn feed(&mut self, event: AppEvent) -> Result<bool, D::Error> {
        let actions = self.app.handle(event);
        self.process_actions(actions)
    }

    /// Execute actions returned by the App.
    ///
    /// Consecutive render requests collapse into one draw after the batch.
    /// Returns `true` if should quit.
    fn process_actions(&mut self, actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut render = false;
        for action in actions {
            match action {
                AppAction::Render => render = true,
                AppAction::Quit => return Ok(true),
                AppAction::Request(request) => {
                    debug!(endpoint = request.endpoint().path(), ?request, "dispatching");
                    self.driver.dispatch(request)?;
                },
                AppAction::RestartTypingTimer => {
                    self.schedule.arm_typing_idle(self.driver.now());
                },
            }
        }
        if render {
            self.driver.render(&self.app)?;
        }
        Ok(false)
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a reference to the driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
