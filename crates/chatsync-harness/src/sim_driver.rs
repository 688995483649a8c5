//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as `TerminalDriver` but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`chatsync_app::Runtime`] orchestration code runs in both production and
//! simulation.
//!
//! Time is virtual. Each poll does exactly one thing, in this order:
//!
//! 1. Return an injected event, if any.
//! 2. Complete the oldest in-flight request through the [`Bridge`], unless
//!    completions are held.
//! 3. Advance the clock by one tick and return [`AppEvent::Tick`].
//!
//! Holding completions lets a test pile up requests, reorder them, and release
//! them one by one to reproduce out-of-order responses.

use std::{
    collections::VecDeque,
    ops::Add,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chatsync_app::{
    ApiRequest, App, AppEvent, Bridge, Driver, KeyInput, Runtime,
    view::{self, View},
};
use chatsync_client::ChatApi;
use rand::{Rng, seq::SliceRandom};

/// Default virtual time advanced per idle poll.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Virtual instant: time elapsed since the simulation started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimInstant(pub Duration);

impl Add<Duration> for SimInstant {
    type Output = SimInstant;

    fn add(self, rhs: Duration) -> SimInstant {
        SimInstant(self.0 + rhs)
    }
}

/// Error type for simulation driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimDriverError {
    /// A request was dispatched after [`Driver::stop`].
    #[error("request dispatched after stop: {0}")]
    Stopped(String),
}

/// Shared state for event injection and inspection.
///
/// This allows a test to reach the driver while the runtime owns it.
#[derive(Default)]
struct SharedState {
    now: SimInstant,
    injected: VecDeque<AppEvent>,
    in_flight: VecDeque<ApiRequest>,
    dispatched: Vec<ApiRequest>,
    hold: bool,
    releases: usize,
    renders: usize,
    last_view: Option<View>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Implements [`Driver`] trait so the same [`chatsync_app::Runtime`]
/// orchestration code runs in both the terminal client and simulation tests.
pub struct SimDriver {
    bridge: Bridge<dyn ChatApi>,
    state: Arc<Mutex<SharedState>>,
    tick: Duration,
}

/// Test-side handle to a [`SimDriver`]. Clones share state.
#[derive(Clone)]
pub struct SimHandle {
    state: Arc<Mutex<SharedState>>,
}

fn lock(state: &Mutex<SharedState>) -> MutexGuard<'_, SharedState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SimDriver {
    /// Create a driver whose requests run against `api`.
    pub fn new(api: Arc<dyn ChatApi>) -> Self {
        Self {
            bridge: Bridge::new(api),
            state: Arc::new(Mutex::new(SharedState::default())),
            tick: DEFAULT_TICK,
        }
    }

    /// Advance the clock by `tick` per idle poll.
    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.max(Duration::from_millis(1));
        self
    }

    /// Handle for injecting events and inspecting the driver.
    pub fn handle(&self) -> SimHandle {
        SimHandle { state: Arc::clone(&self.state) }
    }
}

impl SimHandle {
    fn lock(&self) -> MutexGuard<'_, SharedState> {
        lock(&self.state)
    }

    /// Current virtual time.
    pub fn now(&self) -> SimInstant {
        self.lock().now
    }

    /// Inject an `AppEvent` for processing.
    pub fn inject_event(&self, event: AppEvent) {
        self.lock().injected.push_back(event);
    }

    /// Inject a key press.
    pub fn press(&self, key: KeyInput) {
        self.inject_event(AppEvent::Key(key));
    }

    /// Inject one key press per character of `text`.
    pub fn type_text(&self, text: &str) {
        let mut state = self.lock();
        state.injected.extend(text.chars().map(|c| AppEvent::Key(KeyInput::Char(c))));
    }

    /// Stop completing requests until [`SimHandle::release`].
    pub fn hold(&self) {
        self.lock().hold = true;
    }

    /// Resume completing requests in order.
    pub fn release(&self) {
        let mut state = self.lock();
        state.hold = false;
        state.releases = 0;
    }

    /// Requests dispatched but not yet completed, oldest first.
    pub fn in_flight(&self) -> Vec<ApiRequest> {
        self.lock().in_flight.iter().cloned().collect()
    }

    /// Let the in-flight request at `index` complete next, even while held.
    ///
    /// Returns `false` if there is no such request.
    pub fn complete(&self, index: usize) -> bool {
        let mut state = self.lock();
        let Some(request) = state.in_flight.remove(index) else {
            return false;
        };
        let front = state.releases;
        state.in_flight.insert(front, request);
        state.releases += 1;
        true
    }

    /// Shuffle the in-flight requests.
    pub fn shuffle_in_flight<R: Rng>(&self, rng: &mut R) {
        let mut state = self.lock();
        let released = state.releases.min(state.in_flight.len());
        state.in_flight.make_contiguous()[released..].shuffle(rng);
    }

    /// Every request dispatched so far.
    pub fn dispatched(&self) -> Vec<ApiRequest> {
        self.lock().dispatched.clone()
    }

    /// Number of draws.
    pub fn renders(&self) -> usize {
        self.lock().renders
    }

    /// Screen as last drawn.
    pub fn last_view(&self) -> Option<View> {
        self.lock().last_view.clone()
    }

    /// Whether the runtime shut the driver down.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = SimInstant;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        let request = {
            let mut state = lock(&self.state);
            if let Some(event) = state.injected.pop_front() {
                return Ok(Some(event));
            }
            if state.hold && state.releases == 0 {
                None
            } else {
                let request = state.in_flight.pop_front();
                if request.is_some() {
                    state.releases = state.releases.saturating_sub(1);
                }
                request
            }
        };

        match request {
            Some(request) => Ok(Some(self.bridge.execute(request).await)),
            None => {
                let mut state = lock(&self.state);
                state.now = state.now + self.tick;
                Ok(Some(AppEvent::Tick))
            },
        }
    }

    fn dispatch(&mut self, request: ApiRequest) -> Result<(), Self::Error> {
        let mut state = lock(&self.state);
        if state.stopped {
            return Err(SimDriverError::Stopped(request.endpoint().path().to_string()));
        }
        state.dispatched.push(request.clone());
        state.in_flight.push_back(request);
        Ok(())
    }

    fn now(&self) -> Self::Instant {
        lock(&self.state).now
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let mut state = lock(&self.state);
        state.renders += 1;
        state.last_view = Some(view::render(app));
        Ok(())
    }

    fn stop(&mut self) {
        let mut state = lock(&self.state);
        state.stopped = true;
        state.in_flight.clear();
    }
}

/// Step `runtime` until virtual time reaches `now + duration`.
///
/// Returns `Ok(true)` if the App asked to quit on the way.
///
/// # Errors
///
/// Returns the driver error that stopped the loop.
pub async fn run_for(
    runtime: &mut Runtime<SimDriver>,
    duration: Duration,
) -> Result<bool, SimDriverError> {
    let handle = runtime.driver().handle();
    let until = handle.now() + duration;
    while handle.now() < until {
        if runtime.step().await? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Step `runtime` until no injected events or releasable requests remain,
/// without advancing the clock.
///
/// # Errors
///
/// Returns the driver error that stopped the loop.
pub async fn settle(runtime: &mut Runtime<SimDriver>) -> Result<bool, SimDriverError> {
    let handle = runtime.driver().handle();
    loop {
        let idle = {
            let state = handle.lock();
            state.injected.is_empty()
                && (state.in_flight.is_empty() || (state.hold && state.releases == 0))
        };
        if idle {
            return Ok(false);
        }
        if runtime.step().await? {
            return Ok(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use chatsync_app::{ApiReply, SyncConfig};

    use super::*;
    use crate::SimServer;

    fn driver(server: &SimServer) -> SimDriver {
        SimDriver::new(Arc::new(server.session("alice")))
    }

    #[tokio::test]
    async fn injected_events_come_first() {
        let server = SimServer::new();
        let mut driver = driver(&server);
        let handle = driver.handle();
        driver.dispatch(ApiRequest::ListUsers).unwrap();
        handle.press(KeyInput::Tab);

        let first = driver.poll_event().await.unwrap();
        assert!(matches!(first, Some(AppEvent::Key(KeyInput::Tab))));
        let second = driver.poll_event().await.unwrap();
        assert!(matches!(
            second,
            Some(AppEvent::Response { request: ApiRequest::ListUsers, result: Ok(ApiReply::Users(_)) })
        ));
    }

    #[tokio::test]
    async fn idle_poll_advances_clock() {
        let server = SimServer::new();
        let mut driver = driver(&server).with_tick(Duration::from_millis(250));

        assert!(matches!(driver.poll_event().await.unwrap(), Some(AppEvent::Tick)));
        assert_eq!(driver.now(), SimInstant(Duration::from_millis(250)));
    }

    #[tokio::test]
    async fn held_requests_complete_in_chosen_order() {
        let server = SimServer::new();
        let mut driver = driver(&server);
        let handle = driver.handle();
        handle.hold();
        driver.dispatch(ApiRequest::ListUsers).unwrap();
        driver.dispatch(ApiRequest::GetTyping).unwrap();

        assert!(matches!(driver.poll_event().await.unwrap(), Some(AppEvent::Tick)));
        assert!(handle.complete(1));
        let event = driver.poll_event().await.unwrap();
        assert!(matches!(event, Some(AppEvent::Response { request: ApiRequest::GetTyping, .. })));
        assert!(matches!(driver.poll_event().await.unwrap(), Some(AppEvent::Tick)));
        assert_eq!(handle.in_flight(), vec![ApiRequest::ListUsers]);
    }

    #[tokio::test]
    async fn dispatch_after_stop_fails() {
        let server = SimServer::new();
        let mut driver = driver(&server);
        driver.stop();

        assert!(driver.dispatch(ApiRequest::GetTyping).is_err());
    }

    #[tokio::test]
    async fn run_for_drives_presence_polls() {
        let server = SimServer::new();
        server.connect("alice");
        let driver = driver(&server);
        let handle = driver.handle();
        let mut runtime = Runtime::new(driver, App::new("alice"), &SyncConfig::default());
        runtime.start().unwrap();

        let quit = run_for(&mut runtime, Duration::from_millis(6_050)).await.unwrap();

        assert!(!quit);
        let polls = handle.dispatched().iter().filter(|r| **r == ApiRequest::ListUsers).count();
        assert_eq!(polls, 3);
        assert!(handle.renders() > 0);
    }
}
