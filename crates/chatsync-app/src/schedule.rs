//! Poll timers and the typing debounce.
//!
//! All timers are plain deadlines owned by the [`crate::Runtime`]. The runtime
//! asks [`Schedule::due`] for expired deadlines once per cycle and feeds the
//! resulting events to the App. Generic over the instant type so simulation
//! can run on virtual time.
//!
//! # Invariants
//!
//! - At most one typing deadline exists; arming replaces it.
//! - A periodic timer fires at most once per `due` call. If the runtime fell
//!   behind by several periods the missed firings are coalesced.
//! - After [`Schedule::cancel_all`] nothing fires until [`Schedule::start`].

use std::{ops::Add, time::Duration};

use crate::{AppEvent, SyncConfig};

/// A repeating deadline.
#[derive(Debug, Clone, Copy)]
struct Timer<I> {
    period: Duration,
    next: Option<I>,
}

impl<I> Timer<I>
where
    I: Copy + Ord + Add<Duration, Output = I>,
{
    fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    fn fire(&mut self, now: I) -> bool {
        match self.next {
            Some(at) if at <= now => {
                let mut next = at + self.period;
                if next <= now {
                    next = now + self.period;
                }
                self.next = Some(next);
                true
            },
            _ => false,
        }
    }
}

/// Poll timers plus the typing debounce deadline.
#[derive(Debug, Clone)]
pub struct Schedule<I> {
    presence: Timer<I>,
    conversation: Timer<I>,
    typing_idle: Option<I>,
    idle_after: Duration,
}

impl<I> Schedule<I>
where
    I: Copy + Ord + Add<Duration, Output = I>,
{
    /// Stopped schedule with periods from `config`.
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            presence: Timer::new(config.presence_interval()),
            conversation: Timer::new(config.conversation_interval()),
            typing_idle: None,
            idle_after: config.typing_idle(),
        }
    }

    /// Start the poll timers.
    ///
    /// Presence fires immediately (initial load); the conversation poll first
    /// fires one period from now.
    pub fn start(&mut self, now: I) {
        self.presence.next = Some(now);
        self.conversation.next = Some(now + self.conversation.period);
    }

    /// Arm the typing debounce, cancelling any pending deadline.
    pub fn arm_typing_idle(&mut self, now: I) {
        self.typing_idle = Some(now + self.idle_after);
    }

    /// Events whose deadline is at or before `now`.
    pub fn due(&mut self, now: I) -> Vec<AppEvent> {
        let mut events = Vec::new();
        if self.presence.fire(now) {
            events.push(AppEvent::PresenceDue);
        }
        if self.conversation.fire(now) {
            events.push(AppEvent::ConversationDue);
        }
        if self.typing_idle.is_some_and(|at| at <= now) {
            self.typing_idle = None;
            events.push(AppEvent::TypingIdle);
        }
        events
    }

    /// Cancel every timer.
    pub fn cancel_all(&mut self) {
        self.presence.next = None;
        self.conversation.next = None;
        self.typing_idle = None;
    }

    /// Whether the poll timers are running.
    pub fn is_running(&self) -> bool {
        self.presence.next.is_some() || self.conversation.next.is_some()
    }

    /// Pending typing debounce deadline.
    pub fn typing_idle_deadline(&self) -> Option<I> {
        self.typing_idle
    }

    /// Earliest pending deadline of any timer.
    pub fn next_deadline(&self) -> Option<I> {
        [self.presence.next, self.conversation.next, self.typing_idle].into_iter().flatten().min()
    }
}
