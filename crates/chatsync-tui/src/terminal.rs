//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. Each API request runs on its own
//! tokio task; completions are collected from a [`JoinSet`] in whatever order
//! they finish.

use std::{
    io::{self, Stdout, stdout},
    sync::Arc,
    time::{Duration, Instant},
};

use chatsync_app::{ApiRequest, App, AppEvent, Bridge, Driver, KeyInput, view};
use chatsync_client::ChatApi;
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::warn;

use crate::ui;

/// Longest wait for input before the runtime checks its timers.
const TICK: Duration = Duration::from_millis(100);

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The terminal input stream ended.
    #[error("terminal input closed")]
    InputClosed,
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Handles terminal I/O (crossterm), rendering (ratatui), and request
/// execution (tokio tasks through a [`Bridge`]).
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    bridge: Bridge<dyn ChatApi>,
    requests: JoinSet<AppEvent>,
}

impl TerminalDriver {
    /// Take over the terminal; requests run against `api`.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or the alternate screen cannot be entered.
    pub fn new(api: Arc<dyn ChatApi>) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        let terminal = setup_or_restore(
            || {
                stdout().execute(EnterAlternateScreen)?;
                Terminal::new(CrosstermBackend::new(stdout()))
            },
            restore_terminal,
        )?;

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            bridge: Bridge::new(api),
            requests: JoinSet::new(),
        })
    }

    /// Convert crossterm `KeyCode` to `KeyInput`.
    fn convert_key(code: KeyCode) -> Option<KeyInput> {
        match code {
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Tab | KeyCode::BackTab => Some(KeyInput::Tab),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Up => Some(KeyInput::Up),
            KeyCode::Down => Some(KeyInput::Down),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Instant = Instant;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        tokio::select! {
            biased;

            // Terminal events
            maybe_event = self.event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        Ok(Self::convert_key(key.code).map(AppEvent::Key))
                    },
                    // Redraw on resize
                    Some(Ok(Event::Resize(..))) => Ok(Some(AppEvent::Tick)),
                    Some(Ok(_)) => Ok(None),
                    Some(Err(e)) => Err(TerminalError::Io(e)),
                    None => Err(TerminalError::InputClosed),
                }
            }

            // Request completions
            Some(joined) = self.requests.join_next() => {
                match joined {
                    Ok(event) => Ok(Some(event)),
                    Err(e) => {
                        warn!("request task failed: {e}");
                        Ok(None)
                    },
                }
            }

            // Tick timeout
            () = tokio::time::sleep(TICK) => Ok(Some(AppEvent::Tick)),
        }
    }

    fn dispatch(&mut self, request: ApiRequest) -> Result<(), Self::Error> {
        let bridge = self.bridge.clone();
        self.requests.spawn(async move { bridge.execute(request).await });
        Ok(())
    }

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let view = view::render(app);
        self.terminal.draw(|frame| ui::render(frame, &view))?;
        Ok(())
    }

    fn stop(&mut self) {
        self.requests.abort_all();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        restore_terminal();
    }
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
}

/// Run `setup`; if it fails, run `restore` before returning the error.
fn setup_or_restore<T>(
    setup: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce(),
) -> io::Result<T> {
    setup().inspect_err(|_| restore())
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn failed_setup_restores_terminal() {
        let restored = Cell::new(false);
        let result: io::Result<()> =
            setup_or_restore(|| Err(io::Error::other("no tty")), || restored.set(true));

        assert!(result.is_err());
        assert!(restored.get());
    }

    #[test]
    fn successful_setup_leaves_terminal_alone() {
        let restored = Cell::new(false);
        let result = setup_or_restore(|| Ok(7), || restored.set(true));

        assert_eq!(result.unwrap(), 7);
        assert!(!restored.get());
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        assert_eq!(TerminalDriver::convert_key(KeyCode::BackTab), Some(KeyInput::Tab));
        assert_eq!(TerminalDriver::convert_key(KeyCode::F(1)), None);
    }
}
