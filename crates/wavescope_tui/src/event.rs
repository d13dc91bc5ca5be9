//! Event source for the TUI.
//!
//! Polls crossterm for keyboard, mouse and resize events; an expired poll
//! becomes a [`TuiEvent::Tick`] so the loop redraws periodically.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};

/// Events consumed by the main loop.
#[derive(Clone, Debug)]
pub enum TuiEvent {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// Nothing happened within the poll timeout.
    Tick,
    /// The terminal was resized.
    Resize(u16, u16),
}

/// Polls for the next event, returning [`TuiEvent::Tick`] on timeout.
///
/// Key releases and repeats reported by some terminals are folded into
/// ticks so each press acts once.
pub fn poll_event(timeout: Duration) -> std::io::Result<TuiEvent> {
    if !event::poll(timeout)? {
        return Ok(TuiEvent::Tick);
    }
    Ok(match event::read()? {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => TuiEvent::Key(key),
        CrosstermEvent::Mouse(mouse) => TuiEvent::Mouse(mouse),
        CrosstermEvent::Resize(w, h) => TuiEvent::Resize(w, h),
        _ => TuiEvent::Tick,
    })
}
