//! Terminal waveform viewer.
//!
//! A ratatui shell around [`WaveformEngine`]: a signal list with values at
//! the cursor, a waveform panel replaying the engine's frames onto a
//! braille canvas, a status bar and a `:` command bar speaking the engine's
//! command language.
//!
//! # Layout
//!
//! - **Signal List** (left): names, widths, values at the cursor
//! - **Waveform** (right): traces, time axis, cursors and selection
//! - **Status Bar**: mode, cursor time, cursor delta, zoom, message
//! - **Command Input**: key hints or the command prompt

#![warn(missing_docs)]

pub mod app;
pub mod commands;
pub mod error;
pub mod event;
pub mod render;
pub mod state;
pub mod terminal;
pub mod widgets;

use std::time::Duration;

use wavescope_engine::WaveformEngine;

pub use app::TuiApp;
pub use error::TuiError;
use event::{poll_event, TuiEvent};
use state::InputMode;
use terminal::{init_terminal, install_panic_hook, restore_terminal, Tui};

/// Runs the viewer on a loaded engine until the user quits.
///
/// The terminal is restored on exit, on error and on panic.
///
/// # Errors
///
/// Returns [`TuiError::Terminal`] if the terminal cannot be set up, drawn
/// or polled.
pub fn run_viewer(engine: WaveformEngine) -> Result<(), TuiError> {
    install_panic_hook();
    let mut terminal = init_terminal()?;
    let mut app = TuiApp::new(engine);
    let result = run_loop(&mut app, &mut terminal);
    restore_terminal()?;
    result
}

fn run_loop(app: &mut TuiApp, terminal: &mut Tui) -> Result<(), TuiError> {
    let tick_rate = Duration::from_millis(50);

    while !app.should_quit {
        terminal.draw(|frame| render::render(app, frame))?;

        match poll_event(tick_rate)? {
            TuiEvent::Key(key) => match app.state.mode {
                InputMode::Normal => app.handle_normal_key(key.code),
                InputMode::Command => app.handle_command_key(key.code),
            },
            TuiEvent::Mouse(mouse) => app.handle_mouse(mouse),
            // Panel sizes are re-read on the next draw.
            TuiEvent::Resize(..) | TuiEvent::Tick => {}
        }
    }
    log::debug!("viewer closed");
    Ok(())
}
