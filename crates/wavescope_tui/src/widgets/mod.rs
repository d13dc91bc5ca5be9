//! TUI widget modules.
//!
//! Each module contains a rendering function that draws one panel of the
//! viewer into a ratatui buffer.

pub mod command_input;
pub mod signal_list;
pub mod status_bar;
pub mod waveform;

use ratatui::style::Color as TermColor;
use wavescope_common::Color;

/// Converts an engine colour to a terminal colour, dropping alpha.
pub(crate) fn term_color(color: Color) -> TermColor {
    TermColor::Rgb(color.r, color.g, color.b)
}
