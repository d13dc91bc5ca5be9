//! Command-bar parsing for the TUI.
//!
//! Viewer-only commands are matched first; everything else goes through
//! the engine's [`parse_command`].

use wavescope_common::Timescale;
use wavescope_engine::{parse_command, Command};

/// A command typed into the `:` bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TuiCommand {
    /// An engine command.
    Engine(Command),
    /// Leave the viewer.
    Quit,
    /// Toggle the help popup.
    ToggleHelp,
}

/// Parses a command bar line.
pub fn parse_tui_command(input: &str, timescale: Timescale) -> Result<TuiCommand, String> {
    let trimmed = input.trim();
    match trimmed.to_lowercase().as_str() {
        "quit" | "q" | "exit" => Ok(TuiCommand::Quit),
        "help" | "h" | "?" => Ok(TuiCommand::ToggleHelp),
        _ => parse_command(trimmed, timescale).map(TuiCommand::Engine),
    }
}
