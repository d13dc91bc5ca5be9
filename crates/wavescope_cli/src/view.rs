//! The `wavescope view` command: opens a trace in the terminal viewer.

use crate::pipeline::{load_settings, open_trace, run_script_file};
use crate::{GlobalArgs, ViewArgs};

/// Runs the `view` command and returns the process exit code.
pub fn run(args: &ViewArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_settings(global)?;
    let mut engine = open_trace(&args.file, config)?;
    if let Some(ref script) = args.script {
        run_script_file(&mut engine, script)?;
    }
    wavescope_tui::run_viewer(engine)?;
    Ok(0)
}
