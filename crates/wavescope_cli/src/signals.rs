//! The `wavescope signals` command: lists the signals of a trace.

use std::io::Write;

use wavescope_engine::WaveformEngine;

use crate::pipeline::{load_settings, open_trace};
use crate::{GlobalArgs, SignalsArgs};

/// Runs the `signals` command and returns the process exit code.
pub fn run(args: &SignalsArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_settings(global)?;
    let engine = open_trace(&args.file, config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        write_json(&engine, &mut out)?;
    } else {
        write_table(&engine, &mut out)?;
    }
    Ok(0)
}

/// Writes the signal list as pretty-printed JSON.
fn write_json(engine: &WaveformEngine, out: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(&engine.signal_list())?;
    writeln!(out, "{json}")?;
    Ok(())
}

/// Writes one aligned `name width kind` row per signal.
fn write_table(engine: &WaveformEngine, out: &mut dyn Write) -> std::io::Result<()> {
    let signals = engine.signal_list();
    let name_width = signals
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    writeln!(out, "{:<name_width$}  WIDTH  KIND", "NAME")?;
    for s in &signals {
        let kind = if s.is_bus { "bus" } else { "scalar" };
        writeln!(out, "{:<name_width$}  {:>5}  {kind}", s.name, s.width)?;
    }
    Ok(())
}
