//! The `wavescope value` command: prints a signal's value at a time.

use wavescope_engine::WaveformEngine;
use wavescope_viewport::parse_time;

use crate::pipeline::{load_settings, open_trace};
use crate::{GlobalArgs, ValueArgs};

/// Runs the `value` command and returns the process exit code.
pub fn run(args: &ValueArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_settings(global)?;
    let mut engine = open_trace(&args.file, config)?;
    println!("{}", lookup(&mut engine, args)?);
    Ok(0)
}

/// Applies the format flags and reads the value.
fn lookup(engine: &mut WaveformEngine, args: &ValueArgs) -> Result<String, Box<dyn std::error::Error>> {
    let time = parse_time(&args.time, engine.store().timescale())
        .map_err(|e| format!("invalid time '{}': {e}", args.time))?;
    let id = engine.lookup(&args.signal)?;
    if let Some(base) = args.base {
        engine.set_signal_format(id, base);
    }
    if args.signed {
        engine.set_signal_signed(id, Some(true));
    }
    Ok(engine.value_at(&args.signal, time)?)
}
