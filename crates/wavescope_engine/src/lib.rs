//! The wavescope waveform engine.
//!
//! [`WaveformEngine`] ties the pieces together: it parses VCD text into a
//! [`SignalStore`](wavescope_store::SignalStore), holds the viewport,
//! selection, cursors and per-signal display formats, renders frames onto
//! any [`Surface`](wavescope_render::Surface) and produces static exports.
//!
//! Every interaction is also reachable through the textual command
//! language in [`commands`], which hosts use for command bars and which
//! [`WaveformEngine::run_script`] replays from timestamped scripts.
//!
//! ```
//! use wavescope_engine::WaveformEngine;
//!
//! let mut engine = WaveformEngine::default();
//! engine
//!     .load_vcd("$var wire 1 ! clk $end\n#0\n0!\n#5\n1!\n")
//!     .unwrap();
//! engine.run_command("goto 5").unwrap();
//! assert_eq!(engine.value_at("clk", 5).unwrap(), "1");
//! ```

#![warn(missing_docs)]

pub mod commands;
pub mod engine;
pub mod error;
pub mod script;

pub use commands::{parse_command, Command};
pub use engine::{CursorValue, HoverInfo, WaveformEngine};
pub use error::EngineError;
pub use script::{parse_script, ScriptEntry};
