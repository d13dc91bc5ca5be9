//! Textual command language.
//!
//! Every interactive operation has a command form, so hosts, scripts and
//! tests drive the engine the same way. Times accept units (`15ns`) or bare
//! ticks; commands and their aliases are case-insensitive.

use wavescope_common::Timescale;
use wavescope_format::Base;
use wavescope_viewport::parse_time;

/// A parsed engine command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Zoom in one step.
    ZoomIn,
    /// Zoom out one step.
    ZoomOut,
    /// Fit the whole trace.
    ZoomFit,
    /// Zoom to a time range; the selection or default window when `None`.
    ZoomRange {
        /// Range in ticks.
        range: Option<(u64, u64)>,
    },
    /// Pan one step towards earlier times.
    PanLeft,
    /// Pan one step towards later times.
    PanRight,
    /// Place the primary cursor and center the view on it.
    Goto {
        /// Target time in ticks.
        time: u64,
    },
    /// Place or clear the primary cursor.
    Cursor {
        /// Cursor time in ticks.
        time: Option<u64>,
    },
    /// Place or clear the secondary cursor.
    Marker {
        /// Marker time in ticks.
        time: Option<u64>,
    },
    /// Select a time range.
    Select {
        /// First bound.
        start: u64,
        /// Second bound.
        end: u64,
    },
    /// Clear the selection.
    ClearSelection,
    /// Show the bits of a bus.
    Expand {
        /// Signal name.
        name: String,
    },
    /// Hide the bits of a bus.
    Collapse {
        /// Signal name.
        name: String,
    },
    /// Expand every bus.
    ExpandAll,
    /// Collapse every bus.
    CollapseAll,
    /// Set a signal's display base.
    Format {
        /// Signal name.
        name: String,
        /// New base.
        base: Base,
    },
    /// Set a signal's signedness; `None` restores auto-detection.
    Signed {
        /// Signal name.
        name: String,
        /// Explicit signedness.
        signed: Option<bool>,
    },
    /// Toggle the signal options panel (format badges).
    Options,
    /// Move the primary cursor to the next time a signal shows a value.
    Find {
        /// Signal name.
        name: String,
        /// Value in the signal's display format.
        value: String,
    },
}

fn arg<'a>(parts: &[&'a str], idx: usize, usage: &str) -> Result<&'a str, String> {
    parts
        .get(idx)
        .copied()
        .ok_or_else(|| format!("usage: {usage}"))
}

fn time_arg(text: &str, timescale: Timescale) -> Result<u64, String> {
    parse_time(text, timescale).map_err(|e| format!("invalid time: {e}"))
}

fn optional_time(parts: &[&str], timescale: Timescale) -> Result<Option<u64>, String> {
    match parts.get(1) {
        None => Ok(None),
        Some(t) if t.eq_ignore_ascii_case("off") || t.eq_ignore_ascii_case("clear") => Ok(None),
        Some(t) => time_arg(t, timescale).map(Some),
    }
}

/// Parses one command line, reading times in `timescale` ticks.
pub fn parse_command(input: &str, timescale: Timescale) -> Result<Command, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty command".to_string());
    }

    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    let cmd = parts[0].to_lowercase();

    match cmd.as_str() {
        "zoomin" | "zi" | "+" => Ok(Command::ZoomIn),
        "zoomout" | "zo" | "-" => Ok(Command::ZoomOut),
        "zoomfit" | "zf" | "fit" => Ok(Command::ZoomFit),
        "zoom" | "zr" => {
            if parts.len() == 1 {
                return Ok(Command::ZoomRange { range: None });
            }
            let usage = "zoom <start> <end>";
            let start = time_arg(arg(&parts, 1, usage)?, timescale)?;
            let end = time_arg(arg(&parts, 2, usage)?, timescale)?;
            Ok(Command::ZoomRange {
                range: Some((start, end)),
            })
        }
        "left" | "pl" => Ok(Command::PanLeft),
        "right" | "pr" => Ok(Command::PanRight),
        "goto" | "g" => {
            let time = time_arg(arg(&parts, 1, "goto <time> (e.g. 'goto 15ns')")?, timescale)?;
            Ok(Command::Goto { time })
        }
        "cursor" | "c" => Ok(Command::Cursor {
            time: optional_time(&parts, timescale)?,
        }),
        "marker" | "m" => Ok(Command::Marker {
            time: optional_time(&parts, timescale)?,
        }),
        "select" | "sel" => {
            let usage = "select <start> <end>";
            let start = time_arg(arg(&parts, 1, usage)?, timescale)?;
            let end = time_arg(arg(&parts, 2, usage)?, timescale)?;
            Ok(Command::Select { start, end })
        }
        "unselect" | "clear" => Ok(Command::ClearSelection),
        "expand" | "ex" => Ok(Command::Expand {
            name: arg(&parts, 1, "expand <signal>")?.to_string(),
        }),
        "collapse" | "co" => Ok(Command::Collapse {
            name: arg(&parts, 1, "collapse <signal>")?.to_string(),
        }),
        "expandall" => Ok(Command::ExpandAll),
        "collapseall" => Ok(Command::CollapseAll),
        "format" | "fmt" => {
            let usage = "format <signal> <bin|dec|hex>";
            let name = arg(&parts, 1, usage)?.to_string();
            let base = arg(&parts, 2, usage)?.parse::<Base>()?;
            Ok(Command::Format { name, base })
        }
        "signed" => {
            let usage = "signed <signal> [on|off|auto]";
            let name = arg(&parts, 1, usage)?.to_string();
            let signed = match parts.get(2).map(|s| s.to_lowercase()).as_deref() {
                None | Some("on") | Some("true") | Some("yes") => Some(true),
                Some("off") | Some("false") | Some("no") => Some(false),
                Some("auto") => None,
                Some(other) => return Err(format!("invalid signedness '{other}'; {usage}")),
            };
            Ok(Command::Signed { name, signed })
        }
        "options" | "opts" => Ok(Command::Options),
        "find" | "f" => {
            let usage = "find <signal> <value>";
            let name = arg(&parts, 1, usage)?.to_string();
            let value = arg(&parts, 2, usage)?.to_string();
            Ok(Command::Find { name, value })
        }
        other => Err(format!("unknown command '{other}'")),
    }
}
