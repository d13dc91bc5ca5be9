//! Timestamped command scripts.
//!
//! A script holds one `@<ms> <command>` entry per line. Entries run in
//! timestamp order; entries with equal timestamps keep their file order.
//! Blank lines and lines starting with `#` are ignored.

use crate::error::EngineError;

/// One scheduled command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptEntry {
    /// Offset from script start in milliseconds.
    pub at_ms: u64,
    /// 1-based source line.
    pub line: usize,
    /// The command text.
    pub command: String,
}

/// Parses and orders a script.
///
/// # Errors
///
/// Returns [`EngineError::Script`] for a line without a valid `@<ms>`
/// prefix or without a command.
pub fn parse_script(text: &str) -> Result<Vec<ScriptEntry>, EngineError> {
    let mut entries = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let fail = |msg: String| EngineError::Script {
            line,
            source: Box::new(EngineError::InvalidCommand(msg)),
        };
        let Some(rest) = trimmed.strip_prefix('@') else {
            return Err(fail(format!("expected '@<ms> <command>', got '{trimmed}'")));
        };
        let (stamp, command) = rest
            .split_once(char::is_whitespace)
            .ok_or_else(|| fail("missing command after timestamp".to_string()))?;
        let at_ms = stamp
            .parse::<u64>()
            .map_err(|_| fail(format!("invalid timestamp '{stamp}'")))?;
        entries.push(ScriptEntry {
            at_ms,
            line,
            command: command.trim().to_string(),
        });
    }
    entries.sort_by_key(|e| e.at_ms);
    Ok(entries)
}
