//! Engine error types.

use wavescope_export::ExportError;
use wavescope_format::ParseDisplayError;
use wavescope_vcd::VcdError;

/// Errors returned by engine commands and queries.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The trace could not be loaded; the engine now holds an empty trace.
    #[error(transparent)]
    Vcd(#[from] VcdError),

    /// An export failed; the interactive view is unaffected.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// No signal has the given name.
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),

    /// A command line could not be parsed.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// A value could not be interpreted in the signal's display format.
    #[error(transparent)]
    Value(#[from] ParseDisplayError),

    /// A value search found no match after the cursor.
    #[error("value '{value}' not found on '{signal}'")]
    ValueNotFound {
        /// Signal name.
        signal: String,
        /// The searched value as typed.
        value: String,
    },

    /// A script line failed.
    #[error("script line {line}: {source}")]
    Script {
        /// 1-based line number in the script.
        line: usize,
        /// The failure.
        source: Box<EngineError>,
    },
}
