//! Error types for VCD loading.

use std::path::PathBuf;

/// Errors that can occur while loading a VCD trace.
///
/// Malformed lines are never errors; they are skipped and counted in
/// [`ParseStats`](crate::ParseStats). Only input that cannot yield a trace at
/// all is rejected.
#[derive(Debug, thiserror::Error)]
pub enum VcdError {
    /// The input text is empty or whitespace only.
    #[error("VCD input is empty")]
    Empty,

    /// The input declares no `$var` signals.
    #[error("VCD input declares no signals")]
    NoDeclarations,

    /// The trace file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path of the file that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
