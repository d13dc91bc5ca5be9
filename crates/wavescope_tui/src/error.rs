//! Viewer error types.

use std::io;

/// Errors raised while running the terminal viewer.
#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    /// Terminal setup, drawing or event polling failed.
    #[error("terminal I/O error: {0}")]
    Terminal(#[from] io::Error),
}
