//! Export error types.

use std::path::PathBuf;

/// Errors that can occur while exporting a waveform image.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The requested output format is not one of `svg`, `png` or `pdf`.
    #[error("unsupported export format '{0}'")]
    UnsupportedFormat(String),

    /// The requested image size or scale is unusable.
    #[error("invalid export size {width}x{height} at scale {scale}")]
    InvalidSize {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Requested scale.
        scale: f64,
    },

    /// The image could not be encoded.
    #[error("failed to encode {format} output: {message}")]
    Encode {
        /// Target format name.
        format: &'static str,
        /// Encoder message.
        message: String,
    },

    /// The image could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}
