//! Static export of waveform views to SVG, PNG and PDF.
//!
//! [`export`] lays the trace out independently of any interactive panel
//! (name column, header axis, traces) and draws it with the same renderer
//! onto a format-specific [`Surface`](wavescope_render::Surface):
//!
//! - [`SvgSurface`] writes a single-root SVG document,
//! - PNG output rasterizes that document with `resvg`,
//! - [`PdfSurface`] writes a one-page PDF with a compressed content stream.

#![warn(missing_docs)]

pub mod error;
pub mod exporter;
pub mod options;
pub mod pdf;
pub mod png;
pub mod svg;

pub use error::ExportError;
pub use exporter::{export, DisplaySettings};
pub use options::{ExportFormat, ExportOptions, ExportPayload};
pub use pdf::PdfSurface;
pub use png::rasterize;
pub use svg::SvgSurface;
