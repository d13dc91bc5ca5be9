//! Export formats, options and payloads.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use wavescope_common::Color;
use wavescope_config::ExportDefaults;

use crate::error::ExportError;

/// A static output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Scalable vector graphics document.
    #[default]
    Svg,
    /// Rasterized PNG image.
    Png,
    /// Single-page PDF document.
    Pdf,
}

impl ExportFormat {
    /// Returns the conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::Png => "png",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// Returns the MIME type of the payload.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::Png => "image/png",
            ExportFormat::Pdf => "application/pdf",
        }
    }

    /// Infers the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        ext.parse()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(ExportFormat::Svg),
            "png" => Ok(ExportFormat::Png),
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Settings of one export.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    /// Output format.
    pub format: ExportFormat,
    /// Logical width in pixels, name column included.
    pub width: u32,
    /// Logical height; fitted to the rows when `None`.
    pub height: Option<u32>,
    /// Device pixel ratio for PNG output and SVG/PDF dimensions.
    pub scale: f64,
    /// Background override; the palette background when `None`.
    pub background_color: Option<Color>,
    /// Draw grid lines.
    pub show_grid: bool,
    /// Draw values inside bus capsules.
    pub show_values: bool,
    /// Exported time window in ticks; the current view when `None`.
    pub time_range: Option<(u64, u64)>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Svg,
            width: 1200,
            height: None,
            scale: 1.0,
            background_color: None,
            show_grid: true,
            show_values: true,
            time_range: None,
        }
    }
}

impl ExportOptions {
    /// Builds options from the `[export]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnsupportedFormat`] if the configured format
    /// name is unknown.
    pub fn from_defaults(defaults: &ExportDefaults) -> Result<Self, ExportError> {
        Ok(Self {
            format: defaults.format.parse()?,
            width: defaults.width,
            height: defaults.height,
            scale: defaults.scale,
            background_color: defaults.background,
            show_grid: defaults.show_grid,
            show_values: defaults.show_values,
            time_range: None,
        })
    }

    pub(crate) fn validate(&self) -> Result<(), ExportError> {
        let bad_height = self.height == Some(0);
        if self.width == 0 || bad_height || !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ExportError::InvalidSize {
                width: self.width,
                height: self.height.unwrap_or_default(),
                scale: self.scale,
            });
        }
        Ok(())
    }
}

/// An encoded image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportPayload {
    /// Encoding of `bytes`.
    pub format: ExportFormat,
    /// Logical width.
    pub width: u32,
    /// Logical height.
    pub height: u32,
    /// The encoded file content.
    pub bytes: Vec<u8>,
}

impl ExportPayload {
    /// Returns the payload as text for SVG output.
    pub fn as_text(&self) -> Option<&str> {
        match self.format {
            ExportFormat::Svg => std::str::from_utf8(&self.bytes).ok(),
            _ => None,
        }
    }

    /// Writes the payload to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), ExportError> {
        std::fs::write(path, &self.bytes).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(())
    }
}
