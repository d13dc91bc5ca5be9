//! Configuration types deserialized from `wavescope.toml`.

use serde::{Deserialize, Serialize};
use wavescope_common::Color;
use wavescope_format::{Base, Signedness};

/// The top-level configuration parsed from `wavescope.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WavescopeConfig {
    /// Layout metrics shared by the renderer and exporter.
    pub style: Style,
    /// Colours used for every drawn element.
    pub colors: Palette,
    /// Default value display format.
    pub display: DisplayConfig,
    /// Defaults for static exports.
    pub export: ExportDefaults,
}

/// Layout metrics in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Style {
    /// Height of a scalar signal row.
    pub row_height: f64,
    /// Height of a bus signal row.
    pub bus_row_height: f64,
    /// Height of each per-bit row under an expanded bus.
    pub bit_row_height: f64,
    /// Width of the signal name column in exports.
    pub name_column_width: f64,
    /// Height of the time axis header.
    pub header_height: f64,
    /// Base font size.
    pub font_size: f64,
    /// Font family written into vector output.
    pub font_family: String,
    /// Segments narrower than this collapse into a single tick mark.
    pub lod_floor_px: f64,
    /// Bus segments narrower than this draw as a thin tick instead of a capsule.
    pub capsule_min_px: f64,
    /// Horizontal length of a capsule's slanted ends.
    pub capsule_slant_px: f64,
    /// Target spacing of minor grid lines.
    pub minor_tick_px: f64,
    /// Pan distance of one pan command.
    pub pan_step_px: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            row_height: 28.0,
            bus_row_height: 32.0,
            bit_row_height: 22.0,
            name_column_width: 180.0,
            header_height: 30.0,
            font_size: 12.0,
            font_family: "monospace".to_string(),
            lod_floor_px: 2.0,
            capsule_min_px: 6.0,
            capsule_slant_px: 4.0,
            minor_tick_px: 60.0,
            pan_step_px: 100.0,
        }
    }
}

impl Style {
    /// Returns the row height for a signal of the given kind.
    pub fn row_height_for(&self, is_bus: bool) -> f64 {
        if is_bus {
            self.bus_row_height
        } else {
            self.row_height
        }
    }
}

/// Colours for every drawn element, written as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    /// Canvas background.
    pub background: Color,
    /// Shading of every other row.
    pub row_alt: Color,
    /// Highlight of the hovered or selected row.
    pub row_highlight: Color,
    /// Minor grid lines.
    pub grid_minor: Color,
    /// Major grid lines.
    pub grid_major: Color,
    /// Axis labels and signal names.
    pub axis_text: Color,
    /// Default colour of 1-bit traces.
    pub scalar_trace: Color,
    /// Default colour of bus capsules.
    pub bus_trace: Color,
    /// Unknown (`x`) segments.
    pub unknown: Color,
    /// High-impedance (`z`) segments.
    pub high_z: Color,
    /// Selection overlay.
    pub selection: Color,
    /// Primary cursor line.
    pub cursor_primary: Color,
    /// Secondary cursor line.
    pub cursor_secondary: Color,
    /// Tooltip box fill.
    pub tooltip_background: Color,
    /// Tooltip text.
    pub tooltip_text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::rgb(0x11, 0x18, 0x27),
            row_alt: Color::rgb(0x1a, 0x22, 0x33),
            row_highlight: Color::rgba(0x3b, 0x82, 0xf6, 0x33),
            grid_minor: Color::rgb(0x24, 0x2e, 0x40),
            grid_major: Color::rgb(0x37, 0x41, 0x51),
            axis_text: Color::rgb(0xd1, 0xd5, 0xdb),
            scalar_trace: Color::rgb(0x4a, 0xde, 0x80),
            bus_trace: Color::rgb(0x38, 0xbd, 0xf8),
            unknown: Color::rgb(0xef, 0x44, 0x44),
            high_z: Color::rgb(0xfa, 0xcc, 0x15),
            selection: Color::rgba(0x60, 0xa5, 0xfa, 0x40),
            cursor_primary: Color::rgb(0xf9, 0x73, 0x16),
            cursor_secondary: Color::rgb(0xa7, 0x8b, 0xfa),
            tooltip_background: Color::rgba(0x0b, 0x0f, 0x19, 0xe6),
            tooltip_text: Color::WHITE,
        }
    }
}

/// Default value display format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Base used for signals without an override.
    pub base: Base,
    /// Signedness used for signals without an override.
    pub signedness: Signedness,
}

/// Defaults for static exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportDefaults {
    /// Output format name (`svg`, `png` or `pdf`).
    pub format: String,
    /// Logical width in pixels.
    pub width: u32,
    /// Logical height in pixels; fitted to the rows when absent.
    pub height: Option<u32>,
    /// Device pixel ratio applied to raster output and SVG dimensions.
    pub scale: f64,
    /// Whether to draw the grid.
    pub show_grid: bool,
    /// Whether to draw values inside bus capsules.
    pub show_values: bool,
    /// Background override; the palette background when absent.
    pub background: Option<Color>,
}

impl Default for ExportDefaults {
    fn default() -> Self {
        Self {
            format: "svg".to_string(),
            width: 1200,
            height: None,
            scale: 1.0,
            show_grid: true,
            show_values: true,
            background: None,
        }
    }
}
