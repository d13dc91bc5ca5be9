//! The drawing primitives a render target must support.

use wavescope_common::Color;

/// A point in canvas pixels, origin at the top left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position, growing downwards.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Creates a rectangle.
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the right edge.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Returns the bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

/// Dash pattern of a stroke.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineStyle {
    /// Continuous line.
    #[default]
    Solid,
    /// Long dashes, used for unknown values.
    Dashed,
    /// Dots, used for high-impedance values.
    Dotted,
}

impl LineStyle {
    /// Returns the dash array in pixels, or `None` for solid lines.
    pub fn dash_array(self) -> Option<[f64; 2]> {
        match self {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some([6.0, 4.0]),
            LineStyle::Dotted => Some([1.5, 3.0]),
        }
    }
}

/// Line colour, width and dash pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Line colour.
    pub color: Color,
    /// Line width in pixels.
    pub width: f64,
    /// Dash pattern.
    pub style: LineStyle,
}

impl Stroke {
    /// A solid stroke.
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            style: LineStyle::Solid,
        }
    }

    /// Returns the same stroke with another dash pattern.
    pub fn with_style(self, style: LineStyle) -> Self {
        Self { style, ..self }
    }
}

/// Interior paint of a polygon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    /// Flat colour.
    Solid(Color),
    /// Diagonal hatching over a translucent wash of the same colour.
    Hatch {
        /// Hatch line colour.
        color: Color,
        /// Distance between hatch lines in pixels.
        spacing: f64,
    },
}

/// Horizontal alignment of text relative to its anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the anchor.
    #[default]
    Start,
    /// Text is centered on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

/// Text paint and placement. The anchor's `y` is the text baseline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    /// Text colour.
    pub color: Color,
    /// Font size in pixels.
    pub size: f64,
    /// Horizontal alignment.
    pub anchor: TextAnchor,
    /// Whether to use a bold weight.
    pub bold: bool,
}

impl TextStyle {
    /// A regular-weight style.
    pub fn new(color: Color, size: f64, anchor: TextAnchor) -> Self {
        Self {
            color,
            size,
            anchor,
            bold: false,
        }
    }
}

/// A 2-D drawing target.
///
/// Coordinates are logical pixels; any device scaling is the surface's
/// concern.
pub trait Surface {
    /// Fills an axis-aligned rectangle.
    fn rect(&mut self, rect: Rect, fill: Color);

    /// Draws a straight line.
    fn line(&mut self, from: Point, to: Point, stroke: &Stroke);

    /// Draws an open polyline.
    fn polyline(&mut self, points: &[Point], stroke: &Stroke);

    /// Fills a closed polygon and optionally outlines it.
    fn polygon(&mut self, points: &[Point], fill: &Fill, stroke: Option<&Stroke>);

    /// Draws a single line of text.
    fn text(&mut self, at: Point, text: &str, style: &TextStyle);
}
