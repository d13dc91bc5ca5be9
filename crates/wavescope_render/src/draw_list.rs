//! A surface that records draw calls.

use wavescope_common::Color;

use crate::surface::{Fill, Point, Rect, Stroke, Surface, TextStyle};

/// One recorded drawing primitive.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// A filled rectangle.
    Rect {
        /// Bounds.
        rect: Rect,
        /// Fill colour.
        fill: Color,
    },
    /// A straight line.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke.
        stroke: Stroke,
    },
    /// An open polyline.
    Polyline {
        /// Vertices.
        points: Vec<Point>,
        /// Stroke.
        stroke: Stroke,
    },
    /// A filled, optionally outlined polygon.
    Polygon {
        /// Vertices.
        points: Vec<Point>,
        /// Interior paint.
        fill: Fill,
        /// Outline.
        stroke: Option<Stroke>,
    },
    /// A line of text.
    Text {
        /// Anchor point (baseline).
        at: Point,
        /// The text.
        text: String,
        /// Paint and alignment.
        style: TextStyle,
    },
}

/// A [`Surface`] that stores every call for later replay or inspection.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded commands in draw order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns the number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Discards all recorded commands.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Returns every text string drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replays the recorded commands onto another surface.
    pub fn replay(&self, target: &mut dyn Surface) {
        for command in &self.commands {
            match command {
                DrawCommand::Rect { rect, fill } => target.rect(*rect, *fill),
                DrawCommand::Line { from, to, stroke } => target.line(*from, *to, stroke),
                DrawCommand::Polyline { points, stroke } => target.polyline(points, stroke),
                DrawCommand::Polygon {
                    points,
                    fill,
                    stroke,
                } => target.polygon(points, fill, stroke.as_ref()),
                DrawCommand::Text { at, text, style } => target.text(*at, text, style),
            }
        }
    }
}

impl Surface for DrawList {
    fn rect(&mut self, rect: Rect, fill: Color) {
        self.commands.push(DrawCommand::Rect { rect, fill });
    }

    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            stroke: *stroke,
        });
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) {
        self.commands.push(DrawCommand::Polyline {
            points: points.to_vec(),
            stroke: *stroke,
        });
    }

    fn polygon(&mut self, points: &[Point], fill: &Fill, stroke: Option<&Stroke>) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            fill: *fill,
            stroke: stroke.copied(),
        });
    }

    fn text(&mut self, at: Point, text: &str, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            at,
            text: text.to_string(),
            style: *style,
        });
    }
}
