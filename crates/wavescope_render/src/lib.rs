//! Waveform rendering onto an abstract 2-D [`Surface`].
//!
//! [`render`] draws one frame of a [`Scene`]: background and row shading,
//! the time grid and axis, scalar traces and bus capsules with
//! level-of-detail collapsing, expanded bus bits, and the interactive
//! overlays. The renderer holds no state between frames.
//!
//! [`DrawList`] is a recording surface; hosts replay it onto their own
//! canvas and tests inspect it directly.

#![warn(missing_docs)]

pub mod draw_list;
pub mod geometry;
pub mod layout;
pub mod renderer;
pub mod scene;
pub mod surface;

pub use draw_list::{DrawCommand, DrawList};
pub use geometry::{capsule_points, fit_text, lod_runs, text_width, visible_segments, Run, Segment};
pub use layout::{Layout, Row, RowKind};
pub use renderer::render;
pub use scene::{FormatTable, Overlays, Scene, Tooltip};
pub use surface::{Fill, LineStyle, Point, Rect, Stroke, Surface, TextAnchor, TextStyle};
