//! Viewport transform between trace time and screen pixels.
//!
//! A [`Viewport`] owns the [`ViewState`] (pan, time scale and zoom) for a
//! panel of a given pixel width showing a trace that ends at `max_time`.
//! All mutation goes through its zoom and pan operations, which keep
//! `time_scale == base_scale * zoom` with `zoom` clamped to
//! [`MIN_ZOOM`]..=[`MAX_ZOOM`].
//!
//! The [`ticks`] module picks grid spacing and [`units`] renders times in a
//! readable unit.

#![warn(missing_docs)]

pub mod selection;
pub mod ticks;
pub mod units;
pub mod view;

pub use selection::{CursorPair, SelectionRange};
pub use ticks::{nice_tick_step, Tick, MAJOR_TICK_FACTOR, MINOR_TICK_PX};
pub use units::{best_time_unit, format_time, parse_time, ScaledTime};
pub use view::{
    ViewState, Viewport, MAX_ZOOM, MIN_ZOOM, PAN_STEP_PX, WHEEL_ZOOM_STEP, ZOOM_STEP,
};
