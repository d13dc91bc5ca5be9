//! View state and the operations that mutate it.

use serde::{Deserialize, Serialize};

use crate::ticks::{nice_tick_step, Tick, MAJOR_TICK_FACTOR, MINOR_TICK_PX};

/// Zoom factor applied by one zoom-in or zoom-out command.
pub const ZOOM_STEP: f64 = 1.5;
/// Zoom factor applied by one mouse wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;
/// Smallest allowed zoom relative to fit-to-view.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest allowed zoom relative to fit-to-view.
pub const MAX_ZOOM: f64 = 10.0;
/// Default pan distance in pixels.
pub const PAN_STEP_PX: f64 = 100.0;

/// The pan/zoom state of a waveform panel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    /// Time at the left edge of the panel, in trace ticks.
    pub pan: f64,
    /// Pixels per trace tick.
    pub time_scale: f64,
    /// Zoom relative to fit-to-view, in `[MIN_ZOOM, MAX_ZOOM]`.
    pub zoom: f64,
}

/// Maps trace time onto a panel of `width` pixels.
#[derive(Clone, Debug)]
pub struct Viewport {
    state: ViewState,
    width: f64,
    max_time: u64,
    base_scale: f64,
    pan_step_px: f64,
}

impl Viewport {
    /// Creates a viewport fitted to `max_time` over `width` pixels.
    pub fn new(width: f64, max_time: u64) -> Self {
        let mut vp = Self {
            state: ViewState {
                pan: 0.0,
                time_scale: 1.0,
                zoom: 1.0,
            },
            width: sanitize_width(width),
            max_time,
            base_scale: 1.0,
            pan_step_px: PAN_STEP_PX,
        };
        vp.fit_to_view();
        vp
    }

    /// Returns the current view state.
    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Returns the panel width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the trace end time this viewport is fitted against.
    pub fn max_time(&self) -> u64 {
        self.max_time
    }

    /// Returns the fit-to-view scale in pixels per tick.
    pub fn base_scale(&self) -> f64 {
        self.base_scale
    }

    /// Overrides the pan distance used by [`pan_left`](Self::pan_left) and
    /// [`pan_right`](Self::pan_right).
    pub fn set_pan_step_px(&mut self, px: f64) {
        if px.is_finite() && px > 0.0 {
            self.pan_step_px = px;
        }
    }

    /// Changes the panel width, keeping pan and zoom.
    pub fn resize(&mut self, width: f64) {
        self.width = sanitize_width(width);
        self.base_scale = self.width / self.max_time.max(1) as f64;
        self.state.time_scale = self.base_scale * self.state.zoom;
    }

    /// Changes the trace end time and refits the view.
    pub fn set_max_time(&mut self, max_time: u64) {
        self.max_time = max_time;
        self.fit_to_view();
    }

    /// Shows the whole trace: `zoom = 1`, `pan = 0`.
    pub fn fit_to_view(&mut self) {
        self.base_scale = self.width / self.max_time.max(1) as f64;
        self.state = ViewState {
            pan: 0.0,
            time_scale: self.base_scale,
            zoom: 1.0,
        };
    }

    /// Multiplies the zoom by [`ZOOM_STEP`].
    pub fn zoom_in(&mut self) {
        self.set_zoom(self.state.zoom * ZOOM_STEP);
    }

    /// Divides the zoom by [`ZOOM_STEP`].
    pub fn zoom_out(&mut self) {
        self.set_zoom(self.state.zoom / ZOOM_STEP);
    }

    /// Moves the view earlier by the pan step.
    pub fn pan_left(&mut self) {
        self.pan_by_px(-self.pan_step_px);
    }

    /// Moves the view later by the pan step.
    pub fn pan_right(&mut self) {
        self.pan_by_px(self.pan_step_px);
    }

    /// Shifts the view by `dx` pixels (positive is later in time).
    pub fn pan_by_px(&mut self, dx: f64) {
        let pan = self.state.pan + dx / self.state.time_scale;
        self.state.pan = self.clamp_pan(pan);
    }

    /// Shows `[start, end]` across the panel.
    ///
    /// The zoom is clamped, so very short or very long ranges show as close
    /// to the request as the zoom limits allow, starting at `start`.
    pub fn zoom_to_range(&mut self, start: f64, end: f64) {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        let span = (end - start).max(1.0);
        self.set_zoom((self.width / span) / self.base_scale);
        self.state.pan = self.clamp_pan(start);
    }

    /// Zooms around the pixel column `mouse_x`.
    ///
    /// Negative `delta_y` (wheel up) zooms in by [`WHEEL_ZOOM_STEP`],
    /// positive zooms out, zero is ignored. The time under `mouse_x` stays
    /// at `mouse_x` unless the pan would become negative.
    pub fn wheel_zoom(&mut self, mouse_x: f64, delta_y: f64) {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        let anchor = self.x_to_time(mouse_x);
        let zoom = if delta_y < 0.0 {
            self.state.zoom * WHEEL_ZOOM_STEP
        } else {
            self.state.zoom / WHEEL_ZOOM_STEP
        };
        self.set_zoom(zoom);
        let pan = anchor - mouse_x / self.state.time_scale;
        self.state.pan = self.clamp_pan(pan);
    }

    /// Scrolls so that `time` sits in the middle of the panel.
    pub fn center_on(&mut self, time: f64) {
        let half = self.visible_span() / 2.0;
        self.state.pan = self.clamp_pan(time - half);
    }

    /// Converts a trace time to a pixel column.
    pub fn time_to_x(&self, time: f64) -> f64 {
        (time - self.state.pan) * self.state.time_scale
    }

    /// Converts a pixel column to a trace time.
    pub fn x_to_time(&self, x: f64) -> f64 {
        self.state.pan + x / self.state.time_scale
    }

    /// Returns the length of the visible window in ticks.
    pub fn visible_span(&self) -> f64 {
        self.width / self.state.time_scale
    }

    /// Returns the visible `(start, end)` time window.
    pub fn visible_range(&self) -> (f64, f64) {
        (self.state.pan, self.state.pan + self.visible_span())
    }

    /// Returns the visible window widened to whole ticks.
    pub fn visible_ticks(&self) -> (u64, u64) {
        let (start, end) = self.visible_range();
        (start.floor().max(0.0) as u64, end.ceil().max(0.0) as u64)
    }

    /// Returns the minor grid step in ticks.
    pub fn minor_tick_step(&self) -> f64 {
        nice_tick_step(MINOR_TICK_PX, self.state.time_scale)
    }

    /// Returns the grid ticks inside the visible window, every
    /// [`MAJOR_TICK_FACTOR`]th one marked major.
    pub fn ticks(&self) -> Vec<Tick> {
        self.ticks_with_spacing(MINOR_TICK_PX)
    }

    /// Like [`ticks`](Self::ticks) with a custom minor spacing in pixels.
    pub fn ticks_with_spacing(&self, minor_px: f64) -> Vec<Tick> {
        let step = nice_tick_step(minor_px, self.state.time_scale);
        let (start, end) = self.visible_range();
        let first = (start / step).ceil() as i64;
        let last = (end / step).floor() as i64;
        (first..=last)
            .map(|k| {
                let time = k as f64 * step;
                Tick {
                    time,
                    x: self.time_to_x(time),
                    major: k.rem_euclid(MAJOR_TICK_FACTOR as i64) == 0,
                }
            })
            .collect()
    }

    fn set_zoom(&mut self, zoom: f64) {
        let zoom = if zoom.is_finite() { zoom } else { 1.0 };
        self.state.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.state.time_scale = self.base_scale * self.state.zoom;
        log::trace!("zoom {:.3}, {:.6} px/tick", self.state.zoom, self.state.time_scale);
    }

    fn clamp_pan(&self, pan: f64) -> f64 {
        if pan.is_finite() {
            pan.max(0.0)
        } else {
            0.0
        }
    }
}

fn sanitize_width(width: f64) -> f64 {
    if width.is_finite() && width >= 1.0 {
        width
    } else {
        1.0
    }
}
