//! The waveform engine: trace state, view state and the command surface.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use wavescope_common::Color;
use wavescope_config::WavescopeConfig;
use wavescope_export::{export, DisplaySettings, ExportOptions, ExportPayload};
use wavescope_format::{format, parse_display, resolve_format, Base, DisplayFormat, FormatOverride};
use wavescope_render::{render, DrawList, FormatTable, Layout, Overlays, Row, RowKind, Scene, Surface, Tooltip};
use wavescope_store::{SignalId, SignalStore, SignalSummary};
use wavescope_vcd::{load_vcd_file, parse_vcd, ParsedTrace, VcdError};
use wavescope_viewport::{CursorPair, SelectionRange, ViewState, Viewport};

use crate::commands::{parse_command, Command};
use crate::error::EngineError;
use crate::script::parse_script;

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 400.0;
/// Share of the trace shown by a range zoom without a selection.
const DEFAULT_WINDOW_FRACTION: f64 = 0.1;

/// What lies under a canvas position.
#[derive(Clone, Debug, PartialEq)]
pub struct HoverInfo {
    /// Trace time under the pointer, in ticks.
    pub time: u64,
    /// Name of the signal (or bit) in the row.
    pub signal: String,
    /// Formatted value at `time`.
    pub value: String,
    /// Trace colour of the row.
    pub color: Color,
}

/// A signal's formatted values at the two cursors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CursorValue {
    /// Signal name.
    pub name: String,
    /// Value at the primary cursor, if placed.
    pub primary: Option<String>,
    /// Value at the secondary cursor, if placed.
    pub secondary: Option<String>,
}

/// The waveform engine.
///
/// Owns the loaded trace, the viewport and all interaction state. Every
/// mutating operation marks the engine dirty; hosts redraw with
/// [`render`](Self::render) or [`redraw_if_dirty`](Self::redraw_if_dirty).
#[derive(Debug)]
pub struct WaveformEngine {
    config: WavescopeConfig,
    store: SignalStore,
    viewport: Viewport,
    height: f64,
    overrides: HashMap<SignalId, FormatOverride>,
    expanded: HashSet<SignalId>,
    options_open: bool,
    selection: Option<SelectionRange>,
    cursors: CursorPair,
    hover: Option<(f64, f64)>,
    highlighted: Option<SignalId>,
    dirty: bool,
}

impl Default for WaveformEngine {
    fn default() -> Self {
        Self::new(WavescopeConfig::default())
    }
}

impl WaveformEngine {
    /// Creates an engine with an empty trace.
    pub fn new(config: WavescopeConfig) -> Self {
        let mut viewport = Viewport::new(DEFAULT_WIDTH, 0);
        viewport.set_pan_step_px(config.style.pan_step_px);
        Self {
            config,
            store: SignalStore::empty(),
            viewport,
            height: DEFAULT_HEIGHT,
            overrides: HashMap::new(),
            expanded: HashSet::new(),
            options_open: false,
            selection: None,
            cursors: CursorPair::default(),
            hover: None,
            highlighted: None,
            dirty: true,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &WavescopeConfig {
        &self.config
    }

    /// Returns the loaded trace.
    pub fn store(&self) -> &SignalStore {
        &self.store
    }

    /// Returns the viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Returns the pan/zoom state.
    pub fn view_state(&self) -> ViewState {
        self.viewport.state()
    }

    /// Returns the canvas size.
    pub fn size(&self) -> (f64, f64) {
        (self.viewport.width(), self.height)
    }

    /// Returns the selection.
    pub fn selection(&self) -> Option<SelectionRange> {
        self.selection
    }

    /// Returns the cursors.
    pub fn cursors(&self) -> CursorPair {
        self.cursors
    }

    /// Returns `true` if the bus's bits are shown.
    pub fn is_expanded(&self, id: SignalId) -> bool {
        self.expanded.contains(&id)
    }

    /// Returns `true` while the signal options panel is open.
    pub fn options_open(&self) -> bool {
        self.options_open
    }

    /// Returns `true` if state changed since the last render.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // ---- Loading ----

    /// Parses VCD text and replaces the trace, resetting all view state.
    ///
    /// Returns the number of signals. When the text is empty or declares
    /// nothing the engine holds an empty trace and the error is returned.
    pub fn load_vcd(&mut self, text: &str) -> Result<usize, EngineError> {
        match parse_vcd(text) {
            Ok(trace) => Ok(self.install(trace)),
            Err(e) => {
                log::warn!("trace not loaded: {e}");
                self.install_store(SignalStore::empty());
                Err(e.into())
            }
        }
    }

    /// Reads and loads a VCD file. An unreadable file leaves the current
    /// trace in place.
    pub fn load_vcd_file(&mut self, path: &Path) -> Result<usize, EngineError> {
        match load_vcd_file(path) {
            Ok(trace) => Ok(self.install(trace)),
            Err(e @ VcdError::Io { .. }) => Err(e.into()),
            Err(e) => {
                log::warn!("trace not loaded from {}: {e}", path.display());
                self.install_store(SignalStore::empty());
                Err(e.into())
            }
        }
    }

    fn install(&mut self, trace: ParsedTrace) -> usize {
        let ParsedTrace {
            mut signals,
            max_time,
            timescale,
            stats,
        } = trace;
        let palette = &self.config.colors;
        for signal in &mut signals {
            signal.color = if signal.is_bus {
                palette.bus_trace
            } else {
                palette.scalar_trace
            };
        }
        log::info!(
            "loaded trace: {} signals, max time {} ({}), {} lines skipped",
            signals.len(),
            max_time,
            timescale,
            stats.skipped
        );
        let count = signals.len();
        self.install_store(SignalStore::new(signals, max_time, timescale));
        count
    }

    fn install_store(&mut self, store: SignalStore) {
        let width = self.viewport.width();
        self.viewport = Viewport::new(width, store.max_time());
        self.viewport.set_pan_step_px(self.config.style.pan_step_px);
        self.store = store;
        self.overrides.clear();
        self.expanded.clear();
        self.selection = None;
        self.cursors = CursorPair::default();
        self.hover = None;
        self.highlighted = None;
        self.dirty = true;
    }

    // ---- Navigation ----

    /// Zooms in one step.
    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.dirty = true;
    }

    /// Zooms out one step.
    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.dirty = true;
    }

    /// Pans towards earlier times.
    pub fn pan_left(&mut self) {
        self.viewport.pan_left();
        self.dirty = true;
    }

    /// Pans towards later times.
    pub fn pan_right(&mut self) {
        self.viewport.pan_right();
        self.dirty = true;
    }

    /// Shows the whole trace.
    pub fn fit_to_view(&mut self) {
        self.viewport.fit_to_view();
        self.dirty = true;
    }

    /// Zooms to `range`, or to the selection, or to the first tenth of the
    /// trace (at least one tick) when neither is given.
    pub fn zoom_to_range(&mut self, range: Option<(f64, f64)>) {
        let (start, end) = range
            .or_else(|| {
                self.selection
                    .filter(|s| !s.is_empty())
                    .map(|s| (s.start, s.end))
            })
            .unwrap_or_else(|| self.default_window());
        self.viewport.zoom_to_range(start, end);
        self.dirty = true;
    }

    fn default_window(&self) -> (f64, f64) {
        let end = (self.store.max_time() as f64 * DEFAULT_WINDOW_FRACTION).max(1.0);
        (0.0, end)
    }

    /// Zooms around a pixel column; negative `delta_y` zooms in.
    pub fn wheel_zoom(&mut self, mouse_x: f64, delta_y: f64) {
        self.viewport.wheel_zoom(mouse_x, delta_y);
        self.dirty = true;
    }

    /// Places the primary cursor at `time` and centers the view on it.
    pub fn goto(&mut self, time: u64) {
        self.set_cursor(Some(time as f64));
        self.viewport.center_on(self.clamp_time(time as f64));
    }

    /// Changes the canvas size, keeping pan and zoom.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width);
        if height.is_finite() && height > 0.0 {
            self.height = height;
        }
        self.dirty = true;
    }

    // ---- Rows and formats ----

    /// Shows the bits of every bus.
    pub fn expand_all(&mut self) {
        self.expanded = self
            .store
            .signals()
            .iter()
            .filter(|s| s.is_bus)
            .map(|s| s.id)
            .collect();
        self.dirty = true;
    }

    /// Hides the bits of every bus.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.dirty = true;
    }

    /// Shows or hides a bus's bits. Scalar signals never expand.
    pub fn set_expanded(&mut self, id: SignalId, expanded: bool) {
        let is_bus = self.store.signal(id).is_some_and(|s| s.is_bus);
        if expanded && is_bus {
            self.expanded.insert(id);
        } else {
            self.expanded.remove(&id);
        }
        self.dirty = true;
    }

    /// Flips a bus's expansion and returns the new state.
    pub fn toggle_expanded(&mut self, id: SignalId) -> bool {
        let next = !self.is_expanded(id);
        self.set_expanded(id, next);
        self.is_expanded(id)
    }

    /// Opens or closes the signal options panel and returns the new state.
    pub fn signal_options_toggle(&mut self) -> bool {
        self.options_open = !self.options_open;
        self.dirty = true;
        self.options_open
    }

    /// Sets a signal's display base.
    pub fn set_signal_format(&mut self, id: SignalId, base: Base) {
        self.overrides.entry(id).or_default().base = Some(base);
        self.dirty = true;
    }

    /// Sets a signal's signedness; `None` returns to the configured default.
    pub fn set_signal_signed(&mut self, id: SignalId, signed: Option<bool>) {
        self.overrides.entry(id).or_default().signed = signed;
        self.dirty = true;
    }

    /// Advances a signal to the next base and returns it.
    pub fn cycle_signal_format(&mut self, id: SignalId) -> Base {
        let next = self.format_of(id).base.cycle();
        self.set_signal_format(id, next);
        next
    }

    /// Flips a signal's signedness and returns the new value.
    pub fn toggle_signal_signed(&mut self, id: SignalId) -> bool {
        let next = !self.format_of(id).signed;
        self.set_signal_signed(id, Some(next));
        next
    }

    /// Returns a signal's effective display format.
    pub fn format_of(&self, id: SignalId) -> DisplayFormat {
        let name = self.store.signal(id).map_or("", |s| s.name.as_str());
        resolve_format(
            name,
            self.overrides.get(&id),
            self.config.display.base,
            self.config.display.signedness,
        )
    }

    fn format_table(&self) -> FormatTable {
        self.store
            .signals()
            .iter()
            .map(|s| (s.id, self.format_of(s.id)))
            .collect()
    }

    // ---- Selection, cursors, hover ----

    /// Sets or clears the selected time range.
    pub fn set_selection(&mut self, range: Option<(f64, f64)>) {
        self.selection = range.map(|(a, b)| SelectionRange::new(self.clamp_time(a), self.clamp_time(b)));
        self.dirty = true;
    }

    /// Places or clears the primary cursor.
    pub fn set_cursor(&mut self, time: Option<f64>) {
        self.cursors.primary = time.map(|t| self.clamp_time(t));
        self.dirty = true;
    }

    /// Places or clears the secondary cursor.
    pub fn set_secondary_cursor(&mut self, time: Option<f64>) {
        self.cursors.secondary = time.map(|t| self.clamp_time(t));
        self.dirty = true;
    }

    /// Moves the primary cursor to the next (or previous) change of
    /// `signal`, or by one minor grid step without a signal, keeping it in
    /// view.
    pub fn step_cursor(&mut self, forward: bool, signal: Option<SignalId>) {
        let current = self
            .cursors
            .primary
            .unwrap_or_else(|| self.viewport.visible_range().0);
        let tick = current.max(0.0).round() as u64;
        let change = signal.and_then(|id| self.store.signal(id)).and_then(|s| {
            if forward {
                s.next_change_after(tick)
            } else {
                s.prev_change_before(tick)
            }
        });
        let target = match change {
            Some(t) => t as f64,
            None => {
                let step = self.viewport.minor_tick_step();
                if forward {
                    current + step
                } else {
                    current - step
                }
            }
        };
        self.set_cursor(Some(target));
        let (start, end) = self.viewport.visible_range();
        let placed = self.cursors.primary.unwrap_or(target);
        if placed < start || placed > end {
            self.viewport.center_on(placed);
        }
    }

    /// Sets or clears the pointer position in canvas pixels.
    pub fn set_hover(&mut self, position: Option<(f64, f64)>) {
        self.hover = position;
        self.dirty = true;
    }

    /// Highlights a signal's row.
    pub fn set_highlighted(&mut self, id: Option<SignalId>) {
        self.highlighted = id;
        self.dirty = true;
    }

    fn clamp_time(&self, t: f64) -> f64 {
        if t.is_finite() {
            t.clamp(0.0, self.store.max_time() as f64)
        } else {
            0.0
        }
    }

    // ---- Rendering and export ----

    fn layout(&self) -> Layout {
        Layout::new(
            &self.store,
            &self.expanded,
            &self.config.style,
            self.config.style.header_height,
        )
    }

    fn overlays(&self, layout: &Layout) -> Overlays {
        let hovered_row = self
            .hover
            .and_then(|(_, y)| layout.row_at(y).map(|r| (*r, y)));
        let highlighted_row = self
            .highlighted
            .and_then(|id| {
                layout
                    .rows
                    .iter()
                    .position(|r| r.kind == RowKind::Signal { id })
            })
            .or_else(|| {
                let (row, _) = hovered_row?;
                layout.rows.iter().position(|r| *r == row)
            });
        let tooltip = self.hover.zip(hovered_row).and_then(|((x, _), (row, _))| {
            let time = self
                .cursors
                .primary
                .unwrap_or_else(|| self.clamp_time(self.viewport.x_to_time(x)));
            let (name, value, _) = self.describe_row(&row, time.floor() as u64)?;
            Some(Tooltip {
                time,
                name,
                value,
                row_y: row.y,
            })
        });
        Overlays {
            selection: self.selection,
            cursors: self.cursors,
            highlighted_row,
            tooltip,
            format_badges: self.options_open,
        }
    }

    /// Draws the current frame and clears the dirty flag.
    pub fn render(&mut self, surface: &mut dyn Surface) {
        let formats = self.format_table();
        let overlays = self.overlays(&self.layout());
        let mut scene = Scene::new(
            &self.store,
            &self.viewport,
            &self.config.style,
            &self.config.colors,
            &formats,
            &self.expanded,
        );
        scene.height = self.height;
        scene.overlays = overlays;
        render(&scene, surface);
        self.dirty = false;
    }

    /// Draws only if state changed since the last render. Returns whether a
    /// frame was drawn.
    pub fn redraw_if_dirty(&mut self, surface: &mut dyn Surface) -> bool {
        if !self.dirty {
            return false;
        }
        self.render(surface);
        true
    }

    /// Renders the current frame into a fresh [`DrawList`].
    pub fn frame(&mut self) -> DrawList {
        let mut list = DrawList::new();
        self.render(&mut list);
        list
    }

    /// Exports a static image of the trace. The interactive state is not
    /// touched, whether or not the export succeeds.
    pub fn export(&self, options: &ExportOptions) -> Result<ExportPayload, EngineError> {
        let formats = self.format_table();
        let display = DisplaySettings {
            style: &self.config.style,
            palette: &self.config.colors,
            formats: &formats,
            expanded: &self.expanded,
        };
        export(&self.store, &self.viewport, &display, options).map_err(|e| {
            log::warn!("export failed: {e}");
            EngineError::from(e)
        })
    }

    // ---- Queries ----

    /// Describes the row and time under canvas position `(x, y)`.
    pub fn hover_at(&self, x: f64, y: f64) -> Option<HoverInfo> {
        let layout = self.layout();
        let row = layout.row_at(y)?;
        let time = self.clamp_time(self.viewport.x_to_time(x)).floor() as u64;
        let (signal, value, color) = self.describe_row(row, time)?;
        Some(HoverInfo {
            time,
            signal,
            value,
            color,
        })
    }

    fn describe_row(&self, row: &Row, time: u64) -> Option<(String, String, Color)> {
        match row.kind {
            RowKind::Signal { id } => {
                let signal = self.store.signal(id)?;
                let fmt = self.format_of(id);
                let raw = signal.value_at_time(time);
                Some((
                    signal.name.clone(),
                    format(&raw, signal.width, fmt.signed, fmt.base),
                    signal.color,
                ))
            }
            RowKind::Bit { parent, index, .. } => {
                let bits = self.store.bit_decompose(parent)?;
                let bit = bits.get(index)?;
                Some((
                    bit.signal.name.clone(),
                    bit.signal.value_at_time(time).into_owned(),
                    self.config.colors.scalar_trace,
                ))
            }
        }
    }

    /// Returns every signal's formatted value at both cursors.
    pub fn cursor_values(&self) -> Vec<CursorValue> {
        let at = |id: SignalId, t: Option<f64>| {
            t.and_then(|t| self.formatted_value(id, t.floor() as u64))
        };
        self.store
            .signals()
            .iter()
            .map(|s| CursorValue {
                name: s.name.clone(),
                primary: at(s.id, self.cursors.primary),
                secondary: at(s.id, self.cursors.secondary),
            })
            .collect()
    }

    /// Returns a signal's value at `time` in its display format.
    pub fn formatted_value(&self, id: SignalId, time: u64) -> Option<String> {
        let signal = self.store.signal(id)?;
        let fmt = self.format_of(id);
        Some(format(&signal.value_at_time(time), signal.width, fmt.signed, fmt.base))
    }

    /// Returns the value of the named signal at `time` in its display format.
    pub fn value_at(&self, name: &str, time: u64) -> Result<String, EngineError> {
        let id = self.lookup(name)?;
        self.formatted_value(id, time)
            .ok_or_else(|| EngineError::UnknownSignal(name.to_string()))
    }

    /// Returns name, width and bus flag of every signal in row order.
    pub fn signal_list(&self) -> Vec<SignalSummary> {
        self.store.summaries()
    }

    /// Resolves a signal name to its id.
    pub fn lookup(&self, name: &str) -> Result<SignalId, EngineError> {
        self.store
            .find(name)
            .map(|s| s.id)
            .ok_or_else(|| EngineError::UnknownSignal(name.to_string()))
    }

    /// Finds the first change of a signal to `text` (in its display format)
    /// strictly after `after`, or from time 0 inclusive when `after` is
    /// `None`.
    pub fn find_value(&self, id: SignalId, text: &str, after: Option<u64>) -> Result<Option<u64>, EngineError> {
        let signal = self
            .store
            .signal(id)
            .ok_or_else(|| EngineError::UnknownSignal(id.to_string()))?;
        let fmt = self.format_of(id);
        let target = parse_display(text, signal.width, fmt.signed, fmt.base)?;
        Ok(signal
            .values
            .iter()
            .filter(|c| after.map_or(true, |a| c.time > a))
            .find(|c| c.value == target)
            .map(|c| c.time))
    }

    // ---- Commands ----

    /// Executes a parsed command.
    pub fn execute(&mut self, command: Command) -> Result<(), EngineError> {
        log::trace!("executing {:?}", command);
        match command {
            Command::ZoomIn => self.zoom_in(),
            Command::ZoomOut => self.zoom_out(),
            Command::ZoomFit => self.fit_to_view(),
            Command::ZoomRange { range } => {
                self.zoom_to_range(range.map(|(a, b)| (a as f64, b as f64)))
            }
            Command::PanLeft => self.pan_left(),
            Command::PanRight => self.pan_right(),
            Command::Goto { time } => self.goto(time),
            Command::Cursor { time } => self.set_cursor(time.map(|t| t as f64)),
            Command::Marker { time } => self.set_secondary_cursor(time.map(|t| t as f64)),
            Command::Select { start, end } => self.set_selection(Some((start as f64, end as f64))),
            Command::ClearSelection => self.set_selection(None),
            Command::Expand { name } => {
                let id = self.lookup(&name)?;
                self.set_expanded(id, true);
            }
            Command::Collapse { name } => {
                let id = self.lookup(&name)?;
                self.set_expanded(id, false);
            }
            Command::ExpandAll => self.expand_all(),
            Command::CollapseAll => self.collapse_all(),
            Command::Format { name, base } => {
                let id = self.lookup(&name)?;
                self.set_signal_format(id, base);
            }
            Command::Signed { name, signed } => {
                let id = self.lookup(&name)?;
                self.set_signal_signed(id, signed);
            }
            Command::Options => {
                self.signal_options_toggle();
            }
            Command::Find { name, value } => {
                let id = self.lookup(&name)?;
                let after = self.cursors.primary.map(|t| t.floor() as u64);
                match self.find_value(id, &value, after)? {
                    Some(time) => self.goto(time),
                    None => return Err(EngineError::ValueNotFound { signal: name, value }),
                }
            }
        }
        Ok(())
    }

    /// Parses and executes one command line.
    pub fn run_command(&mut self, line: &str) -> Result<(), EngineError> {
        let command = parse_command(line, self.store.timescale()).map_err(EngineError::InvalidCommand)?;
        self.execute(command)
    }

    /// Runs a timestamped script in timestamp order and returns the number
    /// of commands executed. Stops at the first failing line.
    pub fn run_script(&mut self, text: &str) -> Result<usize, EngineError> {
        let entries = parse_script(text)?;
        for entry in &entries {
            log::debug!("script @{}ms: {}", entry.at_ms, entry.command);
            self.run_command(&entry.command)
                .map_err(|e| EngineError::Script {
                    line: entry.line,
                    source: Box::new(e),
                })?;
        }
        Ok(entries.len())
    }
}
