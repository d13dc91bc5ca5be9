//! TUI application core.
//!
//! [`TuiApp`] owns the waveform engine and the shell state. Keys, mouse
//! events and command-bar lines are translated into engine operations; the
//! waveform panel shows the engine's most recent frame.

use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use wavescope_engine::{Command, WaveformEngine};
use wavescope_render::DrawList;
use wavescope_store::SignalId;
use wavescope_viewport::format_time;

use crate::commands::{parse_tui_command, TuiCommand};
use crate::state::{InputMode, TuiState};

/// Engine pixels covered by one terminal column.
pub const CELL_WIDTH_PX: f64 = 8.0;
/// Engine pixels covered by one terminal row.
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Help popup contents.
pub const HELP_TEXT: &str = "\
Navigation:
  j/k ↑/↓  Select signal       h/l ←/→  Pan
  +/-       Zoom in/out         f         Fit to view
  [ ]       Step cursor         m         Mark secondary cursor
  e Enter   Expand/collapse     E / C     Expand/collapse all
  d         Cycle base          s         Toggle signed
  o         Format badges       Tab       Switch panel
  ?         Toggle help         :         Command mode
  q         Quit

Commands:
  goto <t>        cursor <t|off>     marker <t|off>
  zoom [a b]      select <a> <b>     clear
  expand <sig>    collapse <sig>     fmt <sig> <base>
  signed <sig> [on|off|auto]         find <sig> <value>

Press ? to close";

/// The terminal viewer application.
pub struct TuiApp {
    /// The waveform engine.
    pub engine: WaveformEngine,
    /// Shell state (mode, focus, selection).
    pub state: TuiState,
    /// Whether the application should quit.
    pub should_quit: bool,
    /// Inner area of the waveform panel from the last draw.
    pub wave_area: Option<Rect>,
    frame: DrawList,
}

impl TuiApp {
    /// Creates a viewer around a loaded engine.
    pub fn new(engine: WaveformEngine) -> Self {
        let state = TuiState::new(engine.store().len());
        let mut app = Self {
            engine,
            state,
            should_quit: false,
            wave_area: None,
            frame: DrawList::new(),
        };
        app.sync_highlight();
        app
    }

    /// Returns the id of the selected signal.
    pub fn selected_id(&self) -> Option<SignalId> {
        self.engine
            .store()
            .signals()
            .get(self.state.selected_signal)
            .map(|s| s.id)
    }

    fn sync_highlight(&mut self) {
        let id = self.selected_id();
        self.engine.set_highlighted(id);
    }

    fn selected_name(&self) -> String {
        self.selected_id()
            .and_then(|id| self.engine.store().signal(id))
            .map_or_else(String::new, |s| s.name.clone())
    }

    /// Returns the formatted value of a signal at the primary cursor, or at
    /// time 0 without one.
    pub fn signal_value_str(&self, signal_idx: usize) -> String {
        let time = self
            .engine
            .cursors()
            .primary
            .map_or(0, |t| t.floor() as u64);
        self.engine
            .store()
            .signals()
            .get(signal_idx)
            .and_then(|s| self.engine.formatted_value(s.id, time))
            .unwrap_or_else(|| "?".into())
    }

    /// Returns the primary cursor time as a label, or `-` when unset.
    pub fn cursor_str(&self) -> String {
        let timescale = self.engine.store().timescale();
        self.engine
            .cursors()
            .primary
            .map_or_else(|| "-".into(), |t| format_time(t, timescale))
    }

    /// Returns the distance between the cursors as a label.
    pub fn delta_str(&self) -> Option<String> {
        let timescale = self.engine.store().timescale();
        self.engine
            .cursors()
            .delta()
            .map(|d| format_time(d, timescale))
    }

    /// Returns the frame to show in a waveform panel of `area`, redrawing
    /// when the engine state or the panel size changed.
    pub fn prepare_frame(&mut self, area: Rect) -> &DrawList {
        let width = f64::from(area.width.max(1)) * CELL_WIDTH_PX;
        let height = f64::from(area.height.max(1)) * CELL_HEIGHT_PX;
        if self.engine.size() != (width, height) {
            self.engine.resize(width, height);
        }
        self.wave_area = Some(area);
        if self.engine.is_dirty() {
            self.frame.clear();
            self.engine.render(&mut self.frame);
        }
        &self.frame
    }

    /// Executes a command-bar line and returns a status message.
    pub fn execute_command(&mut self, input: &str) -> Result<String, String> {
        match parse_tui_command(input, self.engine.store().timescale())? {
            TuiCommand::Quit => {
                self.should_quit = true;
                Ok("Quitting".into())
            }
            TuiCommand::ToggleHelp => {
                self.state.show_help = !self.state.show_help;
                Ok(String::new())
            }
            TuiCommand::Engine(cmd) => {
                let summary = match &cmd {
                    Command::ZoomIn
                    | Command::ZoomOut
                    | Command::ZoomFit
                    | Command::ZoomRange { .. } => Summary::Zoom,
                    Command::Goto { .. } | Command::Cursor { .. } | Command::Find { .. } => {
                        Summary::Cursor
                    }
                    Command::Format { name, .. } | Command::Signed { name, .. } => {
                        Summary::Format(name.clone())
                    }
                    _ => Summary::None,
                };
                self.engine.execute(cmd).map_err(|e| e.to_string())?;
                Ok(match summary {
                    Summary::Zoom => format!("Zoom {:.2}x", self.engine.view_state().zoom),
                    Summary::Cursor => format!("Cursor at {}", self.cursor_str()),
                    Summary::Format(name) => match self.engine.lookup(&name) {
                        Ok(id) => format!("{name}: {}", self.engine.format_of(id)),
                        Err(_) => String::new(),
                    },
                    Summary::None => String::new(),
                })
            }
        }
    }

    /// Handles a key press in normal mode.
    pub fn handle_normal_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.select_next_signal();
                self.sync_highlight();
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.select_prev_signal();
                self.sync_highlight();
            }
            KeyCode::Char('h') | KeyCode::Left => self.engine.pan_left(),
            KeyCode::Char('l') | KeyCode::Right => self.engine.pan_right(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.engine.zoom_in(),
            KeyCode::Char('-') => self.engine.zoom_out(),
            KeyCode::Char('f') => self.engine.fit_to_view(),
            KeyCode::Char('[') => {
                let id = self.selected_id();
                self.engine.step_cursor(false, id);
            }
            KeyCode::Char(']') => {
                let id = self.selected_id();
                self.engine.step_cursor(true, id);
            }
            KeyCode::Char('m') => {
                let primary = self.engine.cursors().primary;
                self.engine.set_secondary_cursor(primary);
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    let name = self.selected_name();
                    self.state.status_message = if self.engine.toggle_expanded(id) {
                        format!("Expanded {name}")
                    } else {
                        format!("Collapsed {name}")
                    };
                }
            }
            KeyCode::Char('E') => self.engine.expand_all(),
            KeyCode::Char('C') => self.engine.collapse_all(),
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    let base = self.engine.cycle_signal_format(id);
                    self.state.status_message = format!("{}: {base}", self.selected_name());
                }
            }
            KeyCode::Char('s') => {
                if let Some(id) = self.selected_id() {
                    let signed = self.engine.toggle_signal_signed(id);
                    let label = if signed { "signed" } else { "unsigned" };
                    self.state.status_message = format!("{}: {label}", self.selected_name());
                }
            }
            KeyCode::Char('o') => {
                self.engine.signal_options_toggle();
            }
            KeyCode::Char(':') => {
                self.state.mode = InputMode::Command;
                self.state.command_buffer.clear();
            }
            KeyCode::Char('?') => {
                self.state.show_help = !self.state.show_help;
            }
            KeyCode::Tab => {
                self.state.focused = self.state.focused.next();
            }
            _ => {}
        }
    }

    /// Handles a key press in command mode.
    pub fn handle_command_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.state.mode = InputMode::Normal;
                self.state.command_buffer.clear();
            }
            KeyCode::Enter => {
                let cmd = std::mem::take(&mut self.state.command_buffer);
                self.state.mode = InputMode::Normal;
                if !cmd.trim().is_empty() {
                    match self.execute_command(&cmd) {
                        Ok(msg) => {
                            if !msg.is_empty() {
                                self.state.status_message = msg;
                            }
                        }
                        Err(err) => {
                            log::debug!("command '{cmd}' failed: {err}");
                            self.state.status_message = format!("Error: {err}");
                        }
                    }
                }
            }
            KeyCode::Backspace => {
                self.state.command_buffer.pop();
            }
            KeyCode::Char(c) => {
                self.state.command_buffer.push(c);
            }
            _ => {}
        }
    }

    /// Handles a mouse event over the waveform panel: the wheel zooms around
    /// the pointer, the left button places the cursor and the right button
    /// the secondary cursor.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        let Some((x, y)) = self.canvas_position(event.column, event.row) else {
            if event.kind == MouseEventKind::Moved {
                self.engine.set_hover(None);
            }
            return;
        };
        match event.kind {
            MouseEventKind::ScrollUp => self.engine.wheel_zoom(x, -1.0),
            MouseEventKind::ScrollDown => self.engine.wheel_zoom(x, 1.0),
            MouseEventKind::Moved => self.engine.set_hover(Some((x, y))),
            MouseEventKind::Down(MouseButton::Left) => {
                let time = self.engine.viewport().x_to_time(x);
                self.engine.set_cursor(Some(time));
            }
            MouseEventKind::Down(MouseButton::Right) => {
                let time = self.engine.viewport().x_to_time(x);
                self.engine.set_secondary_cursor(Some(time));
            }
            _ => {}
        }
    }

    /// Maps a terminal cell to engine pixels at the cell center.
    fn canvas_position(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        let area = self.wave_area?;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        inside.then(|| {
            (
                (f64::from(column - area.x) + 0.5) * CELL_WIDTH_PX,
                (f64::from(row - area.y) + 0.5) * CELL_HEIGHT_PX,
            )
        })
    }
}

enum Summary {
    Zoom,
    Cursor,
    Format(String),
    None,
}
