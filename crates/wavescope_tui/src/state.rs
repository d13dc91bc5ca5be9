//! TUI state management.
//!
//! Input mode, focus tracking and signal selection. Pan, zoom, cursors and
//! formats live in the engine; this state only covers the terminal shell.

/// Which panel currently has keyboard focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusedPanel {
    /// The signal list on the left.
    SignalList,
    /// The waveform canvas.
    Waveform,
    /// The command bar at the bottom.
    CommandInput,
}

impl FocusedPanel {
    /// Returns the next panel in tab order.
    pub fn next(self) -> Self {
        match self {
            Self::SignalList => Self::Waveform,
            Self::Waveform => Self::CommandInput,
            Self::CommandInput => Self::SignalList,
        }
    }
}

/// Current input mode of the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode (vim-like keys).
    Normal,
    /// Command entry mode (`:` prefix).
    Command,
}

/// Shell state of the viewer.
#[derive(Clone, Debug)]
pub struct TuiState {
    /// Current input mode.
    pub mode: InputMode,
    /// Which panel has focus.
    pub focused: FocusedPanel,
    /// Index of the selected signal in the signal list.
    pub selected_signal: usize,
    /// Number of signals in the list.
    pub signal_count: usize,
    /// Text typed in command mode.
    pub command_buffer: String,
    /// Message shown in the status bar.
    pub status_message: String,
    /// Whether the help popup is visible.
    pub show_help: bool,
}

impl TuiState {
    /// Creates the initial state for a list of `signal_count` signals.
    pub fn new(signal_count: usize) -> Self {
        Self {
            mode: InputMode::Normal,
            focused: FocusedPanel::SignalList,
            selected_signal: 0,
            signal_count,
            command_buffer: String::new(),
            status_message: String::new(),
            show_help: false,
        }
    }

    /// Moves the selection down, stopping at the last signal.
    pub fn select_next_signal(&mut self) {
        if self.signal_count > 0 && self.selected_signal + 1 < self.signal_count {
            self.selected_signal += 1;
        }
    }

    /// Moves the selection up, stopping at the first signal.
    pub fn select_prev_signal(&mut self) {
        self.selected_signal = self.selected_signal.saturating_sub(1);
    }

    /// Replaces the signal count after a reload, keeping the selection in
    /// range.
    pub fn set_signal_count(&mut self, count: usize) {
        self.signal_count = count;
        self.selected_signal = self.selected_signal.min(count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_stays_in_range() {
        let mut state = TuiState::new(2);
        state.select_prev_signal();
        assert_eq!(state.selected_signal, 0);
        state.select_next_signal();
        state.select_next_signal();
        assert_eq!(state.selected_signal, 1);
    }

    #[test]
    fn empty_list_never_selects() {
        let mut state = TuiState::new(0);
        state.select_next_signal();
        assert_eq!(state.selected_signal, 0);
    }

    #[test]
    fn shrinking_list_clamps_selection() {
        let mut state = TuiState::new(5);
        state.selected_signal = 4;
        state.set_signal_count(2);
        assert_eq!(state.selected_signal, 1);
        state.set_signal_count(0);
        assert_eq!(state.selected_signal, 0);
    }

    #[test]
    fn focus_cycles() {
        let f = FocusedPanel::SignalList;
        assert_eq!(f.next().next().next(), f);
    }
}
