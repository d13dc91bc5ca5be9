//! Everything one frame needs, borrowed from its owners.

use std::collections::{HashMap, HashSet};

use wavescope_common::Color;
use wavescope_config::{Palette, Style};
use wavescope_format::DisplayFormat;
use wavescope_store::{SignalId, SignalStore};
use wavescope_viewport::{CursorPair, SelectionRange, Viewport};

use crate::layout::Layout;

/// Resolved display format per signal.
pub type FormatTable = HashMap<SignalId, DisplayFormat>;

/// Hover tooltip content, resolved by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    /// Time the tooltip reports.
    pub time: f64,
    /// Signal name.
    pub name: String,
    /// Formatted value.
    pub value: String,
    /// Top of the hovered row.
    pub row_y: f64,
}

/// Interactive overlays drawn on top of the traces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overlays {
    /// Translucent selection band.
    pub selection: Option<SelectionRange>,
    /// Measurement cursors.
    pub cursors: CursorPair,
    /// Index into the layout rows of the highlighted row.
    pub highlighted_row: Option<usize>,
    /// Tooltip box.
    pub tooltip: Option<Tooltip>,
    /// Draw per-row format badges.
    pub format_badges: bool,
}

/// One frame's input.
///
/// The viewport's width must equal `width - wave_left`.
#[derive(Clone, Debug)]
pub struct Scene<'a> {
    /// Signals to draw.
    pub store: &'a SignalStore,
    /// Time-to-pixel transform of the waveform area.
    pub viewport: &'a Viewport,
    /// Layout metrics.
    pub style: &'a Style,
    /// Colours.
    pub palette: &'a Palette,
    /// Display format per signal; missing entries use the default format.
    pub formats: &'a FormatTable,
    /// Buses whose bits are shown.
    pub expanded: &'a HashSet<SignalId>,
    /// Canvas width.
    pub width: f64,
    /// Canvas height.
    pub height: f64,
    /// Left edge of the waveform area; the name column lies before it.
    pub wave_left: f64,
    /// Draw signal names in the name column.
    pub show_names: bool,
    /// Draw grid lines.
    pub show_grid: bool,
    /// Draw formatted values inside bus capsules.
    pub show_values: bool,
    /// Canvas fill.
    pub background: Color,
    /// Interactive overlays.
    pub overlays: Overlays,
}

impl<'a> Scene<'a> {
    /// Creates a scene covering the viewport with no name column, grid and
    /// values on, and no overlays. The height fits every row.
    pub fn new(
        store: &'a SignalStore,
        viewport: &'a Viewport,
        style: &'a Style,
        palette: &'a Palette,
        formats: &'a FormatTable,
        expanded: &'a HashSet<SignalId>,
    ) -> Self {
        let mut scene = Self {
            store,
            viewport,
            style,
            palette,
            formats,
            expanded,
            width: viewport.width(),
            height: 0.0,
            wave_left: 0.0,
            show_names: false,
            show_grid: true,
            show_values: true,
            background: palette.background,
            overlays: Overlays::default(),
        };
        scene.height = scene.fitted_height();
        scene
    }

    /// Returns the row layout below the header.
    pub fn layout(&self) -> Layout {
        Layout::new(self.store, self.expanded, self.style, self.style.header_height)
    }

    /// Returns the header plus the height of every row.
    pub fn fitted_height(&self) -> f64 {
        self.style.header_height + self.layout().total_height()
    }

    /// Returns the display format of a signal.
    pub fn format_of(&self, id: SignalId) -> DisplayFormat {
        self.formats.get(&id).copied().unwrap_or_default()
    }

    /// Maps a trace time to a canvas column.
    pub fn time_to_x(&self, time: f64) -> f64 {
        self.wave_left + self.viewport.time_to_x(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavescope_common::Timescale;
    use wavescope_format::Base;
    use wavescope_store::Signal;

    #[test]
    fn scene_defaults_fit_rows() {
        let store = SignalStore::new(
            vec![Signal::new(SignalId::from_raw(0), "!", "clk", 1)],
            100,
            Timescale::default(),
        );
        let viewport = Viewport::new(400.0, 100);
        let style = Style::default();
        let palette = Palette::default();
        let formats = FormatTable::new();
        let expanded = HashSet::new();
        let scene = Scene::new(&store, &viewport, &style, &palette, &formats, &expanded);
        assert_eq!(scene.width, 400.0);
        assert_eq!(scene.height, style.header_height + style.row_height);
        assert_eq!(scene.background, palette.background);
        assert_eq!(scene.format_of(SignalId::from_raw(0)).base, Base::Hex);
        assert_eq!(scene.time_to_x(50.0), 200.0);
    }
}
