//! Vertical row layout of signals and expanded bus bits.

use std::collections::HashSet;

use wavescope_config::Style;
use wavescope_store::{SignalId, SignalStore};

/// What a row displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    /// A signal from the store.
    Signal {
        /// The signal.
        id: SignalId,
    },
    /// One bit of an expanded bus.
    Bit {
        /// The bus.
        parent: SignalId,
        /// Position in the bus's decomposition (0 is the MSB row).
        index: usize,
        /// Bit number within the bus (0 is the LSB).
        bit: u32,
    },
}

/// A laid-out row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Row {
    /// Row content.
    pub kind: RowKind,
    /// Top edge in canvas pixels.
    pub y: f64,
    /// Row height.
    pub height: f64,
}

impl Row {
    /// Returns the vertical center.
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Returns the signal this row belongs to (the bus for bit rows).
    pub fn signal_id(&self) -> SignalId {
        match self.kind {
            RowKind::Signal { id } => id,
            RowKind::Bit { parent, .. } => parent,
        }
    }
}

/// Rows in display order, stacked from a top offset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    /// The rows, top to bottom.
    pub rows: Vec<Row>,
    top: f64,
}

impl Layout {
    /// Lays out every signal of `store` starting at `top`, with the bits of
    /// each bus in `expanded` stacked beneath it.
    pub fn new(store: &SignalStore, expanded: &HashSet<SignalId>, style: &Style, top: f64) -> Self {
        let mut rows = Vec::with_capacity(store.len());
        let mut y = top;
        for signal in store.signals() {
            let height = style.row_height_for(signal.is_bus);
            rows.push(Row {
                kind: RowKind::Signal { id: signal.id },
                y,
                height,
            });
            y += height;
            if signal.is_bus && expanded.contains(&signal.id) {
                for index in 0..signal.width as usize {
                    rows.push(Row {
                        kind: RowKind::Bit {
                            parent: signal.id,
                            index,
                            bit: signal.width - 1 - index as u32,
                        },
                        y,
                        height: style.bit_row_height,
                    });
                    y += style.bit_row_height;
                }
            }
        }
        Self { rows, top }
    }

    /// Returns the row under canvas position `y`.
    pub fn row_at(&self, y: f64) -> Option<&Row> {
        if y < self.top {
            return None;
        }
        let idx = self.rows.partition_point(|r| r.y + r.height <= y);
        self.rows.get(idx)
    }

    /// Returns the combined height of all rows.
    pub fn total_height(&self) -> f64 {
        self.rows.last().map_or(0.0, |r| r.y + r.height - self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavescope_common::Timescale;
    use wavescope_store::Signal;

    fn store() -> SignalStore {
        let clk = Signal::new(SignalId::from_raw(0), "!", "clk", 1);
        let data = Signal::new(SignalId::from_raw(1), "\"", "data", 3);
        SignalStore::new(vec![clk, data], 10, Timescale::default())
    }

    #[test]
    fn rows_stack_by_kind() {
        let style = Style::default();
        let layout = Layout::new(&store(), &HashSet::new(), &style, 30.0);
        assert_eq!(layout.rows.len(), 2);
        assert_eq!(layout.rows[0].y, 30.0);
        assert_eq!(layout.rows[1].y, 30.0 + style.row_height);
        assert_eq!(layout.total_height(), style.row_height + style.bus_row_height);
    }

    #[test]
    fn expanded_bus_adds_bit_rows_msb_first() {
        let style = Style::default();
        let expanded = HashSet::from([SignalId::from_raw(1)]);
        let layout = Layout::new(&store(), &expanded, &style, 0.0);
        assert_eq!(layout.rows.len(), 5);
        assert_eq!(
            layout.rows[2].kind,
            RowKind::Bit {
                parent: SignalId::from_raw(1),
                index: 0,
                bit: 2
            }
        );
        assert_eq!(layout.rows[4].signal_id(), SignalId::from_raw(1));
    }

    #[test]
    fn row_lookup_by_y() {
        let style = Style::default();
        let layout = Layout::new(&store(), &HashSet::new(), &style, 30.0);
        assert!(layout.row_at(10.0).is_none());
        assert_eq!(layout.row_at(31.0).map(Row::signal_id), Some(SignalId::from_raw(0)));
        let y = 30.0 + style.row_height + 1.0;
        assert_eq!(layout.row_at(y).map(Row::signal_id), Some(SignalId::from_raw(1)));
        assert!(layout.row_at(1000.0).is_none());
    }
}
