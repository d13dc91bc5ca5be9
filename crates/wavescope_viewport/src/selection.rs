//! Time selections and cursors.

use serde::{Deserialize, Serialize};

/// A selected time interval, normalized so that `start <= end`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionRange {
    /// Earlier bound in ticks.
    pub start: f64,
    /// Later bound in ticks.
    pub end: f64,
}

impl SelectionRange {
    /// Creates a range from two bounds in either order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Returns `end - start`.
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Returns `true` if the range covers no time.
    pub fn is_empty(&self) -> bool {
        self.span() <= 0.0
    }
}

/// The primary and secondary measurement cursors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CursorPair {
    /// Primary cursor time, if placed.
    pub primary: Option<f64>,
    /// Secondary cursor time, if placed.
    pub secondary: Option<f64>,
}

impl CursorPair {
    /// Returns `|secondary - primary|` when both cursors are placed.
    pub fn delta(&self) -> Option<f64> {
        match (self.primary, self.secondary) {
            (Some(a), Some(b)) => Some((b - a).abs()),
            _ => None,
        }
    }
}
