//! Signals and their value change histories.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use wavescope_common::{default_value, Color};

/// Default trace colour for 1-bit signals.
pub const DEFAULT_SCALAR_COLOR: Color = Color::rgb(0x4a, 0xde, 0x80);
/// Default trace colour for multi-bit buses.
pub const DEFAULT_BUS_COLOR: Color = Color::rgb(0x38, 0xbd, 0xf8);

/// Stable identity of a signal within one trace.
///
/// Ids are assigned in row order when a trace is parsed and stay valid until
/// the store is replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SignalId(u32);

impl SignalId {
    /// Creates an id from its raw index.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single value change event for a signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueChange {
    /// Time of the change in trace ticks.
    pub time: u64,
    /// The raw value from this time on.
    pub value: String,
}

/// History of value changes for a single signal.
#[derive(Clone, Debug)]
pub struct Signal {
    /// Signal identifier.
    pub id: SignalId,
    /// The VCD identifier code the signal was declared with.
    pub code: String,
    /// Signal name with any range suffix removed.
    pub name: String,
    /// Signal bit width.
    pub width: u32,
    /// Ordered list of value changes (strictly ascending by time).
    pub values: Vec<ValueChange>,
    /// Trace colour.
    pub color: Color,
    /// Whether the signal is wider than one bit.
    pub is_bus: bool,
}

impl Signal {
    /// Creates a new signal with an empty history.
    ///
    /// The colour defaults by width: [`DEFAULT_BUS_COLOR`] for buses and
    /// [`DEFAULT_SCALAR_COLOR`] for 1-bit signals.
    pub fn new(id: SignalId, code: impl Into<String>, name: impl Into<String>, width: u32) -> Self {
        let width = width.max(1);
        let is_bus = width > 1;
        Self {
            id,
            code: code.into(),
            name: name.into(),
            width,
            values: Vec::new(),
            color: if is_bus {
                DEFAULT_BUS_COLOR
            } else {
                DEFAULT_SCALAR_COLOR
            },
            is_bus,
        }
    }

    /// Records a value change at the given time.
    ///
    /// A change at the same time as the last one replaces it. A change that
    /// keeps the current value is dropped, as is a change earlier than the
    /// last recorded time. Returns `true` if the history was modified.
    pub fn record(&mut self, time: u64, value: String) -> bool {
        let Some(last) = self.values.last() else {
            self.values.push(ValueChange { time, value });
            return true;
        };
        if time < last.time || last.value == value {
            return false;
        }
        if time == last.time {
            self.values.pop();
            // Same-time replacement may bring the value back to the previous one.
            let unchanged = self.values.last().is_some_and(|prev| prev.value == value);
            if !unchanged {
                self.values.push(ValueChange { time, value });
            }
            return true;
        }
        self.values.push(ValueChange { time, value });
        true
    }

    /// Makes the history start at time 0 with the all-zero default when no
    /// change was recorded there.
    ///
    /// A first change that already holds the default is moved to time 0
    /// instead, keeping consecutive values distinct.
    pub fn ensure_initial_value(&mut self) {
        let default = self.default_value();
        match self.values.first_mut() {
            Some(first) if first.time == 0 => {}
            Some(first) if first.value == default => first.time = 0,
            _ => self.values.insert(
                0,
                ValueChange {
                    time: 0,
                    value: default,
                },
            ),
        }
    }

    /// Returns the default value shown before the first recorded change.
    pub fn default_value(&self) -> String {
        default_value(self.width)
    }

    /// Returns the index of the change in effect at `time`, or `None` if
    /// `time` precedes every change.
    ///
    /// Uses binary search for efficient lookup.
    pub fn change_index_at(&self, time: u64) -> Option<usize> {
        match self.values.binary_search_by_key(&time, |c| c.time) {
            Ok(idx) => Some(idx),
            Err(0) => None,
            Err(idx) => Some(idx - 1),
        }
    }

    /// Returns the recorded value at a given time, or `None` before the
    /// first change.
    pub fn value_at(&self, time: u64) -> Option<&str> {
        self.change_index_at(time)
            .map(|idx| self.values[idx].value.as_str())
    }

    /// Returns the value at a given time, falling back to the default value
    /// before the first change.
    pub fn value_at_time(&self, time: u64) -> Cow<'_, str> {
        match self.value_at(time) {
            Some(v) => Cow::Borrowed(v),
            None => Cow::Owned(self.default_value()),
        }
    }

    /// Returns all value changes within a time range (inclusive).
    pub fn changes_in_range(&self, start: u64, end: u64) -> &[ValueChange] {
        if self.values.is_empty() || end < start {
            return &[];
        }
        let start_idx = self.values.partition_point(|c| c.time < start);
        let end_idx = self.values.partition_point(|c| c.time <= end);
        &self.values[start_idx..end_idx]
    }

    /// Returns the time of the next change strictly after `time`.
    pub fn next_change_after(&self, time: u64) -> Option<u64> {
        let idx = self.values.partition_point(|c| c.time <= time);
        self.values.get(idx).map(|c| c.time)
    }

    /// Returns the time of the last change strictly before `time`.
    pub fn prev_change_before(&self, time: u64) -> Option<u64> {
        let idx = self.values.partition_point(|c| c.time < time);
        idx.checked_sub(1).map(|i| self.values[i].time)
    }

    /// Returns the maximum time recorded, or 0 if empty.
    pub fn max_time(&self) -> u64 {
        self.values.last().map_or(0, |c| c.time)
    }

    /// Returns the `{name, width, is_bus}` summary of this signal.
    pub fn summary(&self) -> SignalSummary {
        SignalSummary {
            name: self.name.clone(),
            width: self.width,
            is_bus: self.is_bus,
        }
    }
}

/// Structured row description consumed by signal list panels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSummary {
    /// Signal name.
    pub name: String,
    /// Bit width.
    pub width: u32,
    /// Whether the signal is a bus.
    pub is_bus: bool,
}
