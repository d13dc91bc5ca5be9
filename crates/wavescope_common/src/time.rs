//! Time units and the per-trace timescale.
//!
//! Raw integer ticks are the canonical time unit everywhere in the engine.
//! A [`Timescale`] only tells display code how long one tick is, so labels
//! can be rendered in a readable unit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A real-world time unit, from femtoseconds up to seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Femtoseconds (1e-15 s).
    Fs,
    /// Picoseconds (1e-12 s).
    Ps,
    /// Nanoseconds (1e-9 s).
    Ns,
    /// Microseconds (1e-6 s).
    Us,
    /// Milliseconds (1e-3 s).
    Ms,
    /// Seconds.
    S,
}

impl TimeUnit {
    /// All units ordered from smallest to largest.
    pub const ALL: [TimeUnit; 6] = [
        TimeUnit::Fs,
        TimeUnit::Ps,
        TimeUnit::Ns,
        TimeUnit::Us,
        TimeUnit::Ms,
        TimeUnit::S,
    ];

    /// Returns the power-of-ten exponent of this unit relative to one second.
    pub fn exponent(self) -> i32 {
        match self {
            TimeUnit::Fs => -15,
            TimeUnit::Ps => -12,
            TimeUnit::Ns => -9,
            TimeUnit::Us => -6,
            TimeUnit::Ms => -3,
            TimeUnit::S => 0,
        }
    }

    /// Returns the length of one unit in seconds.
    pub fn seconds(self) -> f64 {
        10f64.powi(self.exponent())
    }

    /// Returns the display suffix (`"ns"`, `"us"`, ...).
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Fs => "fs",
            TimeUnit::Ps => "ps",
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Error type for parsing time unit strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time unit: '{input}'")]
pub struct ParseTimeUnitError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for TimeUnit {
    type Err = ParseTimeUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fs" => Ok(TimeUnit::Fs),
            "ps" => Ok(TimeUnit::Ps),
            "ns" => Ok(TimeUnit::Ns),
            "us" | "µs" => Ok(TimeUnit::Us),
            "ms" => Ok(TimeUnit::Ms),
            "s" => Ok(TimeUnit::S),
            _ => Err(ParseTimeUnitError {
                input: s.to_string(),
            }),
        }
    }
}

/// The duration of one trace tick, e.g. `10 ps`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timescale {
    /// Multiplier applied to `unit` (1, 10 or 100 in conforming traces).
    pub value: u32,
    /// The unit of one tick.
    pub unit: TimeUnit,
}

impl Timescale {
    /// Creates a timescale from a multiplier and unit.
    pub fn new(value: u32, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    /// Returns the length of one tick in seconds.
    pub fn seconds_per_tick(&self) -> f64 {
        self.value as f64 * self.unit.seconds()
    }

    /// Converts a raw tick count to seconds.
    pub fn ticks_to_seconds(&self, ticks: u64) -> f64 {
        ticks as f64 * self.seconds_per_tick()
    }

    /// Parses the body of a `$timescale` keyword.
    ///
    /// Accepts both the joined (`1ns`) and split (`1 ns`) spellings. Returns
    /// `None` for anything malformed, including a zero multiplier.
    pub fn parse(body: &str) -> Option<Self> {
        let compact: String = body.split_whitespace().collect();
        if compact.is_empty() {
            return None;
        }
        let digit_end = compact
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(compact.len());
        let (num_str, unit_str) = compact.split_at(digit_end);
        let value: u32 = if num_str.is_empty() {
            1
        } else {
            num_str.parse().ok()?
        };
        if value == 0 {
            return None;
        }
        let unit = unit_str.parse().ok()?;
        Some(Self { value, unit })
    }
}

impl Default for Timescale {
    fn default() -> Self {
        Self {
            value: 1,
            unit: TimeUnit::Ns,
        }
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
