//! Human-readable time labels and time parsing.

use std::fmt;

use wavescope_common::{TimeUnit, Timescale};

/// A time expressed in a display unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledTime {
    /// Magnitude in `unit`.
    pub value: f64,
    /// The chosen unit.
    pub unit: TimeUnit,
}

impl fmt::Display for ScaledTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_axis_number(self.value), self.unit)
    }
}

/// Expresses `ticks` trace ticks in the largest unit that keeps the
/// magnitude within `[0.1, 10000)`.
///
/// Zero stays in the trace's own unit. Magnitudes too small for
/// femtoseconds or too large for seconds use those units anyway.
pub fn best_time_unit(ticks: f64, timescale: Timescale) -> ScaledTime {
    if ticks == 0.0 || !ticks.is_finite() {
        return ScaledTime {
            value: 0.0,
            unit: timescale.unit,
        };
    }
    let seconds = ticks * timescale.seconds_per_tick();
    for unit in TimeUnit::ALL.iter().rev() {
        let value = seconds / unit.seconds();
        // Tolerate representation error at the lower bound (100 ns is 0.1 us).
        if value.abs() >= 0.1 - 1e-9 && value.abs() < 10_000.0 {
            return ScaledTime { value, unit: *unit };
        }
    }
    let unit = if seconds.abs() < TimeUnit::Fs.seconds() {
        TimeUnit::Fs
    } else {
        TimeUnit::S
    };
    ScaledTime {
        value: seconds / unit.seconds(),
        unit,
    }
}

/// Formats `ticks` with [`best_time_unit`], e.g. `"15ns"` or `"2.5us"`.
pub fn format_time(ticks: f64, timescale: Timescale) -> String {
    best_time_unit(ticks, timescale).to_string()
}

/// Parses a time such as `"15ns"`, `"2.5 us"` or a bare tick count `"150"`
/// into trace ticks, rounding to the nearest tick.
pub fn parse_time(text: &str, timescale: Timescale) -> Result<u64, String> {
    let s = text.trim();
    if s.is_empty() {
        return Err("empty time".to_string());
    }
    let num_end = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    if num_end == 0 {
        return Err(format!("no numeric value in '{s}'"));
    }
    let number: f64 = s[..num_end]
        .parse()
        .map_err(|_| format!("invalid number in '{s}'"))?;

    let suffix = s[num_end..].trim();
    let ticks = if suffix.is_empty() {
        number
    } else {
        let unit: TimeUnit = suffix.parse().map_err(|e| format!("{e}"))?;
        number * unit.seconds() / timescale.seconds_per_tick()
    };
    if !ticks.is_finite() || ticks > u64::MAX as f64 {
        return Err(format!("time out of range: '{s}'"));
    }
    Ok(ticks.round() as u64)
}

/// Formats with 0, 1 or 2 decimals by magnitude and trims trailing zeros.
fn format_axis_number(value: f64) -> String {
    let mut s = if value.abs() >= 100.0 {
        format!("{:.0}", value.round())
    } else if value.abs() >= 10.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    };
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}
