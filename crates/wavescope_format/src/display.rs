//! Display bases and per-signal format resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The radix a value is displayed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Base {
    /// Base 2, MSB first.
    Binary,
    /// Base 10.
    Decimal,
    /// Base 16, upper-case digits.
    #[default]
    Hex,
}

impl Base {
    /// Cycles to the next display base.
    pub fn cycle(self) -> Self {
        match self {
            Self::Hex => Self::Binary,
            Self::Binary => Self::Decimal,
            Self::Decimal => Self::Hex,
        }
    }

    /// Returns the short badge label (`BIN`, `DEC`, `HEX`).
    pub fn badge(self) -> &'static str {
        match self {
            Self::Binary => "BIN",
            Self::Decimal => "DEC",
            Self::Hex => "HEX",
        }
    }

    /// Returns the numeric radix.
    pub fn radix(self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Decimal => 10,
            Self::Hex => 16,
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Binary => "binary",
            Self::Decimal => "decimal",
            Self::Hex => "hex",
        })
    }
}

impl FromStr for Base {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" | "bin" | "b" => Ok(Self::Binary),
            "decimal" | "dec" | "d" => Ok(Self::Decimal),
            "hex" | "hexadecimal" | "h" => Ok(Self::Hex),
            other => Err(format!(
                "unknown base '{other}' (expected binary, decimal or hex)"
            )),
        }
    }
}

/// How signedness is chosen for signals without an explicit override.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signedness {
    /// Signed when the signal name mentions "signed".
    #[default]
    Auto,
    /// Always two's complement.
    Signed,
    /// Always unsigned.
    Unsigned,
}

impl Signedness {
    /// Resolves the signedness for a signal called `name`.
    pub fn resolve(self, name: &str) -> bool {
        match self {
            Self::Auto => is_signed_name(name),
            Self::Signed => true,
            Self::Unsigned => false,
        }
    }
}

impl FromStr for Signedness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "signed" => Ok(Self::Signed),
            "unsigned" => Ok(Self::Unsigned),
            other => Err(format!(
                "unknown signedness '{other}' (expected auto, signed or unsigned)"
            )),
        }
    }
}

/// Returns `true` if `name` contains `signed` in any letter case.
///
/// Note that `unsigned_count` also matches; callers that care set the
/// signedness explicitly.
pub fn is_signed_name(name: &str) -> bool {
    name.to_ascii_lowercase().contains("signed")
}

/// The resolved display format of one signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFormat {
    /// Display radix.
    pub base: Base,
    /// Whether the value is a two's complement number.
    pub signed: bool,
}

impl DisplayFormat {
    /// Creates a display format.
    pub fn new(base: Base, signed: bool) -> Self {
        Self { base, signed }
    }
}

impl fmt::Display for DisplayFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.signed {
            write!(f, "signed {}", self.base)
        } else {
            write!(f, "{}", self.base)
        }
    }
}

/// Per-signal format settings; unset fields fall back to the global default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormatOverride {
    /// Explicit base, if any.
    pub base: Option<Base>,
    /// Explicit signedness, if any.
    pub signed: Option<bool>,
}

/// Resolves the effective format of a signal.
///
/// Override fields beat the defaults field by field. Without an explicit
/// signedness, `default_signedness` decides (auto-detecting from the name
/// when it is [`Signedness::Auto`]).
pub fn resolve_format(
    name: &str,
    over: Option<&FormatOverride>,
    default_base: Base,
    default_signedness: Signedness,
) -> DisplayFormat {
    let base = over.and_then(|o| o.base).unwrap_or(default_base);
    let signed = over
        .and_then(|o| o.signed)
        .unwrap_or_else(|| default_signedness.resolve(name));
    DisplayFormat { base, signed }
}
