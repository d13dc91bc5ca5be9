//! Raw value strings as stored in signal histories.
//!
//! A raw value is one of:
//! - a bit string (`0`/`1`/`x`/`z` characters, MSB first) padded to the
//!   signal width,
//! - a real literal tagged with a leading `r` (`"r3.25"`),
//! - a string literal tagged with a leading `s` (`"sIDLE"`).
//!
//! A value made entirely of `x` (or `z`) is the unknown (or high-impedance)
//! sentinel for its width.

/// Classification of a raw value string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Every character is `0` or `1`.
    Bits,
    /// Every character is `x` (unknown).
    Unknown,
    /// Every character is `z` (high impedance).
    HighZ,
    /// A bit string with some, but not uniformly, non-binary characters.
    Mixed,
    /// A tagged real literal (`r…`).
    Real,
    /// A tagged string literal (`s…`).
    Str,
}

impl ValueKind {
    /// Classifies a raw value string.
    pub fn classify(raw: &str) -> Self {
        match raw.as_bytes().first() {
            None => ValueKind::Unknown,
            Some(b'r') => ValueKind::Real,
            Some(b's') => ValueKind::Str,
            Some(_) => {
                let bytes = raw.as_bytes();
                if bytes.iter().all(|b| matches!(b, b'0' | b'1')) {
                    ValueKind::Bits
                } else if bytes.iter().all(|&b| b == b'x') {
                    ValueKind::Unknown
                } else if bytes.iter().all(|&b| b == b'z') {
                    ValueKind::HighZ
                } else {
                    ValueKind::Mixed
                }
            }
        }
    }

    /// Returns `true` for plain binary values.
    pub fn is_concrete(self) -> bool {
        self == ValueKind::Bits
    }

    /// Returns `true` if the value carries unknown or high-impedance bits.
    pub fn has_xz(self) -> bool {
        matches!(self, ValueKind::Unknown | ValueKind::HighZ | ValueKind::Mixed)
    }

    /// Returns `true` for tagged real/string literals.
    pub fn is_literal(self) -> bool {
        matches!(self, ValueKind::Real | ValueKind::Str)
    }
}

/// Returns the payload of a tagged literal, or the raw string unchanged.
pub fn literal_payload(raw: &str) -> &str {
    match ValueKind::classify(raw) {
        ValueKind::Real | ValueKind::Str => &raw[1..],
        _ => raw,
    }
}

/// Returns the all-zero default value for a signal of `width` bits.
pub fn default_value(width: u32) -> String {
    "0".repeat(width.max(1) as usize)
}

/// Normalizes and left-pads a bit string to `width` characters.
///
/// Characters are lower-cased. Short values are extended with `0`, or with
/// `x`/`z` when the most significant given bit is `x`/`z`, following the
/// IEEE 1364 extension rule. Values longer than `width` keep their least
/// significant `width` bits.
pub fn pad_bits(bits: &str, width: u32) -> String {
    let width = width.max(1) as usize;
    let bits = bits.to_ascii_lowercase();
    let len = bits.len();
    if len == 0 {
        return "0".repeat(width);
    }
    if len >= width {
        return bits[len - width..].to_string();
    }
    let fill = match bits.as_bytes()[0] {
        b'x' => 'x',
        b'z' => 'z',
        _ => '0',
    };
    let mut padded = String::with_capacity(width);
    padded.extend(std::iter::repeat(fill).take(width - len));
    padded.push_str(&bits);
    padded
}

/// Returns `true` if `c` is a character allowed in a VCD bit string.
pub fn is_bit_char(c: char) -> bool {
    matches!(
        c.to_ascii_lowercase(),
        '0' | '1' | 'x' | 'z' | 'u' | 'w' | 'h' | 'l' | '-'
    )
}
