//! Shared foundational types used across the wavescope waveform engine.
//!
//! This crate provides the time units and trace timescale, RGBA colours used
//! by the style configuration and renderer, and helpers for classifying and
//! padding the raw value strings stored in signal histories.

#![warn(missing_docs)]

pub mod color;
pub mod time;
pub mod value;

pub use color::{Color, ParseColorError};
pub use time::{ParseTimeUnitError, TimeUnit, Timescale};
pub use value::{default_value, is_bit_char, literal_payload, pad_bits, ValueKind};

#[cfg(test)]
mod tests {
    #[test]
    fn value_helpers_at_crate_root() {
        assert!(crate::is_bit_char('Z'));
        assert!(!crate::is_bit_char('q'));
        assert_eq!(crate::literal_payload("shello"), "hello");
        assert_eq!(crate::pad_bits("1", 4), "0001");
    }
}
