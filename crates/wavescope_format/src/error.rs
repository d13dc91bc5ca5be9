//! Errors for display-string parsing.

use crate::display::Base;

/// Errors produced by [`parse_display`](crate::parse_display).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDisplayError {
    /// The text is not a number in the requested base.
    #[error("'{text}' is not a valid {base} value")]
    Invalid {
        /// The rejected text.
        text: String,
        /// The base the text was parsed in.
        base: Base,
    },

    /// The number does not fit in the signal width.
    #[error("'{text}' does not fit in {width} bits")]
    OutOfRange {
        /// The rejected text.
        text: String,
        /// The signal width.
        width: u32,
    },
}
