//! Display formatting of raw signal values.
//!
//! Raw values are MSB-first bit strings of arbitrary width, so radix
//! conversion goes through [`num_bigint`]. [`format`] renders a raw value in
//! a [`Base`], optionally as a two's complement number, and [`parse_display`]
//! converts a displayed string back into a padded bit string.

#![warn(missing_docs)]

pub mod convert;
pub mod display;
pub mod error;

pub use convert::{format, parse_display};
pub use display::{is_signed_name, resolve_format, Base, DisplayFormat, FormatOverride, Signedness};
pub use error::ParseDisplayError;
