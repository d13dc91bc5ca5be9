//! In-memory value change database for waveform display.
//!
//! A [`SignalStore`] owns every [`Signal`] of one trace together with the
//! trace's end time and timescale. Signals keep their changes sorted by
//! time so that value lookups are binary searches, and buses can be split
//! into per-bit [`BitSignal`]s which the store memoizes until the trace is
//! replaced.

#![warn(missing_docs)]

pub mod bits;
pub mod signal;
pub mod store;

pub use bits::{bit_decompose, BitSignal};
pub use signal::{Signal, SignalId, SignalSummary, ValueChange, DEFAULT_BUS_COLOR, DEFAULT_SCALAR_COLOR};
pub use store::SignalStore;
