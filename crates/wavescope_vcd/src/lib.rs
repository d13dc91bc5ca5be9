//! Value Change Dump (VCD) parsing for the wavescope engine.
//!
//! [`parse_vcd`] turns VCD text into a [`ParsedTrace`]: the declared signals
//! with their change histories, the last timestamp and the timescale. The
//! parser is tolerant by construction; lines it does not understand are
//! skipped and counted, and only input that declares nothing is rejected.
//!
//! # Example
//!
//! ```
//! let text = "$timescale 1ns $end\n$var wire 1 ! clk $end\n#0\n0!\n#5\n1!\n";
//! let trace = wavescope_vcd::parse_vcd(text).unwrap();
//! assert_eq!(trace.max_time, 5);
//! assert_eq!(trace.signals[0].value_at_time(7), "1");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod parser;

pub use error::VcdError;
pub use parser::{load_vcd_file, parse_vcd, ParseStats, ParsedTrace};
