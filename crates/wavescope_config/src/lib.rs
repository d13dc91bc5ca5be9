//! Parsing and validation of `wavescope.toml` configuration files.
//!
//! Every section is optional; a missing file or empty document yields
//! [`WavescopeConfig::default`]. The [`Style`] and [`Palette`] parameterise
//! the renderer and exporter, [`DisplayConfig`] sets the default value
//! format, and [`ExportDefaults`] seeds export options.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, validate_config, CONFIG_FILE_NAME};
pub use types::*;
