//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::WavescopeConfig;
use std::path::Path;

/// Name of the configuration file looked up in a directory.
pub const CONFIG_FILE_NAME: &str = "wavescope.toml";

/// Loads `<dir>/wavescope.toml`, or the defaults when the file is absent.
pub fn load_config(dir: &Path) -> Result<WavescopeConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        log::debug!("no {} in {}, using defaults", CONFIG_FILE_NAME, dir.display());
        return Ok(WavescopeConfig::default());
    }
    load_config_file(&path)
}

/// Loads and validates a configuration from an explicit path.
pub fn load_config_file(path: &Path) -> Result<WavescopeConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = load_config_from_str(&content)?;
    log::debug!("loaded configuration from {}", path.display());
    Ok(config)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<WavescopeConfig, ConfigError> {
    let config: WavescopeConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that sizes are positive and finite and the export scale is sane.
pub fn validate_config(config: &WavescopeConfig) -> Result<(), ConfigError> {
    let style = &config.style;
    let positive = [
        ("style.row_height", style.row_height),
        ("style.bus_row_height", style.bus_row_height),
        ("style.bit_row_height", style.bit_row_height),
        ("style.header_height", style.header_height),
        ("style.font_size", style.font_size),
        ("style.minor_tick_px", style.minor_tick_px),
        ("style.pan_step_px", style.pan_step_px),
        ("export.scale", config.export.scale),
    ];
    for (key, value) in positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "{key} must be a positive number, got {value}"
            )));
        }
    }
    let non_negative = [
        ("style.name_column_width", style.name_column_width),
        ("style.lod_floor_px", style.lod_floor_px),
        ("style.capsule_min_px", style.capsule_min_px),
        ("style.capsule_slant_px", style.capsule_slant_px),
    ];
    for (key, value) in non_negative {
        if !(value.is_finite() && value >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "{key} must not be negative, got {value}"
            )));
        }
    }
    if config.export.width == 0 {
        return Err(ConfigError::ValidationError(
            "export.width must be positive".to_string(),
        ));
    }
    if config.export.height == Some(0) {
        return Err(ConfigError::ValidationError(
            "export.height must be positive".to_string(),
        ));
    }
    if config.export.format.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "export.format must not be empty".to_string(),
        ));
    }
    Ok(())
}
