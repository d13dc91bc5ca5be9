//! Shared helpers for CLI commands: configuration discovery and trace
//! loading.

use std::path::{Path, PathBuf};

use wavescope_config::{load_config, load_config_file, WavescopeConfig, CONFIG_FILE_NAME};
use wavescope_engine::WaveformEngine;

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing
/// `wavescope.toml`.
pub fn find_config_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).is_file() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Loads the configuration selected by the global flags.
///
/// `--config` may name a file or a directory holding `wavescope.toml`.
/// Without it the nearest `wavescope.toml` above the current directory is
/// used, and the defaults when there is none.
pub fn load_settings(global: &GlobalArgs) -> Result<WavescopeConfig, Box<dyn std::error::Error>> {
    if let Some(ref path) = global.config {
        if path.is_dir() {
            return Ok(load_config(path)?);
        }
        return Ok(load_config_file(path)?);
    }
    let cwd = std::env::current_dir()?;
    match find_config_dir(&cwd) {
        Some(dir) => Ok(load_config(&dir)?),
        None => {
            log::debug!("no {CONFIG_FILE_NAME} found, using defaults");
            Ok(WavescopeConfig::default())
        }
    }
}

/// Creates an engine with `config` and loads the trace at `path`.
pub fn open_trace(
    path: &Path,
    config: WavescopeConfig,
) -> Result<WaveformEngine, Box<dyn std::error::Error>> {
    if !path.is_file() {
        return Err(format!("trace file not found: {}", path.display()).into());
    }
    let mut engine = WaveformEngine::new(config);
    let count = engine.load_vcd_file(path)?;
    log::debug!("{}: {count} signals", path.display());
    Ok(engine)
}

/// Runs the command script at `path` against `engine`.
pub fn run_script_file(
    engine: &mut WaveformEngine,
    path: &Path,
) -> Result<usize, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read script {}: {e}", path.display()))?;
    let count = engine.run_script(&text)?;
    log::debug!("ran {count} commands from {}", path.display());
    Ok(count)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    use crate::GlobalArgs;

    pub const TRACE: &str = "\
$timescale 1ns $end
$scope module top $end
$var wire 1 ! clk $end
$var wire 8 \" data $end
$upscope $end
$enddefinitions $end
#0
0!
b0 \"
#5
1!
b1010 \"
#10
0!
b11111111 \"
#20
1!
";

    pub fn write_trace(dir: &Path) -> PathBuf {
        let path = dir.join("trace.vcd");
        std::fs::write(&path, TRACE).unwrap();
        path
    }

    pub fn global_with(config: Option<PathBuf>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn find_config_dir_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_config_dir(&nested), Some(dir.path().to_path_buf()));
    }

    #[test]
    fn explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[export]\nformat = \"pdf\"\nwidth = 640\n").unwrap();
        let config = load_settings(&global_with(Some(path))).unwrap();
        assert_eq!(config.export.format, "pdf");
        assert_eq!(config.export.width, 640);
    }

    #[test]
    fn explicit_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[export]\nwidth = 800\n",
        )
        .unwrap();
        let config = load_settings(&global_with(Some(dir.path().to_path_buf()))).unwrap();
        assert_eq!(config.export.width, 800);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_settings(&global_with(Some(missing))).is_err());
    }

    #[test]
    fn open_trace_loads_signals() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_trace(dir.path());
        let engine = open_trace(&path, WavescopeConfig::default()).unwrap();
        assert_eq!(engine.store().len(), 2);
        assert_eq!(engine.store().max_time(), 20);
    }

    #[test]
    fn open_trace_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_trace(&dir.path().join("x.vcd"), WavescopeConfig::default())
            .err()
            .unwrap();
        assert!(err.to_string().contains("trace file not found"));
    }

    #[test]
    fn script_file_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_trace(dir.path());
        let mut engine = open_trace(&path, WavescopeConfig::default()).unwrap();
        let script = dir.path().join("setup.txt");
        std::fs::write(&script, "# setup\n@0 cursor 10\n@5 fmt data dec\n").unwrap();
        assert_eq!(run_script_file(&mut engine, &script).unwrap(), 2);
        assert_eq!(engine.value_at("data", 10).unwrap(), "255");
    }
}
