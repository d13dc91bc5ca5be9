//! The `wavescope export` command: writes a static image of a trace.
//!
//! The format comes from `--format`, then the output extension, then the
//! `[export]` section of the configuration. Size and visibility flags
//! override the configured defaults.

use wavescope_config::ExportDefaults;
use wavescope_engine::WaveformEngine;
use wavescope_export::{ExportFormat, ExportOptions};
use wavescope_viewport::parse_time;

use crate::pipeline::{load_settings, open_trace, run_script_file};
use crate::{ExportArgs, GlobalArgs};

/// Runs the `export` command and returns the process exit code.
pub fn run(args: &ExportArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_settings(global)?;
    let defaults = config.export.clone();
    let mut engine = open_trace(&args.file, config)?;
    if let Some(ref script) = args.script {
        run_script_file(&mut engine, script)?;
    }

    let options = build_options(args, &defaults, &engine)?;
    let payload = engine.export(&options)?;
    payload.write_to(&args.output)?;
    if !global.quiet {
        eprintln!(
            "exported {} ({}x{} {}) to {}",
            args.file.display(),
            payload.width,
            payload.height,
            payload.format,
            args.output.display()
        );
    }
    Ok(0)
}

/// Combines the configured defaults with the command-line overrides.
fn build_options(
    args: &ExportArgs,
    defaults: &ExportDefaults,
    engine: &WaveformEngine,
) -> Result<ExportOptions, Box<dyn std::error::Error>> {
    let mut options = ExportOptions::from_defaults(defaults)?;
    options.format = match args.format {
        Some(format) => format,
        None => ExportFormat::from_path(&args.output).unwrap_or(options.format),
    };
    if let Some(width) = args.width {
        options.width = width;
    }
    if args.height.is_some() {
        options.height = args.height;
    }
    if let Some(scale) = args.scale {
        options.scale = scale;
    }
    if args.no_grid {
        options.show_grid = false;
    }
    if args.no_values {
        options.show_values = false;
    }
    options.time_range = time_window(args, engine)?;
    log::debug!("export options: {options:?}");
    Ok(options)
}

/// Resolves `--from`/`--to`. A missing bound defaults to the trace start or
/// end; with neither the current view is exported.
fn time_window(
    args: &ExportArgs,
    engine: &WaveformEngine,
) -> Result<Option<(u64, u64)>, Box<dyn std::error::Error>> {
    if args.from.is_none() && args.to.is_none() {
        return Ok(None);
    }
    let timescale = engine.store().timescale();
    let bound = |text: &Option<String>, fallback: u64| -> Result<u64, String> {
        match text {
            Some(t) => parse_time(t, timescale).map_err(|e| format!("invalid time '{t}': {e}")),
            None => Ok(fallback),
        }
    };
    let start = bound(&args.from, 0)?;
    let end = bound(&args.to, engine.store().max_time())?;
    if end <= start {
        return Err(format!("empty export window: {start} to {end}").into());
    }
    Ok(Some((start, end)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::{global_with, write_trace, TRACE};
    use std::path::PathBuf;

    fn args(output: &str) -> ExportArgs {
        ExportArgs {
            file: PathBuf::from("trace.vcd"),
            output: PathBuf::from(output),
            format: None,
            width: None,
            height: None,
            scale: None,
            from: None,
            to: None,
            no_grid: false,
            no_values: false,
            script: None,
        }
    }

    fn engine() -> WaveformEngine {
        let mut engine = WaveformEngine::default();
        engine.load_vcd(TRACE).unwrap();
        engine
    }

    #[test]
    fn format_from_extension_then_config() {
        let defaults = ExportDefaults {
            format: "pdf".to_string(),
            ..ExportDefaults::default()
        };
        let e = engine();
        let opts = build_options(&args("out.png"), &defaults, &e).unwrap();
        assert_eq!(opts.format, ExportFormat::Png);
        let opts = build_options(&args("out.img"), &defaults, &e).unwrap();
        assert_eq!(opts.format, ExportFormat::Pdf);
        let mut a = args("out.png");
        a.format = Some(ExportFormat::Svg);
        assert_eq!(build_options(&a, &defaults, &e).unwrap().format, ExportFormat::Svg);
    }

    #[test]
    fn flags_override_defaults() {
        let mut a = args("out.svg");
        a.width = Some(640);
        a.height = Some(300);
        a.scale = Some(2.0);
        a.no_grid = true;
        a.no_values = true;
        let opts = build_options(&a, &ExportDefaults::default(), &engine()).unwrap();
        assert_eq!(opts.width, 640);
        assert_eq!(opts.height, Some(300));
        assert_eq!(opts.scale, 2.0);
        assert!(!opts.show_grid);
        assert!(!opts.show_values);
        assert_eq!(opts.time_range, None);
    }

    #[test]
    fn window_bounds_default_to_trace_extent() {
        let e = engine();
        let mut a = args("out.svg");
        a.from = Some("5ns".to_string());
        assert_eq!(time_window(&a, &e).unwrap(), Some((5, 20)));
        a.from = None;
        a.to = Some("10".to_string());
        assert_eq!(time_window(&a, &e).unwrap(), Some((0, 10)));
    }

    #[test]
    fn empty_window_is_rejected() {
        let mut a = args("out.svg");
        a.from = Some("10".to_string());
        a.to = Some("10".to_string());
        assert!(time_window(&a, &engine()).is_err());
    }

    #[test]
    fn writes_svg_file() {
        let dir = tempfile::tempdir().unwrap();
        let trace = write_trace(dir.path());
        let output = dir.path().join("wave.svg");
        let mut a = args(output.to_str().unwrap());
        a.file = trace;
        a.from = Some("0".to_string());
        a.to = Some("20ns".to_string());
        let code = run(&a, &global_with(Some(dir.path().to_path_buf()))).unwrap();
        assert_eq!(code, 0);
        let text = std::fs::read_to_string(&output).unwrap();
        assert!(text.contains("<svg"));
        assert!(text.contains("data"));
    }
}
