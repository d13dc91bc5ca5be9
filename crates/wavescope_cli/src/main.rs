//! wavescope: inspect and export VCD waveforms from the command line.
//!
//! `wavescope view` opens the terminal viewer, `wavescope signals` and
//! `wavescope value` query a trace, and `wavescope export` writes a static
//! SVG, PNG or PDF image.

#![warn(missing_docs)]

mod export;
mod pipeline;
mod signals;
mod value;
mod view;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use wavescope_export::ExportFormat;
use wavescope_format::Base;

/// wavescope: a VCD waveform viewer.
#[derive(Parser, Debug)]
#[command(name = "wavescope", version, about = "VCD waveform viewer and exporter")]
pub struct Cli {
    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug-level logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored log output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `wavescope.toml`, or a directory containing one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a trace in the terminal viewer.
    View(ViewArgs),
    /// List the signals of a trace.
    Signals(SignalsArgs),
    /// Print a signal's value at a time.
    Value(ValueArgs),
    /// Export a static image of a trace.
    Export(ExportArgs),
}

/// Arguments for `wavescope view`.
#[derive(Parser, Debug)]
pub struct ViewArgs {
    /// VCD file to open.
    pub file: PathBuf,

    /// Command script to run before the viewer opens.
    #[arg(long)]
    pub script: Option<PathBuf>,
}

/// Arguments for `wavescope signals`.
#[derive(Parser, Debug)]
pub struct SignalsArgs {
    /// VCD file to read.
    pub file: PathBuf,

    /// Print machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `wavescope value`.
#[derive(Parser, Debug)]
pub struct ValueArgs {
    /// VCD file to read.
    pub file: PathBuf,

    /// Signal name.
    pub signal: String,

    /// Time in ticks or with a unit (e.g. `15ns`).
    pub time: String,

    /// Display base (`hex`, `decimal`, `binary`).
    #[arg(long)]
    pub base: Option<Base>,

    /// Read the value as two's complement.
    #[arg(long)]
    pub signed: bool,
}

/// Arguments for `wavescope export`.
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// VCD file to read.
    pub file: PathBuf,

    /// Output path.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output format; defaults to the output extension.
    #[arg(short, long)]
    pub format: Option<ExportFormat>,

    /// Image width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels; fitted to the rows when omitted.
    #[arg(long)]
    pub height: Option<u32>,

    /// Device pixel ratio.
    #[arg(long)]
    pub scale: Option<f64>,

    /// Start of the exported window (e.g. `10ns`).
    #[arg(long)]
    pub from: Option<String>,

    /// End of the exported window.
    #[arg(long)]
    pub to: Option<String>,

    /// Omit the grid.
    #[arg(long)]
    pub no_grid: bool,

    /// Omit values inside bus capsules.
    #[arg(long)]
    pub no_values: bool,

    /// Command script to run before exporting.
    #[arg(long)]
    pub script: Option<PathBuf>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from the terminal.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print debug information.
    pub verbose: bool,
    /// Optional config file or directory.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::View(ref args) => view::run(args, &global),
        Command::Signals(ref args) => signals::run(args, &global),
        Command::Value(ref args) => value::run(args, &global),
        Command::Export(ref args) => export::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Default log filter for the verbosity flags; `RUST_LOG` overrides it.
fn default_log_filter(quiet: bool, verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

fn init_logging(cli: &Cli) {
    let env = env_logger::Env::default().default_filter_or(default_log_filter(cli.quiet, cli.verbose));
    let mut builder = env_logger::Builder::from_env(env);
    builder.format_timestamp(None);
    match cli.color {
        ColorChoice::Auto => {}
        ColorChoice::Always => {
            builder.write_style(env_logger::WriteStyle::Always);
        }
        ColorChoice::Never => {
            builder.write_style(env_logger::WriteStyle::Never);
        }
    }
    let _ = builder.try_init();
}
