//! CLI argument definitions for `lumen-range`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "lumen-range",
    version,
    about = "Best/worst-case light output for chain projects",
    long_about = "Estimate the light output range of lamp projects.\n\n\
                  Each chain is a light source followed by attenuating components;\n\
                  component tolerances come from the catalog and compound along the chain."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Catalog document (JSON or TOML, by extension). Defaults to the built-in catalog.
    #[arg(long = "catalog", value_name = "PATH", global = true)]
    pub catalog: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print per-chain and system light output ranges for a project.
    Summary(SummaryArgs),

    /// List component kinds, their modifiers and options.
    Catalog,

    /// Write the active catalog to a file.
    ExportCatalog(ExportCatalogArgs),
}

#[derive(Parser)]
pub struct SummaryArgs {
    /// Project document (JSON).
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,

    /// Required output in lumens (overrides the project's target).
    #[arg(long = "target", value_name = "LUMENS")]
    pub target: Option<f64>,

    /// Exit with status 1 when even the best case misses the target.
    #[arg(long = "fail-below-target")]
    pub fail_below_target: bool,
}

#[derive(Parser)]
pub struct ExportCatalogArgs {
    /// Destination; `.toml` writes TOML, anything else JSON.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
