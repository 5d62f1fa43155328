//! Core CLI types - Cli, Command, and argument structs

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::schema::AnalysisSpec;

/// optodec: population decoding of choice and photostimulation
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "optodec")]
#[command(version)]
#[command(about = "Cross-validated decoding of lick decisions and photostimulation from neural recordings")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the configured accuracy sweep over time points
    Sweep(SweepArgs),

    /// Decode once at the given time points and write the prediction tables
    Decode(DecodeArgs),

    /// Print trial and neuron counts of session files
    Details(DetailsArgs),

    /// Validate a configuration file without decoding
    Validate(ValidateArgs),
}

/// Arguments for the sweep command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct SweepArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Aggregate accuracies per mouse
    #[arg(long)]
    pub per_mouse: bool,

    /// Score the projected decoders
    #[arg(long)]
    pub projected: bool,
}

/// Arguments for the decode command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct DecodeArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Time points to average, in seconds (default post-stimulus window if omitted)
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    pub time: Vec<f64>,

    /// Override output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the details command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct DetailsArgs {
    /// Session JSON files
    #[arg(value_name = "SESSIONS", required = true)]
    pub sessions: Vec<PathBuf>,

    /// Print JSON instead of a text table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show detailed validation report
    #[arg(short, long)]
    pub detailed: bool,
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to an AnalysisSpec
pub fn apply_overrides(spec: &mut AnalysisSpec, args: &SweepArgs) {
    if let Some(output) = &args.output {
        spec.output.path = output.clone();
    }
    if args.per_mouse {
        spec.sweep.per_mouse = true;
    }
    if args.projected {
        spec.sweep.projected = true;
    }
}
