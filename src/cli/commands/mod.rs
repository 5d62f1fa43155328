//! CLI command implementations

mod decode;
mod details;
mod sweep;
mod validate;


use crate::cli::logging::init_tracing;
use crate::cli::LogLevel;
use crate::config::{Cli, Command};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Execute a CLI command based on the parsed arguments
pub fn run_command(cli: Cli) -> Result<(), String> {
    // Configure output based on verbose/quiet flags
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };
    init_tracing(log_level);

    match cli.command {
        Command::Sweep(args) => sweep::run_sweep(args, log_level),
        Command::Decode(args) => decode::run_decode(args, log_level),
        Command::Details(args) => details::run_details(args, log_level),
        Command::Validate(args) => validate::run_validate(args, log_level),
    }
}

/// Serialize `value` as JSON into `path`, creating parent directories
fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
    }
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| format!("Failed to serialize results: {e}"))?;
    fs::write(path, json).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}
