//! optodec CLI
//!
//! # Usage
//!
//! ```bash
//! # Time-resolved accuracy, pooled over mice
//! optodec sweep analysis.yaml
//!
//! # Per-mouse accuracy with S1 vs S2 Wilcoxon tests
//! optodec sweep analysis.yaml --per-mouse
//!
//! # Prediction tables at fixed time points
//! optodec decode analysis.yaml --time 0.5,1.0
//!
//! # Session summary
//! optodec details data/*.json
//! ```

use clap::Parser;
use optodec::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
