//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! optodec sweep analysis.yaml
//! optodec sweep analysis.yaml --per-mouse --output acc.json
//! optodec decode analysis.yaml --time 0.5,1.0
//! optodec details data/*.json
//! optodec validate analysis.yaml
//! ```

mod core;

pub use core::{
    apply_overrides, parse_args, Cli, Command, DecodeArgs, DetailsArgs, SweepArgs, ValidateArgs,
};
