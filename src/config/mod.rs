//! Declarative analysis configuration
//!
//! An analysis is described by one YAML file listing the session files,
//! the decoding options and the time sweep. The CLI argument types live
//! here too, next to the schema they override.

mod cli;
mod loader;
mod schema;
mod validate;


pub use cli::{
    apply_overrides, parse_args, Cli, Command, DecodeArgs, DetailsArgs, SweepArgs, ValidateArgs,
};
pub use loader::{load_config, load_spec_sessions, parse_config};
pub use schema::{AnalysisSpec, OutputSpec};
pub use validate::{validate_config, ValidationError};
