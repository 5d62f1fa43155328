//! # optodec
//!
//! Cross-validated population decoding of lick decisions and
//! photostimulation from trial-resolved calcium imaging sessions.
//!
//! ## Modules
//!
//! - [`session`]: recording sessions, outcome labels and session summaries
//! - [`decode`]: trial selection, features, stratified folds, logistic
//!   regression and the per-session decoding engine
//! - [`metrics`]: accuracy of probabilistic binary predictions
//! - [`sweep`]: decoder accuracy as a function of time, pooled or per mouse
//! - [`stats`]: paired S1 vs S2 comparisons (Wilcoxon signed-rank)
//! - [`reshape`]: long-format per-trial prediction tables
//! - [`response`]: post- minus pre-stimulus activity differences
//! - [`config`]: YAML analysis configuration and CLI arguments
//! - [`cli`]: command handlers of the `optodec` binary
//!
//! ## Example
//!
//! ```no_run
//! use optodec::config::{load_config, load_spec_sessions};
//! use optodec::sweep::{run_sweep, Measure, Split};
//!
//! let spec = load_config("analysis.yaml")?;
//! let sessions = load_spec_sessions(&spec)?;
//! let result = run_sweep(&sessions, &spec.decode, &spec.sweep)?;
//! for (region, curve) in result.curve(Measure::DecAccuracy, Split::All) {
//!     println!("{region}: {:?}", curve.column(0));
//! }
//! # Ok::<(), optodec::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod decode;
pub mod error;
pub mod metrics;
pub mod reshape;
pub mod response;
pub mod session;
pub mod stats;
pub mod sweep;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{Error, Result};
