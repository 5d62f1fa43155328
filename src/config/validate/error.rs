//! Validation error types

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("No session files listed")]
    NoSessions,

    #[error("Session file does not exist: {0}")]
    SessionNotFound(String),

    #[error("Invalid number of folds: {0} (must be >= 2)")]
    InvalidFolds(usize),

    #[error("Invalid C value: {0} (must be > 0.0)")]
    InvalidCValue(f64),

    #[error("Invalid sweep regularizer: {0} (must be > 0.0)")]
    InvalidRegularizer(f64),

    #[error("Invalid max_iter: {0} (must be > 0)")]
    InvalidMaxIter(usize),

    #[error("Invalid tolerance: {0} (must be > 0.0)")]
    InvalidTolerance(f64),

    #[error("Decoding targets cannot be empty")]
    EmptyTargets,

    #[error("Projected decoding requires exactly two targets, got {0}")]
    ProjectionTargets(usize),

    #[error("Sweep time points cannot be empty")]
    EmptyTimePoints,

    #[error("Sweep time point {0} is not finite")]
    NonFiniteTimePoint(f64),

    #[error("Sweep regions cannot be empty")]
    EmptyRegions,

    #[error("Options {0} and {1} are mutually exclusive")]
    MutuallyExclusive(&'static str, &'static str),

    #[error("Option {0} is not implemented")]
    Unsupported(&'static str),
}
