//! Error types for decoding analyses
//!
//! A failure anywhere in a decoding run or sweep aborts it.

use thiserror::Error;

/// Result type alias for optodec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while selecting, decoding or aggregating trials
#[derive(Error, Debug)]
pub enum Error {
    /// Two options were requested that cannot be combined
    #[error("Mutually exclusive options: {0} and {1} cannot both be set")]
    MutuallyExclusive(String, String),

    /// A configuration path that is deliberately left unimplemented
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// A requested time point has no frame on the session's time axis
    #[error("Time point {time_point}s not found on the time axis of session {session}")]
    TimePointNotFound { session: String, time_point: f64 },

    /// Row or partition counts that must agree do not
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// Array shapes disagree
    #[error("Shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Not enough data to run the requested computation
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// A parameter is outside its valid range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A result key does not follow the `{mouse}_{region}` convention
    #[error("Invalid key '{0}': expected '{{mouse}}_{{region}}'")]
    InvalidKey(String),

    /// A mouse is missing one of the two regions in a paired comparison
    #[error("Mouse '{mouse}' has no entry for region '{region}'")]
    MissingPair { mouse: String, region: String },

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
