//! Loading analysis configurations from YAML

use crate::config::schema::AnalysisSpec;
use crate::config::validate::validate_config;
use crate::error::{Error, Result};
use crate::session::{load_sessions, Session};
use std::fs;
use std::path::Path;
use tracing::info;

/// Parse an analysis configuration from YAML text and validate it
pub fn parse_config(yaml: &str) -> Result<AnalysisSpec> {
    let spec: AnalysisSpec = serde_yaml::from_str(yaml)
        .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))?;
    validate_config(&spec).map_err(|e| Error::ConfigError(format!("Invalid config: {e}")))?;
    Ok(spec)
}

/// Read, parse and validate an analysis configuration
///
/// Relative session paths are resolved against the directory of the
/// configuration file.
///
/// ```no_run
/// use optodec::config::load_config;
///
/// let spec = load_config("analysis.yaml")?;
/// # Ok::<(), optodec::Error>(())
/// ```
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<AnalysisSpec> {
    let path = config_path.as_ref();
    let yaml_content = fs::read_to_string(path).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut spec: AnalysisSpec = serde_yaml::from_str(&yaml_content)
        .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))?;
    if let Some(base) = path.parent() {
        for session in &mut spec.sessions {
            if session.is_relative() {
                *session = base.join(&*session);
            }
        }
    }
    validate_config(&spec).map_err(|e| Error::ConfigError(format!("Invalid config: {e}")))?;
    Ok(spec)
}

/// Load every session a configuration lists
pub fn load_spec_sessions(spec: &AnalysisSpec) -> Result<Vec<Session>> {
    let sessions = load_sessions(&spec.sessions)?;
    info!(sessions = sessions.len(), "sessions loaded");
    Ok(sessions)
}
