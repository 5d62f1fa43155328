//! Configuration validation logic
//!
//! Validates analysis configurations before any session is loaded.

use super::error::ValidationError;
use crate::config::schema::AnalysisSpec;

/// Validate an analysis configuration
///
/// Checks:
/// - Session files are listed and exist
/// - Numeric values are in valid ranges
/// - Selection modes are not combined
/// - The sweep has time points and regions
pub fn validate_config(spec: &AnalysisSpec) -> Result<(), ValidationError> {
    if spec.sessions.is_empty() {
        return Err(ValidationError::NoSessions);
    }

    // Session files are generated on the fly in tests
    #[cfg(not(test))]
    if let Some(missing) = spec.sessions.iter().find(|p| !p.exists()) {
        return Err(ValidationError::SessionNotFound(
            missing.display().to_string(),
        ));
    }

    let decode = &spec.decode;
    if decode.n_splits < 2 {
        return Err(ValidationError::InvalidFolds(decode.n_splits));
    }
    if !(decode.c_value > 0.0) {
        return Err(ValidationError::InvalidCValue(decode.c_value));
    }
    if decode.max_iter == 0 {
        return Err(ValidationError::InvalidMaxIter(decode.max_iter));
    }
    if !(decode.tol > 0.0) {
        return Err(ValidationError::InvalidTolerance(decode.tol));
    }
    if decode.targets.is_empty() {
        return Err(ValidationError::EmptyTargets);
    }

    let selection = &decode.selection;
    if selection.hit_miss_only && selection.hit_spont_only {
        return Err(ValidationError::MutuallyExclusive(
            "hit_miss_only",
            "hit_spont_only",
        ));
    }
    if selection.hit_miss_only {
        return Err(ValidationError::Unsupported("hit_miss_only"));
    }
    if decode.projection.is_some() && decode.effective_targets().len() != 2 {
        return Err(ValidationError::ProjectionTargets(
            decode.effective_targets().len(),
        ));
    }

    let sweep = &spec.sweep;
    if sweep.time_points.is_empty() {
        return Err(ValidationError::EmptyTimePoints);
    }
    if let Some(&t) = sweep.time_points.iter().find(|t| !t.is_finite()) {
        return Err(ValidationError::NonFiniteTimePoint(t));
    }
    if sweep.regions.is_empty() {
        return Err(ValidationError::EmptyRegions);
    }
    if !(sweep.regularizer > 0.0) {
        return Err(ValidationError::InvalidRegularizer(sweep.regularizer));
    }

    Ok(())
}
