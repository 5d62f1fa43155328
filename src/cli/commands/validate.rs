//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, AnalysisSpec, ValidateArgs};

/// Format decoding options as a string
pub fn format_decode_info(spec: &AnalysisSpec) -> String {
    let decode = &spec.decode;
    let targets: Vec<String> = decode.targets.iter().map(ToString::to_string).collect();
    let mut lines = vec![
        format!("  Sessions: {}", spec.sessions.len()),
        format!("  Targets: {}", targets.join(", ")),
        format!("  Folds: {}", decode.n_splits),
        format!("  Penalty: {:?} (C={})", decode.penalty, decode.c_value),
        format!("  Neurons: {:?}", decode.neurons),
        format!("  Spontaneous trials trained on: {}", decode.spont_used_for_training),
    ];
    if let Some(direction) = decode.projection {
        lines.push(format!("  Projection: {direction:?}"));
    }
    lines.join("\n")
}

/// Format sweep options as a string
pub fn format_sweep_info(spec: &AnalysisSpec) -> String {
    let sweep = &spec.sweep;
    let regions: Vec<&str> = sweep.regions.iter().map(|r| r.label()).collect();
    [
        format!("  Time points: {:?}", sweep.time_points),
        format!("  Regions: {}", regions.join(", ")),
        format!("  Metric: {}", sweep.metric),
        format!("  Regularizer: {}", sweep.regularizer),
        format!(
            "  Aggregation: {}",
            if sweep.per_mouse { "per mouse" } else { "pooled" }
        ),
        format!("  Output: {}", spec.output.path.display()),
    ]
    .join("\n")
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    log(level, LogLevel::Normal, "✓ Configuration is valid");

    if args.detailed {
        log(level, LogLevel::Normal, "");
        log(level, LogLevel::Normal, "Decoding:");
        log(level, LogLevel::Normal, &format_decode_info(&spec));
        log(level, LogLevel::Normal, "");
        log(level, LogLevel::Normal, "Sweep:");
        log(level, LogLevel::Normal, &format_sweep_info(&spec));
    }

    Ok(())
}
