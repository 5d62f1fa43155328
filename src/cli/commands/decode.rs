//! Decode command implementation

use super::write_json;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, load_spec_sessions, DecodeArgs};
use crate::decode::{train_test_all_sessions, DecodeOutput, Target};
use crate::metrics::class_av_mean_accuracy;

/// Per-mouse row counts and test accuracy of each target
pub fn format_decode_summary(output: &DecodeOutput, targets: &[Target]) -> String {
    let mut lines = Vec::new();
    for (mouse, table) in &output.test {
        let trained = table.used_for_training();
        let mut line = format!(
            "  {mouse}: {} rows ({} cross-validated)",
            table.len(),
            trained.len()
        );
        for &target in targets {
            if let Some(pred) = trained.predictions(target, false) {
                let score = class_av_mean_accuracy(&trained.truth(target), &pred);
                line.push_str(&format!(", {target} {:.3}", score.value));
            }
        }
        lines.push(line);
    }
    lines.join("\n")
}

pub fn run_decode(args: DecodeArgs, level: LogLevel) -> Result<(), String> {
    let mut spec = load_config(&args.config).map_err(|e| e.to_string())?;
    if !args.time.is_empty() {
        spec.decode.time_points = Some(args.time.clone());
    }
    if let Some(output) = &args.output {
        spec.output.path = output.clone();
    }

    let sessions = load_spec_sessions(&spec).map_err(|e| e.to_string())?;
    let output = train_test_all_sessions(&sessions, &spec.decode).map_err(|e| e.to_string())?;

    log(level, LogLevel::Normal, "Decoding summary:");
    log(
        level,
        LogLevel::Normal,
        &format_decode_summary(&output, &spec.decode.effective_targets()),
    );
    write_json(&spec.output.path, &output, spec.output.pretty)?;
    log(
        level,
        LogLevel::Normal,
        &format!("✓ Prediction tables written to {}", spec.output.path.display()),
    );
    Ok(())
}
