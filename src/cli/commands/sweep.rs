//! Sweep command implementation

use super::write_json;
use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{apply_overrides, load_config, load_spec_sessions, SweepArgs};
use crate::metrics::AccuracyMetric;
use crate::session::Region;
use crate::stats::wilcoxon_test;
use crate::sweep::{run_sweep as sweep_sessions, Measure, Split, SweepResult};
use serde::Serialize;

/// Everything the sweep command writes
#[derive(Debug, Serialize)]
pub struct SweepReport {
    pub metric: AccuracyMetric,
    pub per_mouse: bool,
    /// S1 vs S2 decision accuracy p-value per time point, for per-mouse sweeps over both regions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wilcoxon_dec: Option<Vec<f64>>,
    pub result: SweepResult,
}

/// One line per key: decision accuracy at each time point
pub fn format_accuracy_table(result: &SweepResult) -> String {
    let header = result
        .time_points
        .iter()
        .map(|t| format!("{t:>8.2}"))
        .collect::<String>();
    let mut lines = vec![format!("{:<16}{header}", "key / time (s)")];
    for (key, curve) in result.curve(Measure::DecAccuracy, Split::All) {
        let values = curve
            .column(0)
            .iter()
            .map(|v| format!("{v:>8.3}"))
            .collect::<String>();
        lines.push(format!("{key:<16}{values}"));
    }
    lines.join("\n")
}

pub fn run_sweep(args: SweepArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Loading configuration: {}", args.config.display()),
    );
    let mut spec = load_config(&args.config).map_err(|e| e.to_string())?;
    apply_overrides(&mut spec, &args);

    let sessions = load_spec_sessions(&spec).map_err(|e| e.to_string())?;
    log(
        level,
        LogLevel::Normal,
        &format!(
            "Sweeping {} time points over {} sessions ({})",
            spec.sweep.time_points.len(),
            sessions.len(),
            if spec.sweep.per_mouse { "per mouse" } else { "pooled" }
        ),
    );

    let result = sweep_sessions(&sessions, &spec.decode, &spec.sweep).map_err(|e| e.to_string())?;

    let both_regions = Region::BOTH.iter().all(|r| spec.sweep.regions.contains(r));
    let wilcoxon_dec = if spec.sweep.per_mouse && both_regions {
        let p = wilcoxon_test(&result.curve(Measure::DecAccuracy, Split::All))
            .map_err(|e| e.to_string())?;
        Some(p)
    } else {
        None
    };

    log(level, LogLevel::Verbose, &format_accuracy_table(&result));
    if let Some(p) = &wilcoxon_dec {
        log(level, LogLevel::Verbose, &format!("Wilcoxon S1 vs S2: {p:?}"));
    }

    let report = SweepReport {
        metric: spec.sweep.metric,
        per_mouse: spec.sweep.per_mouse,
        wilcoxon_dec,
        result,
    };
    write_json(&spec.output.path, &report, spec.output.pretty)?;
    log(
        level,
        LogLevel::Normal,
        &format!("✓ Results written to {}", spec.output.path.display()),
    );
    Ok(())
}
