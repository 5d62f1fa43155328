//! Decoder accuracy as a function of time
//!
//! Each (time point, region) pair is an independent decoding run on the
//! frame of that time point and the neurons of that region. Runs execute in
//! parallel; their tables are then scored either pooled over all mice or
//! per mouse, and the fold-averaged coefficients are collected into a
//! [`WeightStore`].

mod config;
mod per_mouse;
mod pooled;
mod record;


pub use config::SweepConfig;
pub use per_mouse::compute_accuracy_time_array_average_per_mouse;
pub use pooled::compute_accuracy_time_array;
pub use record::{Measure, Split, SweepRecord, SweepResult};

use crate::decode::{train_test_all_sessions, DecodeConfig, DecodeOutput, WeightStore};
use crate::error::{Error, Result};
use crate::metrics::Score;
use crate::session::{Region, Session};
use rayon::prelude::*;
use tracing::{debug, info};

/// Run whichever sweep `sweep.per_mouse` selects
pub fn run_sweep(sessions: &[Session], base: &DecodeConfig, sweep: &SweepConfig) -> Result<SweepResult> {
    if sweep.per_mouse {
        compute_accuracy_time_array_average_per_mouse(sessions, base, sweep)
    } else {
        compute_accuracy_time_array(sessions, base, sweep)
    }
}

/// Decoding output of one (time point, region) pair
pub(crate) struct PointRun {
    pub time_index: usize,
    pub time_point: f64,
    pub region: Region,
    pub output: DecodeOutput,
}

impl PointRun {
    pub fn record(&self, key: String, mouse: Option<&str>, measure: Measure, split: Split, score: Score) -> SweepRecord {
        SweepRecord {
            key,
            region: self.region,
            mouse: mouse.map(str::to_string),
            time_index: self.time_index,
            time_point: self.time_point,
            measure,
            split,
            score,
        }
    }
}

pub(crate) fn check_sweep(sweep: &SweepConfig) -> Result<()> {
    if sweep.time_points.is_empty() {
        return Err(Error::InvalidParameter("sweep needs at least one time point".into()));
    }
    if sweep.regions.is_empty() {
        return Err(Error::InvalidParameter("sweep needs at least one region".into()));
    }
    if !(sweep.regularizer > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "regularizer must be positive, got {}",
            sweep.regularizer
        )));
    }
    Ok(())
}

/// Decode every (time point, region) pair, in time-major order
pub(crate) fn decode_points(
    sessions: &[Session],
    base: &DecodeConfig,
    sweep: &SweepConfig,
) -> Result<Vec<PointRun>> {
    check_sweep(sweep)?;
    let points: Vec<(usize, f64, Region)> = sweep
        .time_points
        .iter()
        .enumerate()
        .flat_map(|(i, &tp)| sweep.regions.iter().map(move |&region| (i, tp, region)))
        .collect();
    info!(
        time_points = sweep.time_points.len(),
        regions = sweep.regions.len(),
        sessions = sessions.len(),
        "starting accuracy sweep"
    );

    points
        .par_iter()
        .map(|&(time_index, time_point, region)| {
            let config = sweep.point_config(base, time_point, region);
            let output = train_test_all_sessions(sessions, &config)?;
            debug!(time_point, %region, "decoded time point");
            Ok(PointRun {
                time_index,
                time_point,
                region,
                output,
            })
        })
        .collect()
}

/// Fold-averaged coefficients of every run, one column per time point
pub(crate) fn collect_weights(runs: &[PointRun], n_time_points: usize) -> Result<WeightStore> {
    let mut store = WeightStore::new();
    for run in runs {
        let Some(weights) = &run.output.weights else {
            continue;
        };
        for (&target, per_session) in &weights.weights {
            for signature in per_session.keys() {
                if let Some(coef) = weights.fold_mean(target, signature) {
                    store.insert_column(
                        run.region,
                        target,
                        signature,
                        run.time_index,
                        n_time_points,
                        coef.view(),
                    )?;
                }
            }
        }
    }
    Ok(store)
}

/// Rows of `values` at `indices`
pub(crate) fn pick<T: Copy>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i]).collect()
}

/// Indices where `keep` holds
pub(crate) fn where_true<T>(values: &[T], keep: impl Fn(&T) -> bool) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| keep(v).then_some(i))
        .collect()
}
