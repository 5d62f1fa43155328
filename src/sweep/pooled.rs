//! Accuracy sweep pooled over all mice

use super::{collect_weights, decode_points, pick, where_true, Measure, Split, SweepConfig, SweepResult};
use crate::decode::{mean_angle, DecodeConfig, PredictionTable, Target, TrainTable};
use crate::error::Result;
use crate::metrics::Score;
use crate::session::{Session, TrialCategory};
use tracing::info;

/// Decoder accuracy per time point and region, pooling the test rows of all mice
///
/// Records are keyed by region. For every pair this reports the decision
/// accuracy overall, against a constant 0.5 baseline and per behavioural
/// outcome; when a stimulation decoder ran, its accuracy overall and per lick
/// decision; and the circular mean of the per-fold decoder angles.
pub fn compute_accuracy_time_array(
    sessions: &[Session],
    base: &DecodeConfig,
    sweep: &SweepConfig,
) -> Result<SweepResult> {
    let runs = decode_points(sessions, base, sweep)?;
    let metric = sweep.metric;
    let projected = sweep.projected;
    let mut records = Vec::new();

    for run in &runs {
        let key = run.region.to_string();
        let test = PredictionTable::concat(run.output.test.values().cloned());
        let lick = test.true_dec();

        if let Some(pred_lick) = test.predictions(Target::Dec, projected) {
            let half = vec![0.5; lick.len()];
            records.push(run.record(key.clone(), None, Measure::DecBaseline, Split::All, metric.compute(&lick, &half)));
            records.push(run.record(key.clone(), None, Measure::DecAccuracy, Split::All, metric.compute(&lick, &pred_lick)));

            for category in TrialCategory::BEHAVIOURAL {
                let idx = where_true(&test.rows, |r| r.outcome == category);
                let score = metric.compute(&pick(&lick, &idx), &pick(&pred_lick, &idx));
                records.push(run.record(key.clone(), None, Measure::DecAccuracy, Split::Outcome(category), score));
            }
        }

        if let Some(pred_ps) = test.predictions(Target::Stim, projected) {
            let ps = test.stim_present();
            records.push(run.record(key.clone(), None, Measure::StimAccuracy, Split::All, metric.compute(&ps, &pred_ps)));
            for decision in [false, true] {
                let idx = where_true(&lick, |&l| l == decision);
                let score = metric.compute(&pick(&ps, &idx), &pick(&pred_ps, &idx));
                records.push(run.record(key.clone(), None, Measure::StimAccuracy, Split::Decision(decision), score));
            }
        }

        let train = TrainTable::concat(run.output.train.values().cloned());
        let angle = mean_angle(&train.angles());
        records.push(run.record(key, None, Measure::Angle, Split::All, Score::point(angle)));
    }

    let weights = collect_weights(&runs, sweep.time_points.len())?;
    info!(records = records.len(), "pooled sweep finished");
    Ok(SweepResult {
        time_points: sweep.time_points.clone(),
        records,
        weights,
    })
}
