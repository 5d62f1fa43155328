//! Accuracy sweep aggregated per mouse

use super::{collect_weights, decode_points, pick, where_true, Measure, Split, SweepConfig, SweepResult};
use crate::decode::{DecodeConfig, Target};
use crate::error::Result;
use crate::metrics::Score;
use crate::session::{Session, TrialCategory};
use tracing::info;

fn mean_std(values: &[f64]) -> Score {
    if values.is_empty() {
        return Score::new(f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Score::new(mean, var.sqrt())
}

/// Decoder accuracy per time point, region and mouse
///
/// Records are keyed `{mouse}_{region}`. Overall accuracies and the 0.5
/// baseline are computed on the rows that took part in cross-validation;
/// outcome splits use every row, so evaluation-only categories (autorewarded
/// misses, unrewarded hits) are scored too. The stimulation decoder is split
/// by lick decision (restricted to cross-validated rows) or, with
/// `split_fourway`, by outcome category. The mean and std of its output are
/// reported over the same splits, and the decoder angle is the arithmetic
/// mean of the per-fold angles.
pub fn compute_accuracy_time_array_average_per_mouse(
    sessions: &[Session],
    base: &DecodeConfig,
    sweep: &SweepConfig,
) -> Result<SweepResult> {
    let runs = decode_points(sessions, base, sweep)?;
    let metric = sweep.metric;
    let projected = sweep.projected;
    let mut records = Vec::new();

    for run in &runs {
        for (mouse, test) in &run.output.test {
            test.check_training_partition()?;
            let key = format!("{mouse}_{}", run.region);
            let record = |measure, split, score| run.record(key.clone(), Some(mouse.as_str()), measure, split, score);

            let training = test.used_for_training_indices();
            let lick = test.true_dec();
            let outcome_idx = |category: TrialCategory| where_true(&test.rows, |r| r.outcome == category);

            if let Some(pred_lick) = test.predictions(Target::Dec, projected) {
                let lick_train = pick(&lick, &training);
                let half = vec![0.5; lick_train.len()];
                records.push(record(Measure::DecBaseline, Split::All, metric.compute(&lick_train, &half)));
                records.push(record(
                    Measure::DecAccuracy,
                    Split::All,
                    metric.compute(&lick_train, &pick(&pred_lick, &training)),
                ));
                for &category in &sweep.per_mouse_categories {
                    let idx = outcome_idx(category);
                    let score = metric.compute(&pick(&lick, &idx), &pick(&pred_lick, &idx));
                    records.push(record(Measure::DecAccuracy, Split::Outcome(category), score));
                }
            }

            if let Some(pred_ps) = test.predictions(Target::Stim, projected) {
                let ps = test.stim_present();
                records.push(record(
                    Measure::StimAccuracy,
                    Split::All,
                    metric.compute(&pick(&ps, &training), &pick(&pred_ps, &training)),
                ));

                if sweep.split_fourway {
                    for &category in &sweep.per_mouse_categories {
                        let idx = outcome_idx(category);
                        let split = Split::Outcome(category);
                        records.push(record(
                            Measure::StimAccuracy,
                            split,
                            metric.compute(&pick(&ps, &idx), &pick(&pred_ps, &idx)),
                        ));
                        records.push(record(Measure::StimPrediction, split, mean_std(&pick(&pred_ps, &idx))));
                    }
                } else {
                    for decision in [false, true] {
                        let split = Split::Decision(decision);
                        let in_training: Vec<usize> = training
                            .iter()
                            .copied()
                            .filter(|&i| lick[i] == decision)
                            .collect();
                        records.push(record(
                            Measure::StimAccuracy,
                            split,
                            metric.compute(&pick(&ps, &in_training), &pick(&pred_ps, &in_training)),
                        ));
                        let all_rows = where_true(&lick, |&l| l == decision);
                        records.push(record(Measure::StimPrediction, split, mean_std(&pick(&pred_ps, &all_rows))));
                    }
                }
            }

            if let Some(train) = run.output.train.get(mouse) {
                let angles = train.angles();
                if !angles.is_empty() {
                    let angle = angles.iter().sum::<f64>() / angles.len() as f64;
                    records.push(record(Measure::Angle, Split::All, Score::point(angle)));
                }
            }
        }
    }

    let weights = collect_weights(&runs, sweep.time_points.len())?;
    info!(records = records.len(), "per-mouse sweep finished");
    Ok(SweepResult {
        time_points: sweep.time_points.clone(),
        records,
        weights,
    })
}
