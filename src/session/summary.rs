//! Per-session summaries: behavioural performance, trial counts and time axes

use super::{Outcome, Region, Session, STIM_150_CLASS};
use crate::error::{Error, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Stimulation levels (cells stimulated) used by [`beh_metric`] by default
pub const DEFAULT_STIM_LEVELS: [u32; 7] = [0, 5, 10, 20, 30, 40, 50];

/// Behavioural performance measure
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviourMetric {
    /// (hit + cr) / (hit + fp + cr + miss)
    #[default]
    Accuracy,
    /// hit / (hit + fp)
    Sensitivity,
}

/// Behavioural performance per session and stimulation level
///
/// Returns an array of shape (sessions x levels). Levels without trials
/// yield NaN.
pub fn beh_metric(sessions: &[Session], metric: BehaviourMetric, stim_levels: &[u32]) -> Array2<f64> {
    let mut acc = Array2::zeros((sessions.len(), stim_levels.len()));
    for (i_session, session) in sessions.iter().enumerate() {
        for (i_stim, &stim) in stim_levels.iter().enumerate() {
            let count = |outcome: Outcome| {
                session
                    .trial_subsets
                    .iter()
                    .zip(&session.outcome)
                    .filter(|&(&s, &o)| s == stim && o == outcome)
                    .count() as f64
            };
            let tp = count(Outcome::Hit);
            let fp = count(Outcome::FalsePositive);
            let tn = count(Outcome::CorrectRejection);
            let fn_ = count(Outcome::Miss);
            acc[[i_session, i_stim]] = match metric {
                BehaviourMetric::Accuracy => (tp + tn) / (tp + fp + tn + fn_),
                BehaviourMetric::Sensitivity => tp / (tp + fp),
            };
        }
    }
    acc
}

/// Trial and neuron counts of one session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionDetails {
    pub mouse: String,
    pub run: u32,
    pub frequency: f64,
    pub n_s1: usize,
    pub n_s2: usize,
    pub trials: usize,
    pub hit: usize,
    pub fp: usize,
    /// Misses that were not autorewarded
    pub miss: usize,
    pub cr: usize,
    pub ur_hit: usize,
    pub ar_miss: usize,
    pub too_early: usize,
}

/// Summary table of all sessions, sorted by mouse and run
///
/// Counts exclude 150-cell stimulation trials.
pub fn create_df_table_details(sessions: &[Session]) -> Result<Vec<SessionDetails>> {
    let mut table = Vec::with_capacity(sessions.len());
    for session in sessions {
        let kept: Vec<usize> = (0..session.n_trials())
            .filter(|&i| session.photostim[i] < STIM_150_CLASS)
            .collect();
        let count = |pred: &dyn Fn(usize) -> bool| kept.iter().filter(|&&i| pred(i)).count();

        let details = SessionDetails {
            mouse: session.mouse.clone(),
            run: session.run_number,
            frequency: session.frequency,
            n_s1: session.n_region_neurons(Region::S1),
            n_s2: session.n_region_neurons(Region::S2),
            trials: kept.len(),
            hit: count(&|i: usize| session.outcome[i] == Outcome::Hit),
            fp: count(&|i: usize| session.outcome[i] == Outcome::FalsePositive),
            miss: count(&|i: usize| session.outcome[i] == Outcome::Miss && !session.autorewarded[i]),
            cr: count(&|i: usize| session.outcome[i] == Outcome::CorrectRejection),
            too_early: count(&|i: usize| session.outcome[i] == Outcome::TooEarly),
            ur_hit: count(&|i: usize| session.unrewarded_hits[i]),
            ar_miss: count(&|i: usize| session.autorewarded[i]),
        };

        let total = details.hit
            + details.fp
            + details.miss
            + details.cr
            + details.too_early
            + details.ar_miss;
        if total != details.trials {
            return Err(Error::InvariantViolation(format!(
                "session {}: category counts sum to {total}, expected {} trials",
                session.signature, details.trials
            )));
        }
        table.push(details);
    }

    table.sort_by(|a, b| a.mouse.cmp(&b.mouse).then(a.run.cmp(&b.run)));
    Ok(table)
}

/// Time axes per imaging frequency and the time points they share
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeAxes {
    /// (frequency, time axis) pairs in ascending frequency
    pub per_frequency: Vec<(f64, Vec<f64>)>,
    /// Time points present on every axis
    pub mutual: Vec<f64>,
}

/// Collect the time axis of each imaging frequency and intersect them
///
/// Sessions recorded at the same frequency are assumed to share the axis;
/// the last one seen is kept.
pub fn create_tp_dict(sessions: &[Session]) -> TimeAxes {
    let mut per_frequency: Vec<(f64, Vec<f64>)> = Vec::new();
    for session in sessions {
        match per_frequency
            .iter_mut()
            .find(|(f, _)| *f == session.frequency)
        {
            Some(entry) => entry.1 = session.filter_ps_time.clone(),
            None => per_frequency.push((session.frequency, session.filter_ps_time.clone())),
        }
    }
    per_frequency.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mutual = match per_frequency.split_first() {
        Some(((_, first), rest)) => {
            let mut mutual: Vec<f64> = first
                .iter()
                .copied()
                .filter(|t| {
                    rest.iter()
                        .all(|(_, axis)| axis.iter().any(|u| (u - t).abs() < 1e-9))
                })
                .collect();
            mutual.sort_by(f64::total_cmp);
            mutual.dedup();
            mutual
        }
        None => Vec::new(),
    };

    TimeAxes {
        per_frequency,
        mutual,
    }
}
