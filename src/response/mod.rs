//! Stimulus-evoked activity: post-stimulus minus pre-stimulus baseline
//!
//! A [`ResponseQuery`] picks a trial type, a region, a baseline length and a
//! post-stimulus window. [`response_difference`] returns the per-trial
//! difference averaged over the region's neurons; the `create_df_*`
//! functions tabulate it across sessions.

#[cfg(test)]
mod tests;

use crate::error::{Error, Result};
use crate::session::{Outcome, Region, Session, TimeAxes, STIM_150_CLASS};
use ndarray::{Array3, Axis};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Baseline length used by the response tables, in seconds
pub const DEFAULT_PRE_WINDOW: f64 = 2.0;

/// Post-stimulus window length used by [`create_df_differences`]
pub const DEFAULT_POST_DURATION: f64 = 1.0;

/// Trial types with a defined evoked response
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseTrialType {
    /// Rewarded hit
    Hit,
    Fp,
    /// Miss that was not autorewarded
    Miss,
    Cr,
    /// Hit without reward
    UrHit,
    /// Autorewarded miss
    ArMiss,
    /// Spontaneous reward trial
    SpontRew,
}

impl ResponseTrialType {
    pub const REGULAR: [ResponseTrialType; 4] = [
        ResponseTrialType::Hit,
        ResponseTrialType::Fp,
        ResponseTrialType::Miss,
        ResponseTrialType::Cr,
    ];

    /// Types tabulated per time point
    pub const DYNAMIC: [ResponseTrialType; 6] = [
        ResponseTrialType::Hit,
        ResponseTrialType::Fp,
        ResponseTrialType::Miss,
        ResponseTrialType::Cr,
        ResponseTrialType::UrHit,
        ResponseTrialType::ArMiss,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseTrialType::Hit => "hit",
            ResponseTrialType::Fp => "fp",
            ResponseTrialType::Miss => "miss",
            ResponseTrialType::Cr => "cr",
            ResponseTrialType::UrHit => "ur_hit",
            ResponseTrialType::ArMiss => "ar_miss",
            ResponseTrialType::SpontRew => "spont_rew",
        }
    }

    /// Behaviour trials of this type, excluding 150-cell stimulations
    fn behaviour_trials(&self, session: &Session) -> Vec<usize> {
        (0..session.n_trials())
            .filter(|&i| session.photostim[i] < STIM_150_CLASS)
            .filter(|&i| {
                let outcome = session.outcome[i];
                match self {
                    ResponseTrialType::Hit => outcome == Outcome::Hit && !session.unrewarded_hits[i],
                    ResponseTrialType::Fp => outcome == Outcome::FalsePositive,
                    ResponseTrialType::Miss => outcome == Outcome::Miss && !session.autorewarded[i],
                    ResponseTrialType::Cr => outcome == Outcome::CorrectRejection,
                    ResponseTrialType::UrHit => session.unrewarded_hits[i],
                    ResponseTrialType::ArMiss => outcome == Outcome::Miss && session.autorewarded[i],
                    ResponseTrialType::SpontRew => false,
                }
            })
            .collect()
    }
}

impl fmt::Display for ResponseTrialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the response is read after stimulus onset
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostWindow {
    /// Mean over `[t0, t0 + duration)`, `t0` the first positive time point;
    /// the baseline excludes time 0
    Fixed { duration: f64 },
    /// The single frame at this time point; the baseline includes time 0
    TimePoint(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseQuery {
    pub trial_type: ResponseTrialType,
    pub region: Region,
    /// Baseline length before stimulus onset, in seconds
    pub pre_window: f64,
    pub post: PostWindow,
}

impl ResponseQuery {
    pub fn new(trial_type: ResponseTrialType, region: Region, post: PostWindow) -> Self {
        Self {
            trial_type,
            region,
            pre_window: DEFAULT_PRE_WINDOW,
            post,
        }
    }
}

fn frames_where(session: &Session, keep: impl Fn(f64) -> bool) -> Vec<usize> {
    session
        .filter_ps_time
        .iter()
        .zip(&session.filter_ps_array)
        .filter_map(|(&t, &frame)| keep(t).then_some(frame))
        .collect()
}

/// Baseline and post-stimulus frames of a query
fn window_frames(session: &Session, query: &ResponseQuery) -> Result<(Vec<usize>, Vec<usize>)> {
    let pre_start = -query.pre_window;
    let (pre, post) = match query.post {
        PostWindow::Fixed { duration } => {
            let onset = session
                .filter_ps_time
                .iter()
                .copied()
                .find(|&t| t > 0.0)
                .ok_or_else(|| {
                    Error::InsufficientData(format!(
                        "session {} has no post-stimulus time points",
                        session.signature
                    ))
                })?;
            (
                frames_where(session, |t| t < 0.0 && t >= pre_start),
                frames_where(session, |t| t >= onset && t < onset + duration),
            )
        }
        PostWindow::TimePoint(time_point) => (
            frames_where(session, |t| t <= 0.0 && t >= pre_start),
            vec![session.frame_for_time(time_point)?],
        ),
    };
    if pre.is_empty() || post.is_empty() {
        return Err(Error::InsufficientData(format!(
            "session {}: empty baseline or response window",
            session.signature
        )));
    }
    Ok((pre, post))
}

/// Per-trial response of a query, averaged over the region's neurons
///
/// Each neuron's response is its mean over the post window minus its mean
/// over the baseline window. Returns an empty vector when the session has
/// no trials of the requested type.
pub fn response_difference(session: &Session, query: &ResponseQuery) -> Result<Vec<f64>> {
    let (tensor, trials): (&Array3<f64>, Vec<usize>) = match query.trial_type {
        ResponseTrialType::SpontRew => (&session.pre_rew_trials, (0..session.n_spont_trials()).collect()),
        trial_type => (&session.behaviour_trials, trial_type.behaviour_trials(session)),
    };
    let neurons = session.neuron_indices(query.region.into());
    if trials.is_empty() || neurons.is_empty() {
        return Ok(Vec::new());
    }
    let (pre, post) = window_frames(session, query)?;

    let activity = tensor.select(Axis(0), &neurons).select(Axis(1), &trials);
    let window_mean = |frames: &[usize]| {
        activity
            .select(Axis(2), frames)
            .mean_axis(Axis(2))
            .ok_or_else(|| Error::InsufficientData("empty window".into()))
    };
    let diff = window_mean(&post)? - window_mean(&pre)?;
    let per_trial = diff
        .mean_axis(Axis(0))
        .ok_or_else(|| Error::InsufficientData("no neurons".into()))?;
    Ok(per_trial.to_vec())
}

/// Response averaged over neurons and trials, `None` without trials
pub fn mean_response_difference(session: &Session, query: &ResponseQuery) -> Result<Option<f64>> {
    let per_trial = response_difference(session, query)?;
    if per_trial.is_empty() {
        return Ok(None);
    }
    Ok(Some(per_trial.iter().sum::<f64>() / per_trial.len() as f64))
}

/// One tabulated response
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub diff_dff: f64,
    /// Upper-case region label
    pub region: String,
    pub trial_type: ResponseTrialType,
    pub session: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_point: Option<f64>,
    /// Running trial number across the whole table, from 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_id: Option<usize>,
}

/// Mean fixed-window response per session, region and regular trial type
///
/// Combinations without trials are left out.
pub fn create_df_differences(sessions: &[Session]) -> Result<Vec<ResponseRecord>> {
    let mut records = Vec::new();
    for session in sessions {
        for region in Region::BOTH {
            for trial_type in ResponseTrialType::REGULAR {
                let query = ResponseQuery::new(
                    trial_type,
                    region,
                    PostWindow::Fixed {
                        duration: DEFAULT_POST_DURATION,
                    },
                );
                if let Some(diff_dff) = mean_response_difference(session, &query)? {
                    records.push(ResponseRecord {
                        diff_dff,
                        region: region.label().to_string(),
                        trial_type,
                        session: session.signature.clone(),
                        time_point: None,
                        trial_id: None,
                    });
                }
            }
        }
    }
    Ok(records)
}

/// Per-trial response at every shared time point from -2 s on
///
/// Ordered by session, time point, region and trial type; `trial_id`
/// numbers the rows from 1 across the whole table.
pub fn create_df_dyn_differences(sessions: &[Session], axes: &TimeAxes) -> Result<Vec<ResponseRecord>> {
    let time_points: Vec<f64> = axes
        .mutual
        .iter()
        .copied()
        .filter(|&t| t >= -DEFAULT_PRE_WINDOW)
        .collect();
    let mut records = Vec::new();
    for session in sessions {
        for &time_point in &time_points {
            for region in Region::BOTH {
                for trial_type in ResponseTrialType::DYNAMIC {
                    let query = ResponseQuery::new(trial_type, region, PostWindow::TimePoint(time_point));
                    for diff_dff in response_difference(session, &query)? {
                        let trial_id = records.len() + 1;
                        records.push(ResponseRecord {
                            diff_dff,
                            region: region.label().to_string(),
                            trial_type,
                            session: session.signature.clone(),
                            time_point: Some(time_point),
                            trial_id: Some(trial_id),
                        });
                    }
                }
            }
        }
        debug!(session = %session.signature, rows = records.len(), "response table");
    }
    Ok(records)
}
