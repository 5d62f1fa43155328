//! Recording sessions
//!
//! A [`Session`] holds everything the decoders read from one imaging run:
//! the trial-resolved activity tensors, the per-trial behavioural labels,
//! the per-neuron region masks and the mapping from stimulus-relative time
//! to tensor frame. Sessions are read-only inputs to the analyses.

mod outcome;
pub mod summary;


pub use outcome::{NeuronSelection, Outcome, Region, TrialCategory};
pub use summary::{beh_metric, create_df_table_details, create_tp_dict, BehaviourMetric, SessionDetails, TimeAxes};

use crate::error::{Error, Result};
use ndarray::Array3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Stimulation class at or above which trials are 150-cell stimulations
pub const STIM_150_CLASS: u8 = 2;

/// Frames averaged when no explicit time points are given
pub const DEFAULT_POST_STIM_FRAMES: usize = 5;

/// Tolerance used when matching time points against the session time axis
const TIME_TOLERANCE: f64 = 1e-9;

/// One imaging session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    /// Mouse identifier
    pub mouse: String,
    /// Unique session key
    pub signature: String,
    /// Run number within the mouse
    #[serde(default)]
    pub run_number: u32,
    /// Imaging frame rate in Hz
    #[serde(default)]
    pub frequency: f64,
    /// Activity of behaviour trials, neuron x trial x frame
    pub behaviour_trials: Array3<f64>,
    /// Activity of spontaneous (pre-reward) trials, neuron x trial x frame
    pub pre_rew_trials: Array3<f64>,
    /// Outcome per behaviour trial
    pub outcome: Vec<Outcome>,
    /// Stimulation class per trial (0 none, 1 test, 2 = 150 cells)
    pub photostim: Vec<u8>,
    /// Number of cells stimulated per trial
    pub trial_subsets: Vec<u32>,
    /// Lick decision per trial
    pub decision: Vec<bool>,
    /// Miss trials that were rewarded anyway
    pub autorewarded: Vec<bool>,
    /// Hit trials that were not rewarded
    pub unrewarded_hits: Vec<bool>,
    /// S1 membership per neuron
    pub s1_bool: Vec<bool>,
    /// S2 membership per neuron
    pub s2_bool: Vec<bool>,
    /// Tensor frame per entry of `filter_ps_time`
    pub filter_ps_array: Vec<usize>,
    /// Stimulus-relative time in seconds per entry of `filter_ps_array`
    pub filter_ps_time: Vec<f64>,
    /// Index into `filter_ps_array` of the last pre-stimulus frame
    pub final_pre_gap_tp: usize,
}

impl Session {
    /// Load a session from a JSON file and validate it
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to read session file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let session: Session = serde_json::from_str(&content)?;
        session.validate()?;
        Ok(session)
    }

    pub fn n_neurons(&self) -> usize {
        self.behaviour_trials.shape()[0]
    }

    pub fn n_trials(&self) -> usize {
        self.behaviour_trials.shape()[1]
    }

    pub fn n_spont_trials(&self) -> usize {
        self.pre_rew_trials.shape()[1]
    }

    /// Check that every vector agrees with the tensor shapes
    pub fn validate(&self) -> Result<()> {
        let (n_neurons, n_trials, n_frames) = self.behaviour_trials.dim();

        let per_trial = [
            ("outcome", self.outcome.len()),
            ("photostim", self.photostim.len()),
            ("trial_subsets", self.trial_subsets.len()),
            ("decision", self.decision.len()),
            ("autorewarded", self.autorewarded.len()),
            ("unrewarded_hits", self.unrewarded_hits.len()),
        ];
        for (name, len) in per_trial {
            if len != n_trials {
                return Err(self.shape_error(name, vec![n_trials], vec![len]));
            }
        }

        for (name, len) in [("s1_bool", self.s1_bool.len()), ("s2_bool", self.s2_bool.len())] {
            if len != n_neurons {
                return Err(self.shape_error(name, vec![n_neurons], vec![len]));
            }
        }

        let (spont_neurons, _, spont_frames) = self.pre_rew_trials.dim();
        if spont_neurons != n_neurons || spont_frames != n_frames {
            return Err(self.shape_error(
                "pre_rew_trials",
                vec![n_neurons, self.n_spont_trials(), n_frames],
                self.pre_rew_trials.shape().to_vec(),
            ));
        }

        if self.filter_ps_array.len() != self.filter_ps_time.len() {
            return Err(self.shape_error(
                "filter_ps_time",
                vec![self.filter_ps_array.len()],
                vec![self.filter_ps_time.len()],
            ));
        }
        if let Some(&frame) = self.filter_ps_array.iter().find(|&&f| f >= n_frames) {
            return Err(Error::InvariantViolation(format!(
                "session {}: frame {frame} out of range for {n_frames} frames",
                self.signature
            )));
        }

        if let Some(trial) =
            (0..n_trials).find(|&i| self.autorewarded[i] && self.unrewarded_hits[i])
        {
            return Err(Error::InvariantViolation(format!(
                "session {}: trial {trial} is both autorewarded and an unrewarded hit",
                self.signature
            )));
        }

        Ok(())
    }

    fn shape_error(&self, field: &str, expected: Vec<usize>, actual: Vec<usize>) -> Error {
        Error::ShapeMismatch {
            context: format!("session {} field {field}", self.signature),
            expected,
            actual,
        }
    }

    /// Tensor frame corresponding to a stimulus-relative time point
    pub fn frame_for_time(&self, time_point: f64) -> Result<usize> {
        self.filter_ps_time
            .iter()
            .position(|&t| (t - time_point).abs() < TIME_TOLERANCE)
            .map(|i| self.filter_ps_array[i])
            .ok_or_else(|| Error::TimePointNotFound {
                session: self.signature.clone(),
                time_point,
            })
    }

    /// Frames for a list of time points, or the default post-stimulus window
    pub fn frames_for_times(&self, time_points: Option<&[f64]>) -> Result<Vec<usize>> {
        match time_points {
            Some(times) => times.iter().map(|&t| self.frame_for_time(t)).collect(),
            None => {
                let start = self.final_pre_gap_tp + 1;
                let end = (start + DEFAULT_POST_STIM_FRAMES).min(self.filter_ps_array.len());
                if start >= end {
                    return Err(Error::InsufficientData(format!(
                        "session {} has no frames after the pre-stimulus gap",
                        self.signature
                    )));
                }
                Ok(self.filter_ps_array[start..end].to_vec())
            }
        }
    }

    /// Indices of neurons included by a selection
    pub fn neuron_indices(&self, selection: NeuronSelection) -> Vec<usize> {
        match selection {
            NeuronSelection::All => (0..self.n_neurons()).collect(),
            NeuronSelection::S1 => mask_indices(&self.s1_bool),
            NeuronSelection::S2 => mask_indices(&self.s2_bool),
        }
    }

    /// Number of neurons in a region
    pub fn n_region_neurons(&self, region: Region) -> usize {
        self.neuron_indices(region.into()).len()
    }
}

pub(crate) fn mask_indices(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &m)| m.then_some(i))
        .collect()
}

/// Load and validate a list of session files, keeping their order
pub fn load_sessions<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Session>> {
    paths.iter().map(Session::from_json_file).collect()
}

/// Mouse identifiers in sorted order, without duplicates
pub fn mouse_list(sessions: &[Session]) -> Vec<String> {
    let mut mice: Vec<String> = sessions.iter().map(|s| s.mouse.clone()).collect();
    mice.sort();
    mice.dedup();
    mice
}
