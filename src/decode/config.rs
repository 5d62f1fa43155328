//! Configuration of a decoding run

use super::logreg::{LogisticRegression, Penalty};
use super::selector::SelectionConfig;
use crate::error::{Error, Result};
use crate::session::NeuronSelection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Variable a decoder predicts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Lick decision
    Dec,
    /// Any cells stimulated
    Stim,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Dec => "dec",
            Target::Stim => "stim",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coefficient vector used for projected decoding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionDirection {
    /// Project onto the decoder of the same target
    Same,
    /// Project onto the decoder of the other target
    Different,
}

/// Options of [`train_test_all_sessions`](super::train_test_all_sessions)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    pub targets: Vec<Target>,
    pub n_splits: usize,
    pub penalty: Penalty,
    /// Inverse regularisation strength
    pub c_value: f64,
    pub selection: SelectionConfig,
    pub neurons: NeuronSelection,
    /// Stimulus-relative time points to average; default post-stimulus window if unset
    pub time_points: Option<Vec<f64>>,
    /// Merge spontaneous trials into the cross-validation pool
    pub spont_used_for_training: bool,
    pub projection: Option<ProjectionDirection>,
    pub return_decoder_weights: bool,
    pub max_iter: usize,
    pub tol: f64,
    /// Shuffle the stratified split with this seed
    pub shuffle_seed: Option<u64>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            targets: vec![Target::Dec, Target::Stim],
            n_splits: 4,
            penalty: Penalty::L2,
            c_value: 0.2,
            selection: SelectionConfig::default(),
            neurons: NeuronSelection::All,
            time_points: None,
            spont_used_for_training: true,
            projection: None,
            return_decoder_weights: false,
            max_iter: 100,
            tol: 1e-4,
            shuffle_seed: None,
        }
    }
}

impl DecodeConfig {
    /// Targets actually decoded; hit/spont mode drops `dec`
    pub fn effective_targets(&self) -> Vec<Target> {
        if self.selection.hit_spont_only {
            self.targets
                .iter()
                .copied()
                .filter(|&t| t != Target::Dec)
                .collect()
        } else {
            self.targets.clone()
        }
    }

    /// Spontaneous trials are always trained on in hit/spont mode
    pub fn spont_in_pool(&self) -> bool {
        self.spont_used_for_training || self.selection.hit_spont_only
    }

    pub fn estimator(&self) -> LogisticRegression {
        LogisticRegression {
            penalty: self.penalty,
            c: self.c_value,
            balanced: true,
            max_iter: self.max_iter,
            tol: self.tol,
        }
    }

    /// Check option ranges and combinations
    pub fn check(&self) -> Result<()> {
        self.selection.check()?;
        if self.n_splits < 2 {
            return Err(Error::InvalidParameter(format!(
                "n_splits must be at least 2, got {}",
                self.n_splits
            )));
        }
        if !(self.c_value > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "c_value must be positive, got {}",
                self.c_value
            )));
        }
        if self.effective_targets().is_empty() {
            return Err(Error::InvalidParameter(
                "no target left to decode (hit/spont mode drops dec)".into(),
            ));
        }
        if self.projection.is_some() && self.effective_targets().len() != 2 {
            return Err(Error::InvalidParameter(
                "projected decoding requires exactly two targets".into(),
            ));
        }
        Ok(())
    }
}
