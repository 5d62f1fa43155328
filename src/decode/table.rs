//! Per-trial prediction tables

use super::config::Target;
use crate::error::{Error, Result};
use crate::session::TrialCategory;
use serde::{Deserialize, Serialize};

/// One value per decoding target
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dec: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stim: Option<f64>,
}

impl TargetValues {
    pub fn get(&self, target: Target) -> Option<f64> {
        match target {
            Target::Dec => self.dec,
            Target::Stim => self.stim,
        }
    }

    pub fn set(&mut self, target: Target, value: f64) {
        match target {
            Target::Dec => self.dec = Some(value),
            Target::Stim => self.stim = Some(value),
        }
    }
}

/// Trial population a row was drawn from
///
/// `trial` indexes the behaviour tensor for `TrainTest` and `EvalOnly` rows
/// and the spontaneous tensor for `Spontaneous` rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    TrainTest,
    EvalOnly,
    Spontaneous,
}

/// Test-side prediction for one trial
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub session: String,
    pub trial: usize,
    pub partition: Partition,
    /// Test fold, for cross-validated rows
    pub fold: Option<usize>,
    pub pred: TargetValues,
    /// Prediction of the projected decoder, when enabled
    pub pred_proj: TargetValues,
    pub true_dec: bool,
    /// Number of cells stimulated
    pub true_stim: u32,
    pub true_reward: bool,
    pub outcome: TrialCategory,
    pub autorewarded_miss: bool,
    pub unrewarded_hit: bool,
    pub used_for_training: bool,
}

impl PredictionRow {
    /// Ground truth of a decoding target
    pub fn truth(&self, target: Target) -> bool {
        match target {
            Target::Dec => self.true_dec,
            Target::Stim => self.true_stim > 0,
        }
    }
}

/// In-fold prediction for one training trial
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainRow {
    pub session: String,
    pub trial: usize,
    pub partition: Partition,
    pub fold: usize,
    pub pred: TargetValues,
    pub pred_proj: TargetValues,
    pub true_dec: bool,
    pub true_stim: u32,
    pub true_reward: bool,
    pub outcome: TrialCategory,
    pub autorewarded_miss: bool,
    pub unrewarded_hit: bool,
    /// Angle in degrees between the two decoders of this fold
    pub angle: Option<f64>,
}

/// Accessors shared by prediction and training rows
pub trait TableRow {
    fn truth(&self, target: Target) -> bool;
    fn prediction(&self, target: Target, projected: bool) -> Option<f64>;
    fn outcome(&self) -> TrialCategory;
}

impl TableRow for PredictionRow {
    fn truth(&self, target: Target) -> bool {
        PredictionRow::truth(self, target)
    }

    fn prediction(&self, target: Target, projected: bool) -> Option<f64> {
        if projected {
            self.pred_proj.get(target)
        } else {
            self.pred.get(target)
        }
    }

    fn outcome(&self) -> TrialCategory {
        self.outcome
    }
}

impl TableRow for TrainRow {
    fn truth(&self, target: Target) -> bool {
        match target {
            Target::Dec => self.true_dec,
            Target::Stim => self.true_stim > 0,
        }
    }

    fn prediction(&self, target: Target, projected: bool) -> Option<f64> {
        if projected {
            self.pred_proj.get(target)
        } else {
            self.pred.get(target)
        }
    }

    fn outcome(&self) -> TrialCategory {
        self.outcome
    }
}

/// Rows of one mouse, accumulated across its sessions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table<R> {
    pub rows: Vec<R>,
}

/// Test-side predictions of one mouse
pub type PredictionTable = Table<PredictionRow>;

/// Training-side predictions of one mouse
pub type TrainTable = Table<TrainRow>;

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R> FromIterator<R> for Table<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<R: TableRow + Clone> Table<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: R) {
        self.rows.push(row);
    }

    pub fn extend(&mut self, other: Table<R>) {
        self.rows.extend(other.rows);
    }

    /// Concatenate tables in order
    pub fn concat<I: IntoIterator<Item = Table<R>>>(tables: I) -> Self {
        tables.into_iter().flat_map(|t| t.rows).collect()
    }

    pub fn truth(&self, target: Target) -> Vec<bool> {
        self.rows.iter().map(|r| r.truth(target)).collect()
    }

    /// Decision labels
    pub fn true_dec(&self) -> Vec<bool> {
        self.truth(Target::Dec)
    }

    /// Whether any cell was stimulated, per row
    pub fn stim_present(&self) -> Vec<bool> {
        self.truth(Target::Stim)
    }

    /// Predicted probabilities, or `None` if any row lacks the column
    pub fn predictions(&self, target: Target, projected: bool) -> Option<Vec<f64>> {
        self.rows
            .iter()
            .map(|r| r.prediction(target, projected))
            .collect()
    }

    /// Rows matching a predicate
    pub fn select<F: Fn(&R) -> bool>(&self, predicate: F) -> Self {
        self.rows.iter().filter(|r| predicate(r)).cloned().collect()
    }

    /// Rows of one outcome category
    pub fn with_outcome(&self, category: TrialCategory) -> Self {
        self.select(|r| r.outcome() == category)
    }
}

impl PredictionTable {
    pub fn used_for_training_indices(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.used_for_training.then_some(i))
            .collect()
    }

    /// Rows that were part of the cross-validation pool
    pub fn used_for_training(&self) -> Self {
        self.select(|r| r.used_for_training)
    }

    /// Autorewarded misses and unrewarded hits must never be trained on
    pub fn check_training_partition(&self) -> Result<()> {
        let leaked = self
            .rows
            .iter()
            .filter(|r| r.used_for_training && (r.autorewarded_miss || r.unrewarded_hit))
            .count();
        if leaked > 0 {
            return Err(Error::InvariantViolation(format!(
                "{leaked} autorewarded or unrewarded-hit rows are marked as used for training"
            )));
        }
        Ok(())
    }
}

impl TrainTable {
    /// Decoder angles of the rows that carry one
    pub fn angles(&self) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.angle).collect()
    }
}
