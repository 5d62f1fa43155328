//! Flat sweep records and the curves derived from them

use crate::decode::WeightStore;
use crate::metrics::Score;
use crate::session::{Region, TrialCategory};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Quantity a record measures
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// Accuracy of the decision decoder
    DecAccuracy,
    /// Accuracy of a constant 0.5 prediction of the decision
    DecBaseline,
    /// Accuracy of the stimulation decoder
    StimAccuracy,
    /// Mean and std of the stimulation decoder's output
    StimPrediction,
    /// Angle between the decision and stimulation decoders, in degrees
    Angle,
}

/// Subset of rows a record was computed on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Split {
    All,
    Outcome(TrialCategory),
    /// Rows with the given lick decision
    Decision(bool),
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Split::All => f.write_str("all"),
            Split::Outcome(category) => write!(f, "{category}"),
            Split::Decision(lick) => write!(f, "{}", u8::from(*lick)),
        }
    }
}

/// One value of a sweep, tagged with where it came from
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    /// Region for pooled sweeps, `{mouse}_{region}` for per-mouse sweeps
    pub key: String,
    pub region: Region,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mouse: Option<String>,
    pub time_index: usize,
    pub time_point: f64,
    pub measure: Measure,
    pub split: Split,
    pub score: Score,
}

/// Records and decoder weights of a whole sweep
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub time_points: Vec<f64>,
    pub records: Vec<SweepRecord>,
    pub weights: WeightStore,
}

impl SweepResult {
    /// Keys present in the records, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.records.iter().map(|r| r.key.clone()).collect();
        keys.sort();
        keys.dedup();
        keys
    }

    pub fn select(&self, measure: Measure, split: Split) -> impl Iterator<Item = &SweepRecord> {
        self.records
            .iter()
            .filter(move |r| r.measure == measure && r.split == split)
    }

    /// (time points x {value, dispersion}) per key; missing entries are NaN
    pub fn curve(&self, measure: Measure, split: Split) -> BTreeMap<String, Array2<f64>> {
        let n_tp = self.time_points.len();
        let mut curves: BTreeMap<String, Array2<f64>> = BTreeMap::new();
        for record in self.select(measure, split) {
            let curve = curves
                .entry(record.key.clone())
                .or_insert_with(|| Array2::from_elem((n_tp, 2), f64::NAN));
            curve[[record.time_index, 0]] = record.score.value;
            curve[[record.time_index, 1]] = record.score.dispersion;
        }
        curves
    }

    /// Decoder angle per key and time point
    pub fn angles(&self) -> BTreeMap<String, Array1<f64>> {
        self.curve(Measure::Angle, Split::All)
            .into_iter()
            .map(|(key, curve)| (key, curve.column(0).to_owned()))
            .collect()
    }

    /// Splits present for a measure, sorted
    pub fn splits(&self, measure: Measure) -> Vec<Split> {
        let mut splits: Vec<Split> = self
            .records
            .iter()
            .filter(|r| r.measure == measure)
            .map(|r| r.split)
            .collect();
        splits.sort();
        splits.dedup();
        splits
    }
}
