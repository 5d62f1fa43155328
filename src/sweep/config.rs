//! Time-sweep options

use crate::decode::{DecodeConfig, Penalty, ProjectionDirection, SelectionConfig};
use crate::metrics::AccuracyMetric;
use crate::session::{Region, TrialCategory};
use serde::{Deserialize, Serialize};

/// Options of the time-resolved accuracy sweeps
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Stimulus-relative time points, in seconds
    pub time_points: Vec<f64>,
    pub regions: Vec<Region>,
    pub metric: AccuracyMetric,
    pub penalty: Penalty,
    /// Inverse regularisation strength of the sweep decoders
    pub regularizer: f64,
    /// Score the projected decoders instead of the full ones
    pub projected: bool,
    pub projection_direction: ProjectionDirection,
    /// Split stimulation accuracy by outcome category instead of by decision
    pub split_fourway: bool,
    /// Aggregate per mouse instead of pooling all mice
    pub per_mouse: bool,
    /// Outcome categories reported by the per-mouse sweep
    pub per_mouse_categories: Vec<TrialCategory>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            time_points: Vec::new(),
            regions: Region::BOTH.to_vec(),
            metric: AccuracyMetric::ClassAvMeanAccuracy,
            penalty: Penalty::L2,
            regularizer: 0.02,
            projected: false,
            projection_direction: ProjectionDirection::Different,
            split_fourway: false,
            per_mouse: false,
            per_mouse_categories: TrialCategory::PER_MOUSE.to_vec(),
        }
    }
}

impl SweepConfig {
    /// Decoding options for one (time point, region) pair
    ///
    /// Trial selection is reset to its defaults; folds, targets, spontaneous
    /// handling and solver options come from `base`.
    pub fn point_config(&self, base: &DecodeConfig, time_point: f64, region: Region) -> DecodeConfig {
        DecodeConfig {
            time_points: Some(vec![time_point]),
            neurons: region.into(),
            c_value: self.regularizer,
            penalty: self.penalty,
            selection: SelectionConfig::default(),
            projection: self.projected.then_some(self.projection_direction),
            return_decoder_weights: true,
            ..base.clone()
        }
    }
}
