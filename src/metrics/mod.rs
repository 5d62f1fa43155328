//! Accuracy metrics for decoder predictions

mod accuracy;


pub use accuracy::{
    class_av_mean_accuracy, llh, mean_accuracy, mean_accuracy_pred, min_mean_accuracy,
    prob_correct, r2_acc, separability,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Metric value with its dispersion
///
/// Metrics without a natural spread report a dispersion of 0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub value: f64,
    pub dispersion: f64,
}

impl Score {
    pub fn new(value: f64, dispersion: f64) -> Self {
        Self { value, dispersion }
    }

    /// Score without dispersion
    pub fn point(value: f64) -> Self {
        Self {
            value,
            dispersion: 0.0,
        }
    }
}

/// Accuracy metric selectable from configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyMetric {
    MeanAccuracy,
    MeanAccuracyPred,
    Llh,
    R2Acc,
    Separability,
    MinMeanAccuracy,
    #[default]
    ClassAvMeanAccuracy,
}

impl AccuracyMetric {
    /// Evaluate the metric
    pub fn compute(&self, truth: &[bool], estimate: &[f64]) -> Score {
        match self {
            AccuracyMetric::MeanAccuracy => mean_accuracy(truth, estimate),
            AccuracyMetric::MeanAccuracyPred => mean_accuracy_pred(truth, estimate),
            AccuracyMetric::Llh => llh(truth, estimate),
            AccuracyMetric::R2Acc => r2_acc(truth, estimate),
            AccuracyMetric::Separability => separability(truth, estimate),
            AccuracyMetric::MinMeanAccuracy => min_mean_accuracy(truth, estimate),
            AccuracyMetric::ClassAvMeanAccuracy => class_av_mean_accuracy(truth, estimate),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AccuracyMetric::MeanAccuracy => "mean_accuracy",
            AccuracyMetric::MeanAccuracyPred => "mean_accuracy_pred",
            AccuracyMetric::Llh => "llh",
            AccuracyMetric::R2Acc => "r2_acc",
            AccuracyMetric::Separability => "separability",
            AccuracyMetric::MinMeanAccuracy => "min_mean_accuracy",
            AccuracyMetric::ClassAvMeanAccuracy => "class_av_mean_accuracy",
        }
    }
}

impl fmt::Display for AccuracyMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
