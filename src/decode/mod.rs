//! Cross-validated decoding of choice and stimulation
//!
//! Per session: select trials, average the selected frames into a trial x
//! neuron feature matrix, standardise, split the training pool into
//! stratified folds and fit one logistic regression per fold and target.
//! Every pool trial is scored once by the decoder of its test fold;
//! evaluation-only and separate spontaneous trials are scored by all folds
//! and averaged.

mod config;
mod engine;
mod features;
mod folds;
mod geometry;
mod logreg;
mod scaler;
mod selector;
mod table;
mod weights;

#[cfg(test)]
mod tests;

pub use config::{DecodeConfig, ProjectionDirection, Target};
pub use engine::{train_test_all_sessions, train_test_all_sessions_with, DecodeOutput};
pub use features::{extract_features, FeatureSet, MeanOverTime, TimeReducer};
pub use folds::StratifiedKFold;
pub use geometry::{angle_vecs, mean_angle};
pub use logreg::{LogisticModel, LogisticRegression, Penalty};
pub use scaler::StandardScaler;
pub use selector::{
    reward_label, reward_label_with, select_trials, RewardRule, SelectionConfig, TrialSelection,
    REWARD_RULES,
};
pub use table::{
    Partition, PredictionRow, PredictionTable, Table, TableRow, TargetValues, TrainRow, TrainTable,
};
pub use weights::{DecoderWeights, WeightStore};
