//! Decoder coefficient stores

use super::config::Target;
use crate::error::{Error, Result};
use crate::session::Region;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-fold coefficients of one decoding run: target -> signature -> (fold x neuron)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DecoderWeights {
    pub weights: BTreeMap<Target, BTreeMap<String, Array2<f64>>>,
}

impl DecoderWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: Target, signature: &str, fold_by_neuron: Array2<f64>) {
        self.weights
            .entry(target)
            .or_default()
            .insert(signature.to_string(), fold_by_neuron);
    }

    pub fn get(&self, target: Target, signature: &str) -> Option<&Array2<f64>> {
        self.weights.get(&target)?.get(signature)
    }

    /// Coefficients averaged over folds
    pub fn fold_mean(&self, target: Target, signature: &str) -> Option<Array1<f64>> {
        self.get(target, signature)?.mean_axis(Axis(0))
    }

    pub fn merge(&mut self, other: DecoderWeights) {
        for (target, per_session) in other.weights {
            self.weights.entry(target).or_default().extend(per_session);
        }
    }
}

/// Fold-averaged coefficients across a time sweep
///
/// Keyed `"{region}_{target}"` -> signature -> (neuron x time point).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightStore {
    pub weights: BTreeMap<String, BTreeMap<String, Array2<f64>>>,
}

impl WeightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(region: Region, target: Target) -> String {
        format!("{region}_{target}")
    }

    /// Write one time point's coefficients, allocating (n_neurons x n_time_points) on first use
    pub fn insert_column(
        &mut self,
        region: Region,
        target: Target,
        signature: &str,
        time_index: usize,
        n_time_points: usize,
        coef: ArrayView1<'_, f64>,
    ) -> Result<()> {
        let matrix = self
            .weights
            .entry(Self::key(region, target))
            .or_default()
            .entry(signature.to_string())
            .or_insert_with(|| Array2::from_elem((coef.len(), n_time_points), f64::NAN));
        if matrix.nrows() != coef.len() || time_index >= matrix.ncols() {
            return Err(Error::ShapeMismatch {
                context: format!("weight store entry {signature}"),
                expected: vec![matrix.nrows(), matrix.ncols()],
                actual: vec![coef.len(), time_index + 1],
            });
        }
        matrix.column_mut(time_index).assign(&coef);
        Ok(())
    }

    pub fn get(&self, region: Region, target: Target, signature: &str) -> Option<&Array2<f64>> {
        self.weights.get(&Self::key(region, target))?.get(signature)
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
