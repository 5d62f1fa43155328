//! Per-feature z-scoring

use crate::error::{Error, Result};
use ndarray::{Array1, Array2, ArrayView2, Axis};

/// Zero-mean, unit-variance scaler fitted on the rows of a matrix
///
/// Features with zero variance keep a scale of 1 so that they map to 0
/// instead of NaN.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Fit on `x` (samples x features)
    pub fn fit(x: ArrayView2<'_, f64>) -> Result<Self> {
        let mean = x.mean_axis(Axis(0)).ok_or_else(|| {
            Error::InsufficientData("cannot fit a scaler on zero samples".into())
        })?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s < 10.0 * f64::EPSILON { 1.0 } else { s });
        Ok(Self { mean, scale })
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        (&x - &self.mean) / &self.scale
    }

    pub fn inverse_transform(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        &x * &self.scale + &self.mean
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }
}
