//! Feature extraction: slice a session's activity tensors into trial x neuron matrices

use super::scaler::StandardScaler;
use super::selector::TrialSelection;
use crate::error::{Error, Result};
use crate::session::Session;
use ndarray::{concatenate, Array2, ArrayView3, Axis};

/// Collapses the frame axis of a neuron x trial x frame tensor
pub trait TimeReducer: Send + Sync {
    /// Reduce to a trial x neuron matrix
    fn reduce(&self, data: ArrayView3<'_, f64>) -> Result<Array2<f64>>;
}

/// Arithmetic mean over frames
#[derive(Clone, Copy, Debug, Default)]
pub struct MeanOverTime;

impl TimeReducer for MeanOverTime {
    fn reduce(&self, data: ArrayView3<'_, f64>) -> Result<Array2<f64>> {
        let mean = data
            .mean_axis(Axis(2))
            .ok_or_else(|| Error::InsufficientData("no frames selected".into()))?;
        Ok(mean.reversed_axes())
    }
}

/// Standardised features of the three trial populations of one session
#[derive(Clone, Debug)]
pub struct FeatureSet {
    /// Train/test pool (spontaneous trials appended when merged), trials x neurons
    pub pool: Array2<f64>,
    /// Evaluation-only trials, trials x neurons
    pub eval_only: Array2<f64>,
    /// Spontaneous trials, trials x neurons
    pub spont: Array2<f64>,
    /// Scaler fitted on the populations listed in [`extract_features`]
    pub scaler: StandardScaler,
}

/// Slice, reduce and standardise the features of one session
///
/// The scaler is fitted on the pool and evaluation-only trials, plus the
/// spontaneous trials when they are not merged into the pool, and applied
/// to all three populations.
pub fn extract_features(
    session: &Session,
    selection: &TrialSelection,
    neurons: &[usize],
    frames: &[usize],
    spont_in_pool: bool,
    reducer: &dyn TimeReducer,
) -> Result<FeatureSet> {
    if frames.is_empty() {
        return Err(Error::InsufficientData(format!(
            "session {}: no frames selected",
            session.signature
        )));
    }

    let behaviour = session
        .behaviour_trials
        .select(Axis(0), neurons)
        .select(Axis(2), frames);
    let spont_raw = session
        .pre_rew_trials
        .select(Axis(0), neurons)
        .select(Axis(2), frames);

    let pool_raw = reducer.reduce(behaviour.select(Axis(1), &selection.pool).view())?;
    let eval_raw = reducer.reduce(behaviour.select(Axis(1), &selection.eval_only).view())?;
    let spont_raw = reducer.reduce(spont_raw.view())?;

    let pool_raw = if spont_in_pool {
        stack_rows(&[&pool_raw, &spont_raw])?
    } else {
        pool_raw
    };

    let fit_data = if spont_in_pool {
        stack_rows(&[&pool_raw, &eval_raw])?
    } else {
        stack_rows(&[&pool_raw, &eval_raw, &spont_raw])?
    };
    let scaler = StandardScaler::fit(fit_data.view())?;

    Ok(FeatureSet {
        pool: scaler.transform(pool_raw.view()),
        eval_only: scaler.transform(eval_raw.view()),
        spont: scaler.transform(spont_raw.view()),
        scaler,
    })
}

fn stack_rows(parts: &[&Array2<f64>]) -> Result<Array2<f64>> {
    let views: Vec<_> = parts.iter().map(|p| p.view()).collect();
    concatenate(Axis(0), &views).map_err(|e| Error::ShapeMismatch {
        context: format!("stacking feature matrices: {e}"),
        expected: parts.first().map(|p| vec![p.ncols()]).unwrap_or_default(),
        actual: parts.iter().map(|p| p.ncols()).collect(),
    })
}
