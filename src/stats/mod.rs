//! Paired comparison of S1 and S2 accuracies across mice

mod normal;
mod wilcoxon;

#[cfg(test)]
mod tests;

pub use normal::{erf, normal_cdf};
pub use wilcoxon::{signed_rank, SignedRankResult, EXACT_MAX_N};

use crate::error::{Error, Result};
use crate::session::Region;
use ndarray::{Array1, Array2};
use std::collections::{BTreeMap, BTreeSet};

/// A per-time-point series of values
pub trait TimeCourse {
    fn n_time_points(&self) -> usize;
    fn value_at(&self, time_index: usize) -> f64;
}

/// Curves shaped (time points x {mean, std}); the mean column is used
impl TimeCourse for Array2<f64> {
    fn n_time_points(&self) -> usize {
        self.nrows()
    }

    fn value_at(&self, time_index: usize) -> f64 {
        self[[time_index, 0]]
    }
}

impl TimeCourse for Array1<f64> {
    fn n_time_points(&self) -> usize {
        self.len()
    }

    fn value_at(&self, time_index: usize) -> f64 {
        self[time_index]
    }
}

impl TimeCourse for Vec<f64> {
    fn n_time_points(&self) -> usize {
        self.len()
    }

    fn value_at(&self, time_index: usize) -> f64 {
        self[time_index]
    }
}

/// Split a `{mouse}_{region}` key
pub fn parse_mouse_region(key: &str) -> Result<(&str, Region)> {
    let (mouse, region) = key
        .rsplit_once('_')
        .ok_or_else(|| Error::InvalidKey(key.to_string()))?;
    let region = Region::parse(region).ok_or_else(|| Error::InvalidKey(key.to_string()))?;
    if mouse.is_empty() {
        return Err(Error::InvalidKey(key.to_string()));
    }
    Ok((mouse, region))
}

/// Wilcoxon signed-rank p-value per time point, pairing S1 and S2 by mouse
///
/// Keys must follow `{mouse}_{region}`, and every mouse needs both regions.
/// A time point where any mouse has a NaN accuracy gets a NaN p-value.
pub fn wilcoxon_test<T: TimeCourse>(accuracies: &BTreeMap<String, T>) -> Result<Vec<f64>> {
    let mut mice = BTreeSet::new();
    for key in accuracies.keys() {
        let (mouse, _) = parse_mouse_region(key)?;
        mice.insert(mouse.to_string());
    }

    let mut pairs = Vec::with_capacity(mice.len());
    for mouse in &mice {
        let lookup = |region: Region| {
            accuracies
                .get(&format!("{mouse}_{region}"))
                .ok_or_else(|| Error::MissingPair {
                    mouse: mouse.clone(),
                    region: region.to_string(),
                })
        };
        pairs.push((lookup(Region::S1)?, lookup(Region::S2)?));
    }

    let Some(n_tp) = accuracies.values().next().map(TimeCourse::n_time_points) else {
        return Ok(Vec::new());
    };
    if let Some(bad) = accuracies.values().find(|v| v.n_time_points() != n_tp) {
        return Err(Error::ShapeMismatch {
            context: "wilcoxon test time courses".into(),
            expected: vec![n_tp],
            actual: vec![bad.n_time_points()],
        });
    }

    let p_values = (0..n_tp)
        .map(|tp| {
            let s1: Vec<f64> = pairs.iter().map(|(a, _)| a.value_at(tp)).collect();
            let s2: Vec<f64> = pairs.iter().map(|(_, b)| b.value_at(tp)).collect();
            signed_rank(&s1, &s2).p_value
        })
        .collect();
    Ok(p_values)
}
