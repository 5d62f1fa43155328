//! Long-format prediction tables for per-trial plotting
//!
//! Decoding runs produce one [`PredictionTable`] per (region, time point,
//! mouse). [`make_violin_df_custom`] flattens that grid into one long table
//! per time point with every row tagged by where it came from.

#[cfg(test)]
mod tests;

use crate::decode::{train_test_all_sessions, DecodeConfig, Penalty, PredictionRow, PredictionTable, SelectionConfig};
use crate::error::{Error, Result};
use crate::session::{Region, Session};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Target row count per mouse after trial-count normalisation
pub const NORMALISED_TRIALS: f64 = 10000.0;

/// Smallest allowed replication factor
pub const MIN_MULTIPLIER: usize = 10;

/// Time points decoded by [`get_decoder_data_for_violin_plots`] by default
pub const DEFAULT_VIOLIN_TIME_POINTS: [f64; 2] = [1.0, 4.0];

/// Inverse regularisation strength of the per-trial decoders
pub const VIOLIN_C_VALUE: f64 = 50.0;

/// Prediction tables of every mouse at one time point
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSlice {
    pub time_point: f64,
    pub per_mouse: BTreeMap<String, PredictionTable>,
}

/// region -> time slices, in time order
pub type RegionTimeTables = BTreeMap<Region, Vec<TimeSlice>>;

/// Prediction row tagged with its region, mouse and time point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaggedRow {
    /// Upper-case region label
    pub region: String,
    pub mouse: String,
    pub time_point: f64,
    /// Rows of this mouse at this (region, time point) before replication
    pub n_trials_mouse: usize,
    #[serde(flatten)]
    pub row: PredictionRow,
}

/// All rows of one time point
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LongTable {
    pub time_point: f64,
    pub rows: Vec<TaggedRow>,
}

impl LongTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows belonging to a mouse
    pub fn count_mouse(&self, mouse: &str) -> usize {
        self.rows.iter().filter(|r| r.mouse == mouse).count()
    }

    pub fn count_region(&self, region: Region) -> usize {
        self.rows.iter().filter(|r| r.region == region.label()).count()
    }
}

/// Replication factor per mouse, taken from the first region and time point
fn multipliers(first: &TimeSlice) -> Result<BTreeMap<String, usize>> {
    first
        .per_mouse
        .iter()
        .map(|(mouse, table)| {
            let n = table.len();
            let multiplier = if n == 0 {
                0
            } else {
                (NORMALISED_TRIALS / n as f64).round() as usize
            };
            if multiplier < MIN_MULTIPLIER {
                return Err(Error::InsufficientData(format!(
                    "mouse {mouse} has {n} rows, replication factor {multiplier} is below {MIN_MULTIPLIER}"
                )));
            }
            debug!(mouse, n_trials = n, multiplier, "trial-count normalisation");
            Ok((mouse.clone(), multiplier))
        })
        .collect()
}

/// Flatten (region, time point, mouse) tables into one long table per time point
///
/// Rows are ordered S1 before S2, then by mouse, keeping each table's row
/// order. Every region must hold the same time points and the same mice.
/// With `normalise`, each mouse's rows are repeated `round(10000 / n)` times
/// (`n` counted at the first region and time point) so that mice carry equal
/// weight in pooled statistics; the factor must be at least 10.
pub fn make_violin_df_custom(tables: &RegionTimeTables, normalise: bool) -> Result<Vec<LongTable>> {
    let Some(first) = tables.values().next().and_then(|slices| slices.first()) else {
        return Ok(Vec::new());
    };
    let time_points: Vec<f64> = first_region_times(tables);
    let mice: Vec<&String> = first.per_mouse.keys().collect();

    for (region, slices) in tables {
        let times: Vec<f64> = slices.iter().map(|s| s.time_point).collect();
        if times != time_points {
            return Err(Error::ShapeMismatch {
                context: format!("time points of region {region}"),
                expected: vec![time_points.len()],
                actual: vec![times.len()],
            });
        }
        if let Some(slice) = slices.iter().find(|s| s.per_mouse.keys().ne(mice.iter().copied())) {
            return Err(Error::InvalidParameter(format!(
                "region {region} at time {} does not hold the same mice as the first table",
                slice.time_point
            )));
        }
    }

    let multipliers = if normalise { Some(multipliers(first)?) } else { None };

    let long = (0..time_points.len())
        .map(|i_tp| {
            let mut rows = Vec::new();
            for (region, slices) in tables {
                let slice = &slices[i_tp];
                for (mouse, table) in &slice.per_mouse {
                    let repeat = multipliers.as_ref().and_then(|m| m.get(mouse).copied()).unwrap_or(1);
                    let n_trials_mouse = table.len();
                    for _ in 0..repeat {
                        rows.extend(table.rows.iter().map(|row| TaggedRow {
                            region: region.label().to_string(),
                            mouse: mouse.clone(),
                            time_point: slice.time_point,
                            n_trials_mouse,
                            row: row.clone(),
                        }));
                    }
                }
            }
            LongTable {
                time_point: time_points[i_tp],
                rows,
            }
        })
        .collect();
    Ok(long)
}

fn first_region_times(tables: &RegionTimeTables) -> Vec<f64> {
    tables
        .values()
        .next()
        .map(|slices| slices.iter().map(|s| s.time_point).collect())
        .unwrap_or_default()
}

/// Decode S1 and S2 at each time point and build normalised long tables
///
/// Decoders use an L2 penalty with C = 50 and the default trial selection;
/// fold count, targets and spontaneous handling come from `base`.
pub fn get_decoder_data_for_violin_plots(
    sessions: &[Session],
    base: &DecodeConfig,
    time_points: &[f64],
) -> Result<Vec<LongTable>> {
    let points: Vec<(Region, f64)> = Region::BOTH
        .iter()
        .flat_map(|&region| time_points.iter().map(move |&tp| (region, tp)))
        .collect();
    info!(time_points = time_points.len(), "decoding per-trial tables");

    let decoded: Vec<(Region, TimeSlice)> = points
        .par_iter()
        .map(|&(region, time_point)| {
            let config = DecodeConfig {
                time_points: Some(vec![time_point]),
                neurons: region.into(),
                c_value: VIOLIN_C_VALUE,
                penalty: Penalty::L2,
                selection: SelectionConfig::default(),
                projection: None,
                return_decoder_weights: false,
                ..base.clone()
            };
            let output = train_test_all_sessions(sessions, &config)?;
            Ok((
                region,
                TimeSlice {
                    time_point,
                    per_mouse: output.test,
                },
            ))
        })
        .collect::<Result<_>>()?;

    let mut tables = RegionTimeTables::new();
    for (region, slice) in decoded {
        tables.entry(region).or_default().push(slice);
    }
    make_violin_df_custom(&tables, true)
}
