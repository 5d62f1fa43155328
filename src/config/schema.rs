//! YAML schema of an analysis run

use crate::decode::DecodeConfig;
use crate::sweep::SweepConfig;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Deserialize a bool from either a YAML boolean (`true`) or a quoted string (`"true"`).
fn deserialize_bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::Str(s) => match s.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected 'true' or 'false', got '{other}'"
            ))),
        },
    }
}

/// Complete analysis configuration
///
/// ```yaml
/// sessions:
///   - data/PB_191_run1.json
///   - data/PB_192_run1.json
/// decode:
///   n_splits: 4
///   c_value: 0.2
/// sweep:
///   time_points: [-1.0, 0.0, 1.0, 2.0]
///   per_mouse: true
/// output:
///   path: results/sweep.json
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSpec {
    /// Session JSON files, decoded in this order within each mouse
    pub sessions: Vec<PathBuf>,

    #[serde(default)]
    pub decode: DecodeConfig,

    #[serde(default)]
    pub sweep: SweepConfig,

    #[serde(default)]
    pub output: OutputSpec,
}

/// Where and how results are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Indent the JSON output
    #[serde(default, deserialize_with = "deserialize_bool_lenient")]
    pub pretty: bool,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("./optodec_results.json")
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            pretty: false,
        }
    }
}
