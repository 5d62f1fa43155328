//! Trial outcome and category labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavioural outcome of a single trial
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    /// Lick on a stimulated trial
    #[serde(rename = "hit")]
    Hit,
    /// Lick on a catch trial
    #[serde(rename = "fp")]
    FalsePositive,
    /// No lick on a catch trial
    #[serde(rename = "cr")]
    CorrectRejection,
    /// No lick on a stimulated trial
    #[serde(rename = "miss")]
    Miss,
    /// Lick before the response window opened
    #[serde(rename = "too_")]
    TooEarly,
}

impl Outcome {
    /// All outcomes, in table order
    pub const ALL: [Outcome; 5] = [
        Outcome::Hit,
        Outcome::FalsePositive,
        Outcome::CorrectRejection,
        Outcome::Miss,
        Outcome::TooEarly,
    ];

    /// Short label used in result tables
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Hit => "hit",
            Outcome::FalsePositive => "fp",
            Outcome::CorrectRejection => "cr",
            Outcome::Miss => "miss",
            Outcome::TooEarly => "too_",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a row in a prediction table
///
/// Extends [`Outcome`] with the evaluation-only reasons and spontaneous
/// trials. Used as the stratification key of the fold split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrialCategory {
    Hit,
    Fp,
    Miss,
    Cr,
    #[serde(rename = "too_")]
    TooEarly,
    /// Autorewarded miss
    Arm,
    /// Unrewarded hit
    Urh,
    /// Spontaneous (pre-reward) trial
    Spont,
}

impl TrialCategory {
    /// Regular behavioural categories used by the pooled accuracy split
    pub const BEHAVIOURAL: [TrialCategory; 4] = [
        TrialCategory::Hit,
        TrialCategory::Fp,
        TrialCategory::Miss,
        TrialCategory::Cr,
    ];

    /// Categories used by the per-mouse accuracy split
    pub const PER_MOUSE: [TrialCategory; 7] = [
        TrialCategory::Hit,
        TrialCategory::Fp,
        TrialCategory::Miss,
        TrialCategory::Cr,
        TrialCategory::Arm,
        TrialCategory::Urh,
        TrialCategory::Spont,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TrialCategory::Hit => "hit",
            TrialCategory::Fp => "fp",
            TrialCategory::Miss => "miss",
            TrialCategory::Cr => "cr",
            TrialCategory::TooEarly => "too_",
            TrialCategory::Arm => "arm",
            TrialCategory::Urh => "urh",
            TrialCategory::Spont => "spont",
        }
    }
}

impl From<Outcome> for TrialCategory {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Hit => TrialCategory::Hit,
            Outcome::FalsePositive => TrialCategory::Fp,
            Outcome::CorrectRejection => TrialCategory::Cr,
            Outcome::Miss => TrialCategory::Miss,
            Outcome::TooEarly => TrialCategory::TooEarly,
        }
    }
}

impl fmt::Display for TrialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded brain region
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    S1,
    S2,
}

impl Region {
    pub const BOTH: [Region; 2] = [Region::S1, Region::S2];

    /// Lower-case key, as used in `{mouse}_{region}` result keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::S1 => "s1",
            Region::S2 => "s2",
        }
    }

    /// Upper-case label, as used in long-format tables
    pub fn label(&self) -> &'static str {
        match self {
            Region::S1 => "S1",
            Region::S2 => "S2",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "s1" => Some(Region::S1),
            "s2" => Some(Region::S2),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which neurons feed the decoders
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeuronSelection {
    #[default]
    All,
    S1,
    S2,
}

impl From<Region> for NeuronSelection {
    fn from(region: Region) -> Self {
        match region {
            Region::S1 => NeuronSelection::S1,
            Region::S2 => NeuronSelection::S2,
        }
    }
}
