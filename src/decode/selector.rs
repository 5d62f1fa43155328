//! Trial selection: which trials train the decoders and which are only scored

use crate::error::{Error, Result};
use crate::session::{Outcome, Session, TrialCategory, STIM_150_CLASS};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Category toggles controlling the trial partition
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Keep 150-cell stimulation trials
    pub include_150: bool,
    /// Train on autorewarded misses instead of only scoring them
    pub include_autoreward: bool,
    /// Train on unrewarded hits instead of only scoring them
    pub include_unrewarded_hit: bool,
    /// Keep too-early trials
    pub include_too_early: bool,
    /// Restrict the pool to hit and miss trials (not implemented)
    pub hit_miss_only: bool,
    /// Restrict the pool to hits; other outcomes become evaluation-only
    pub hit_spont_only: bool,
}

impl SelectionConfig {
    /// Reject combinations of mutually exclusive modes
    pub fn check(&self) -> Result<()> {
        if self.hit_miss_only && self.hit_spont_only {
            return Err(Error::MutuallyExclusive(
                "hit_miss_only".into(),
                "hit_spont_only".into(),
            ));
        }
        Ok(())
    }
}

/// Partition of one session's trials
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrialSelection {
    /// Trials passing the stimulation filter
    pub candidates: Vec<usize>,
    /// Trials used for cross-validated training and testing
    pub pool: Vec<usize>,
    /// Trials only scored by the fitted decoders
    pub eval_only: Vec<usize>,
    /// Reason each evaluation-only trial was held out
    pub eval_only_labels: Vec<TrialCategory>,
    /// Candidates in neither the pool nor the evaluation-only set
    pub excluded: Vec<usize>,
}

impl TrialSelection {
    pub fn n_pool(&self) -> usize {
        self.pool.len()
    }

    pub fn n_eval_only(&self) -> usize {
        self.eval_only.len()
    }
}

/// Partition a session's trials according to `config`
///
/// Filters are applied as successive intersections. Autorewarded misses
/// and unrewarded hits are held out for evaluation unless their include
/// toggle is set, in which case they stay in the pool. The held-out set
/// ignores the stimulation filter, so 150-cell trials carrying either flag
/// are still scored.
pub fn select_trials(session: &Session, config: &SelectionConfig) -> Result<TrialSelection> {
    config.check()?;

    let candidates: Vec<usize> = if config.include_150 {
        (0..session.n_trials()).collect()
    } else {
        (0..session.n_trials())
            .filter(|&i| session.photostim[i] < STIM_150_CLASS)
            .collect()
    };

    if config.hit_miss_only {
        return Err(Error::NotImplemented(
            "hit/miss-only selection has no evaluation-only accounting".into(),
        ));
    }

    let mut pool = candidates.clone();
    if config.hit_spont_only {
        pool.retain(|&i| session.outcome[i] == Outcome::Hit);
    }

    if config.include_autoreward {
        warn!(session = %session.signature, "autorewarded misses not excluded from training");
    } else {
        pool.retain(|&i| !session.autorewarded[i]);
    }

    if config.include_unrewarded_hit {
        warn!(session = %session.signature, "unrewarded hits not excluded from training");
    } else {
        pool.retain(|&i| !session.unrewarded_hits[i]);
    }

    if config.include_too_early {
        warn!(session = %session.signature, "too-early trials not excluded");
    } else {
        pool.retain(|&i| session.outcome[i] != Outcome::TooEarly);
    }

    // Flagged trials are scored whatever their stimulation class
    let mut eval_only = Vec::new();
    let mut eval_only_labels = Vec::new();
    if !config.include_autoreward {
        for i in (0..session.n_trials()).filter(|&i| session.autorewarded[i]) {
            eval_only.push(i);
            eval_only_labels.push(TrialCategory::Arm);
        }
    }
    if !config.include_unrewarded_hit {
        let urh: Vec<usize> = (0..session.n_trials())
            .filter(|&i| session.unrewarded_hits[i] && !eval_only.contains(&i))
            .collect();
        for i in urh {
            eval_only.push(i);
            eval_only_labels.push(TrialCategory::Urh);
        }
    }

    if config.hit_spont_only {
        for outcome in [Outcome::Miss, Outcome::FalsePositive, Outcome::CorrectRejection] {
            let extra: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&i| session.outcome[i] == outcome && !eval_only.contains(&i))
                .collect();
            eval_only_labels.extend(std::iter::repeat(TrialCategory::from(outcome)).take(extra.len()));
            eval_only.extend(extra);
        }
    }

    let excluded = candidates
        .iter()
        .copied()
        .filter(|i| !pool.contains(i) && !eval_only.contains(i))
        .collect();

    Ok(TrialSelection {
        candidates,
        pool,
        eval_only,
        eval_only_labels,
        excluded,
    })
}

/// One step of the reward-label computation
///
/// Rules are applied in order; each may override the label produced by the
/// rules before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardRule {
    /// Hits and too-early licks are rewarded
    Base,
    /// Autorewarded misses are rewarded
    Autoreward,
    /// Unrewarded hits are not
    UnrewardedHit,
}

/// Reward rules in order of increasing precedence
pub const REWARD_RULES: [RewardRule; 3] = [
    RewardRule::Base,
    RewardRule::Autoreward,
    RewardRule::UnrewardedHit,
];

impl RewardRule {
    /// Apply this rule to `trial`, given the label so far
    pub fn apply(&self, session: &Session, trial: usize, current: bool) -> bool {
        match self {
            RewardRule::Base => matches!(session.outcome[trial], Outcome::Hit | Outcome::TooEarly),
            RewardRule::Autoreward if session.autorewarded[trial] => true,
            RewardRule::UnrewardedHit if session.unrewarded_hits[trial] => false,
            RewardRule::Autoreward | RewardRule::UnrewardedHit => current,
        }
    }
}

/// Whether `trial` was rewarded, after applying a list of rules in order
pub fn reward_label_with(rules: &[RewardRule], session: &Session, trial: usize) -> bool {
    rules
        .iter()
        .fold(false, |label, rule| rule.apply(session, trial, label))
}

/// Whether `trial` was rewarded
pub fn reward_label(session: &Session, trial: usize) -> bool {
    reward_label_with(&REWARD_RULES, session, trial)
}
