//! Synthetic sessions shared by integration tests

#![allow(dead_code)]

use ndarray::Array3;
use optodec::session::{Outcome, Session};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::path::{Path, PathBuf};

pub const N_FRAMES: usize = 12;
pub const PRE_GAP: usize = 4;

/// 100 trials: 40 hit, 20 false positive, 20 miss, 20 correct rejection
///
/// S1 neurons carry the lick decision, S2 neurons carry stimulation.
pub fn session(mouse: &str, signature: &str, seed: u64) -> Session {
    let pattern = [
        Outcome::Hit,
        Outcome::FalsePositive,
        Outcome::Miss,
        Outcome::CorrectRejection,
        Outcome::Hit,
    ];
    let outcome: Vec<Outcome> = pattern.iter().copied().cycle().take(100).collect();
    let n_neurons = 10;
    let half = n_neurons / 2;
    let n_trials = outcome.len();

    let decision: Vec<bool> = outcome
        .iter()
        .map(|o| matches!(o, Outcome::Hit | Outcome::FalsePositive))
        .collect();
    let photostim: Vec<u8> = outcome
        .iter()
        .map(|o| u8::from(matches!(o, Outcome::Hit | Outcome::Miss)))
        .collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0).unwrap();
    let mut behaviour = Array3::zeros((n_neurons, n_trials, N_FRAMES));
    for ((n, t, _), v) in behaviour.indexed_iter_mut() {
        let encoded = if n < half { decision[t] } else { photostim[t] > 0 };
        *v = noise.sample(&mut rng) + if encoded { 1.5 } else { 0.0 };
    }
    let mut spont = Array3::zeros((n_neurons, 10, N_FRAMES));
    for ((n, _, _), v) in spont.indexed_iter_mut() {
        *v = noise.sample(&mut rng) + if n < half { 1.5 } else { 0.0 };
    }

    Session {
        mouse: mouse.to_string(),
        signature: signature.to_string(),
        run_number: 1,
        frequency: 5.0,
        behaviour_trials: behaviour,
        pre_rew_trials: spont,
        trial_subsets: photostim.iter().map(|&p| if p > 0 { 20 } else { 0 }).collect(),
        outcome,
        photostim,
        decision,
        autorewarded: vec![false; n_trials],
        unrewarded_hits: vec![false; n_trials],
        s1_bool: (0..n_neurons).map(|n| n < half).collect(),
        s2_bool: (0..n_neurons).map(|n| n >= half).collect(),
        filter_ps_array: (0..N_FRAMES).collect(),
        filter_ps_time: (0..N_FRAMES)
            .map(|f| (f as f64 - PRE_GAP as f64) * 0.2)
            .collect(),
        final_pre_gap_tp: PRE_GAP,
    }
}

/// Write `session` as JSON under `dir`
pub fn write_session(dir: &Path, session: &Session) -> PathBuf {
    let path = dir.join(format!("{}.json", session.signature));
    std::fs::write(&path, serde_json::to_string(session).unwrap()).unwrap();
    path
}
