//! Synthetic sessions for unit tests

use crate::session::{Outcome, Session};
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

pub(crate) const N_FRAMES: usize = 12;
pub(crate) const PRE_GAP: usize = 4;

/// Outcome list with the given counts, interleaved so every fold sees each outcome
pub(crate) fn outcomes(hit: usize, fp: usize, miss: usize, cr: usize) -> Vec<Outcome> {
    let mut remaining = [
        (Outcome::Hit, hit),
        (Outcome::FalsePositive, fp),
        (Outcome::Miss, miss),
        (Outcome::CorrectRejection, cr),
    ];
    let mut out = Vec::with_capacity(hit + fp + miss + cr);
    while remaining.iter().any(|(_, n)| *n > 0) {
        for (outcome, n) in remaining.iter_mut() {
            if *n > 0 {
                out.push(*outcome);
                *n -= 1;
            }
        }
    }
    out
}

/// Session whose first `n_neurons / 2` neurons (S1) encode the lick
/// decision and whose remaining neurons (S2) encode stimulation
pub(crate) fn synthetic_session(
    mouse: &str,
    signature: &str,
    outcomes: &[Outcome],
    n_neurons: usize,
    n_spont: usize,
    signal: f64,
    seed: u64,
) -> Session {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0).unwrap();
    let n_trials = outcomes.len();
    let half = n_neurons / 2;

    let decision: Vec<bool> = outcomes
        .iter()
        .map(|o| matches!(o, Outcome::Hit | Outcome::FalsePositive | Outcome::TooEarly))
        .collect();
    let photostim: Vec<u8> = outcomes
        .iter()
        .map(|o| u8::from(matches!(o, Outcome::Hit | Outcome::Miss)))
        .collect();
    let trial_subsets: Vec<u32> = photostim.iter().map(|&p| if p > 0 { 20 } else { 0 }).collect();

    let mut behaviour = Array3::zeros((n_neurons, n_trials, N_FRAMES));
    for ((n, t, _), v) in behaviour.indexed_iter_mut() {
        let encoded = if n < half { decision[t] } else { photostim[t] > 0 };
        *v = noise.sample(&mut rng) + if encoded { signal } else { 0.0 };
    }
    let mut spont = Array3::zeros((n_neurons, n_spont, N_FRAMES));
    for ((n, _, _), v) in spont.indexed_iter_mut() {
        *v = noise.sample(&mut rng) + if n < half { signal } else { 0.0 };
    }

    Session {
        mouse: mouse.to_string(),
        signature: signature.to_string(),
        run_number: 1,
        frequency: 5.0,
        behaviour_trials: behaviour,
        pre_rew_trials: spont,
        outcome: outcomes.to_vec(),
        photostim,
        trial_subsets,
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

/// Standard 100-trial session: 40 hit, 20 fp, 20 miss, 20 cr
pub(crate) fn standard_session(mouse: &str, signature: &str, seed: u64) -> Session {
    synthetic_session(mouse, signature, &outcomes(40, 20, 20, 20), 10, 10, 1.5, seed)
}
