//! Stratified K-Fold cross-validation splitter

use crate::error::{Error, Result};
use tracing::warn;

/// Stratified K-Fold splitter
///
/// Each fold's test set keeps the class proportions of the whole sample.
/// Without shuffling the split is deterministic: samples of a class are
/// assigned to folds in index order.
#[derive(Clone, Debug)]
pub struct StratifiedKFold {
    n_splits: usize,
    shuffle: bool,
    seed: u64,
}

impl StratifiedKFold {
    /// Create a new splitter
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            shuffle: false,
            seed: 42,
        }
    }

    /// Shuffle fold assignment within each class using `seed`
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.shuffle = true;
        self.seed = seed;
        self
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Generate train/test indices for each fold, stratified over `labels`
    pub fn split<L: PartialEq>(&self, labels: &[L]) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        let n_samples = labels.len();
        if self.n_splits < 2 {
            return Err(Error::InvalidParameter(format!(
                "n_splits must be at least 2, got {}",
                self.n_splits
            )));
        }
        if self.n_splits > n_samples {
            return Err(Error::InsufficientData(format!(
                "cannot split {n_samples} samples into {} folds",
                self.n_splits
            )));
        }

        // Classes encoded in order of first appearance
        let mut classes: Vec<&L> = Vec::new();
        let encoded: Vec<usize> = labels
            .iter()
            .map(|label| match classes.iter().position(|c| *c == label) {
                Some(k) => k,
                None => {
                    classes.push(label);
                    classes.len() - 1
                }
            })
            .collect();
        let n_classes = classes.len();

        let mut counts = vec![0usize; n_classes];
        for &k in &encoded {
            counts[k] += 1;
        }
        if counts.iter().all(|&c| c < self.n_splits) {
            return Err(Error::InsufficientData(format!(
                "n_splits={} is greater than the number of members in each class",
                self.n_splits
            )));
        }
        if let Some(&min) = counts.iter().min() {
            if min < self.n_splits {
                warn!(
                    least_populated = min,
                    n_splits = self.n_splits,
                    "least populated class has fewer members than n_splits"
                );
            }
        }

        // allocation[fold][class]: every n_splits-th sample of the class-sorted order
        let mut sorted = encoded.clone();
        sorted.sort_unstable();
        let mut allocation = vec![vec![0usize; n_classes]; self.n_splits];
        for (pos, &k) in sorted.iter().enumerate() {
            allocation[pos % self.n_splits][k] += 1;
        }

        let mut test_fold = vec![0usize; n_samples];
        let mut rng_state = self.seed;
        for k in 0..n_classes {
            let mut folds_for_class: Vec<usize> = (0..self.n_splits)
                .flat_map(|fold| std::iter::repeat(fold).take(allocation[fold][k]))
                .collect();

            if self.shuffle {
                // LCG-based Fisher-Yates for reproducibility
                for i in (1..folds_for_class.len()).rev() {
                    rng_state = rng_state
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1);
                    let j = (rng_state >> 33) as usize % (i + 1);
                    folds_for_class.swap(i, j);
                }
            }

            let members = encoded.iter().enumerate().filter(|(_, &e)| e == k);
            for ((sample, _), fold) in members.zip(folds_for_class) {
                test_fold[sample] = fold;
            }
        }

        let folds = (0..self.n_splits)
            .map(|fold| {
                let (test, train): (Vec<usize>, Vec<usize>) =
                    (0..n_samples).partition(|&i| test_fold[i] == fold);
                (train, test)
            })
            .collect();

        Ok(folds)
    }
}
