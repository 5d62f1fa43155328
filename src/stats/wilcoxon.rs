//! Wilcoxon signed-rank test

use super::normal::normal_cdf;
use serde::Serialize;

/// Largest sample size for which the exact null distribution is used
pub const EXACT_MAX_N: usize = 50;

/// Outcome of a two-sided signed-rank test
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SignedRankResult {
    /// min(R+, R-)
    pub statistic: f64,
    pub p_value: f64,
    /// Pairs with a non-zero difference
    pub n: usize,
    pub exact: bool,
}

/// Average ranks of `values` (1-based), with the sizes of tied groups
fn rank_with_ties(values: &[f64]) -> (Vec<f64>, Vec<usize>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut ties = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        let avg = (start + end + 1) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = avg;
        }
        if end - start > 1 {
            ties.push(end - start);
        }
        start = end;
    }
    (ranks, ties)
}

/// P(T <= t) under the null, by counting subsets of {1..n} with rank sum <= t
fn exact_cdf(n: usize, t: f64) -> f64 {
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![0.0_f64; max_sum + 1];
    counts[0] = 1.0;
    for rank in 1..=n {
        for sum in (rank..=max_sum).rev() {
            counts[sum] += counts[sum - rank];
        }
    }
    let total = 2.0_f64.powi(n as i32);
    let limit = t.floor().max(0.0) as usize;
    counts.iter().take(limit.min(max_sum) + 1).sum::<f64>() / total
}

/// Two-sided Wilcoxon signed-rank test on paired samples
///
/// Zero differences are dropped. The exact null distribution is used for
/// up to [`EXACT_MAX_N`] pairs without tied absolute differences, the tie
/// corrected normal approximation otherwise. With no non-zero difference,
/// or a NaN in either sample, the p-value is NaN.
pub fn signed_rank(x: &[f64], y: &[f64]) -> SignedRankResult {
    assert_eq!(x.len(), y.len(), "paired samples must have same length");
    if x.iter().chain(y).any(|v| v.is_nan()) {
        return SignedRankResult {
            statistic: f64::NAN,
            p_value: f64::NAN,
            n: 0,
            exact: false,
        };
    }
    let diffs: Vec<f64> = x
        .iter()
        .zip(y)
        .map(|(a, b)| a - b)
        .filter(|d| *d != 0.0)
        .collect();
    let n = diffs.len();
    if n == 0 {
        return SignedRankResult {
            statistic: 0.0,
            p_value: f64::NAN,
            n,
            exact: false,
        };
    }

    let abs: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let (ranks, ties) = rank_with_ties(&abs);
    let r_plus: f64 = diffs
        .iter()
        .zip(&ranks)
        .filter(|(d, _)| **d > 0.0)
        .map(|(_, r)| r)
        .sum();
    let total = (n * (n + 1)) as f64 / 2.0;
    let statistic = r_plus.min(total - r_plus);

    let exact = n <= EXACT_MAX_N && ties.is_empty();
    let p_value = if exact {
        (2.0 * exact_cdf(n, statistic)).min(1.0)
    } else {
        let nf = n as f64;
        let mean = nf * (nf + 1.0) / 4.0;
        let tie_term: f64 = ties
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * (t * t - 1.0)
            })
            .sum();
        let var = (nf * (nf + 1.0) * (2.0 * nf + 1.0) - 0.5 * tie_term) / 24.0;
        if var <= 0.0 {
            f64::NAN
        } else {
            let z = (statistic - mean) / var.sqrt();
            (2.0 * normal_cdf(-z.abs())).min(1.0)
        }
    };

    SignedRankResult {
        statistic,
        p_value,
        n,
        exact,
    }
}
