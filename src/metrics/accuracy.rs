//! Accuracy of probabilistic binary predictions
//!
//! Every function takes the binary ground truth and the predicted
//! probability of the positive class, and panics if their lengths differ.

use super::Score;

fn check_lengths(truth: &[bool], estimate: &[f64]) {
    assert_eq!(
        truth.len(),
        estimate.len(),
        "truth and estimate must have same length"
    );
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Population mean and standard deviation (ddof = 0)
fn mean_std(values: &[f64]) -> (f64, f64) {
    let m = mean(values.iter().copied());
    let var = mean(values.iter().map(|v| (v - m).powi(2)));
    (m, var.sqrt())
}

fn class_estimates(truth: &[bool], estimate: &[f64], class: bool) -> Vec<f64> {
    truth
        .iter()
        .zip(estimate)
        .filter_map(|(&t, &e)| (t == class).then_some(e))
        .collect()
}

/// Probability assigned to the correct class, per trial
pub fn prob_correct(truth: &[bool], estimate: &[f64]) -> Vec<f64> {
    check_lengths(truth, estimate);
    truth
        .iter()
        .zip(estimate)
        .map(|(&t, &e)| if t { e } else { 1.0 - e })
        .collect()
}

/// Mean and standard deviation of the per-trial correct-class probability
pub fn mean_accuracy(truth: &[bool], estimate: &[f64]) -> Score {
    let (value, dispersion) = mean_std(&prob_correct(truth, estimate));
    Score::new(value, dispersion)
}

/// Fraction correct after thresholding the estimate at 0.5
pub fn mean_accuracy_pred(truth: &[bool], estimate: &[f64]) -> Score {
    check_lengths(truth, estimate);
    let value = mean(
        truth
            .iter()
            .zip(estimate)
            .map(|(&t, &e)| if t == (e > 0.5) { 1.0 } else { 0.0 }),
    );
    Score::point(value)
}

/// Mean log-likelihood, with probabilities clipped to [1e-3, 1]
pub fn llh(truth: &[bool], estimate: &[f64]) -> Score {
    let value = mean(
        prob_correct(truth, estimate)
            .into_iter()
            .map(|p| p.clamp(1e-3, 1.0).ln()),
    );
    Score::point(value)
}

/// Coefficient of determination between truth and estimate
///
/// A constant truth vector scores 1 for a perfect estimate and 0 otherwise.
pub fn r2_acc(truth: &[bool], estimate: &[f64]) -> Score {
    check_lengths(truth, estimate);
    let y: Vec<f64> = truth.iter().map(|&t| if t { 1.0 } else { 0.0 }).collect();
    let y_mean = mean(y.iter().copied());
    let ss_res: f64 = y.iter().zip(estimate).map(|(a, b)| (a - b).powi(2)).sum();
    let ss_tot: f64 = y.iter().map(|a| (a - y_mean).powi(2)).sum();
    let value = if y.is_empty() {
        f64::NAN
    } else if ss_tot == 0.0 {
        if ss_res == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - ss_res / ss_tot
    };
    Score::point(value)
}

/// Mean estimate on positive trials minus mean estimate on negative trials
pub fn separability(truth: &[bool], estimate: &[f64]) -> Score {
    check_lengths(truth, estimate);
    let pos = mean(class_estimates(truth, estimate, true).into_iter());
    let neg = mean(class_estimates(truth, estimate, false).into_iter());
    Score::point(pos - neg)
}

/// Worse of the two per-class mean accuracies
///
/// NaN if either class is absent.
pub fn min_mean_accuracy(truth: &[bool], estimate: &[f64]) -> Score {
    check_lengths(truth, estimate);
    let acc_true = mean(class_estimates(truth, estimate, true).into_iter());
    let acc_false = 1.0 - mean(class_estimates(truth, estimate, false).into_iter());
    let value = if acc_true.is_nan() || acc_false.is_nan() {
        f64::NAN
    } else {
        acc_true.min(acc_false)
    };
    Score::point(value)
}

/// Unweighted mean of the two per-class mean accuracies
///
/// The dispersion pools the per-class standard deviations weighted by class
/// size. With a single class present the score reduces to that class's
/// mean accuracy and standard deviation.
pub fn class_av_mean_accuracy(truth: &[bool], estimate: &[f64]) -> Score {
    check_lengths(truth, estimate);
    let positives = class_estimates(truth, estimate, true);
    let negatives = class_estimates(truth, estimate, false);
    let (mean_true, std_true) = mean_std(&positives);
    let (mean_false_est, std_false) = mean_std(&negatives);
    let mean_false = 1.0 - mean_false_est;

    match (positives.is_empty(), negatives.is_empty()) {
        (false, false) => {
            let n_true = positives.len() as f64;
            let n_false = negatives.len() as f64;
            let pooled =
                ((n_true * std_true.powi(2) + n_false * std_false.powi(2)) / (n_true + n_false)).sqrt();
            Score::new(0.5 * (mean_true + mean_false), pooled)
        }
        (false, true) => Score::new(mean_true, std_true),
        (true, false) => Score::new(mean_false, std_false),
        (true, true) => Score::new(f64::NAN, f64::NAN),
    }
}
