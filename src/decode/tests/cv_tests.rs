//! Fold splitting, scaler, logistic regression and angle tests

use crate::decode::*;
use crate::error::Error;
use crate::session::TrialCategory;
use approx::assert_abs_diff_eq;
use ndarray::{array, Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn scenario_labels() -> Vec<TrialCategory> {
    crate::testutil::outcomes(40, 20, 20, 20)
        .into_iter()
        .map(TrialCategory::from)
        .collect()
}

#[test]
fn test_stratified_kfold_100_trial_scenario() {
    let labels = scenario_labels();
    let folds = StratifiedKFold::new(4).split(&labels).unwrap();

    assert_eq!(folds.len(), 4);
    let mut seen = vec![0usize; 100];
    for (train, test) in &folds {
        assert_eq!(test.len(), 25);
        assert_eq!(train.len(), 75);
        for &i in test {
            seen[i] += 1;
            assert!(!train.contains(&i));
        }
        let hits = test.iter().filter(|&&i| labels[i] == TrialCategory::Hit).count();
        assert_eq!(hits, 10);
        for category in [TrialCategory::Fp, TrialCategory::Miss, TrialCategory::Cr] {
            assert_eq!(test.iter().filter(|&&i| labels[i] == category).count(), 5);
        }
    }
    assert!(seen.iter().all(|&c| c == 1));
}

#[test]
fn test_stratified_kfold_deterministic_allocation() {
    let labels = [0, 0, 0, 1, 1, 1];
    let folds = StratifiedKFold::new(3).split(&labels).unwrap();
    let tests: Vec<Vec<usize>> = folds.into_iter().map(|(_, test)| test).collect();
    assert_eq!(tests, vec![vec![0, 3], vec![1, 4], vec![2, 5]]);
}

#[test]
fn test_stratified_kfold_uneven_classes() {
    let labels = ["a", "a", "a", "a", "a", "b", "b", "c"];
    let folds = StratifiedKFold::new(2).split(&labels).unwrap();
    let mut all: Vec<usize> = folds.iter().flat_map(|(_, t)| t.clone()).collect();
    all.sort_unstable();
    assert_eq!(all, (0..8).collect::<Vec<_>>());
    for (_, test) in &folds {
        let n_b = test.iter().filter(|&&i| labels[i] == "b").count();
        assert_eq!(n_b, 1);
    }
}

#[test]
fn test_stratified_kfold_shuffle_reproducible() {
    let labels = scenario_labels();
    let a = StratifiedKFold::new(4).with_shuffle(3).split(&labels).unwrap();
    let b = StratifiedKFold::new(4).with_shuffle(3).split(&labels).unwrap();
    assert_eq!(a, b);
    for (_, test) in &a {
        assert_eq!(test.len(), 25);
    }
    let unshuffled = StratifiedKFold::new(4).split(&labels).unwrap();
    assert_ne!(a, unshuffled);
}

#[test]
fn test_stratified_kfold_too_many_splits() {
    let labels = [true, false, true];
    assert!(matches!(
        StratifiedKFold::new(4).split(&labels),
        Err(Error::InsufficientData(_))
    ));
    assert!(matches!(
        StratifiedKFold::new(1).split(&labels),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn test_scaler_round_trip() {
    let x = array![[1.0, 10.0, 3.0], [2.0, 20.0, 3.0], [4.0, -5.0, 3.0], [0.5, 7.0, 3.0]];
    let scaler = StandardScaler::fit(x.view()).unwrap();
    let z = scaler.transform(x.view());

    let mean = z.mean_axis(Axis(0)).unwrap();
    for &m in mean.iter() {
        assert_abs_diff_eq!(m, 0.0, epsilon = 1e-12);
    }
    assert_abs_diff_eq!(z.column(0).std(0.0), 1.0, epsilon = 1e-12);
    // Constant feature maps to zero
    assert!(z.column(2).iter().all(|&v| v == 0.0));

    let back = scaler.inverse_transform(z.view());
    for (a, b) in back.iter().zip(x.iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-12);
    }
}

#[test]
fn test_scaler_rejects_empty() {
    let x = Array2::<f64>::zeros((0, 3));
    assert!(StandardScaler::fit(x.view()).is_err());
}

#[test]
fn test_logreg_symmetric_problem() {
    let x = array![[-2.0], [-1.0], [1.0], [2.0]];
    let y = [false, false, true, true];
    let model = LogisticRegression::new(Penalty::L2, 1.0).fit(x.view(), &y).unwrap();

    assert!(model.coef()[0] > 0.0);
    assert_abs_diff_eq!(model.intercept(), 0.0, epsilon = 1e-4);
    let p = model.predict_proba(x.view());
    assert!(p[0] < 0.5 && p[3] > 0.5);
    assert_abs_diff_eq!(p[0] + p[3], 1.0, epsilon = 1e-4);
}

#[test]
fn test_logreg_stronger_regularisation_shrinks_coefficients() {
    let x = array![[-2.0], [-1.0], [-0.5], [0.5], [1.0], [2.0]];
    let y = [false, false, true, false, true, true];
    let weak = LogisticRegression::new(Penalty::L2, 10.0).fit(x.view(), &y).unwrap();
    let strong = LogisticRegression::new(Penalty::L2, 0.01).fit(x.view(), &y).unwrap();
    assert!(weak.coef()[0] > strong.coef()[0]);
    assert!(strong.coef()[0] > 0.0);
}

#[test]
fn test_logreg_l1_zeroes_irrelevant_features() {
    let mut rng = StdRng::seed_from_u64(11);
    let noise = Normal::new(0.0, 1.0).unwrap();
    let n = 200;
    let y: Vec<bool> = (0..n).map(|i| i % 2 == 0).collect();
    let mut x = Array2::<f64>::zeros((n, 6));
    for ((i, j), v) in x.indexed_iter_mut() {
        let signal = if j == 0 && y[i] { 2.0 } else { 0.0 };
        *v = noise.sample(&mut rng) + signal;
    }

    let model = LogisticRegression::new(Penalty::L1, 0.05).fit(x.view(), &y).unwrap();
    assert!(model.coef()[0] > 0.0);
    let zeros = model.coef().iter().skip(1).filter(|&&w| w == 0.0).count();
    assert!(zeros >= 3, "expected sparse coefficients, got {:?}", model.coef());
}

#[test]
fn test_logreg_unpenalised_fits_noisy_data() {
    let x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0]];
    let y = [false, false, true, false, true, true];
    let model = LogisticRegression::new(Penalty::None, 1.0).fit(x.view(), &y).unwrap();
    assert!(model.coef()[0].is_finite() && model.coef()[0] > 0.0);
    let p = model.predict_proba(x.view());
    assert!(p.iter().all(|&v| (0.0..=1.0).contains(&v)));
}

#[test]
fn test_logreg_requires_two_classes() {
    let x = array![[0.0], [1.0]];
    assert!(matches!(
        LogisticRegression::default().fit(x.view(), &[true, true]),
        Err(Error::InsufficientData(_))
    ));
    assert!(matches!(
        LogisticRegression::default().fit(x.view(), &[true]),
        Err(Error::ShapeMismatch { .. })
    ));
    assert!(matches!(
        LogisticRegression::new(Penalty::L2, 0.0).fit(x.view(), &[true, false]),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn test_logreg_balanced_weights_center_intercept() {
    // 1 positive vs 5 negatives, symmetric about zero in feature space
    let x = array![[2.0], [-2.0], [-2.0], [-2.0], [-2.0], [-2.0]];
    let y = [true, false, false, false, false, false];
    let balanced = LogisticRegression::new(Penalty::L2, 1.0).fit(x.view(), &y).unwrap();
    let unbalanced = LogisticRegression {
        balanced: false,
        ..LogisticRegression::new(Penalty::L2, 1.0)
    }
    .fit(x.view(), &y)
    .unwrap();
    assert_abs_diff_eq!(balanced.intercept(), 0.0, epsilon = 1e-3);
    assert!(unbalanced.intercept() < balanced.intercept());
}

#[test]
fn test_angle_vecs() {
    let a = array![1.0, 0.0];
    let b = array![0.0, 3.0];
    assert_abs_diff_eq!(angle_vecs(a.view(), b.view()), 90.0, epsilon = 1e-10);
    assert_abs_diff_eq!(angle_vecs(a.view(), a.view()), 0.0, epsilon = 1e-6);
    let c: Array1<f64> = -&a;
    assert_abs_diff_eq!(angle_vecs(a.view(), c.view()), 180.0, epsilon = 1e-6);
    assert!(angle_vecs(a.view(), Array1::zeros(2).view()).is_nan());
}

#[test]
fn test_mean_angle_wraps() {
    assert_abs_diff_eq!(mean_angle(&[350.0, 10.0]), 0.0, epsilon = 1e-10);
    assert_abs_diff_eq!(mean_angle(&[80.0, 100.0]), 90.0, epsilon = 1e-10);
    assert!(mean_angle(&[]).is_nan());
}
