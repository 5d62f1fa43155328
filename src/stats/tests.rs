use super::*;
use crate::error::Error;
use approx::assert_abs_diff_eq;
use ndarray::array;

#[test]
fn test_normal_cdf() {
    assert_abs_diff_eq!(erf(0.0), 0.0, epsilon = 1e-7);
    assert_abs_diff_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-7);
    assert_abs_diff_eq!(normal_cdf(1.96), 0.975, epsilon = 1e-4);
    assert_abs_diff_eq!(normal_cdf(-1.96), 0.025, epsilon = 1e-4);
}

#[test]
fn test_signed_rank_exact_all_positive() {
    let x = [2.0, 4.0, 6.0, 8.0, 10.0];
    let y = [1.0, 2.0, 3.0, 4.0, 5.0];
    let result = signed_rank(&x, &y);
    assert!(result.exact);
    assert_eq!(result.statistic, 0.0);
    assert_abs_diff_eq!(result.p_value, 0.0625, epsilon = 1e-12);
}

#[test]
fn test_signed_rank_exact_mixed_signs() {
    let x = [1.0, -2.0, 3.0, 4.0, 5.0];
    let y = [0.0; 5];
    let result = signed_rank(&x, &y);
    assert_eq!(result.statistic, 2.0);
    assert_abs_diff_eq!(result.p_value, 0.1875, epsilon = 1e-12);
}

#[test]
fn test_signed_rank_drops_zero_differences() {
    let x = [1.0, 2.0, 3.0, 4.0, 5.0, 7.0];
    let y = [0.0, 0.0, 0.0, 0.0, 0.0, 7.0];
    let result = signed_rank(&x, &y);
    assert_eq!(result.n, 5);
    assert_abs_diff_eq!(result.p_value, 0.0625, epsilon = 1e-12);
}

#[test]
fn test_signed_rank_ties_use_normal_approximation() {
    let x = [1.0, 1.0, 2.0, 2.0, -3.0];
    let result = signed_rank(&x, &[0.0; 5]);
    assert!(!result.exact);
    assert_eq!(result.statistic, 5.0);
    assert_abs_diff_eq!(result.p_value, 0.4963, epsilon = 1e-3);

    let symmetric = signed_rank(&[1.0, -1.0], &[0.0, 0.0]);
    assert_abs_diff_eq!(symmetric.p_value, 1.0, epsilon = 1e-9);
}

#[test]
fn test_signed_rank_no_differences() {
    let result = signed_rank(&[1.0, 2.0], &[1.0, 2.0]);
    assert_eq!(result.n, 0);
    assert!(result.p_value.is_nan());
}

#[test]
fn test_signed_rank_nan_input() {
    let result = signed_rank(&[0.9, f64::NAN, 0.7], &[0.5, 0.5, 0.5]);
    assert!(result.p_value.is_nan());
    assert!(result.statistic.is_nan());
}

fn curves() -> BTreeMap<String, Array2<f64>> {
    let mut acc = BTreeMap::new();
    for (i, mouse) in ["PB_191", "PB_192", "RL_100", "RL_101", "J1"].iter().enumerate() {
        let offset = i as f64 * 0.01;
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
        acc.insert(
            format!("{mouse}_s1"),
            array![[0.8 + offset, 0.05], [0.6 + sign * (0.1 + offset), 0.05]],
        );
        acc.insert(
            format!("{mouse}_s2"),
            array![[0.6, 0.05], [0.6, 0.05]],
        );
    }
    acc
}

#[test]
fn test_wilcoxon_test_per_time_point() {
    let p = wilcoxon_test(&curves()).unwrap();
    assert_eq!(p.len(), 2);
    // S1 above S2 for every mouse
    assert_abs_diff_eq!(p[0], 0.0625, epsilon = 1e-12);
    // Mixed signs: no evidence
    assert!(p[1] > 0.5);
}

#[test]
fn test_wilcoxon_test_nan_time_point() {
    let mut acc = curves();
    // mouse without an estimate at the second time point
    acc.get_mut("RL_100_s2").unwrap()[[1, 0]] = f64::NAN;
    let p = wilcoxon_test(&acc).unwrap();
    assert_abs_diff_eq!(p[0], 0.0625, epsilon = 1e-12);
    assert!(p[1].is_nan());
}

#[test]
fn test_wilcoxon_test_accepts_one_dimensional_curves() {
    let acc: BTreeMap<String, Vec<f64>> = curves()
        .into_iter()
        .map(|(k, v)| (k, v.column(0).to_vec()))
        .collect();
    let p = wilcoxon_test(&acc).unwrap();
    assert_abs_diff_eq!(p[0], 0.0625, epsilon = 1e-12);
}

#[test]
fn test_wilcoxon_test_key_errors() {
    let mut acc = curves();
    acc.insert("badkey".into(), array![[0.5, 0.0], [0.5, 0.0]]);
    assert!(matches!(wilcoxon_test(&acc), Err(Error::InvalidKey(_))));

    let mut acc = curves();
    acc.insert("m9_s3".into(), array![[0.5, 0.0], [0.5, 0.0]]);
    assert!(matches!(wilcoxon_test(&acc), Err(Error::InvalidKey(_))));

    let mut acc = curves();
    acc.remove("J1_s2");
    match wilcoxon_test(&acc) {
        Err(Error::MissingPair { mouse, region }) => {
            assert_eq!(mouse, "J1");
            assert_eq!(region, "s2");
        }
        other => panic!("expected missing pair, got {other:?}"),
    }
}

#[test]
fn test_parse_mouse_region() {
    assert_eq!(parse_mouse_region("PB_191_s2").unwrap(), ("PB_191", Region::S2));
    assert!(parse_mouse_region("_s1").is_err());
}
