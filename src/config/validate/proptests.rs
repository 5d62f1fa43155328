//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;
use crate::decode::DecodeConfig;
use crate::sweep::SweepConfig;
use proptest::prelude::*;
use std::path::PathBuf;

fn arb_valid_spec() -> impl Strategy<Value = AnalysisSpec> {
    (
        2usize..10,                                   // n_splits
        1e-4f64..100.0,                               // c_value
        1e-4f64..10.0,                                // regularizer
        proptest::collection::vec(-2.0f64..5.0, 1..8), // time_points
    )
        .prop_map(|(n_splits, c_value, regularizer, time_points)| AnalysisSpec {
            sessions: vec![PathBuf::from("session.json")],
            decode: DecodeConfig {
                n_splits,
                c_value,
                ..Default::default()
            },
            sweep: SweepConfig {
                time_points,
                regularizer,
                ..Default::default()
            },
            output: OutputSpec::default(),
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_spec_passes(spec in arb_valid_spec()) {
        prop_assert!(validate_config(&spec).is_ok());
    }

    #[test]
    fn prop_single_fold_fails(spec in arb_valid_spec(), n_splits in 0usize..2) {
        let mut spec = spec;
        spec.decode.n_splits = n_splits;
        prop_assert!(matches!(
            validate_config(&spec),
            Err(ValidationError::InvalidFolds(_))
        ));
    }

    #[test]
    fn prop_non_positive_c_fails(spec in arb_valid_spec(), c in -10.0f64..=0.0) {
        let mut spec = spec;
        spec.decode.c_value = c;
        prop_assert!(matches!(
            validate_config(&spec),
            Err(ValidationError::InvalidCValue(_))
        ));
    }

    #[test]
    fn prop_non_positive_regularizer_fails(spec in arb_valid_spec(), c in -10.0f64..=0.0) {
        let mut spec = spec;
        spec.sweep.regularizer = c;
        prop_assert!(matches!(
            validate_config(&spec),
            Err(ValidationError::InvalidRegularizer(_))
        ));
    }

    #[test]
    fn prop_yaml_roundtrip_preserves_spec(spec in arb_valid_spec()) {
        let yaml = serde_yaml::to_string(&spec).unwrap();
        let parsed: AnalysisSpec = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed.decode.n_splits, spec.decode.n_splits);
        prop_assert_eq!(parsed.sweep.time_points.len(), spec.sweep.time_points.len());
    }
}
