//! End-to-end analysis through the public API

mod common;

use optodec::config::{load_config, load_spec_sessions};
use optodec::reshape::make_violin_df_custom;
use optodec::response::{create_df_differences, ResponseTrialType};
use optodec::session::Region;
use optodec::stats::wilcoxon_test;
use optodec::sweep::{run_sweep, Measure, Split};
use std::collections::BTreeMap;
use std::fs;

fn write_workspace(per_mouse: bool) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let a = common::session("m1", "m1_r1", 11);
    let b = common::session("m2", "m2_r1", 12);
    common::write_session(dir.path(), &a);
    common::write_session(dir.path(), &b);

    let times = &a.filter_ps_time[5..8];
    let yaml = format!(
        "sessions:\n  - m1_r1.json\n  - m2_r1.json\nsweep:\n  time_points: [{}, {}, {}]\n  regularizer: 1.0\n  per_mouse: {per_mouse}\n",
        times[0], times[1], times[2]
    );
    let config = dir.path().join("analysis.yaml");
    fs::write(&config, yaml).unwrap();
    (dir, config)
}

#[test]
fn test_pooled_sweep_from_config() {
    let (_dir, config) = write_workspace(false);
    let spec = load_config(&config).unwrap();
    let sessions = load_spec_sessions(&spec).unwrap();
    assert_eq!(sessions.len(), 2);

    let result = run_sweep(&sessions, &spec.decode, &spec.sweep).unwrap();
    assert_eq!(result.time_points.len(), 3);

    let curves = result.curve(Measure::DecAccuracy, Split::All);
    assert_eq!(curves.len(), 2);
    let s1 = &curves["s1"];
    assert_eq!(s1.dim(), (3, 2));
    for value in s1.column(0) {
        assert!(*value > 0.6, "S1 should decode the lick decision, got {value}");
    }

    let baseline = result.curve(Measure::DecBaseline, Split::All);
    assert!(baseline["s2"].column(0).iter().all(|v| (*v - 0.5).abs() < 1e-12));
}

#[test]
fn test_per_mouse_sweep_feeds_wilcoxon() {
    let (_dir, config) = write_workspace(true);
    let spec = load_config(&config).unwrap();
    let sessions = load_spec_sessions(&spec).unwrap();

    let result = run_sweep(&sessions, &spec.decode, &spec.sweep).unwrap();
    let curves = result.curve(Measure::DecAccuracy, Split::All);
    let keys: Vec<&str> = curves.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["m1_s1", "m1_s2", "m2_s1", "m2_s2"]);

    let p_values = wilcoxon_test(&curves).unwrap();
    assert_eq!(p_values.len(), 3);
    for p in p_values {
        assert!(p.is_nan() || (0.0..=1.0).contains(&p));
    }
}

#[test]
fn test_response_differences_from_loaded_sessions() {
    let (_dir, config) = write_workspace(false);
    let spec = load_config(&config).unwrap();
    let sessions = load_spec_sessions(&spec).unwrap();

    let records = create_df_differences(&sessions).unwrap();
    assert!(!records.is_empty());
    assert!(records.iter().all(|r| r.diff_dff.is_finite()));
    assert!(records
        .iter()
        .any(|r| r.trial_type == ResponseTrialType::Hit && r.region == "S1"));
}

#[test]
fn test_empty_violin_input() {
    let tables = BTreeMap::<Region, Vec<_>>::new();
    assert!(make_violin_df_custom(&tables, true).unwrap().is_empty());
}
