use super::*;
use crate::decode::{Partition, PredictionRow, TargetValues};
use crate::session::TrialCategory;
use crate::testutil::standard_session;

fn row(trial: usize) -> PredictionRow {
    PredictionRow {
        session: "s".into(),
        trial,
        partition: Partition::TrainTest,
        fold: Some(0),
        pred: TargetValues {
            dec: Some(0.7),
            stim: None,
        },
        pred_proj: TargetValues::default(),
        true_dec: true,
        true_stim: 0,
        true_reward: true,
        outcome: TrialCategory::Fp,
        autorewarded_miss: false,
        unrewarded_hit: false,
        used_for_training: true,
    }
}

fn table(n: usize) -> PredictionTable {
    (0..n).map(row).collect()
}

fn grid(counts: &[(&str, usize)], time_points: &[f64]) -> RegionTimeTables {
    Region::BOTH
        .iter()
        .map(|&region| {
            let slices = time_points
                .iter()
                .map(|&time_point| TimeSlice {
                    time_point,
                    per_mouse: counts.iter().map(|&(m, n)| (m.to_string(), table(n))).collect(),
                })
                .collect();
            (region, slices)
        })
        .collect()
}

#[test]
fn test_long_table_order_and_tags() {
    let long = make_violin_df_custom(&grid(&[("b", 2), ("a", 3)], &[1.0, 4.0]), false).unwrap();
    assert_eq!(long.len(), 2);
    assert_eq!(long[1].time_point, 4.0);

    let rows = &long[0].rows;
    assert_eq!(rows.len(), 10);
    let tags: Vec<(&str, &str)> = rows.iter().map(|r| (r.region.as_str(), r.mouse.as_str())).collect();
    assert_eq!(tags[0], ("S1", "a"));
    assert_eq!(tags[3], ("S1", "b"));
    assert_eq!(tags[5], ("S2", "a"));
    assert_eq!(tags[9], ("S2", "b"));
    assert!(rows.iter().filter(|r| r.mouse == "a").all(|r| r.n_trials_mouse == 3));
    assert_eq!(rows[1].row.trial, 1);
}

#[test]
fn test_normalisation_equalises_mice() {
    let long = make_violin_df_custom(&grid(&[("a", 100), ("b", 400)], &[1.0]), true).unwrap();
    let table = &long[0];
    // round(10000 / 100) = 100 copies, round(10000 / 400) = 25 copies, per region
    assert_eq!(table.count_mouse("a"), 2 * 100 * 100);
    assert_eq!(table.count_mouse("b"), 2 * 400 * 25);
    assert_eq!(table.count_region(Region::S2), 10000 + 10000);
    assert!(table.rows.iter().all(|r| r.n_trials_mouse == 100 || r.n_trials_mouse == 400));
}

#[test]
fn test_normalisation_rejects_large_mice() {
    let result = make_violin_df_custom(&grid(&[("a", 100), ("big", 1200)], &[1.0]), true);
    assert!(matches!(result, Err(Error::InsufficientData(_))));
    // Without normalisation the same grid is fine
    assert!(make_violin_df_custom(&grid(&[("big", 1200)], &[1.0]), false).is_ok());
}

#[test]
fn test_irregular_grid_is_rejected() {
    let mut tables = grid(&[("a", 3)], &[1.0, 4.0]);
    tables.get_mut(&Region::S2).unwrap().pop();
    assert!(matches!(
        make_violin_df_custom(&tables, false),
        Err(Error::ShapeMismatch { .. })
    ));

    let mut tables = grid(&[("a", 3)], &[1.0]);
    tables.get_mut(&Region::S2).unwrap()[0]
        .per_mouse
        .insert("z".into(), table(2));
    assert!(matches!(
        make_violin_df_custom(&tables, false),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn test_empty_grid() {
    assert!(make_violin_df_custom(&RegionTimeTables::new(), true).unwrap().is_empty());
}

#[test]
fn test_tagged_row_serializes_flat() {
    let tagged = TaggedRow {
        region: "S1".into(),
        mouse: "m1".into(),
        time_point: 1.0,
        n_trials_mouse: 3,
        row: row(4),
    };
    let json = serde_json::to_value(&tagged).unwrap();
    assert_eq!(json["region"], "S1");
    assert_eq!(json["trial"], 4);
    assert_eq!(json["outcome"], "fp");
}

#[test]
fn test_decoder_data_for_violin_plots() {
    let sessions = vec![standard_session("m1", "m1_r1", 3), standard_session("m2", "m2_r1", 4)];
    let times = sessions[0].filter_ps_time[6..8].to_vec();
    let long = get_decoder_data_for_violin_plots(&sessions, &DecodeConfig::default(), &times).unwrap();

    assert_eq!(long.len(), 2);
    // 100 behaviour + 10 spontaneous rows per mouse, replicated round(10000 / 110) = 91 times
    let table = &long[0];
    assert_eq!(table.count_mouse("m1"), 2 * 110 * 91);
    assert_eq!(table.count_region(Region::S1), table.count_region(Region::S2));
    assert!(table.rows.iter().all(|r| r.n_trials_mouse == 110));
}
