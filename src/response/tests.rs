use super::*;
use crate::session::create_tp_dict;
use crate::testutil::standard_session;
use approx::assert_abs_diff_eq;

/// Baseline activity 0.5, post-stimulus activity 2.0 plus 0.1 per neuron
fn step_session() -> Session {
    let mut session = standard_session("m1", "m1_r1", 11);
    let times = session.filter_ps_time.clone();
    let fill = |tensor: &mut Array3<f64>| {
        for ((n, _, f), v) in tensor.indexed_iter_mut() {
            *v = if times[f] > 1e-9 { 2.0 + 0.1 * n as f64 } else { 0.5 };
        }
    };
    fill(&mut session.behaviour_trials);
    fill(&mut session.pre_rew_trials);
    session.unrewarded_hits[0] = true;
    session.autorewarded[2] = true;
    session.photostim[1] = STIM_150_CLASS;
    session
}

#[test]
fn test_fixed_window_difference() {
    let session = step_session();
    let query = ResponseQuery::new(
        ResponseTrialType::Cr,
        Region::S1,
        PostWindow::Fixed { duration: 1.0 },
    );
    let per_trial = response_difference(&session, &query).unwrap();
    assert_eq!(per_trial.len(), 20);
    // S1 neurons 0..5 add 0.0..0.4, mean 0.2
    for d in &per_trial {
        assert_abs_diff_eq!(*d, 1.7, epsilon = 1e-12);
    }

    let s2 = ResponseQuery { region: Region::S2, ..query };
    assert_abs_diff_eq!(
        mean_response_difference(&session, &s2).unwrap().unwrap(),
        2.2,
        epsilon = 1e-12
    );
}

#[test]
fn test_trial_type_filters() {
    let session = step_session();
    let count = |trial_type| {
        let query = ResponseQuery::new(trial_type, Region::S1, PostWindow::TimePoint(0.4));
        response_difference(&session, &query).unwrap().len()
    };
    assert_eq!(count(ResponseTrialType::Hit), 39);
    assert_eq!(count(ResponseTrialType::UrHit), 1);
    assert_eq!(count(ResponseTrialType::Miss), 19);
    assert_eq!(count(ResponseTrialType::ArMiss), 1);
    // One false positive is a 150-cell stimulation
    assert_eq!(count(ResponseTrialType::Fp), 19);
    assert_eq!(count(ResponseTrialType::Cr), 20);
    assert_eq!(count(ResponseTrialType::SpontRew), 10);
}

#[test]
fn test_time_point_window_includes_onset_in_baseline() {
    let session = step_session();
    let at = |time_point: f64| {
        let query = ResponseQuery::new(ResponseTrialType::Hit, Region::S1, PostWindow::TimePoint(time_point));
        mean_response_difference(&session, &query).unwrap().unwrap()
    };
    let onset = session.filter_ps_time[4];
    assert_abs_diff_eq!(at(onset), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(at(session.filter_ps_time[6]), 1.7, epsilon = 1e-12);
}

#[test]
fn test_missing_trials_and_time_points() {
    let mut session = step_session();
    session.unrewarded_hits[0] = false;
    let query = ResponseQuery::new(ResponseTrialType::UrHit, Region::S1, PostWindow::TimePoint(0.4));
    assert!(response_difference(&session, &query).unwrap().is_empty());
    assert_eq!(mean_response_difference(&session, &query).unwrap(), None);

    let query = ResponseQuery::new(ResponseTrialType::Hit, Region::S1, PostWindow::TimePoint(9.0));
    assert!(matches!(
        response_difference(&session, &query),
        Err(Error::TimePointNotFound { .. })
    ));
}

#[test]
fn test_create_df_differences() {
    let records = create_df_differences(&[step_session()]).unwrap();
    assert_eq!(records.len(), 8);
    assert_eq!(records[0].region, "S1");
    assert_eq!(records[0].trial_type, ResponseTrialType::Hit);
    assert_eq!(records[4].region, "S2");
    assert!(records.iter().all(|r| r.time_point.is_none() && r.trial_id.is_none()));
}

#[test]
fn test_create_df_dyn_differences_numbers_trials() {
    let session = step_session();
    let axes = create_tp_dict(std::slice::from_ref(&session));
    let records = create_df_dyn_differences(&[session], &axes).unwrap();

    let per_block = 39 + 19 + 19 + 20 + 1 + 1;
    assert_eq!(records.len(), 12 * 2 * per_block);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.trial_id, Some(i + 1));
    }
    assert_eq!(records[0].time_point, Some(axes.mutual[0]));
    assert_eq!(records[per_block].region, "S2");
}
