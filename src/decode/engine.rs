//! Cross-validated decoding of every session, grouped by mouse

use super::config::{DecodeConfig, ProjectionDirection, Target};
use super::features::{extract_features, MeanOverTime, TimeReducer};
use super::folds::StratifiedKFold;
use super::geometry::angle_vecs;
use super::logreg::LogisticModel;
use super::selector::{reward_label, select_trials};
use super::table::{Partition, PredictionRow, PredictionTable, TargetValues, TrainRow, TrainTable};
use super::weights::DecoderWeights;
use crate::error::{Error, Result};
use crate::session::{mouse_list, Session, TrialCategory, DEFAULT_POST_STIM_FRAMES};
use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Prediction tables of one decoding run, keyed by mouse
#[derive(Clone, Debug, Default, Serialize)]
pub struct DecodeOutput {
    pub train: BTreeMap<String, TrainTable>,
    pub test: BTreeMap<String, PredictionTable>,
    /// Per-fold coefficients, when requested
    pub weights: Option<DecoderWeights>,
}

/// Decode all sessions with the mean-over-time reducer
pub fn train_test_all_sessions(sessions: &[Session], config: &DecodeConfig) -> Result<DecodeOutput> {
    train_test_all_sessions_with(sessions, config, &MeanOverTime)
}

/// Decode all sessions, reducing the time axis with `reducer`
///
/// Mice are processed in sorted order and each mouse's sessions in input
/// order; rows accumulate in that order, folds in order within a session.
pub fn train_test_all_sessions_with(
    sessions: &[Session],
    config: &DecodeConfig,
    reducer: &dyn TimeReducer,
) -> Result<DecodeOutput> {
    config.check()?;
    let targets = config.effective_targets();
    if config.time_points.is_none() {
        warn!(
            frames = DEFAULT_POST_STIM_FRAMES,
            "no time points given, averaging the frames after the pre-stimulus gap"
        );
    }

    let mut output = DecodeOutput {
        weights: config.return_decoder_weights.then(DecoderWeights::new),
        ..DecodeOutput::default()
    };

    for mouse in mouse_list(sessions) {
        let mut train = TrainTable::new();
        let mut test = PredictionTable::new();
        for session in sessions.iter().filter(|s| s.mouse == mouse) {
            let decoded = decode_session(session, config, &targets, reducer)?;
            train.extend(decoded.train);
            test.extend(decoded.test);
            if let (Some(store), Some(weights)) = (output.weights.as_mut(), decoded.weights) {
                store.merge(weights);
            }
        }
        output.train.insert(mouse.clone(), train);
        output.test.insert(mouse, test);
    }

    Ok(output)
}

struct SessionOutput {
    train: TrainTable,
    test: PredictionTable,
    weights: Option<DecoderWeights>,
}

/// Labels of one row of a feature matrix
#[derive(Clone, Debug)]
struct TrialMeta {
    trial: usize,
    partition: Partition,
    outcome: TrialCategory,
    decision: bool,
    stim_present: bool,
    true_stim: u32,
    reward: bool,
    autorewarded: bool,
    unrewarded_hit: bool,
}

impl TrialMeta {
    fn behaviour(session: &Session, trial: usize, outcome: TrialCategory, partition: Partition) -> Self {
        Self {
            trial,
            partition,
            outcome,
            decision: session.decision[trial],
            stim_present: session.photostim[trial] > 0,
            true_stim: session.trial_subsets[trial],
            reward: reward_label(session, trial),
            autorewarded: session.autorewarded[trial],
            unrewarded_hit: session.unrewarded_hits[trial],
        }
    }

    /// Spontaneous trials count as rewarded licks without stimulation
    fn spontaneous(trial: usize) -> Self {
        Self {
            trial,
            partition: Partition::Spontaneous,
            outcome: TrialCategory::Spont,
            decision: true,
            stim_present: false,
            true_stim: 0,
            reward: true,
            autorewarded: false,
            unrewarded_hit: false,
        }
    }

    fn label(&self, target: Target) -> bool {
        match target {
            Target::Dec => self.decision,
            Target::Stim => self.stim_present,
        }
    }

    fn prediction_row(
        &self,
        session: &str,
        fold: Option<usize>,
        pred: TargetValues,
        pred_proj: TargetValues,
        used_for_training: bool,
    ) -> PredictionRow {
        PredictionRow {
            session: session.to_string(),
            trial: self.trial,
            partition: self.partition,
            fold,
            pred,
            pred_proj,
            true_dec: self.decision,
            true_stim: self.true_stim,
            true_reward: self.reward,
            outcome: self.outcome,
            autorewarded_miss: self.autorewarded,
            unrewarded_hit: self.unrewarded_hit,
            used_for_training,
        }
    }

    fn train_row(
        &self,
        session: &str,
        fold: usize,
        pred: TargetValues,
        pred_proj: TargetValues,
        angle: Option<f64>,
    ) -> TrainRow {
        TrainRow {
            session: session.to_string(),
            trial: self.trial,
            partition: self.partition,
            fold,
            pred,
            pred_proj,
            true_dec: self.decision,
            true_stim: self.true_stim,
            true_reward: self.reward,
            outcome: self.outcome,
            autorewarded_miss: self.autorewarded,
            unrewarded_hit: self.unrewarded_hit,
            angle,
        }
    }
}

/// Feature matrices a fold's decoders are applied to
struct Populations<'a> {
    train: ArrayView2<'a, f64>,
    test: ArrayView2<'a, f64>,
    eval: ArrayView2<'a, f64>,
    spont: ArrayView2<'a, f64>,
}

struct Predictions {
    train: Array1<f64>,
    test: Array1<f64>,
    eval: Array1<f64>,
    spont: Array1<f64>,
}

impl Populations<'_> {
    fn predict(&self, model: &LogisticModel) -> Predictions {
        Predictions {
            train: model.predict_proba(self.train),
            test: model.predict_proba(self.test),
            eval: model.predict_proba(self.eval),
            spont: model.predict_proba(self.spont),
        }
    }

    /// Single-column projections onto `axis`: train, test, eval, spont
    fn project(&self, axis: ArrayView1<'_, f64>) -> [Array2<f64>; 4] {
        [self.train, self.test, self.eval, self.spont].map(|x| x.dot(&axis).insert_axis(Axis(1)))
    }
}

fn unit_vector(v: &Array1<f64>) -> Array1<f64> {
    let norm = v.dot(v).sqrt();
    if norm > 0.0 {
        v / norm
    } else {
        v.clone()
    }
}

fn values_at(targets: &[Target], columns: &[&Array1<f64>], pos: usize) -> TargetValues {
    let mut values = TargetValues::default();
    for (&target, column) in targets.iter().zip(columns) {
        values.set(target, column[pos]);
    }
    values
}

fn decode_session(
    session: &Session,
    config: &DecodeConfig,
    targets: &[Target],
    reducer: &dyn TimeReducer,
) -> Result<SessionOutput> {
    session.validate()?;
    let selection = select_trials(session, &config.selection)?;
    let neurons = session.neuron_indices(config.neurons);
    if neurons.is_empty() {
        return Err(Error::InsufficientData(format!(
            "session {}: no neurons in selection {:?}",
            session.signature, config.neurons
        )));
    }
    let frames = session.frames_for_times(config.time_points.as_deref())?;
    let spont_in_pool = config.spont_in_pool();
    let features = extract_features(session, &selection, &neurons, &frames, spont_in_pool, reducer)?;

    let mut pool_meta: Vec<TrialMeta> = selection
        .pool
        .iter()
        .map(|&i| TrialMeta::behaviour(session, i, session.outcome[i].into(), Partition::TrainTest))
        .collect();
    let spont_meta: Vec<TrialMeta> = (0..session.n_spont_trials()).map(TrialMeta::spontaneous).collect();
    let spont_meta = if spont_in_pool {
        pool_meta.extend(spont_meta);
        Vec::new()
    } else {
        spont_meta
    };
    let eval_meta: Vec<TrialMeta> = selection
        .eval_only
        .iter()
        .zip(&selection.eval_only_labels)
        .map(|(&i, &label)| TrialMeta::behaviour(session, i, label, Partition::EvalOnly))
        .collect();

    debug!(
        session = %session.signature,
        n_pool = pool_meta.len(),
        n_eval_only = eval_meta.len(),
        n_spont_separate = spont_meta.len(),
        n_neurons = neurons.len(),
        n_frames = frames.len(),
        "decoding session"
    );

    let strata: Vec<TrialCategory> = pool_meta.iter().map(|m| m.outcome).collect();
    let mut splitter = StratifiedKFold::new(config.n_splits);
    if let Some(seed) = config.shuffle_seed {
        splitter = splitter.with_shuffle(seed);
    }
    let folds = splitter.split(&strata)?;

    let estimator = config.estimator();
    let n_targets = targets.len();
    let projected = config.projection.is_some();
    let mut eval_sum = vec![Array1::<f64>::zeros(eval_meta.len()); n_targets];
    let mut eval_proj_sum = eval_sum.clone();
    let mut spont_sum = vec![Array1::<f64>::zeros(spont_meta.len()); n_targets];
    let mut spont_proj_sum = spont_sum.clone();
    let mut fold_coefs = vec![Array2::<f64>::zeros((folds.len(), neurons.len())); n_targets];

    let mut train = TrainTable::new();
    let mut test = PredictionTable::new();

    for (fold, (train_idx, test_idx)) in folds.iter().enumerate() {
        let x_train = features.pool.select(Axis(0), train_idx);
        let x_test = features.pool.select(Axis(0), test_idx);
        let labels: Vec<Vec<bool>> = targets
            .iter()
            .map(|&t| train_idx.iter().map(|&i| pool_meta[i].label(t)).collect())
            .collect();

        let models = labels
            .iter()
            .map(|y| estimator.fit(x_train.view(), y))
            .collect::<Result<Vec<_>>>()?;
        for (coefs, model) in fold_coefs.iter_mut().zip(&models) {
            coefs.row_mut(fold).assign(model.coef());
        }

        let angle = (n_targets == 2).then(|| angle_vecs(models[0].coef().view(), models[1].coef().view()));

        let population = Populations {
            train: x_train.view(),
            test: x_test.view(),
            eval: features.eval_only.view(),
            spont: if spont_in_pool {
                features.spont.slice(s![0..0, ..])
            } else {
                features.spont.view()
            },
        };
        let preds: Vec<Predictions> = models.iter().map(|m| population.predict(m)).collect();

        let proj_preds: Option<Vec<Predictions>> = match config.projection {
            None => None,
            Some(direction) => {
                let mut out = Vec::with_capacity(n_targets);
                for k in 0..n_targets {
                    let source = match direction {
                        ProjectionDirection::Same => &models[k],
                        ProjectionDirection::Different => &models[1 - k],
                    };
                    let axis = unit_vector(source.coef());
                    let [p_train, p_test, p_eval, p_spont] = population.project(axis.view());
                    let model = estimator.fit(p_train.view(), &labels[k])?;
                    let projected_population = Populations {
                        train: p_train.view(),
                        test: p_test.view(),
                        eval: p_eval.view(),
                        spont: p_spont.view(),
                    };
                    out.push(projected_population.predict(&model));
                }
                Some(out)
            }
        };

        let train_cols: Vec<&Array1<f64>> = preds.iter().map(|p| &p.train).collect();
        let test_cols: Vec<&Array1<f64>> = preds.iter().map(|p| &p.test).collect();
        let train_proj_cols: Option<Vec<&Array1<f64>>> =
            proj_preds.as_ref().map(|pp| pp.iter().map(|p| &p.train).collect());
        let test_proj_cols: Option<Vec<&Array1<f64>>> =
            proj_preds.as_ref().map(|pp| pp.iter().map(|p| &p.test).collect());

        for (pos, &i) in train_idx.iter().enumerate() {
            let pred_proj = train_proj_cols
                .as_deref()
                .map(|cols| values_at(targets, cols, pos))
                .unwrap_or_default();
            train.push(pool_meta[i].train_row(
                &session.signature,
                fold,
                values_at(targets, &train_cols, pos),
                pred_proj,
                angle,
            ));
        }
        for (pos, &i) in test_idx.iter().enumerate() {
            let pred_proj = test_proj_cols
                .as_deref()
                .map(|cols| values_at(targets, cols, pos))
                .unwrap_or_default();
            test.push(pool_meta[i].prediction_row(
                &session.signature,
                Some(fold),
                values_at(targets, &test_cols, pos),
                pred_proj,
                true,
            ));
        }

        for k in 0..n_targets {
            eval_sum[k] += &preds[k].eval;
            spont_sum[k] += &preds[k].spont;
            if let Some(pp) = &proj_preds {
                eval_proj_sum[k] += &pp[k].eval;
                spont_proj_sum[k] += &pp[k].spont;
            }
        }
    }

    // Evaluation-only and separate spontaneous trials: mean over folds
    let n_folds = folds.len() as f64;
    let held_out = [
        (&eval_meta, &eval_sum, &eval_proj_sum),
        (&spont_meta, &spont_sum, &spont_proj_sum),
    ];
    for (metas, sums, proj_sums) in held_out {
        let means: Vec<Array1<f64>> = sums.iter().map(|s| s / n_folds).collect();
        let proj_means: Vec<Array1<f64>> = proj_sums.iter().map(|s| s / n_folds).collect();
        let cols: Vec<&Array1<f64>> = means.iter().collect();
        let proj_cols: Vec<&Array1<f64>> = proj_means.iter().collect();
        for (pos, meta) in metas.iter().enumerate() {
            let pred_proj = if projected {
                values_at(targets, &proj_cols, pos)
            } else {
                TargetValues::default()
            };
            test.push(meta.prediction_row(
                &session.signature,
                None,
                values_at(targets, &cols, pos),
                pred_proj,
                false,
            ));
        }
    }

    let weights = config.return_decoder_weights.then(|| {
        let mut weights = DecoderWeights::new();
        for (&target, coefs) in targets.iter().zip(fold_coefs) {
            weights.insert(target, &session.signature, coefs);
        }
        weights
    });

    Ok(SessionOutput {
        train,
        test,
        weights,
    })
}
