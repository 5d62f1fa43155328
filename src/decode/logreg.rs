//! Binary logistic regression with class-balanced weights
//!
//! # Objective
//!
//! With sample weights `s_i` summing to `S`:
//!
//! ```text
//! J(w, b) = (1/S) Σ s_i [softplus(z_i) - y_i z_i] + R(w),   z_i = x_i·w + b
//! R(w) = ||w||² / (2 C S)   (L2)
//!      = ||w||₁ / (C S)     (L1)
//!      = 0                  (None)
//! ```
//!
//! which has the same minimiser as `C Σ s_i loss_i + penalty(w)`. The
//! intercept is never penalised. Smooth objectives are minimised with
//! L-BFGS, the L1 objective with FISTA.

use crate::error::{Error, Result};
use ndarray::{s, Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::warn;

/// Regularisation applied to the coefficients
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Penalty {
    #[default]
    L2,
    L1,
    None,
}

/// Logistic regression estimator
#[derive(Clone, Debug, PartialEq)]
pub struct LogisticRegression {
    pub penalty: Penalty,
    /// Inverse regularisation strength
    pub c: f64,
    /// Weight samples by `n / (2 n_class)`
    pub balanced: bool,
    pub max_iter: usize,
    /// Stop once the gradient infinity norm (or the FISTA step) falls below this
    pub tol: f64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            penalty: Penalty::L2,
            c: 1.0,
            balanced: true,
            max_iter: 100,
            tol: 1e-4,
        }
    }
}

/// Fitted coefficients of a [`LogisticRegression`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    coef: Array1<f64>,
    intercept: f64,
}

impl LogisticModel {
    pub fn new(coef: Array1<f64>, intercept: f64) -> Self {
        Self { coef, intercept }
    }

    pub fn coef(&self) -> &Array1<f64> {
        &self.coef
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Linear predictor `x·w + b` per row
    pub fn decision_function(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        x.dot(&self.coef) + self.intercept
    }

    /// Probability of the positive class per row
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        self.decision_function(x).mapv(sigmoid)
    }
}

/// Numerically stable sigmoid
pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// softplus(z) - y z, computed without overflow
fn stable_loss(z: f64, y: f64) -> f64 {
    z.max(0.0) - z * y + (-z.abs()).exp().ln_1p()
}

impl LogisticRegression {
    pub fn new(penalty: Penalty, c: f64) -> Self {
        Self {
            penalty,
            c,
            ..Self::default()
        }
    }

    /// Fit on `x` (samples x features) against boolean labels
    pub fn fit(&self, x: ArrayView2<'_, f64>, y: &[bool]) -> Result<LogisticModel> {
        if x.nrows() != y.len() {
            return Err(Error::ShapeMismatch {
                context: "logistic regression labels".into(),
                expected: vec![x.nrows()],
                actual: vec![y.len()],
            });
        }
        if !(self.c > 0.0) {
            return Err(Error::InvalidParameter(format!("C must be positive, got {}", self.c)));
        }
        let n_pos = y.iter().filter(|&&v| v).count();
        let n_neg = y.len() - n_pos;
        if n_pos == 0 || n_neg == 0 {
            return Err(Error::InsufficientData(format!(
                "logistic regression needs both classes, got {n_pos} positive and {n_neg} negative samples"
            )));
        }

        let n = y.len() as f64;
        let sample_weight: Array1<f64> = y
            .iter()
            .map(|&v| {
                if !self.balanced {
                    1.0
                } else if v {
                    n / (2.0 * n_pos as f64)
                } else {
                    n / (2.0 * n_neg as f64)
                }
            })
            .collect();
        let total_weight = sample_weight.sum();

        let objective = Objective {
            x,
            y: y.iter().map(|&v| if v { 1.0 } else { 0.0 }).collect(),
            sample_weight,
            total_weight,
            l2: match self.penalty {
                Penalty::L2 => 1.0 / (self.c * total_weight),
                Penalty::L1 | Penalty::None => 0.0,
            },
        };

        let theta0 = Array1::zeros(x.ncols() + 1);
        let theta = match self.penalty {
            Penalty::L2 | Penalty::None => lbfgs(&objective, theta0, self.max_iter, self.tol),
            Penalty::L1 => fista(
                &objective,
                theta0,
                1.0 / (self.c * total_weight),
                self.max_iter * 10,
                self.tol,
            ),
        };

        let p = x.ncols();
        Ok(LogisticModel {
            coef: theta.slice(s![..p]).to_owned(),
            intercept: theta[p],
        })
    }
}

/// Weighted mean logistic loss plus optional L2 term; parameters are `[w, b]`
struct Objective<'a> {
    x: ArrayView2<'a, f64>,
    y: Array1<f64>,
    sample_weight: Array1<f64>,
    total_weight: f64,
    l2: f64,
}

impl Objective<'_> {
    fn n_features(&self) -> usize {
        self.x.ncols()
    }

    fn linear(&self, theta: &Array1<f64>) -> Array1<f64> {
        let p = self.n_features();
        self.x.dot(&theta.slice(s![..p])) + theta[p]
    }

    fn value(&self, theta: &Array1<f64>) -> f64 {
        let z = self.linear(theta);
        let data: f64 = z
            .iter()
            .zip(self.y.iter())
            .zip(self.sample_weight.iter())
            .map(|((&z, &y), &s)| s * stable_loss(z, y))
            .sum();
        data / self.total_weight + self.l2_term(theta)
    }

    fn value_grad(&self, theta: &Array1<f64>) -> (f64, Array1<f64>) {
        let p = self.n_features();
        let z = self.linear(theta);

        let mut value = 0.0;
        let mut residual = Array1::zeros(z.len());
        for i in 0..z.len() {
            let s = self.sample_weight[i];
            value += s * stable_loss(z[i], self.y[i]);
            residual[i] = s * (sigmoid(z[i]) - self.y[i]) / self.total_weight;
        }
        value = value / self.total_weight + self.l2_term(theta);

        let mut grad = Array1::zeros(p + 1);
        grad.slice_mut(s![..p])
            .assign(&(self.x.t().dot(&residual) + &theta.slice(s![..p]) * self.l2));
        grad[p] = residual.sum();
        (value, grad)
    }

    fn l2_term(&self, theta: &Array1<f64>) -> f64 {
        if self.l2 == 0.0 {
            return 0.0;
        }
        let w = theta.slice(s![..self.n_features()]);
        0.5 * self.l2 * w.dot(&w)
    }
}

const LBFGS_HISTORY: usize = 10;
const ARMIJO_C1: f64 = 1e-4;
const MAX_LINE_SEARCH: usize = 50;

fn inf_norm(v: ArrayView1<'_, f64>) -> f64 {
    v.iter().fold(0.0, |m, x| m.max(x.abs()))
}

/// Limited-memory BFGS with Armijo backtracking
fn lbfgs(objective: &Objective<'_>, mut theta: Array1<f64>, max_iter: usize, tol: f64) -> Array1<f64> {
    let mut history: VecDeque<(Array1<f64>, Array1<f64>, f64)> = VecDeque::with_capacity(LBFGS_HISTORY);
    let (mut value, mut grad) = objective.value_grad(&theta);

    for _ in 0..max_iter {
        if inf_norm(grad.view()) < tol {
            return theta;
        }

        // Two-loop recursion
        let mut q = grad.clone();
        let mut alphas = Vec::with_capacity(history.len());
        for (s, y, rho) in history.iter().rev() {
            let alpha = rho * s.dot(&q);
            q.scaled_add(-alpha, y);
            alphas.push(alpha);
        }
        if let Some((s, y, _)) = history.back() {
            q *= s.dot(y) / y.dot(y);
        }
        for ((s, y, rho), alpha) in history.iter().zip(alphas.into_iter().rev()) {
            let beta = rho * y.dot(&q);
            q.scaled_add(alpha - beta, s);
        }
        let mut direction = -q;

        let mut slope = grad.dot(&direction);
        if slope >= 0.0 {
            history.clear();
            direction = -&grad;
            slope = grad.dot(&direction);
        }

        let mut step = if history.is_empty() {
            1.0 / inf_norm(grad.view()).max(1.0)
        } else {
            1.0
        };
        let mut accepted = None;
        for _ in 0..MAX_LINE_SEARCH {
            let candidate = &theta + &(&direction * step);
            let candidate_value = objective.value(&candidate);
            if candidate_value <= value + ARMIJO_C1 * step * slope {
                accepted = Some((candidate, candidate_value));
                break;
            }
            step *= 0.5;
        }
        let Some((next, _)) = accepted else {
            // No decrease along the search direction
            return theta;
        };

        let (next_value, next_grad) = objective.value_grad(&next);
        let s = &next - &theta;
        let y = &next_grad - &grad;
        let sy = s.dot(&y);
        if sy > 1e-10 {
            if history.len() == LBFGS_HISTORY {
                history.pop_front();
            }
            history.push_back((s, y, 1.0 / sy));
        }

        theta = next;
        value = next_value;
        grad = next_grad;
    }

    if inf_norm(grad.view()) >= tol {
        warn!(max_iter, "lbfgs failed to converge");
    }
    theta
}

/// FISTA with backtracking for the L1-penalised objective
///
/// The intercept (last parameter) is excluded from soft-thresholding.
fn fista(objective: &Objective<'_>, mut theta: Array1<f64>, l1: f64, max_iter: usize, tol: f64) -> Array1<f64> {
    let p = objective.n_features();
    let prox = |v: &Array1<f64>, threshold: f64| -> Array1<f64> {
        let mut out = v.clone();
        for w in out.slice_mut(s![..p]).iter_mut() {
            *w = w.signum() * (w.abs() - threshold).max(0.0);
        }
        out
    };

    let mut momentum_point = theta.clone();
    let mut t = 1.0_f64;
    let mut lipschitz = 1.0_f64;

    for _ in 0..max_iter {
        let (value, grad) = objective.value_grad(&momentum_point);

        let mut next;
        loop {
            next = prox(&(&momentum_point - &(&grad / lipschitz)), l1 / lipschitz);
            let diff = &next - &momentum_point;
            let bound = value + grad.dot(&diff) + 0.5 * lipschitz * diff.dot(&diff);
            if objective.value(&next) <= bound + 1e-12 || lipschitz > 1e12 {
                break;
            }
            lipschitz *= 2.0;
        }

        let t_next = 0.5 * (1.0 + (1.0 + 4.0 * t * t).sqrt());
        let change = &next - &theta;
        momentum_point = &next + &(&change * ((t - 1.0) / t_next));
        t = t_next;

        let converged = inf_norm(change.view()) < tol * inf_norm(theta.view()).max(1.0);
        theta = next;
        if converged {
            return theta;
        }
    }

    warn!(max_iter, "fista failed to converge");
    theta
}
