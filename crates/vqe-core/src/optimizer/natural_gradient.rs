//! Quantum natural gradient descent.
//!
//! Preconditions the Euclidean gradient with the inverse of the
//! Fubini-Study metric tensor g(θ) supplied by the objective:
//!
//!   θ' = θ − η (g(θ) + λI)⁻¹ ∇f(θ)
//!
//! The system is solved by LU decomposition. When g + λI is singular (a
//! parameter the state does not depend on, with λ = 0) the Moore-Penrose
//! pseudo-inverse is used instead, which leaves such directions untouched.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{UpdateRule, ensure_len};
use crate::error::{VqeError, VqeResult};
use crate::objective::{MetricApproximation, Objective};

/// Singular values below this are treated as zero by the pseudo-inverse.
pub const PSEUDO_INVERSE_EPS: f64 = 1e-10;

/// Natural gradient descent with a fixed step size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NaturalGradient {
    /// Step size η.
    pub step_size: f64,
    /// Metric tensor approximation requested from the objective.
    pub approximation: MetricApproximation,
    /// Regularizer λ added to the metric diagonal.
    pub lam: f64,
}

impl NaturalGradient {
    /// Create a rule with block-diagonal metric and no regularization.
    pub fn new(step_size: f64) -> Self {
        Self {
            step_size,
            approximation: MetricApproximation::BlockDiagonal,
            lam: 0.0,
        }
    }

    /// Set the metric approximation.
    #[must_use]
    pub fn with_approximation(mut self, approximation: MetricApproximation) -> Self {
        self.approximation = approximation;
        self
    }

    /// Set the regularizer λ.
    #[must_use]
    pub fn with_lam(mut self, lam: f64) -> Self {
        self.lam = lam;
        self
    }

    /// Solve `(metric + λI) x = grad`.
    fn precondition(&self, mut metric: DMatrix<f64>, grad: &[f64]) -> VqeResult<DVector<f64>> {
        let n = grad.len();
        for i in 0..n {
            metric[(i, i)] += self.lam;
        }
        let rhs = DVector::from_column_slice(grad);

        if let Some(x) = metric.clone().lu().solve(&rhs) {
            if x.iter().all(|v| v.is_finite()) {
                return Ok(x);
            }
        }

        debug!(n, "metric tensor singular, falling back to pseudo-inverse");
        let pinv = metric
            .pseudo_inverse(PSEUDO_INVERSE_EPS)
            .map_err(|e| VqeError::SingularMetric(e.to_string()))?;
        Ok(pinv * rhs)
    }
}

impl UpdateRule for NaturalGradient {
    fn step(&mut self, objective: &mut dyn Objective, params: &[f64]) -> VqeResult<Vec<f64>> {
        let n = params.len();
        let grad = objective.gradient(params)?;
        ensure_len(n, grad.len())?;

        let metric = objective.metric_tensor(params, self.approximation)?;
        ensure_len(n, metric.nrows())?;
        ensure_len(n, metric.ncols())?;
        trace!(?grad, approximation = ?self.approximation, "natural gradient step");

        let direction = self.precondition(metric, &grad)?;
        Ok(params
            .iter()
            .zip(direction.iter())
            .map(|(p, d)| p - self.step_size * d)
            .collect())
    }

    fn name(&self) -> &str {
        "QNGOptimizer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::FnObjective;

    fn quadratic() -> FnObjective<impl FnMut(&[f64]) -> f64> {
        FnObjective::new(|x: &[f64]| x[0] * x[0] + x[1] * x[1])
            .with_gradient(|x| vec![2.0 * x[0], 2.0 * x[1]])
    }

    #[test]
    fn identity_metric_matches_gradient_descent() {
        let mut f = quadratic().with_metric(|_| DMatrix::identity(2, 2));
        let mut qng = NaturalGradient::new(0.1);
        let next = qng.step(&mut f, &[1.0, -2.0]).unwrap();
        assert!((next[0] - 0.8).abs() < 1e-12);
        assert!((next[1] - (-1.6)).abs() < 1e-12);
    }

    #[test]
    fn metric_rescales_step() {
        // g = diag(1/4, 1/4) makes the step four times larger.
        let mut f = quadratic().with_metric(|_| DMatrix::from_diagonal_element(2, 2, 0.25));
        let mut qng = NaturalGradient::new(0.1);
        let next = qng.step(&mut f, &[1.0, 0.0]).unwrap();
        assert!((next[0] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn singular_metric_uses_pseudo_inverse() {
        let mut f = quadratic().with_metric(|_| DMatrix::from_diagonal(&DVector::from_vec(vec![1.0, 0.0])));
        let mut qng = NaturalGradient::new(0.1);
        let next = qng.step(&mut f, &[1.0, 1.0]).unwrap();
        assert!((next[0] - 0.8).abs() < 1e-12);
        assert!((next[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn regularizer_damps_step() {
        let mut f = quadratic().with_metric(|_| DMatrix::zeros(2, 2));
        let mut qng = NaturalGradient::new(0.1).with_lam(1.0);
        let next = qng.step(&mut f, &[1.0, 0.0]).unwrap();
        assert!((next[0] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn missing_metric_is_an_error() {
        let mut f = quadratic();
        let mut qng = NaturalGradient::new(0.1);
        let err = qng.step(&mut f, &[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, VqeError::MetricUnavailable));
    }

    #[test]
    fn metric_shape_checked() {
        let mut f = quadratic().with_metric(|_| DMatrix::identity(3, 3));
        let mut qng = NaturalGradient::new(0.1);
        let err = qng.step(&mut f, &[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, VqeError::DimensionMismatch { .. }));
    }
}
