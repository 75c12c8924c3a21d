//! Collaborator contracts for the quantity being minimized.
//!
//! The loop never looks inside an objective. It only asks for a value, and
//! the update rules additionally ask for a gradient and (for natural-gradient
//! steps) a metric tensor.
//!
//! A device-backed objective that also exposes the simulated state implements
//! [`StatefulObjective`], which hands back `(energy, state)` from a single
//! call so the recorded state always belongs to the recorded energy.

use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{VqeError, VqeResult};

/// Step used by the default central-difference gradient.
pub const FINITE_DIFFERENCE_STEP: f64 = 1e-6;

/// Approximation applied to the metric tensor for natural-gradient steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricApproximation {
    /// Keep couplings between parameters of the same layer.
    #[default]
    BlockDiagonal,
    /// Keep only the diagonal.
    Diagonal,
}

impl MetricApproximation {
    /// Map the `diag_approx` flag onto an approximation.
    pub fn from_diag_approx(diag_approx: bool) -> Self {
        if diag_approx {
            Self::Diagonal
        } else {
            Self::BlockDiagonal
        }
    }
}

/// A scalar function of a parameter vector.
pub trait Objective {
    /// Evaluate the objective at `params`.
    fn evaluate(&mut self, params: &[f64]) -> VqeResult<f64>;

    /// Gradient at `params`.
    ///
    /// Defaults to a central finite difference with
    /// [`FINITE_DIFFERENCE_STEP`]; objectives with an analytic or
    /// parameter-shift gradient should override this.
    fn gradient(&mut self, params: &[f64]) -> VqeResult<Vec<f64>> {
        central_difference(self, params)
    }

    /// Metric tensor at `params`, `n × n` for `n` parameters.
    fn metric_tensor(
        &mut self,
        _params: &[f64],
        _approximation: MetricApproximation,
    ) -> VqeResult<DMatrix<f64>> {
        Err(VqeError::MetricUnavailable)
    }
}

/// Central finite-difference gradient of `objective` at `params`.
pub fn central_difference<O>(objective: &mut O, params: &[f64]) -> VqeResult<Vec<f64>>
where
    O: Objective + ?Sized,
{
    let mut shifted = params.to_vec();
    let mut grad = Vec::with_capacity(params.len());
    for i in 0..params.len() {
        shifted[i] = params[i] + FINITE_DIFFERENCE_STEP;
        let plus = objective.evaluate(&shifted)?;
        shifted[i] = params[i] - FINITE_DIFFERENCE_STEP;
        let minus = objective.evaluate(&shifted)?;
        shifted[i] = params[i];
        grad.push((plus - minus) / (2.0 * FINITE_DIFFERENCE_STEP));
    }
    Ok(grad)
}

/// An objective backed by a simulator whose state can be captured.
pub trait StatefulObjective: Objective {
    /// Evaluate at `params` and return the state the value was computed from.
    fn evaluate_with_state(&mut self, params: &[f64]) -> VqeResult<(f64, Vec<Complex64>)>;
}

type GradientFn = Box<dyn FnMut(&[f64]) -> Vec<f64>>;
type MetricFn = Box<dyn FnMut(&[f64]) -> DMatrix<f64>>;

/// Adapts a plain closure into an [`Objective`].
///
/// ```rust
/// use vqe_core::{FnObjective, Objective};
///
/// let mut f = FnObjective::new(|x: &[f64]| (x[0] - 3.0).powi(2))
///     .with_gradient(|x| vec![2.0 * (x[0] - 3.0)]);
/// assert_eq!(f.evaluate(&[1.0]).unwrap(), 4.0);
/// assert_eq!(f.gradient(&[1.0]).unwrap(), vec![-4.0]);
/// ```
pub struct FnObjective<F> {
    f: F,
    gradient: Option<GradientFn>,
    metric: Option<MetricFn>,
    evaluations: usize,
}

impl<F> FnObjective<F>
where
    F: FnMut(&[f64]) -> f64,
{
    /// Wrap `f`.
    pub fn new(f: F) -> Self {
        Self {
            f,
            gradient: None,
            metric: None,
            evaluations: 0,
        }
    }

    /// Supply an analytic gradient instead of finite differences.
    #[must_use]
    pub fn with_gradient(mut self, gradient: impl FnMut(&[f64]) -> Vec<f64> + 'static) -> Self {
        self.gradient = Some(Box::new(gradient));
        self
    }

    /// Supply a metric tensor, enabling natural-gradient steps.
    ///
    /// The closure returns the full metric; the diagonal approximation is
    /// applied by zeroing off-diagonal entries.
    #[must_use]
    pub fn with_metric(mut self, metric: impl FnMut(&[f64]) -> DMatrix<f64> + 'static) -> Self {
        self.metric = Some(Box::new(metric));
        self
    }

    /// Number of times `f` has been called.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }
}

impl<F> Objective for FnObjective<F>
where
    F: FnMut(&[f64]) -> f64,
{
    fn evaluate(&mut self, params: &[f64]) -> VqeResult<f64> {
        self.evaluations += 1;
        Ok((self.f)(params))
    }

    fn gradient(&mut self, params: &[f64]) -> VqeResult<Vec<f64>> {
        if let Some(gradient) = self.gradient.as_mut() {
            return Ok(gradient(params));
        }
        central_difference(self, params)
    }

    fn metric_tensor(
        &mut self,
        params: &[f64],
        approximation: MetricApproximation,
    ) -> VqeResult<DMatrix<f64>> {
        let metric = self.metric.as_mut().ok_or(VqeError::MetricUnavailable)?;
        let full = metric(params);
        Ok(match approximation {
            MetricApproximation::BlockDiagonal => full,
            MetricApproximation::Diagonal => DMatrix::from_diagonal(&full.diagonal()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gradient_matches_analytic() {
        let mut f = FnObjective::new(|x: &[f64]| x[0] * x[0] + 3.0 * x[1]);
        let g = f.gradient(&[2.0, -1.0]).unwrap();
        assert!((g[0] - 4.0).abs() < 1e-6);
        assert!((g[1] - 3.0).abs() < 1e-6);
        assert_eq!(f.evaluations(), 4);
    }

    #[test]
    fn metric_unavailable_without_closure() {
        let mut f = FnObjective::new(|x: &[f64]| x[0]);
        let err = f
            .metric_tensor(&[0.0], MetricApproximation::Diagonal)
            .unwrap_err();
        assert!(matches!(err, VqeError::MetricUnavailable));
    }

    #[test]
    fn diagonal_approximation_drops_couplings() {
        let mut f = FnObjective::new(|x: &[f64]| x[0])
            .with_metric(|_| DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.5, 2.0]));
        let m = f
            .metric_tensor(&[0.0, 0.0], MetricApproximation::Diagonal)
            .unwrap();
        assert_eq!(m[(0, 1)], 0.0);
        assert_eq!(m[(1, 1)], 2.0);
    }

    #[test]
    fn diag_approx_flag_mapping() {
        assert_eq!(
            MetricApproximation::from_diag_approx(true),
            MetricApproximation::Diagonal
        );
        assert_eq!(
            MetricApproximation::from_diag_approx(false),
            MetricApproximation::BlockDiagonal
        );
    }
}
