//! Plain gradient descent.
//!
//!   θ' = θ − η ∇f(θ)

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{UpdateRule, ensure_len};
use crate::error::VqeResult;
use crate::objective::Objective;

/// Gradient descent with a fixed step size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientDescent {
    /// Step size η.
    pub step_size: f64,
}

impl GradientDescent {
    /// Create a new rule with step size `step_size`.
    pub fn new(step_size: f64) -> Self {
        Self { step_size }
    }
}

impl UpdateRule for GradientDescent {
    fn step(&mut self, objective: &mut dyn Objective, params: &[f64]) -> VqeResult<Vec<f64>> {
        let grad = objective.gradient(params)?;
        ensure_len(params.len(), grad.len())?;
        trace!(?grad, "gradient descent step");

        Ok(params
            .iter()
            .zip(&grad)
            .map(|(p, g)| p - self.step_size * g)
            .collect())
    }

    fn name(&self) -> &str {
        "GradientDescentOptimizer"
    }
}
