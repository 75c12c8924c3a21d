//! Update rules and optimizer selection.
//!
//! Two update rules are supported, selected by name the way experiment
//! scripts refer to them:
//!
//! | name                       | rule                        |
//! |----------------------------|-----------------------------|
//! | `GradientDescentOptimizer` | [`GradientDescent`]         |
//! | `QNGOptimizer`             | [`NaturalGradient`]         |
//!
//! The name is resolved once into the [`Optimizer`] enum; the loop then
//! dispatches on the variant, never on the string.

pub mod gradient_descent;
pub mod natural_gradient;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{VqeError, VqeResult};
use crate::objective::{MetricApproximation, Objective};

pub use gradient_descent::GradientDescent;
pub use natural_gradient::NaturalGradient;

/// Maps the current parameters to improved parameters.
pub trait UpdateRule {
    /// Take one step from `params`, returning a new parameter vector.
    ///
    /// May evaluate the objective (and its gradient) any number of times.
    fn step(&mut self, objective: &mut dyn Objective, params: &[f64]) -> VqeResult<Vec<f64>>;

    /// Human-readable name, used in log output.
    fn name(&self) -> &str {
        "custom"
    }
}

/// The two supported update-rule kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptimizerKind {
    /// Plain gradient descent.
    #[serde(rename = "GradientDescentOptimizer")]
    GradientDescent,
    /// Quantum natural gradient descent.
    #[serde(rename = "QNGOptimizer")]
    NaturalGradient,
}

impl OptimizerKind {
    /// All supported kinds.
    pub const ALL: [OptimizerKind; 2] = [Self::GradientDescent, Self::NaturalGradient];

    /// The name this kind is selected by.
    pub const fn name(self) -> &'static str {
        match self {
            Self::GradientDescent => "GradientDescentOptimizer",
            Self::NaturalGradient => "QNGOptimizer",
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptimizerKind {
    type Err = VqeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| VqeError::UnsupportedOptimizerKind {
                name: s.to_string(),
            })
    }
}

/// Optimizer settings shared by both kinds.
///
/// `diag_approx` and `lam` only affect [`NaturalGradient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Step size (learning rate).
    #[serde(default = "default_step_size")]
    pub step_size: f64,

    /// Use the diagonal metric approximation instead of block-diagonal.
    #[serde(default)]
    pub diag_approx: bool,

    /// Tikhonov regularizer added to the metric diagonal.
    #[serde(default)]
    pub lam: f64,
}

fn default_step_size() -> f64 {
    0.01
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            step_size: default_step_size(),
            diag_approx: false,
            lam: 0.0,
        }
    }
}

impl OptimizerConfig {
    /// Create a config with the given step size and defaults otherwise.
    pub fn new(step_size: f64) -> Self {
        Self {
            step_size,
            ..Self::default()
        }
    }

    /// Select the diagonal metric approximation.
    #[must_use]
    pub fn with_diag_approx(mut self, diag_approx: bool) -> Self {
        self.diag_approx = diag_approx;
        self
    }

    /// Set the metric regularizer.
    #[must_use]
    pub fn with_lam(mut self, lam: f64) -> Self {
        self.lam = lam;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> VqeResult<()> {
        if !self.step_size.is_finite() || self.step_size <= 0.0 {
            return Err(VqeError::InvalidConfig(format!(
                "step_size must be a positive finite number, got {}",
                self.step_size
            )));
        }
        if !self.lam.is_finite() || self.lam < 0.0 {
            return Err(VqeError::InvalidConfig(format!(
                "lam must be a non-negative finite number, got {}",
                self.lam
            )));
        }
        Ok(())
    }
}

/// A resolved update rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Optimizer {
    /// Plain gradient descent.
    GradientDescent(GradientDescent),
    /// Quantum natural gradient descent.
    NaturalGradient(NaturalGradient),
}

impl Optimizer {
    /// Build the optimizer for `kind` from `config`.
    pub fn new(kind: OptimizerKind, config: &OptimizerConfig) -> VqeResult<Self> {
        config.validate()?;
        Ok(match kind {
            OptimizerKind::GradientDescent => {
                Self::GradientDescent(GradientDescent::new(config.step_size))
            }
            OptimizerKind::NaturalGradient => Self::NaturalGradient(
                NaturalGradient::new(config.step_size)
                    .with_approximation(MetricApproximation::from_diag_approx(config.diag_approx))
                    .with_lam(config.lam),
            ),
        })
    }

    /// Resolve `name` and build the optimizer.
    ///
    /// Fails with [`VqeError::UnsupportedOptimizerKind`] for any name other
    /// than `GradientDescentOptimizer` or `QNGOptimizer`.
    pub fn from_name(name: &str, config: &OptimizerConfig) -> VqeResult<Self> {
        let kind: OptimizerKind = name.parse()?;
        Self::new(kind, config)
    }

    /// Which kind this optimizer is.
    pub fn kind(&self) -> OptimizerKind {
        match self {
            Self::GradientDescent(_) => OptimizerKind::GradientDescent,
            Self::NaturalGradient(_) => OptimizerKind::NaturalGradient,
        }
    }

    /// Step size of the underlying rule.
    pub fn step_size(&self) -> f64 {
        match self {
            Self::GradientDescent(gd) => gd.step_size,
            Self::NaturalGradient(qng) => qng.step_size,
        }
    }
}

impl UpdateRule for Optimizer {
    fn step(&mut self, objective: &mut dyn Objective, params: &[f64]) -> VqeResult<Vec<f64>> {
        match self {
            Self::GradientDescent(gd) => gd.step(objective, params),
            Self::NaturalGradient(qng) => qng.step(objective, params),
        }
    }

    fn name(&self) -> &str {
        self.kind().name()
    }
}

/// Fail with [`VqeError::DimensionMismatch`] unless `actual == expected`.
pub(crate) fn ensure_len(expected: usize, actual: usize) -> VqeResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(VqeError::DimensionMismatch { expected, actual })
    }
}
