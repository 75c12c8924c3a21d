//! Loop configuration.
//!
//! All fields carry serde defaults, so a partial YAML or JSON document
//! deserializes into a complete [`RunConfig`].

use serde::{Deserialize, Serialize};

use crate::error::{VqeError, VqeResult};

/// Whether the objective at the initial parameters opens the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Record the initial evaluation as the first history entry.
    #[default]
    Include,
    /// Start the history with the first accepted step.
    Exclude,
}

/// Whether the step on which convergence is detected is recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalPolicy {
    /// Stop without recording the converging step.
    #[default]
    Drop,
    /// Record the converging step once, then stop.
    Record,
}

/// What ends up in the returned history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryPolicy {
    /// Seed handling.
    #[serde(default)]
    pub seed: SeedPolicy,
    /// Converging-step handling.
    #[serde(default)]
    pub terminal: TerminalPolicy,
}

impl HistoryPolicy {
    /// Construct a policy from its two halves.
    pub fn new(seed: SeedPolicy, terminal: TerminalPolicy) -> Self {
        Self { seed, terminal }
    }
}

/// Settings for one run of the convergence loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Maximum number of update steps.
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,

    /// Absolute tolerance on consecutive energy differences.
    #[serde(default = "default_conv_tol")]
    pub conv_tol: f64,

    /// Emit a progress line every `print_freq` steps (0 disables).
    #[serde(default = "default_print_freq")]
    pub print_freq: usize,

    /// History recording policy.
    #[serde(default)]
    pub history: HistoryPolicy,
}

fn default_max_iter() -> usize {
    100
}

fn default_conv_tol() -> f64 {
    1e-6
}

fn default_print_freq() -> usize {
    20
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_iter: default_max_iter(),
            conv_tol: default_conv_tol(),
            print_freq: default_print_freq(),
            history: HistoryPolicy::default(),
        }
    }
}

impl RunConfig {
    /// Defaults with the given iteration budget.
    pub fn new(max_iter: usize) -> Self {
        Self {
            max_iter,
            ..Self::default()
        }
    }

    /// Set the iteration budget.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the convergence tolerance.
    #[must_use]
    pub fn with_conv_tol(mut self, conv_tol: f64) -> Self {
        self.conv_tol = conv_tol;
        self
    }

    /// Set the progress frequency.
    #[must_use]
    pub fn with_print_freq(mut self, print_freq: usize) -> Self {
        self.print_freq = print_freq;
        self
    }

    /// Set the history policy.
    #[must_use]
    pub fn with_history(mut self, history: HistoryPolicy) -> Self {
        self.history = history;
        self
    }

    /// True when step `n` should produce a progress line.
    pub fn reports_at(&self, n: usize) -> bool {
        self.print_freq > 0 && n % self.print_freq == 0
    }

    /// Check value ranges.
    pub fn validate(&self) -> VqeResult<()> {
        if !self.conv_tol.is_finite() || self.conv_tol < 0.0 {
            return Err(VqeError::InvalidConfig(format!(
                "conv_tol must be a non-negative finite number, got {}",
                self.conv_tol
            )));
        }
        Ok(())
    }
}
