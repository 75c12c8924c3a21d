//! Error types for the core crate.

use thiserror::Error;

/// Errors produced while selecting an optimizer or driving the loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VqeError {
    /// The requested optimizer name is not one of the two supported kinds.
    #[error("unsupported optimizer '{name}': use either QNGOptimizer or GradientDescentOptimizer")]
    UnsupportedOptimizerKind {
        /// The name that was requested.
        name: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A vector or matrix does not match the parameter count.
    #[error("dimension mismatch: expected {expected} components, got {actual}")]
    DimensionMismatch {
        /// Number of parameters being optimized.
        expected: usize,
        /// Length that was actually returned.
        actual: usize,
    },

    /// The objective cannot provide a metric tensor for natural-gradient steps.
    #[error("objective does not provide a metric tensor, QNGOptimizer needs one")]
    MetricUnavailable,

    /// The initial parameter vector is empty.
    #[error("initial parameter vector is empty")]
    EmptyParameters,

    /// The natural-gradient linear system could not be solved.
    #[error("metric tensor is singular and has no usable pseudo-inverse: {0}")]
    SingularMetric(String),

    /// The external objective or device failed.
    #[error("objective evaluation failed: {0}")]
    Objective(String),
}

/// Result type for core operations.
pub type VqeResult<T> = Result<T, VqeError>;
