//! Error types for the visualization crate.

use thiserror::Error;
use vqe_core::VqeError;

/// Errors produced while projecting or exporting optimization data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VizError {
    /// The state has zero (or non-finite) norm and cannot be normalized.
    #[error("state vector has zero or non-finite norm")]
    ZeroNorm,

    /// Bloch projection needs exactly two amplitudes.
    #[error("Bloch projection needs a single-qubit state, got {0} amplitudes")]
    NotSingleQubit(usize),

    /// A parameter vector is not two-dimensional.
    #[error("parameter vector {index} has {len} components, expected 2")]
    NotTwoDimensional {
        /// Position in the history.
        index: usize,
        /// Its length.
        len: usize,
    },

    /// Thinning stride must be positive.
    #[error("stride must be at least 1")]
    InvalidStride,

    /// Landscape grids need at least one point per axis.
    #[error("landscape resolution must be at least 1")]
    InvalidResolution,

    /// The objective failed while sampling a landscape.
    #[error("objective evaluation failed: {0}")]
    Objective(#[from] VqeError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization error.
    #[error("export error: {0}")]
    Export(String),
}

impl From<serde_json::Error> for VizError {
    fn from(e: serde_json::Error) -> Self {
        VizError::Export(e.to_string())
    }
}

/// Result type for visualization operations.
pub type VizResult<T> = Result<T, VizError>;
