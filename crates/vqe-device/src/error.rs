//! Error types for the device crate.

use thiserror::Error;
use vqe_core::VqeError;

/// Errors produced by the reference device.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeviceError {
    /// The parameter vector does not match the ansatz.
    #[error("ansatz takes {expected} parameters, got {actual}")]
    ParameterCount {
        /// Parameters consumed by the ansatz.
        expected: usize,
        /// Parameters supplied.
        actual: usize,
    },

    /// An operation or Pauli string references a qubit outside the register.
    #[error("qubit {qubit} is out of range for a {num_qubits}-qubit register")]
    QubitOutOfRange {
        /// The offending qubit index.
        qubit: usize,
        /// Register width.
        num_qubits: usize,
    },

    /// The register is wider than the statevector simulator allows.
    #[error("{num_qubits} qubits exceeds the simulator limit of {max}")]
    RegisterTooWide {
        /// Requested width.
        num_qubits: usize,
        /// Widest supported register.
        max: usize,
    },

    /// A two-qubit gate uses the same qubit twice.
    #[error("control and target must differ, both are {0}")]
    RepeatedQubit(usize),

    /// Coefficients and observables differ in length.
    #[error("{coeffs} coefficients given for {observables} observables")]
    TermCountMismatch {
        /// Number of coefficients.
        coeffs: usize,
        /// Number of observables.
        observables: usize,
    },

    /// Hamiltonian contains no terms.
    #[error("Hamiltonian is empty")]
    EmptyHamiltonian,

    /// A Pauli string or Hamiltonian could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

impl From<DeviceError> for VqeError {
    fn from(e: DeviceError) -> Self {
        VqeError::Objective(e.to_string())
    }
}
