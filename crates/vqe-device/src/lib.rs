//! `vqe-device`: a small exact statevector device for VQE runs.
//!
//! Provides the objective collaborator the convergence loop drives:
//! an [`Ansatz`] prepares ψ(θ), a [`Hamiltonian`] measures it, and
//! [`ExpectationCost`] ties them together with exact gradients and
//! metric tensors.
//!
//! ```rust
//! use vqe_core::{ConvergenceLoop, NullObserver, OptimizerConfig, RunConfig};
//! use vqe_device::{Ansatz, ExpectationCost};
//!
//! let mut cost = ExpectationCost::new(
//!     Ansatz::single_qubit(),
//!     "1.0 * X0 + 1.0 * Z0".parse().unwrap(),
//! )
//! .unwrap();
//!
//! let mut runner = ConvergenceLoop::new(RunConfig::new(500)).with_observer(NullObserver);
//! let outcome = runner
//!     .run_by_name(&mut cost, "QNGOptimizer", &OptimizerConfig::new(0.01), &[0.011, 0.012])
//!     .unwrap();
//! assert!(outcome.final_energy < 0.0);
//! ```

pub mod ansatz;
pub mod cost;
pub mod error;
pub mod hamiltonian;
pub mod statevector;

pub use ansatz::{Ansatz, Axis, Operation};
pub use cost::ExpectationCost;
pub use error::{DeviceError, DeviceResult};
pub use hamiltonian::{Hamiltonian, HamiltonianTerm, PauliOp, PauliString};
pub use statevector::{MAX_QUBITS, Statevector};
