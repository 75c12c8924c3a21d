//! `vqe-core`: convergence-driven optimization loop for VQE experiments.
//!
//! A run repeatedly applies an update rule to a parameter vector, evaluates
//! the objective after each step and stops once two consecutive energies
//! agree within an absolute tolerance, or after a fixed number of steps.
//!
//! - [`optimizer`]: the two update rules (gradient descent, quantum natural
//!   gradient) and name-based selection
//! - [`runner`]: the loop itself
//! - [`history`]: per-run energy / parameter / state history
//! - [`observer`]: progress reporting
//!
//! The objective and the simulator behind it are collaborators supplied by
//! the caller through the [`Objective`] and [`StatefulObjective`] traits.
//!
//! # Quick start
//!
//! ```rust
//! use vqe_core::{ConvergenceLoop, FnObjective, OptimizerConfig, RunConfig, Termination};
//!
//! let mut cost = FnObjective::new(|x: &[f64]| (x[0] - 3.0).powi(2))
//!     .with_gradient(|x| vec![2.0 * (x[0] - 3.0)]);
//!
//! let mut runner = ConvergenceLoop::new(RunConfig::new(200).with_conv_tol(1e-6));
//! let outcome = runner
//!     .run_by_name(&mut cost, "GradientDescentOptimizer", &OptimizerConfig::new(0.1), &[0.0])
//!     .unwrap();
//!
//! assert_eq!(outcome.status, Termination::Converged);
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod objective;
pub mod observer;
pub mod optimizer;
pub mod runner;

pub use config::{HistoryPolicy, RunConfig, SeedPolicy, TerminalPolicy};
pub use error::{VqeError, VqeResult};
pub use history::History;
pub use objective::{
    FINITE_DIFFERENCE_STEP, FnObjective, MetricApproximation, Objective, StatefulObjective,
    central_difference,
};
pub use observer::{
    ConsoleObserver, NullObserver, ProgressLine, ProgressObserver, RecordingObserver, RunSummary,
    TracingObserver,
};
pub use optimizer::{
    GradientDescent, NaturalGradient, Optimizer, OptimizerConfig, OptimizerKind, UpdateRule,
};
pub use runner::{ConvergenceLoop, RunOutcome, Termination};
