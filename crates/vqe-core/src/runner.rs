//! The convergence-driven optimization loop.
//!
//! ```text
//!   INITIALIZED ──► ITERATING ──► CONVERGED   (|E_n − E_prev| ≤ conv_tol)
//!                        │
//!                        └──────► EXHAUSTED   (max_iter steps taken)
//! ```
//!
//! Each step applies the update rule, evaluates the objective at the new
//! parameters and compares against the previously accepted energy. Progress
//! goes to a [`ProgressObserver`]; the history is built per run and returned
//! inside the [`RunOutcome`].

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{RunConfig, SeedPolicy, TerminalPolicy};
use crate::error::{VqeError, VqeResult};
use crate::history::History;
use crate::objective::{Objective, StatefulObjective};
use crate::observer::{ProgressLine, ProgressObserver, RunSummary, TracingObserver};
use crate::optimizer::{Optimizer, OptimizerConfig, UpdateRule};

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Consecutive energies agreed within tolerance.
    Converged,
    /// The iteration budget ran out first.
    Exhausted,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    /// How the loop ended.
    pub status: Termination,
    /// Last evaluated energy (the seed energy if no step was taken).
    pub final_energy: f64,
    /// Parameters after the last step.
    pub final_params: Vec<f64>,
    /// Number of update steps taken.
    pub iterations: usize,
    /// Recorded history.
    pub history: History,
}

impl RunOutcome {
    /// True if the run converged.
    pub fn converged(&self) -> bool {
        self.status == Termination::Converged
    }
}

struct Evaluation {
    energy: f64,
    state: Option<Vec<Complex64>>,
}

/// Drives an update rule until convergence or until the budget runs out.
///
/// ```rust
/// use vqe_core::{ConvergenceLoop, FnObjective, GradientDescent, NullObserver, RunConfig};
///
/// let mut f = FnObjective::new(|x: &[f64]| (x[0] - 3.0).powi(2))
///     .with_gradient(|x| vec![2.0 * (x[0] - 3.0)]);
/// let mut runner = ConvergenceLoop::new(RunConfig::new(200)).with_observer(NullObserver);
/// let outcome = runner.run(&mut f, &mut GradientDescent::new(0.1), &[0.0]).unwrap();
/// assert!(outcome.converged());
/// assert!((outcome.final_params[0] - 3.0).abs() < 1e-2);
/// ```
#[derive(Debug, Clone)]
pub struct ConvergenceLoop<P = TracingObserver> {
    config: RunConfig,
    observer: P,
}

impl ConvergenceLoop<TracingObserver> {
    /// Create a loop that reports through `tracing`.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            observer: TracingObserver,
        }
    }
}

impl<P: ProgressObserver> ConvergenceLoop<P> {
    /// Replace the progress observer.
    pub fn with_observer<Q: ProgressObserver>(self, observer: Q) -> ConvergenceLoop<Q> {
        ConvergenceLoop {
            config: self.config,
            observer,
        }
    }

    /// The loop configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The progress observer.
    pub fn observer(&self) -> &P {
        &self.observer
    }

    /// Consume the loop, returning its observer.
    pub fn into_observer(self) -> P {
        self.observer
    }

    /// Run `rule` on `objective` from `initial`.
    ///
    /// The caller's `initial` slice is copied, never modified. Errors from
    /// the objective or the rule abort the run and are returned unchanged.
    pub fn run<O, R>(&mut self, objective: &mut O, rule: &mut R, initial: &[f64]) -> VqeResult<RunOutcome>
    where
        O: Objective,
        R: UpdateRule + ?Sized,
    {
        self.drive(objective, rule, initial, |objective, params| {
            Ok(Evaluation {
                energy: objective.evaluate(params)?,
                state: None,
            })
        })
    }

    /// Like [`run`](Self::run), also recording the state behind every
    /// recorded energy.
    ///
    /// The state comes from the same [`StatefulObjective::evaluate_with_state`]
    /// call as the energy it is stored with.
    pub fn run_recording_states<O, R>(
        &mut self,
        objective: &mut O,
        rule: &mut R,
        initial: &[f64],
    ) -> VqeResult<RunOutcome>
    where
        O: StatefulObjective,
        R: UpdateRule + ?Sized,
    {
        self.drive(objective, rule, initial, |objective, params| {
            let (energy, state) = objective.evaluate_with_state(params)?;
            Ok(Evaluation {
                energy,
                state: Some(state),
            })
        })
    }

    /// Select the optimizer by name, then [`run`](Self::run) it.
    ///
    /// An unsupported name fails before the objective is evaluated.
    pub fn run_by_name<O: Objective>(
        &mut self,
        objective: &mut O,
        optimizer_name: &str,
        optimizer_config: &OptimizerConfig,
        initial: &[f64],
    ) -> VqeResult<RunOutcome> {
        let mut optimizer = Optimizer::from_name(optimizer_name, optimizer_config)?;
        self.run(objective, &mut optimizer, initial)
    }

    fn drive<O, R, E>(
        &mut self,
        objective: &mut O,
        rule: &mut R,
        initial: &[f64],
        evaluate: E,
    ) -> VqeResult<RunOutcome>
    where
        O: Objective,
        R: UpdateRule + ?Sized,
        E: Fn(&mut O, &[f64]) -> VqeResult<Evaluation>,
    {
        if initial.is_empty() {
            return Err(VqeError::EmptyParameters);
        }
        self.config.validate()?;

        let policy = self.config.history;
        let mut history = History::new();
        let mut params = initial.to_vec();

        let seed = evaluate(objective, &params)?;
        warn_if_non_finite(None, seed.energy);
        debug!(
            optimizer = rule.name(),
            max_iter = self.config.max_iter,
            conv_tol = self.config.conv_tol,
            energy = seed.energy,
            "starting optimization"
        );
        if policy.seed == SeedPolicy::Include {
            history.record(seed.energy, &params, seed.state);
        }

        let mut prev_energy = seed.energy;
        let mut final_energy = seed.energy;
        let mut status = Termination::Exhausted;
        let mut iterations = 0;

        for n in 0..self.config.max_iter {
            let next = rule.step(objective, &params)?;
            if next.len() != initial.len() {
                return Err(VqeError::DimensionMismatch {
                    expected: initial.len(),
                    actual: next.len(),
                });
            }
            params = next;

            let Evaluation { energy, state } = evaluate(objective, &params)?;
            warn_if_non_finite(Some(n), energy);
            let conv = (energy - prev_energy).abs();
            iterations = n + 1;
            final_energy = energy;
            debug!(iteration = n, energy, conv, "step");

            if self.config.reports_at(n) {
                self.observer.on_progress(&ProgressLine {
                    iteration: n,
                    energy,
                    convergence: conv,
                });
            }

            if conv <= self.config.conv_tol {
                if policy.terminal == TerminalPolicy::Record {
                    history.record(energy, &params, state);
                }
                status = Termination::Converged;
                break;
            }

            history.record(energy, &params, state);
            prev_energy = energy;
        }

        self.observer.on_finish(&RunSummary {
            status,
            final_energy,
            iterations,
        });

        Ok(RunOutcome {
            status,
            final_energy,
            final_params: params,
            iterations,
            history,
        })
    }
}

// Non-finite energies fail the tolerance test and keep the loop going; they
// are only surfaced in the log.
fn warn_if_non_finite(iteration: Option<usize>, energy: f64) {
    if !energy.is_finite() {
        warn!(?iteration, energy, "objective returned a non-finite energy");
    }
}
