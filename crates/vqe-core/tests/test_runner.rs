//! Tests for the convergence loop.

use num_complex::Complex64;
use proptest::prelude::*;

use vqe_core::{
    ConvergenceLoop, FnObjective, GradientDescent, HistoryPolicy, NullObserver, Objective,
    OptimizerConfig, OptimizerKind, RecordingObserver, RunConfig, SeedPolicy, StatefulObjective,
    Termination, TerminalPolicy, VqeError, VqeResult,
};

fn shifted_quadratic() -> FnObjective<impl FnMut(&[f64]) -> f64> {
    FnObjective::new(|x: &[f64]| (x[0] - 3.0).powi(2)).with_gradient(|x| vec![2.0 * (x[0] - 3.0)])
}

/// f(x) = x: every gradient step lowers the energy by exactly the step size,
/// so the loop never converges for tolerances below it.
fn linear() -> FnObjective<impl FnMut(&[f64]) -> f64> {
    FnObjective::new(|x: &[f64]| x[0]).with_gradient(|_| vec![1.0])
}

fn quiet(config: RunConfig) -> ConvergenceLoop<NullObserver> {
    ConvergenceLoop::new(config).with_observer(NullObserver)
}

// ---------------------------------------------------------------------------
// Optimizer selection
// ---------------------------------------------------------------------------

#[test]
fn unsupported_optimizer_runs_nothing() {
    for name in ["Adam", "", "gradientdescentoptimizer", "QNG"] {
        let mut f = shifted_quadratic();
        let mut runner = quiet(RunConfig::default());
        let err = runner
            .run_by_name(&mut f, name, &OptimizerConfig::new(0.1), &[0.0])
            .unwrap_err();
        assert!(
            matches!(err, VqeError::UnsupportedOptimizerKind { name: ref n } if n == name),
            "unexpected error for {name:?}: {err}"
        );
        assert_eq!(f.evaluations(), 0, "objective evaluated for {name:?}");
    }
}

#[test]
fn both_names_run() {
    for kind in OptimizerKind::ALL {
        let mut f = shifted_quadratic().with_metric(|_| nalgebra::DMatrix::identity(1, 1));
        let mut runner = quiet(RunConfig::new(500));
        let outcome = runner
            .run_by_name(&mut f, kind.name(), &OptimizerConfig::new(0.1), &[0.0])
            .unwrap();
        assert!(outcome.converged(), "{kind} did not converge");
    }
}

// ---------------------------------------------------------------------------
// Termination
// ---------------------------------------------------------------------------

#[test]
fn quadratic_converges_near_minimum() {
    let mut f = shifted_quadratic();
    let mut runner = quiet(RunConfig::new(200).with_conv_tol(1e-6));
    let outcome = runner
        .run(&mut f, &mut GradientDescent::new(0.1), &[0.0])
        .unwrap();

    assert_eq!(outcome.status, Termination::Converged);
    assert!((outcome.final_params[0] - 3.0).abs() < 1e-2);
    assert!(outcome.iterations < 200);
}

#[test]
fn budget_exhausted_without_convergence() {
    let mut f = linear();
    let mut runner = quiet(RunConfig::new(10));
    let outcome = runner
        .run(&mut f, &mut GradientDescent::new(0.1), &[0.0])
        .unwrap();

    assert_eq!(outcome.status, Termination::Exhausted);
    assert_eq!(outcome.iterations, 10);
    assert!((outcome.final_energy - (-1.0)).abs() < 1e-12);
}

#[test]
fn zero_budget_with_seed() {
    let mut f = shifted_quadratic();
    let mut runner = quiet(RunConfig::new(0));
    let outcome = runner
        .run(&mut f, &mut GradientDescent::new(0.1), &[1.0])
        .unwrap();

    assert_eq!(outcome.status, Termination::Exhausted);
    assert_eq!(outcome.iterations, 0);
    assert_eq!(outcome.history.energies(), &[4.0]);
    assert_eq!(outcome.final_energy, 4.0);
    assert_eq!(outcome.final_params, vec![1.0]);
}

#[test]
fn zero_budget_without_seed() {
    let mut f = shifted_quadratic();
    let policy = HistoryPolicy::new(SeedPolicy::Exclude, TerminalPolicy::Drop);
    let mut runner = quiet(RunConfig::new(0).with_history(policy));
    let outcome = runner
        .run(&mut f, &mut GradientDescent::new(0.1), &[1.0])
        .unwrap();

    assert_eq!(outcome.status, Termination::Exhausted);
    assert_eq!(outcome.iterations, 0);
    assert!(outcome.history.is_empty());
}

#[test]
fn initial_params_untouched() {
    let mut f = shifted_quadratic();
    let initial = vec![0.5];
    let mut runner = quiet(RunConfig::new(20));
    let outcome = runner
        .run(&mut f, &mut GradientDescent::new(0.1), &initial)
        .unwrap();
    assert_eq!(initial, vec![0.5]);
    assert_ne!(outcome.final_params, initial);
}

// ---------------------------------------------------------------------------
// History policies
// ---------------------------------------------------------------------------

#[test]
fn converging_step_not_recorded_by_default() {
    let mut f = shifted_quadratic();
    let mut runner = quiet(RunConfig::new(200));
    let outcome = runner
        .run(&mut f, &mut GradientDescent::new(0.1), &[0.0])
        .unwrap();

    assert!(outcome.converged());
    // seed + every accepted step, the converging step excluded
    assert_eq!(outcome.history.len(), outcome.iterations);
    assert_eq!(outcome.history.params().len(), outcome.history.len());
    assert_ne!(outcome.history.last_energy(), Some(outcome.final_energy));
}

#[test]
fn converging_step_recorded_once_when_requested() {
    let mut f = shifted_quadratic();
    let policy = HistoryPolicy::new(SeedPolicy::Exclude, TerminalPolicy::Record);
    let mut runner = quiet(RunConfig::new(200).with_history(policy));
    let outcome = runner
        .run(&mut f, &mut GradientDescent::new(0.1), &[0.0])
        .unwrap();

    assert!(outcome.converged());
    assert_eq!(outcome.history.len(), outcome.iterations);
    assert_eq!(outcome.history.last_energy(), Some(outcome.final_energy));
    let energies = outcome.history.energies();
    assert_ne!(energies[energies.len() - 1], energies[energies.len() - 2]);
}

#[test]
fn seed_and_converging_step_both_recorded() {
    let mut f = shifted_quadratic();
    let policy = HistoryPolicy::new(SeedPolicy::Include, TerminalPolicy::Record);
    let mut runner = quiet(RunConfig::new(200).with_history(policy));
    let outcome = runner
        .run(&mut f, &mut GradientDescent::new(0.1), &[0.0])
        .unwrap();

    assert!(outcome.converged());
    assert_eq!(outcome.history.len(), outcome.iterations + 1);
    assert_eq!(outcome.history.params().len(), outcome.history.len());
    assert_eq!(outcome.history.energies()[0], 9.0);
    assert_eq!(outcome.history.last_energy(), Some(outcome.final_energy));
}

#[test]
fn exhausted_history_counts_every_step() {
    let mut f = linear();
    let mut runner = quiet(RunConfig::new(7));
    let outcome = runner
        .run(&mut f, &mut GradientDescent::new(0.1), &[0.0])
        .unwrap();
    assert_eq!(outcome.history.len(), 8);

    let mut f = linear();
    let policy = HistoryPolicy::new(SeedPolicy::Exclude, TerminalPolicy::Drop);
    let mut runner = quiet(RunConfig::new(7).with_history(policy));
    let outcome = runner
        .run(&mut f, &mut GradientDescent::new(0.1), &[0.0])
        .unwrap();
    assert_eq!(outcome.history.len(), 7);
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

#[test]
fn progress_emitted_on_multiples_of_print_freq() {
    let mut f = linear();
    let mut runner =
        ConvergenceLoop::new(RunConfig::new(10).with_print_freq(3)).with_observer(RecordingObserver::new());
    let outcome = runner
        .run(&mut f, &mut GradientDescent::new(0.1), &[0.0])
        .unwrap();

    let seen: Vec<usize> = runner.observer().lines().iter().map(|l| l.iteration).collect();
    assert_eq!(seen, vec![0, 3, 6, 9]);

    let summary = runner.observer().summary().unwrap();
    assert_eq!(summary.iterations, outcome.iterations);
    assert_eq!(summary.status, Termination::Exhausted);
}

#[test]
fn progress_does_not_change_outcome() {
    let run = |print_freq: usize| {
        let mut f = shifted_quadratic();
        let mut runner = ConvergenceLoop::new(RunConfig::new(200).with_print_freq(print_freq))
            .with_observer(RecordingObserver::new());
        runner
            .run(&mut f, &mut GradientDescent::new(0.1), &[0.0])
            .unwrap()
    };
    assert_eq!(run(1), run(0));
}

#[test]
fn progress_line_carries_convergence_parameter() {
    let mut f = linear();
    let mut recorder = RecordingObserver::new();
    let mut runner = ConvergenceLoop::new(RunConfig::new(1).with_print_freq(1)).with_observer(&mut recorder);
    runner
        .run(&mut f, &mut GradientDescent::new(0.25), &[1.0])
        .unwrap();
    drop(runner);

    let line = recorder.lines()[0];
    assert_eq!(line.iteration, 0);
    assert!((line.energy - 0.75).abs() < 1e-12);
    assert!((line.convergence - 0.25).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// State recording
// ---------------------------------------------------------------------------

/// Objective whose "device state" encodes the parameters it was evaluated at.
struct EchoDevice {
    calls: usize,
}

impl Objective for EchoDevice {
    fn evaluate(&mut self, params: &[f64]) -> VqeResult<f64> {
        self.calls += 1;
        Ok((params[0] - 1.0).powi(2))
    }

    fn gradient(&mut self, params: &[f64]) -> VqeResult<Vec<f64>> {
        Ok(vec![2.0 * (params[0] - 1.0)])
    }
}

impl StatefulObjective for EchoDevice {
    fn evaluate_with_state(&mut self, params: &[f64]) -> VqeResult<(f64, Vec<Complex64>)> {
        let energy = self.evaluate(params)?;
        Ok((energy, vec![Complex64::new(params[0], 0.0)]))
    }
}

#[test]
fn recorded_state_belongs_to_recorded_params() {
    let mut device = EchoDevice { calls: 0 };
    let mut runner = quiet(RunConfig::new(50));
    let outcome = runner
        .run_recording_states(&mut device, &mut GradientDescent::new(0.2), &[0.0])
        .unwrap();

    let history = &outcome.history;
    assert_eq!(history.states().len(), history.len());
    for (params, state) in history.params().iter().zip(history.states()) {
        assert_eq!(state[0].re, params[0]);
    }
    assert_eq!(history.states()[0][0].re, 0.0);
    assert!(device.calls > 0);
}

#[test]
fn recorded_states_without_seed() {
    let mut device = EchoDevice { calls: 0 };
    let policy = HistoryPolicy::new(SeedPolicy::Exclude, TerminalPolicy::Record);
    let mut runner = quiet(RunConfig::new(50).with_history(policy));
    let outcome = runner
        .run_recording_states(&mut device, &mut GradientDescent::new(0.2), &[0.0])
        .unwrap();

    assert!(outcome.converged());
    let history = &outcome.history;
    assert_eq!(history.len(), outcome.iterations);
    assert_eq!(history.states().len(), history.len());
    assert_eq!(history.params().len(), history.len());
    for (params, state) in history.params().iter().zip(history.states()) {
        assert_eq!(state[0].re, params[0]);
    }
    // first entry is the first step, 0 - 0.2 * 2 * (0 - 1)
    assert!((history.states()[0][0].re - 0.4).abs() < 1e-12);
}

#[test]
fn objective_errors_propagate() {
    struct Failing;
    impl Objective for Failing {
        fn evaluate(&mut self, _params: &[f64]) -> VqeResult<f64> {
            Err(VqeError::Objective("device offline".into()))
        }
    }

    let mut runner = quiet(RunConfig::default());
    let err = runner
        .run(&mut Failing, &mut GradientDescent::new(0.1), &[0.0])
        .unwrap_err();
    assert!(err.to_string().contains("device offline"));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn history_never_exceeds_budget(
        start in -10.0f64..10.0,
        max_iter in 0usize..40,
        step in 0.01f64..0.4,
    ) {
        let mut f = shifted_quadratic();
        let mut runner = quiet(RunConfig::new(max_iter));
        let outcome = runner
            .run(&mut f, &mut GradientDescent::new(step), &[start])
            .unwrap();
        prop_assert!(outcome.history.len() <= max_iter + 1);
        prop_assert!(outcome.iterations <= max_iter);
        if outcome.status == Termination::Exhausted {
            prop_assert_eq!(outcome.iterations, max_iter);
        }
    }
}
