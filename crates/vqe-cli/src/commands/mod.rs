//! Subcommand implementations.

pub mod compare;
pub mod landscape;
pub mod run;

use std::f64::consts::TAU;

use anyhow::{Result, bail};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vqe_core::{ConvergenceLoop, Optimizer, ProgressObserver, RunOutcome};
use vqe_device::ExpectationCost;

use crate::cli::ProblemArgs;
use crate::config::CliConfig;

/// Build the cost and the starting point described by `config`.
///
/// `random_init` replaces the configured initial parameters with uniform
/// draws from [0, 2π), reproducible per seed.
pub fn prepare(config: &CliConfig, random_init: Option<u64>) -> Result<(ExpectationCost, Vec<f64>)> {
    let cost = config.problem.cost()?;
    let num_params = cost.ansatz().num_params();
    let initial = match random_init {
        Some(seed) => random_params(num_params, seed),
        None => config.problem.initial_params.clone(),
    };
    if initial.len() != num_params {
        bail!(
            "ansatz takes {} parameters, {} initial values given",
            num_params,
            initial.len()
        );
    }
    Ok((cost, initial))
}

/// `n` angles drawn uniformly from [0, 2π).
pub fn random_params(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0.0..TAU)).collect()
}

/// Apply the shared problem flags and re-validate.
pub(crate) fn configure(mut config: CliConfig, problem: &ProblemArgs) -> Result<CliConfig> {
    problem.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Run the optimizer `name` on `cost`.
pub(crate) fn optimize<P: ProgressObserver>(
    config: &CliConfig,
    name: &str,
    cost: &mut ExpectationCost,
    initial: &[f64],
    record_states: bool,
    observer: P,
) -> Result<RunOutcome> {
    let mut optimizer = Optimizer::from_name(name, &config.optimizer.settings)?;
    let mut runner = ConvergenceLoop::new(config.run.clone()).with_observer(observer);
    let outcome = if record_states {
        runner.run_recording_states(cost, &mut optimizer, initial)?
    } else {
        runner.run(cost, &mut optimizer, initial)?
    };
    Ok(outcome)
}
