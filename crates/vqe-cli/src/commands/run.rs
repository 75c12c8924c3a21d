//! Run command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use tracing::info;

use vqe_core::{ConsoleObserver, RunOutcome, TracingObserver};
use vqe_viz::export::{self, ExportConfig};

use super::{configure, optimize, prepare};
use crate::cli::{ProblemArgs, SettingsArgs};
use crate::config::CliConfig;

/// Output switches of the run command.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunFlags {
    /// Record states alongside energies.
    pub record_states: bool,
    /// Plain progress lines on stdout.
    pub plain: bool,
}

/// Execute the run command.
pub fn execute(
    mut config: CliConfig,
    optimizer: Option<&str>,
    problem: &ProblemArgs,
    settings: &SettingsArgs,
    flags: RunFlags,
    output: Option<&Path>,
) -> Result<RunOutcome> {
    if let Some(name) = optimizer {
        config.optimizer.name = name.to_string();
    }
    settings.apply(&mut config);
    let config = configure(config, problem)?;
    let (mut cost, initial) = prepare(&config, problem.random_init)?;
    let name = config.optimizer.name.clone();

    println!(
        "{} Optimizing {} with {} from {:?}",
        style("→").cyan().bold(),
        style(&config.problem.hamiltonian).green(),
        style(&name).yellow(),
        initial
    );

    let outcome = if flags.plain {
        optimize(&config, &name, &mut cost, &initial, flags.record_states, ConsoleObserver)?
    } else {
        optimize(&config, &name, &mut cost, &initial, flags.record_states, TracingObserver)?
    };
    info!(circuits = cost.circuit_evaluations(), "device usage");

    if !flags.plain {
        let mark = if outcome.converged() {
            style("✓").green().bold()
        } else {
            style("!").yellow().bold()
        };
        println!("{} Final value of the energy = {:.8}", mark, outcome.final_energy);
        println!("  Number of iterations = {}", outcome.iterations);
    }

    if let Some(path) = output {
        export::to_file(&outcome, path, &ExportConfig::default())?;
        println!("  Wrote {}", style(path.display()).green());
    }

    Ok(outcome)
}
