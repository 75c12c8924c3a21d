//! Compare command implementation.
//!
//! Runs both optimizers from the same starting point and writes a plot
//! bundle with the landscape and one trace per optimizer.

use std::path::Path;

use anyhow::Result;
use console::style;
use tracing::warn;

use vqe_core::{OptimizerKind, TracingObserver};
use vqe_viz::export::{self, ExportConfig};
use vqe_viz::landscape::DEFAULT_RANGE;
use vqe_viz::{Landscape, PlotBundle, Trace};

use super::{configure, optimize, prepare};
use crate::cli::{ProblemArgs, SettingsArgs};
use crate::config::CliConfig;

const TRACES: [(OptimizerKind, &str, &str); 2] = [
    (OptimizerKind::GradientDescent, "Gradient descent", "g"),
    (
        OptimizerKind::NaturalGradient,
        "Quantum natural gradient descent",
        "k",
    ),
];

/// Plot-bundle options.
#[derive(Debug, Clone, Copy)]
pub struct CompareOptions {
    /// Marker thinning interval.
    pub stride: usize,
    /// Landscape grid points per axis.
    pub resolution: usize,
    /// Whether to sample the landscape.
    pub landscape: bool,
}

/// Execute the compare command.
pub fn execute(
    mut config: CliConfig,
    problem: &ProblemArgs,
    settings: &SettingsArgs,
    options: CompareOptions,
    output: &Path,
) -> Result<PlotBundle> {
    settings.apply(&mut config);
    let config = configure(config, problem)?;
    let (cost, initial) = prepare(&config, problem.random_init)?;
    // Bloch paths only exist for one qubit.
    let record_states = cost.ansatz().num_qubits() == 1;

    println!(
        "{} Comparing optimizers on {} from {:?}",
        style("→").cyan().bold(),
        style(&config.problem.hamiltonian).green(),
        initial
    );

    let mut bundle = PlotBundle::new();
    for (kind, label, color) in TRACES {
        let mut run_cost = cost.clone();
        let outcome = optimize(
            &config,
            kind.name(),
            &mut run_cost,
            &initial,
            record_states,
            TracingObserver,
        )?;
        println!(
            "  {}: E = {:.8}, iterations = {}",
            style(kind.name()).yellow(),
            outcome.final_energy,
            outcome.iterations
        );
        bundle = bundle.with_trace(Trace::from_outcome(label, color, &outcome, options.stride)?);
    }

    if options.landscape {
        if initial.len() == 2 {
            let landscape = Landscape::compute(&mut cost.clone(), options.resolution, DEFAULT_RANGE)?;
            bundle = bundle.with_landscape(landscape);
        } else {
            warn!(
                num_params = initial.len(),
                "landscape needs exactly two parameters, skipping"
            );
        }
    }

    export::to_file(&bundle, output, &ExportConfig::default())?;
    println!("  Wrote {}", style(output.display()).green());
    Ok(bundle)
}
