//! Landscape command implementation.

use std::path::Path;

use anyhow::{Result, bail};
use console::style;

use vqe_viz::Landscape;
use vqe_viz::export::{self, ExportConfig};
use vqe_viz::landscape::DEFAULT_RANGE;

use super::configure;
use crate::cli::ProblemArgs;
use crate::config::CliConfig;

/// Execute the landscape command.
pub fn execute(
    config: CliConfig,
    problem: &ProblemArgs,
    resolution: usize,
    range: (f64, Option<f64>),
    output: Option<&Path>,
) -> Result<Landscape> {
    let config = configure(config, problem)?;
    let mut cost = config.problem.cost()?;
    let num_params = cost.ansatz().num_params();
    if num_params != 2 {
        bail!("landscape needs a two-parameter ansatz, this one has {num_params}");
    }
    let range = (range.0, range.1.unwrap_or(DEFAULT_RANGE.1));
    let landscape = Landscape::compute(&mut cost, resolution, range)?;

    match output {
        Some(path) => {
            export::to_file(&landscape, path, &ExportConfig::default())?;
            eprintln!(
                "{} Wrote {}x{} grid to {}",
                style("✓").green().bold(),
                resolution,
                resolution,
                style(path.display()).green()
            );
        }
        None => println!("{}", export::to_json(&landscape, &ExportConfig::default())?),
    }
    Ok(landscape)
}
