//! Command-line definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::CliConfig;

/// VQE optimizer runs and comparisons on a reference statevector device
#[derive(Debug, Parser)]
#[command(name = "vqe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// YAML configuration file
    #[arg(short, long, global = true, env = "VQE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Optimize with one optimizer
    Run {
        /// Optimizer (GradientDescentOptimizer, QNGOptimizer)
        #[arg(long)]
        optimizer: Option<String>,

        #[command(flatten)]
        problem: ProblemArgs,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Record the state behind every recorded energy
        #[arg(long)]
        record_states: bool,

        /// Print progress as plain lines instead of log events
        #[arg(long)]
        plain: bool,

        /// Write the run outcome as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run both optimizers from the same start and export a plot bundle
    Compare {
        #[command(flatten)]
        problem: ProblemArgs,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Plot every n-th point as a marker
        #[arg(long, default_value = "10")]
        stride: usize,

        /// Landscape grid points per axis
        #[arg(long, default_value = "100")]
        resolution: usize,

        /// Skip the landscape grid
        #[arg(long)]
        no_landscape: bool,

        /// Bundle output file
        #[arg(short, long, default_value = "comparison.json")]
        output: PathBuf,
    },

    /// Sample the energy landscape of a two-parameter problem
    Landscape {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Grid points per axis
        #[arg(long, default_value = "100")]
        resolution: usize,

        /// Lower bound of both axes
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        lo: f64,

        /// Upper bound of both axes (default 2π)
        #[arg(long, allow_hyphen_values = true)]
        hi: Option<f64>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Problem overrides shared by all subcommands.
#[derive(Debug, Clone, Default, Args)]
pub struct ProblemArgs {
    /// Hamiltonian, e.g. "1.0 * X0 + 1.0 * Z0"
    #[arg(long)]
    pub hamiltonian: Option<String>,

    /// Initial parameters, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub initial: Option<Vec<f64>>,

    /// Draw initial parameters uniformly from [0, 2π) with this seed
    #[arg(long, conflicts_with = "initial")]
    pub random_init: Option<u64>,
}

/// Optimizer and loop overrides.
#[derive(Debug, Clone, Default, Args)]
pub struct SettingsArgs {
    /// Step size
    #[arg(long)]
    pub step_size: Option<f64>,

    /// Maximum number of update steps
    #[arg(long)]
    pub max_iter: Option<usize>,

    /// Absolute convergence tolerance
    #[arg(long)]
    pub conv_tol: Option<f64>,

    /// Progress interval, 0 for none
    #[arg(long)]
    pub print_freq: Option<usize>,

    /// Use the diagonal metric approximation (QNG)
    #[arg(long)]
    pub diag_approx: bool,

    /// Metric regularization (QNG)
    #[arg(long)]
    pub lam: Option<f64>,
}

impl ProblemArgs {
    /// Apply onto `config`.
    pub fn apply(&self, config: &mut CliConfig) {
        if let Some(h) = &self.hamiltonian {
            config.problem.hamiltonian.clone_from(h);
        }
        if let Some(initial) = &self.initial {
            config.problem.initial_params.clone_from(initial);
        }
    }
}

impl SettingsArgs {
    /// Apply onto `config`.
    pub fn apply(&self, config: &mut CliConfig) {
        if let Some(v) = self.step_size {
            config.optimizer.settings.step_size = v;
        }
        if let Some(v) = self.max_iter {
            config.run.max_iter = v;
        }
        if let Some(v) = self.conv_tol {
            config.run.conv_tol = v;
        }
        if let Some(v) = self.print_freq {
            config.run.print_freq = v;
        }
        if self.diag_approx {
            config.optimizer.settings.diag_approx = true;
        }
        if let Some(v) = self.lam {
            config.optimizer.settings.lam = v;
        }
    }
}
