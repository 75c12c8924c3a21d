//! Experiment configuration.
//!
//! Precedence, lowest first: built-in defaults, YAML file (`--config`),
//! `VQE_*` environment variables, command-line flags.
//!
//! ```yaml
//! optimizer:
//!   name: QNGOptimizer
//!   step_size: 0.01
//!   diag_approx: false
//! run:
//!   max_iter: 500
//!   conv_tol: 1.0e-6
//!   print_freq: 20
//! problem:
//!   hamiltonian: "1.0 * X0 + 1.0 * Z0"
//!   initial_params: [0.011, 0.012]
//!   ansatz: single_qubit
//! log_level: info
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use vqe_core::{OptimizerConfig, OptimizerKind, RunConfig};
use vqe_device::{Ansatz, ExpectationCost, Hamiltonian};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Optimizer selection and settings.
    #[serde(default)]
    pub optimizer: OptimizerSection,
    /// Convergence loop settings.
    #[serde(default)]
    pub run: RunConfig,
    /// What to optimize.
    #[serde(default)]
    pub problem: ProblemConfig,
    /// Log filter used when no `-v` flag is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Optimizer name plus its settings.
///
/// On disk the settings sit beside `name` in one flat, strict mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OptimizerFields", into = "OptimizerFields")]
pub struct OptimizerSection {
    /// `GradientDescentOptimizer` or `QNGOptimizer`.
    pub name: String,
    /// Step size, metric approximation, regularizer.
    pub settings: OptimizerConfig,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct OptimizerFields {
    #[serde(default = "default_optimizer_name")]
    name: String,
    #[serde(default = "default_step_size")]
    step_size: f64,
    #[serde(default)]
    diag_approx: bool,
    #[serde(default)]
    lam: f64,
}

fn default_optimizer_name() -> String {
    OptimizerKind::GradientDescent.name().to_string()
}

fn default_step_size() -> f64 {
    OptimizerConfig::default().step_size
}

impl From<OptimizerFields> for OptimizerSection {
    fn from(fields: OptimizerFields) -> Self {
        Self {
            name: fields.name,
            settings: OptimizerConfig::new(fields.step_size)
                .with_diag_approx(fields.diag_approx)
                .with_lam(fields.lam),
        }
    }
}

impl From<OptimizerSection> for OptimizerFields {
    fn from(section: OptimizerSection) -> Self {
        Self {
            name: section.name,
            step_size: section.settings.step_size,
            diag_approx: section.settings.diag_approx,
            lam: section.settings.lam,
        }
    }
}

impl Default for OptimizerSection {
    fn default() -> Self {
        Self {
            name: default_optimizer_name(),
            settings: OptimizerConfig::default(),
        }
    }
}

/// Circuit family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnsatzSpec {
    /// RX(θ₀) RY(θ₁) on one qubit.
    #[default]
    SingleQubit,
    /// Alternating RY layers and CNOT chains.
    HardwareEfficient {
        /// Register width.
        num_qubits: usize,
        /// Entangling repetitions.
        reps: usize,
    },
}

impl AnsatzSpec {
    /// Build the circuit.
    pub fn build(&self) -> Result<Ansatz> {
        match *self {
            Self::SingleQubit => Ok(Ansatz::single_qubit()),
            Self::HardwareEfficient { num_qubits, reps } => {
                Ok(Ansatz::hardware_efficient(num_qubits, reps)?)
            }
        }
    }
}

/// The optimization problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemConfig {
    /// Hamiltonian in `"c * P + ..."` form.
    #[serde(default = "default_hamiltonian")]
    pub hamiltonian: String,
    /// Starting parameters.
    #[serde(default = "default_initial_params")]
    pub initial_params: Vec<f64>,
    /// Circuit family.
    #[serde(default)]
    pub ansatz: AnsatzSpec,
}

fn default_hamiltonian() -> String {
    "1.0 * X0 + 1.0 * Z0".to_string()
}

fn default_initial_params() -> Vec<f64> {
    vec![0.011, 0.012]
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            hamiltonian: default_hamiltonian(),
            initial_params: default_initial_params(),
            ansatz: AnsatzSpec::default(),
        }
    }
}

impl ProblemConfig {
    /// Build the expectation-value cost.
    pub fn cost(&self) -> Result<ExpectationCost> {
        let hamiltonian: Hamiltonian = self
            .hamiltonian
            .parse()
            .with_context(|| format!("invalid Hamiltonian '{}'", self.hamiltonian))?;
        Ok(ExpectationCost::new(self.ansatz.build()?, hamiltonian)?)
    }
}

impl CliConfig {
    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&contents).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parse YAML text.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(contents)?)
    }

    /// File (if any), then environment overrides.
    ///
    /// Not validated here: command-line flags still apply on top, and the
    /// commands validate the final result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.merge_env())
    }

    /// Apply `VQE_*` variables from the process environment.
    pub fn merge_env(self) -> Self {
        self.merge_env_from(|key| std::env::var(key).ok())
    }

    /// Apply `VQE_*` overrides from `lookup`.
    ///
    /// Unset or unparseable variables leave the current value unchanged.
    pub fn merge_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = lookup("VQE_MAX_ITER").and_then(|v| v.parse().ok()) {
            self.run.max_iter = val;
        }
        if let Some(val) = lookup("VQE_CONV_TOL").and_then(|v| v.parse().ok()) {
            self.run.conv_tol = val;
        }
        if let Some(val) = lookup("VQE_PRINT_FREQ").and_then(|v| v.parse().ok()) {
            self.run.print_freq = val;
        }
        if let Some(val) = lookup("VQE_STEP_SIZE").and_then(|v| v.parse().ok()) {
            self.optimizer.settings.step_size = val;
        }
        if let Some(name) = lookup("VQE_OPTIMIZER") {
            self.optimizer.name = name;
        }
        if let Some(level) = lookup("VQE_LOG_LEVEL") {
            self.log_level = Some(level);
        }
        self
    }

    /// Check every section before a run starts.
    pub fn validate(&self) -> Result<()> {
        self.optimizer
            .name
            .parse::<OptimizerKind>()
            .context("invalid optimizer.name")?;
        self.optimizer
            .settings
            .validate()
            .context("invalid optimizer settings")?;
        self.run.validate().context("invalid run settings")?;
        if self.problem.initial_params.is_empty() {
            bail!("problem.initial_params must not be empty");
        }
        if self.problem.initial_params.iter().any(|p| !p.is_finite()) {
            bail!("problem.initial_params must be finite");
        }
        Ok(())
    }
}
