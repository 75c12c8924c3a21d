//! Library half of the `vqe` binary: argument definitions, configuration
//! loading and the subcommand implementations.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Commands, ProblemArgs, SettingsArgs};
pub use config::{AnsatzSpec, CliConfig, OptimizerSection, ProblemConfig};
