//! `vqe` command-line interface.
//!
//! ```text
//! vqe run --optimizer QNGOptimizer --step-size 0.01 --max-iter 500
//! vqe compare --initial 0.011,0.012 --stride 10 -o comparison.json
//! vqe landscape --resolution 100 -o landscape.json
//! ```

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use vqe_cli::commands::compare::CompareOptions;
use vqe_cli::commands::run::RunFlags;
use vqe_cli::commands::{compare, landscape, run};
use vqe_cli::{Cli, CliConfig, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            std::process::exit(2);
        }
    };

    // -v flags win over the configured level.
    let filter = match cli.verbose {
        0 => config.log_level.clone().unwrap_or_else(|| "warn".to_string()),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run {
            optimizer,
            problem,
            settings,
            record_states,
            plain,
            output,
        } => run::execute(
            config,
            optimizer.as_deref(),
            &problem,
            &settings,
            RunFlags {
                record_states,
                plain,
            },
            output.as_deref(),
        )
        .map(drop),

        Commands::Compare {
            problem,
            settings,
            stride,
            resolution,
            no_landscape,
            output,
        } => compare::execute(
            config,
            &problem,
            &settings,
            CompareOptions {
                stride,
                resolution,
                landscape: !no_landscape,
            },
            &output,
        )
        .map(drop),

        Commands::Landscape {
            problem,
            resolution,
            lo,
            hi,
            output,
        } => landscape::execute(config, &problem, resolution, (lo, hi), output.as_deref()).map(drop),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
