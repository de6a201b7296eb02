//! `pbaesa` command-line entry point.
//!
//! Loads `pbaesa-config.yaml` (defaults when the file is absent), sets up
//! logging from its `logging` section, and dispatches to a subcommand:
//!
//! - `build` exports the allocation-factor table of one year
//! - `factor` looks up one allocation factor
//! - `exploit` prints the exploitation of the safe operating space
//! - `thresholds` prints the configured boundary budgets

mod commands;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pbaesa_core::{AssessmentConfig, LogFormat, LoggingConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    ExploitArgs, FactorArgs, run_build, run_exploit, run_factor, run_thresholds,
};

/// Planetary-boundary assessments and EXIOBASE allocation factors.
#[derive(Parser, Debug)]
#[command(name = "pbaesa", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, global = true, default_value = "pbaesa-config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build and persist the allocation-factor table of a year.
    Build {
        /// Reference year of the input-output tables.
        #[arg(long)]
        year: u16,
    },

    /// Look up an allocation factor.
    Factor(FactorArgs),

    /// Compute the exploitation of the safe operating space.
    Exploit(ExploitArgs),

    /// Print the configured safe operating space.
    Thresholds,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = load_config(&cli.config);
    let logging = config
        .as_ref()
        .map_or_else(|_| LoggingConfig::default(), |c| c.logging.clone());
    init_tracing(&logging);

    let result = config.and_then(|config| {
        info!(config = %cli.config.display(), "pbaesa starting");
        match cli.command {
            Commands::Build { year } => run_build(&config, year),
            Commands::Factor(args) => run_factor(&config, &args),
            Commands::Exploit(args) => run_exploit(&config, &args),
            Commands::Thresholds => {
                run_thresholds(&config);
                Ok(())
            }
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Read the configuration file, or fall back to defaults plus environment
/// overrides when it does not exist.
fn load_config(path: &Path) -> anyhow::Result<AssessmentConfig> {
    if path.exists() {
        Ok(AssessmentConfig::from_file(path)?)
    } else {
        let mut config = AssessmentConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

/// Initialize structured logging. `RUST_LOG` takes precedence over the
/// configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
