//! Block reward operator CLI
//!
//! Computes the deferred reward of a block from a header, an optional staking
//! snapshot and the chain configuration, and inspects configuration values.

mod commands;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};
use settings::AppConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "blockreward")]
#[command(about = "Deferred block reward computation", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file (environment overrides use the BLOCKREWARD_ prefix)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the reward of one block and print it as JSON
    Compute {
        /// Header JSON file
        #[arg(long, value_name = "PATH")]
        header: PathBuf,
        /// Staking snapshot JSON file
        #[arg(long, value_name = "PATH")]
        staking: Option<PathBuf>,
        /// Run only the deferred computation and log its duration
        #[arg(long)]
        deferred_only: bool,
    },
    /// Check fork ordering and reward ratios
    ValidateConfig,
    /// Parse a `/`-separated ratio
    ParseRatio {
        ratio: String,
        /// Expected number of terms
        #[arg(long, default_value_t = 3)]
        parts: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config);

    let output = match cli.command {
        Commands::Compute {
            header,
            staking,
            deferred_only,
        } => commands::compute(&config, &header, staking.as_deref(), deferred_only)?,
        Commands::ValidateConfig => commands::validate(&config)?,
        Commands::ParseRatio { ratio, parts } => commands::ratio(&ratio, parts)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "compact" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
