//! Operator configuration: an optional TOML file plus `BLOCKREWARD_*`
//! environment overrides.

use anyhow::{Context, Result};
use blockreward_types::{ChainConfig, ConsensusConfig};
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::Path;

pub const ENV_PREFIX: &str = "BLOCKREWARD";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// `pretty` or `compact`.
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_chain")]
    pub chain: ChainConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_chain() -> ChainConfig {
    ChainConfig {
        consensus: Some(ConsensusConfig::default()),
        ..Default::default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            chain: default_chain(),
        }
    }
}

impl AppConfig {
    /// Load from `path` (if any), then apply environment overrides.
    ///
    /// Nested keys are separated by `__`, e.g.
    /// `BLOCKREWARD_CHAIN__GOVERNANCE__REWARD__RATIO=50/40/10`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                anyhow::bail!("configuration file {} does not exist", path.display());
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let settings = builder.build().context("failed to read configuration")?;
        settings
            .try_deserialize::<AppConfig>()
            .context("invalid configuration")
    }
}
