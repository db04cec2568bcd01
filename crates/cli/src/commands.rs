//! Subcommand handlers. Each returns the JSON document to print.

use crate::settings::AppConfig;
use anyhow::{Context, Result};
use blockreward_economics::{
    parse_ratio, validate_config, ForkSchedule, RewardDistributor, StakingSnapshot,
    StaticStaking,
};
use blockreward_types::Header;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::info;

fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid {what} in {}", path.display()))
}

/// Reward for the block described by `header_path`.
///
/// With `deferred_only` the proposer-policy dispatch and fee compensation are
/// skipped and the computation time is logged.
pub fn compute(
    cfg: &AppConfig,
    header_path: &Path,
    staking_path: Option<&Path>,
    deferred_only: bool,
) -> Result<Value> {
    validate_config(&cfg.chain).context("configuration rejected")?;

    let header: Header = read_json(header_path, "header")?;
    let staking = match staking_path {
        Some(path) => StaticStaking::new(read_json::<StakingSnapshot>(path, "staking snapshot")?),
        None => StaticStaking(None),
    };
    let regime = cfg.chain.regime_at(header.number)?;
    let distributor = RewardDistributor::new(cfg.chain.clone(), staking);

    let spec = if deferred_only {
        let (spec, elapsed) = distributor.deferred_reward_timed(&header, &cfg.chain)?;
        info!(
            block = header.number,
            ?regime,
            elapsed_us = elapsed.as_micros() as u64,
            "Computed deferred reward"
        );
        spec
    } else {
        let spec = distributor.block_reward(&header, &cfg.chain)?;
        info!(block = header.number, ?regime, "Computed block reward");
        spec
    };

    Ok(serde_json::to_value(&spec)?)
}

pub fn validate(cfg: &AppConfig) -> Result<Value> {
    validate_config(&cfg.chain)?;
    Ok(json!({
        "valid": true,
        "chain_id": cfg.chain.chain_id,
        "magma_compatible_block": cfg.chain.magma_compatible_block,
        "kore_compatible_block": cfg.chain.kore_compatible_block,
    }))
}

pub fn ratio(ratio: &str, parts: usize) -> Result<Value> {
    let parsed = parse_ratio(ratio, parts)?;
    Ok(json!({
        "ratio": parsed.as_str(),
        "weights": parsed.weights(),
        "total": parsed.total().to_string(),
    }))
}
