//! Governance reward parameters.
//!
//! A [`ProtocolParameters`] value is a point-in-time snapshot of the reward
//! related governance parameters for one block. It is supplied by the
//! governance layer and is read-only to reward computation.

use crate::amount::Amount;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Smallest unit per whole token (18 decimals).
pub const UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Default per-block minting amount: 9.6 tokens.
pub const DEFAULT_MINTING_AMOUNT: u128 = 9_600_000_000_000_000_000;

/// Default pool split: proposer group / treasury A / treasury B.
pub const DEFAULT_RATIO: &str = "34/54/12";

/// Default proposer / stakers sub-split of the proposer group.
pub const DEFAULT_PROPOSER_STAKER_RATIO: &str = "20/80";

/// Default minimum qualifying stake, in whole tokens.
pub const DEFAULT_MINIMUM_STAKE: u64 = 5_000_000;

/// Default legacy fixed gas price: 25 gwei-equivalent.
pub const DEFAULT_UNIT_PRICE: u64 = 25_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolParameters {
    /// Newly issued amount per block, in the smallest unit.
    #[serde(with = "crate::amount")]
    pub minting_amount: Amount,
    /// `"cn/treasuryA/treasuryB"` weights.
    pub ratio: String,
    /// `"proposer/stakers"` weights applied to the cn portion.
    pub proposer_staker_ratio: String,
    /// Stake (whole tokens) a node must exceed to earn a staking share.
    pub minimum_stake: u64,
    /// When false, transaction fees were already paid to the proposer during
    /// execution and are excluded from deferred accounting.
    pub deferred_tx_fee: bool,
    /// Fixed per-gas price used before base-fee pricing.
    pub unit_price: u64,
}

impl Default for ProtocolParameters {
    fn default() -> Self {
        Self {
            minting_amount: BigUint::from(DEFAULT_MINTING_AMOUNT),
            ratio: DEFAULT_RATIO.to_string(),
            proposer_staker_ratio: DEFAULT_PROPOSER_STAKER_RATIO.to_string(),
            minimum_stake: DEFAULT_MINIMUM_STAKE,
            deferred_tx_fee: true,
            unit_price: DEFAULT_UNIT_PRICE,
        }
    }
}
