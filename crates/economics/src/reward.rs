//! The per-block reward result.

use blockreward_types::{Address, Amount};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Recipient → credited amount.
pub type Rewards = HashMap<Address, Amount>;

/// Pool totals and final credits for one block.
///
/// `rewards` is what gets applied to balances. It holds the proposer pool
/// under the block's rewardbase, the treasury pools under their configured
/// addresses and one entry per staking share; credits to a shared address
/// are summed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSpec {
    /// Newly minted amount.
    #[serde(with = "blockreward_types::amount")]
    pub minted: Amount,
    /// Total transaction fee before burning.
    #[serde(with = "blockreward_types::amount")]
    pub fee: Amount,
    #[serde(with = "blockreward_types::amount")]
    pub burnt: Amount,
    #[serde(with = "blockreward_types::amount")]
    pub proposer: Amount,
    /// Amount actually paid out as staking shares.
    #[serde(with = "blockreward_types::amount")]
    pub stakers: Amount,
    #[serde(with = "blockreward_types::amount")]
    pub treasury_a: Amount,
    #[serde(with = "blockreward_types::amount")]
    pub treasury_b: Amount,
    #[serde(with = "blockreward_types::amount::map")]
    pub rewards: Rewards,
}

impl RewardSpec {
    /// `proposer + stakers + treasury_a + treasury_b`.
    pub fn pool_total(&self) -> BigUint {
        &self.proposer + &self.stakers + &self.treasury_a + &self.treasury_b
    }

    /// Sum of every credit in `rewards`.
    pub fn rewards_total(&self) -> BigUint {
        self.rewards.values().sum()
    }

    pub fn reward_of(&self, addr: &Address) -> Option<&Amount> {
        self.rewards.get(addr)
    }
}

/// Add `amount` to `addr`'s entry, creating it if needed.
pub fn increment(rewards: &mut Rewards, addr: Address, amount: &BigUint) {
    *rewards.entry(addr).or_default() += amount;
}
