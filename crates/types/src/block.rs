use crate::address::Address;
use crate::amount::Amount;
use serde::{Deserialize, Serialize};

/// Height of a block in the canonical chain.
pub type BlockNumber = u64;

/// The header fields consumed by reward computation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    /// Block height, used to resolve fork regimes and per-block snapshots.
    pub number: BlockNumber,
    /// Total gas consumed by the block's transactions.
    pub gas_used: u64,
    /// Per-gas base fee; only present once base-fee pricing is active.
    #[serde(
        default,
        with = "crate::amount::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub base_fee: Option<Amount>,
    /// Address credited with the proposer's reward.
    pub rewardbase: Address,
}

impl Header {
    pub fn new(number: BlockNumber, gas_used: u64, rewardbase: Address) -> Self {
        Self {
            number,
            gas_used,
            base_fee: None,
            rewardbase,
        }
    }

    pub fn with_base_fee(mut self, base_fee: impl Into<Amount>) -> Self {
        self.base_fee = Some(base_fee.into());
        self
    }
}
