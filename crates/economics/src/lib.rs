//! Deferred block reward economics.
//!
//! Divides a block's reward (minted amount plus collected fees, minus burns)
//! among the proposer, the staking nodes and two treasury pools. Every node
//! must reach byte-identical results, so all arithmetic is integer-only and
//! every truncation remainder is reassigned explicitly:
//!
//! - fee accounting and burns ([`fee`])
//! - pool split, legacy or three-way depending on the fork regime ([`split`])
//! - proportional stake shares ([`shares`])
//! - remainder folding and treasury fallbacks ([`aggregate`])
//! - policy dispatch and fee compensation ([`distributor`])

pub mod aggregate;
pub mod distributor;
pub mod errors;
pub mod fee;
pub mod fork;
pub mod ratio;
pub mod reward;
pub mod shares;
pub mod split;
pub mod staking;

pub use aggregate::aggregate;
pub use distributor::*;
pub use errors::*;
pub use fee::{deferred_fee_split, total_fee, FeeSplit};
pub use fork::{ForkRegime, ForkSchedule};
pub use ratio::{parse_ratio, Ratio, POOL_RATIO_PARTS, PROPOSER_STAKER_RATIO_PARTS};
pub use reward::{RewardSpec, Rewards};
pub use shares::{allocate_shares, ShareAllocation, StakeShares};
pub use split::{split, PoolSplit};
pub use staking::{ConsolidatedNode, StakingEntry, StakingSnapshot};

use blockreward_types::ChainConfig;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Check a chain configuration before use: fork ordering, and that both
/// genesis ratios parse with the right number of non-zero-total terms.
pub fn validate_config(config: &ChainConfig) -> Result<(), ValidationError> {
    config.validate()?;
    let reward = &config.governance.reward;
    for (ratio, parts) in [
        (&reward.ratio, POOL_RATIO_PARTS),
        (&reward.proposer_staker_ratio, PROPOSER_STAKER_RATIO_PARTS),
    ] {
        if parse_ratio(ratio, parts)?.total() == 0 {
            return Err(RewardError::ZeroRatioTotal {
                ratio: ratio.clone(),
            }
            .into());
        }
    }
    Ok(())
}
