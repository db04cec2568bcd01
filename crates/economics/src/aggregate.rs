//! Merging of split and share results into the final reward table.
//!
//! The order below is fixed; changing it changes integer outputs:
//!
//! 1. split remainder → treasury A
//! 2. share remainder → proposer
//! 3. unset treasury A / treasury B → proposer (each independently)
//! 4. credit proposer, treasuries and shares

use crate::fee::FeeSplit;
use crate::reward::{increment, RewardSpec, Rewards};
use crate::shares::ShareAllocation;
use crate::split::PoolSplit;
use crate::staking::StakingSnapshot;
use blockreward_types::Address;
use num_bigint::BigUint;
use tracing::debug;

pub fn aggregate(
    rewardbase: Address,
    minted: &BigUint,
    fee: FeeSplit,
    split: PoolSplit,
    allocation: ShareAllocation,
    snapshot: Option<&StakingSnapshot>,
) -> RewardSpec {
    // The share remainder moves to `proposer`; stakers report what was paid.
    let stakers = allocation.distributed();
    let PoolSplit {
        mut proposer,
        stakers: _,
        mut treasury_a,
        mut treasury_b,
        remainder,
    } = split;
    let ShareAllocation {
        shares,
        remainder: share_remainder,
    } = allocation;

    treasury_a += remainder;
    proposer += &share_remainder;

    let treasury_a_addr = snapshot.and_then(StakingSnapshot::treasury_a);
    let treasury_b_addr = snapshot.and_then(StakingSnapshot::treasury_b);

    if treasury_a_addr.is_none() {
        debug!(target: "reward", %treasury_a, "treasury A unset, proposer gets its portion");
        proposer += std::mem::take(&mut treasury_a);
    }
    if treasury_b_addr.is_none() {
        debug!(target: "reward", %treasury_b, "treasury B unset, proposer gets its portion");
        proposer += std::mem::take(&mut treasury_b);
    }

    let mut rewards = Rewards::new();
    increment(&mut rewards, rewardbase, &proposer);
    if let Some(addr) = treasury_a_addr {
        increment(&mut rewards, addr, &treasury_a);
    }
    if let Some(addr) = treasury_b_addr {
        increment(&mut rewards, addr, &treasury_b);
    }
    for (addr, share) in &shares {
        increment(&mut rewards, *addr, share);
    }

    RewardSpec {
        minted: minted.clone(),
        fee: fee.total,
        burnt: fee.burnt,
        proposer,
        stakers,
        treasury_a,
        treasury_b,
        rewards,
    }
}
