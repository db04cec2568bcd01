//! Allocation of the stakers pool across consolidated staking nodes.

use crate::staking::StakingSnapshot;
use blockreward_types::{Address, ProtocolParameters};
use num_bigint::BigUint;
use num_traits::Zero;
use std::collections::HashMap;
use tracing::debug;

/// Reward address → staking share.
pub type StakeShares = HashMap<Address, BigUint>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareAllocation {
    /// Only non-zero shares are present.
    pub shares: StakeShares,
    /// `staker_pool - sum(shares)`; never negative.
    pub remainder: BigUint,
}

impl ShareAllocation {
    pub fn distributed(&self) -> BigUint {
        self.shares.values().sum()
    }
}

/// Divide `staker_pool` among nodes staking more than `minimum_stake`, in
/// proportion to the stake above the minimum.
///
/// Without a snapshot, or without any qualifying node, the whole pool is
/// returned as remainder.
pub fn allocate_shares(
    params: &ProtocolParameters,
    snapshot: Option<&StakingSnapshot>,
    staker_pool: &BigUint,
) -> ShareAllocation {
    let Some(snapshot) = snapshot else {
        return ShareAllocation {
            shares: StakeShares::new(),
            remainder: staker_pool.clone(),
        };
    };

    let minimum_stake = u128::from(params.minimum_stake);
    let qualifying: Vec<(Address, u128)> = snapshot
        .consolidated_nodes()
        .into_iter()
        .filter(|node| node.staking_amount > minimum_stake)
        .map(|node| (node.reward_addr, node.staking_amount - minimum_stake))
        .collect();

    let total_excess: BigUint = qualifying.iter().map(|(_, excess)| BigUint::from(*excess)).sum();
    let mut shares = StakeShares::new();
    let mut remainder = staker_pool.clone();

    if !total_excess.is_zero() {
        for (reward_addr, excess) in qualifying {
            let share = staker_pool * excess / &total_excess;
            remainder -= &share;
            if !share.is_zero() {
                shares.insert(reward_addr, share);
            }
        }
    }

    debug!(
        target: "reward",
        minimum_stake = params.minimum_stake,
        %staker_pool,
        %remainder,
        recipients = shares.len(),
        "stake shares"
    );

    ShareAllocation { shares, remainder }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staking::StakingEntry;

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    fn params(minimum_stake: u64) -> ProtocolParameters {
        ProtocolParameters {
            minimum_stake,
            ..Default::default()
        }
    }

    fn snapshot(stakes: &[(u8, u64)]) -> StakingSnapshot {
        StakingSnapshot {
            nodes: stakes
                .iter()
                .map(|(b, amount)| StakingEntry {
                    node_id: addr(*b),
                    reward_addr: addr(b + 100),
                    staking_amount: *amount,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn n(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn shares_follow_excess_stake() {
        let snap = snapshot(&[(1, 1100), (2, 1300)]);
        let alloc = allocate_shares(&params(1000), Some(&snap), &n(40));
        assert_eq!(alloc.shares.get(&addr(101)), Some(&n(10)));
        assert_eq!(alloc.shares.get(&addr(102)), Some(&n(30)));
        assert_eq!(alloc.remainder, n(0));
    }

    #[test]
    fn missing_snapshot_returns_whole_pool() {
        let alloc = allocate_shares(&params(1000), None, &n(40));
        assert!(alloc.shares.is_empty());
        assert_eq!(alloc.remainder, n(40));
    }

    #[test]
    fn nodes_at_or_below_minimum_are_excluded() {
        let snap = snapshot(&[(1, 1000), (2, 999)]);
        let alloc = allocate_shares(&params(1000), Some(&snap), &n(40));
        assert!(alloc.shares.is_empty());
        assert_eq!(alloc.remainder, n(40));
    }

    #[test]
    fn zero_shares_are_omitted_and_remainder_kept() {
        // excess 1 and 1000: pool 10 -> floor(10/1001) = 0 and floor(10000/1001) = 9
        let snap = snapshot(&[(1, 1001), (2, 2000)]);
        let alloc = allocate_shares(&params(1000), Some(&snap), &n(10));
        assert!(!alloc.shares.contains_key(&addr(101)));
        assert_eq!(alloc.shares.get(&addr(102)), Some(&n(9)));
        assert_eq!(alloc.remainder, n(1));
        assert_eq!(alloc.distributed() + &alloc.remainder, n(10));
    }

    #[test]
    fn consolidated_nodes_receive_one_share() {
        let mut snap = snapshot(&[(1, 1100), (2, 1300)]);
        snap.nodes.push(StakingEntry {
            node_id: addr(3),
            reward_addr: addr(101),
            staking_amount: 200,
        });
        // addr(101) consolidates to 1300 -> excess 300, addr(102) excess 300
        let alloc = allocate_shares(&params(1000), Some(&snap), &n(40));
        assert_eq!(alloc.shares.get(&addr(101)), Some(&n(20)));
        assert_eq!(alloc.shares.get(&addr(102)), Some(&n(20)));
        assert_eq!(alloc.shares.len(), 2);
    }

    #[test]
    fn merged_stakes_above_u64_keep_their_weight() {
        let mut snap = snapshot(&[(1, u64::MAX), (2, u64::MAX)]);
        snap.nodes.push(StakingEntry {
            node_id: addr(3),
            reward_addr: addr(101),
            staking_amount: u64::MAX,
        });
        // addr(101) holds twice addr(102)'s stake
        let alloc = allocate_shares(&params(0), Some(&snap), &n(30));
        assert_eq!(alloc.shares.get(&addr(101)), Some(&n(20)));
        assert_eq!(alloc.shares.get(&addr(102)), Some(&n(10)));
        assert_eq!(alloc.remainder, n(0));
    }
}
