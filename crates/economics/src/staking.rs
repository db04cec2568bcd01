//! Per-block staking snapshot.

use blockreward_types::{Address, BlockNumber};
use serde::{Deserialize, Serialize};

/// One staking contract registered for a consensus node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingEntry {
    pub node_id: Address,
    pub reward_addr: Address,
    /// Staked amount in whole tokens.
    pub staking_amount: u64,
}

/// Staking entries that pay out to the same reward address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedNode {
    pub node_ids: Vec<Address>,
    pub reward_addr: Address,
    /// Sum of the merged stakes; wide enough that no sum of `u64` stakes clamps.
    pub staking_amount: u128,
}

/// Staking state captured at a block, plus the two treasury addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingSnapshot {
    pub block_num: BlockNumber,
    #[serde(default)]
    pub nodes: Vec<StakingEntry>,
    /// Treasury A recipient; the zero address means unset.
    #[serde(default)]
    pub treasury_a_addr: Address,
    /// Treasury B recipient; the zero address means unset.
    #[serde(default)]
    pub treasury_b_addr: Address,
}

impl StakingSnapshot {
    pub fn treasury_a(&self) -> Option<Address> {
        Some(self.treasury_a_addr).filter(|addr| !addr.is_empty())
    }

    pub fn treasury_b(&self) -> Option<Address> {
        Some(self.treasury_b_addr).filter(|addr| !addr.is_empty())
    }

    /// Merge entries by reward address, summing stakes. Nodes keep the order
    /// in which their reward address first appears.
    pub fn consolidated_nodes(&self) -> Vec<ConsolidatedNode> {
        let mut consolidated: Vec<ConsolidatedNode> = Vec::with_capacity(self.nodes.len());
        for entry in &self.nodes {
            match consolidated
                .iter_mut()
                .find(|node| node.reward_addr == entry.reward_addr)
            {
                Some(node) => {
                    node.node_ids.push(entry.node_id);
                    node.staking_amount += u128::from(entry.staking_amount);
                }
                None => consolidated.push(ConsolidatedNode {
                    node_ids: vec![entry.node_id],
                    reward_addr: entry.reward_addr,
                    staking_amount: u128::from(entry.staking_amount),
                }),
            }
        }
        consolidated
    }
}
