//! Reward Pool Module
//!
//! Applies computed per-block reward tables to account balances and stages
//! tables for blocks whose rewards are settled later.

use crate::account_ledger::BalanceAdder;
use anyhow::{Context, Result};
use blockreward_economics::{RewardSpec, Rewards};
use blockreward_types::{Address, Amount, BlockNumber};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("rewards for block {0} are already staged")]
    AlreadyStaged(BlockNumber),
    #[error("rewards for block {block} are already settled (through {settled_through})")]
    AlreadySettled {
        block: BlockNumber,
        settled_through: BlockNumber,
    },
}

/// Credit every entry of `rewards` to `ledger`, in ascending address order.
///
/// Returns the total credited. Credits are not rolled back if the ledger
/// rejects one part way through; [`RewardSink`] keeps track of what is still
/// owed in that case.
pub fn apply_rewards(ledger: &mut dyn BalanceAdder, rewards: &Rewards) -> Result<Amount> {
    let mut entries: Vec<(&Address, &Amount)> = rewards.iter().collect();
    entries.sort_by_key(|(addr, _)| **addr);

    let mut total = BigUint::zero();
    for (addr, amount) in entries {
        ledger.add_balance(addr, amount)?;
        total += amount;
        debug!(target: "treasury", "Credited {} to {}", amount, addr);
    }
    Ok(total)
}

/// Staged reward tables awaiting settlement.
///
/// Settlement removes each entry as soon as the ledger accepts it, so a
/// failed settlement leaves exactly the uncredited remainder staged.
#[derive(Debug, Clone, Default)]
pub struct RewardSink {
    /// block number → (recipient → amount still owed)
    blocks: BTreeMap<BlockNumber, Rewards>,
    /// Highest block whose rewards (and all earlier staged ones) are fully settled
    settled_through: Option<BlockNumber>,
    /// Total staged across all blocks since creation
    total_staged: Amount,
}

impl RewardSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the reward table of a finalized block.
    ///
    /// Empty tables are recorded too, so a block can only be staged once.
    pub fn credit_block_rewards(&mut self, block: BlockNumber, spec: &RewardSpec) -> Result<()> {
        if self.blocks.contains_key(&block) {
            return Err(TreasuryError::AlreadyStaged(block).into());
        }
        if let Some(settled_through) = self.settled_through.filter(|s| block <= *s) {
            return Err(TreasuryError::AlreadySettled {
                block,
                settled_through,
            }
            .into());
        }

        let block_total = spec.rewards_total();
        self.total_staged += &block_total;
        self.blocks.insert(block, spec.rewards.clone());

        info!(
            target: "treasury",
            "Block {}: Staged {} across {} recipients",
            block,
            block_total,
            spec.rewards.len()
        );
        Ok(())
    }

    pub fn is_pending(&self, block: BlockNumber) -> bool {
        self.blocks.contains_key(&block)
    }

    /// Total still owed to `addr` across all pending blocks.
    pub fn recipient_total(&self, addr: &Address) -> Amount {
        self.blocks.values().filter_map(|r| r.get(addr)).sum()
    }

    pub fn get_block_rewards(&self, block: BlockNumber) -> Option<&Rewards> {
        self.blocks.get(&block)
    }

    /// Pending block numbers, ascending.
    pub fn pending_blocks(&self) -> Vec<BlockNumber> {
        self.blocks.keys().copied().collect()
    }

    pub fn settled_through(&self) -> Option<BlockNumber> {
        self.settled_through
    }

    pub fn total_staged(&self) -> &Amount {
        &self.total_staged
    }

    /// Credit every pending block up to and including `up_to_block`, oldest
    /// first and in ascending address order within a block.
    ///
    /// Credited entries and fully settled blocks are removed as they go. On a
    /// ledger error the failing entry and everything after it stay pending.
    pub fn settle_to_accounts(
        &mut self,
        ledger: &mut dyn BalanceAdder,
        up_to_block: BlockNumber,
    ) -> Result<Amount> {
        let mut total_settled = BigUint::zero();
        let due: Vec<BlockNumber> = self.blocks.range(..=up_to_block).map(|(b, _)| *b).collect();

        for block in &due {
            let Some(rewards) = self.blocks.get_mut(block) else {
                continue;
            };
            let mut recipients: Vec<Address> = rewards.keys().copied().collect();
            recipients.sort();

            for addr in recipients {
                let Some(amount) = rewards.get(&addr) else {
                    continue;
                };
                ledger
                    .add_balance(&addr, amount)
                    .with_context(|| format!("settling block {block}"))?;
                total_settled += amount;
                debug!(target: "treasury", "Credited {} to {} for block {}", amount, addr, block);
                rewards.remove(&addr);
            }

            self.blocks.remove(block);
            self.settled_through = self.settled_through.max(Some(*block));
        }

        info!(
            target: "treasury",
            "Settled {} across {} blocks to accounts",
            total_settled,
            due.len()
        );
        Ok(total_settled)
    }

    pub fn get_statistics(&self) -> RewardPoolStatistics {
        let pending_blocks = self.blocks.len();
        let recipients = self
            .blocks
            .values()
            .flat_map(|r| r.keys())
            .collect::<HashSet<_>>()
            .len();
        let pending_total: Amount = self.blocks.values().flat_map(|r| r.values()).sum();

        RewardPoolStatistics {
            pending_blocks,
            recipients,
            average_per_block: if pending_blocks > 0 {
                &pending_total / BigUint::from(pending_blocks)
            } else {
                BigUint::zero()
            },
            pending_total,
            total_staged: self.total_staged.clone(),
        }
    }
}

/// Summary of the staged rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPoolStatistics {
    pub pending_blocks: usize,
    pub recipients: usize,
    #[serde(with = "blockreward_types::amount")]
    pub pending_total: Amount,
    #[serde(with = "blockreward_types::amount")]
    pub total_staged: Amount,
    #[serde(with = "blockreward_types::amount")]
    pub average_per_block: Amount,
}

/// Stages each block's rewards and settles them straight into a ledger.
pub struct RewardPoolManager<L> {
    sink: RewardSink,
    ledger: L,
}

impl<L: BalanceAdder> RewardPoolManager<L> {
    pub fn new(ledger: L) -> Self {
        Self {
            sink: RewardSink::new(),
            ledger,
        }
    }

    /// Stage and settle one block's rewards.
    ///
    /// A block left pending by a failed settlement is resumed rather than
    /// staged again; only what it still owes is credited.
    pub fn process_block_rewards(
        &mut self,
        block: BlockNumber,
        spec: &RewardSpec,
    ) -> Result<Amount> {
        if self.sink.is_pending(block) {
            info!(target: "treasury", "Block {}: Resuming settlement", block);
        } else {
            self.sink.credit_block_rewards(block, spec)?;
        }
        self.sink.settle_to_accounts(&mut self.ledger, block)
    }

    pub fn get_sink(&self) -> &RewardSink {
        &self.sink
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }
}
