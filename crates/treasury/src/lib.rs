//! Reward treasury
//!
//! Applies computed block rewards to account balances and stages per-block
//! reward tables until they are settled.

pub mod account_ledger;
pub mod reward_pool;

pub use account_ledger::{BalanceAdder, InMemoryAccountLedger, MockAccountLedger};
pub use reward_pool::{
    apply_rewards, RewardPoolManager, RewardPoolStatistics, RewardSink, TreasuryError,
};
