//! Account ledger interface for reward application
//!
//! Reward application needs exactly one capability from the ledger: credit an
//! amount to an address. Reads are never required.

use anyhow::Result;
use blockreward_types::{Address, Amount};
use num_bigint::BigUint;
use num_traits::Zero;
use std::collections::HashMap;

/// Credit-only view of an account ledger.
pub trait BalanceAdder {
    /// Add `amount` to `addr`'s balance.
    fn add_balance(&mut self, addr: &Address, amount: &Amount) -> Result<()>;
}

// -----------------------------------------------------------------------------
// In-memory implementation (for tools or testing)
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccountLedger {
    balances: HashMap<Address, Amount>,
    total_credited: Amount,
}

impl InMemoryAccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, addr: &Address) -> Amount {
        self.balances.get(addr).cloned().unwrap_or_else(BigUint::zero)
    }

    /// Sum of every credit applied so far.
    pub fn total_credited(&self) -> &Amount {
        &self.total_credited
    }

    pub fn balances(&self) -> &HashMap<Address, Amount> {
        &self.balances
    }
}

impl BalanceAdder for InMemoryAccountLedger {
    fn add_balance(&mut self, addr: &Address, amount: &Amount) -> Result<()> {
        *self.balances.entry(*addr).or_default() += amount;
        self.total_credited += amount;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Mock ledger (records every call; optionally fails on one address)
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct MockAccountLedger {
    credit_calls: Vec<(Address, Amount)>,
    fail_on: Option<Address>,
    /// Failures left before `fail_on` is accepted again; `None` fails forever.
    failures_left: Option<u32>,
}

impl MockAccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger that rejects credits to `addr`.
    pub fn failing_on(addr: Address) -> Self {
        Self {
            fail_on: Some(addr),
            ..Self::default()
        }
    }

    /// A ledger that rejects only the first credit to `addr`.
    pub fn failing_once_on(addr: Address) -> Self {
        Self {
            fail_on: Some(addr),
            failures_left: Some(1),
            ..Self::default()
        }
    }

    /// Sum of every recorded credit to `addr`.
    pub fn credited_to(&self, addr: &Address) -> Amount {
        self.credit_calls
            .iter()
            .filter(|(a, _)| a == addr)
            .map(|(_, amount)| amount)
            .sum()
    }

    pub fn get_credit_calls(&self) -> &[(Address, Amount)] {
        &self.credit_calls
    }

    pub fn clear_calls(&mut self) {
        self.credit_calls.clear();
    }
}

impl BalanceAdder for MockAccountLedger {
    fn add_balance(&mut self, addr: &Address, amount: &Amount) -> Result<()> {
        if self.fail_on == Some(*addr) && self.failures_left != Some(0) {
            if let Some(left) = self.failures_left.as_mut() {
                *left -= 1;
            }
            anyhow::bail!("account {addr} is locked");
        }
        self.credit_calls.push((*addr, amount.clone()));
        Ok(())
    }
}
