#![allow(dead_code)]

use blockreward_economics::{StakingEntry, StakingSnapshot};
use blockreward_types::{Address, ProtocolParameters, ADDRESS_BYTES};
use num_bigint::BigUint;

/// Deterministic address derived from a label.
pub fn test_address(label: &str) -> Address {
    let hash = blake3::hash(label.as_bytes());
    let mut bytes = [0u8; ADDRESS_BYTES];
    bytes.copy_from_slice(&hash.as_bytes()[..ADDRESS_BYTES]);
    Address(bytes)
}

pub fn n(v: u64) -> BigUint {
    BigUint::from(v)
}

pub fn params(minted: u64, ratio: &str, sub: &str, minimum_stake: u64) -> ProtocolParameters {
    ProtocolParameters {
        minting_amount: n(minted),
        ratio: ratio.to_string(),
        proposer_staker_ratio: sub.to_string(),
        minimum_stake,
        deferred_tx_fee: true,
        unit_price: 1,
    }
}

/// Snapshot whose node `label` stakes `amount` and is paid at `test_address("{label}-reward")`.
pub fn snapshot(
    stakes: &[(&str, u64)],
    treasury_a: Address,
    treasury_b: Address,
) -> StakingSnapshot {
    StakingSnapshot {
        block_num: 0,
        nodes: stakes
            .iter()
            .map(|(label, amount)| StakingEntry {
                node_id: test_address(label),
                reward_addr: reward_address(label),
                staking_amount: *amount,
            })
            .collect(),
        treasury_a_addr: treasury_a,
        treasury_b_addr: treasury_b,
    }
}

pub fn reward_address(label: &str) -> Address {
    test_address(&format!("{label}-reward"))
}
