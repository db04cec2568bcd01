//! Transaction fee accounting: total fee and the burnt / rewardable split.

use crate::errors::RewardError;
use crate::fork::ForkRegime;
use crate::split::proposer_minted_share;
use blockreward_types::{Header, ProtocolParameters};
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

/// `total == reward + burnt` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeSplit {
    /// Raw block fee before any burn.
    pub total: BigUint,
    /// Portion left for distribution.
    pub reward: BigUint,
    pub burnt: BigUint,
}

/// Raw fee of the block: `gas_used * base_fee` under base-fee pricing,
/// otherwise `gas_used * unit_price`.
pub fn total_fee(
    header: &Header,
    params: &ProtocolParameters,
    regime: ForkRegime,
) -> Result<BigUint, RewardError> {
    let gas_used = BigUint::from(header.gas_used);
    if regime.base_fee_pricing() {
        let base_fee = header
            .base_fee
            .as_ref()
            .ok_or(RewardError::MissingBaseFee {
                block: header.number,
            })?;
        Ok(gas_used * base_fee)
    } else {
        Ok(gas_used * params.unit_price)
    }
}

/// Half of the fee, truncated.
pub fn half_fee_burn(fee: &BigUint) -> BigUint {
    fee / 2u32
}

/// Burn of the remaining fee, capped at the proposer's share of minting.
pub fn proposer_cap_burn(
    params: &ProtocolParameters,
    fee: &BigUint,
) -> Result<BigUint, RewardError> {
    let cap = proposer_minted_share(params)?;
    debug!(target: "reward", %fee, %cap, "proposer cap burn");
    Ok(if *fee >= cap { cap } else { fee.clone() })
}

/// Split the block fee for deferred distribution.
///
/// With fee deferral disabled the fee was already paid to the proposer
/// during execution, so everything here is zero and the caller compensates.
/// Otherwise the half burn is applied first and the proposer cap burn is
/// evaluated against what is left of it.
pub fn deferred_fee_split(
    header: &Header,
    params: &ProtocolParameters,
    regime: ForkRegime,
) -> Result<FeeSplit, RewardError> {
    if !params.deferred_tx_fee {
        return Ok(FeeSplit::default());
    }

    let total = total_fee(header, params, regime)?;
    let mut reward = total.clone();
    let mut burnt = BigUint::zero();

    if regime.burns_half_fee() {
        let burn = half_fee_burn(&reward);
        reward -= &burn;
        burnt += burn;
    }

    if regime.caps_proposer_fee() {
        let burn = proposer_cap_burn(params, &reward)?;
        reward -= &burn;
        burnt += burn;
    }

    debug!(
        target: "reward",
        block = header.number,
        %total, %reward, %burnt,
        "deferred fee split"
    );

    Ok(FeeSplit {
        total,
        reward,
        burnt,
    })
}
