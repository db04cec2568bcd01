//! Division of `minted + fee` into proposer, stakers and treasury pools.
//!
//! Two algorithms exist and exactly one applies per block, keyed by
//! [`ForkRegime`]:
//!
//! - legacy: the pool ratio is applied to `minted + fee` as a whole and the
//!   cn portion goes to the proposer.
//! - three-way: the pool ratio is applied to `minted` only, the cn portion is
//!   sub-split between proposer and stakers, and the whole fee is added to
//!   the proposer.
//!
//! Every ratio term truncates on its own. Whatever the truncations drop is
//! returned as `remainder` so the caller can reassign it.

use crate::errors::RewardError;
use crate::fork::ForkRegime;
use crate::ratio::{parse_ratio, Ratio, POOL_RATIO_PARTS, PROPOSER_STAKER_RATIO_PARTS};
use blockreward_types::ProtocolParameters;
use num_bigint::BigUint;
use num_traits::Zero;
use tracing::debug;

/// Output of one split; `proposer + stakers + treasury_a + treasury_b +
/// remainder == minted + fee`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolSplit {
    pub proposer: BigUint,
    pub stakers: BigUint,
    pub treasury_a: BigUint,
    pub treasury_b: BigUint,
    pub remainder: BigUint,
}

impl PoolSplit {
    pub fn total(&self) -> BigUint {
        &self.proposer + &self.stakers + &self.treasury_a + &self.treasury_b + &self.remainder
    }
}

/// Split algorithm signature: `(params, minted, reward_fee)`.
pub type SplitFn =
    fn(&ProtocolParameters, &BigUint, &BigUint) -> Result<PoolSplit, RewardError>;

/// Regime → algorithm table.
pub fn algorithm_for(regime: ForkRegime) -> SplitFn {
    match regime {
        ForkRegime::Legacy | ForkRegime::Magma => split_legacy,
        ForkRegime::Kore => split_three_way,
    }
}

/// Split `minted + reward_fee` with the algorithm of `regime`.
pub fn split(
    params: &ProtocolParameters,
    regime: ForkRegime,
    minted: &BigUint,
    reward_fee: &BigUint,
) -> Result<PoolSplit, RewardError> {
    algorithm_for(regime)(params, minted, reward_fee)
}

fn into_terms<const N: usize>(
    ratio: &Ratio,
    source: &BigUint,
) -> Result<[BigUint; N], RewardError> {
    ratio
        .apply(source)?
        .try_into()
        .map_err(|terms: Vec<BigUint>| RewardError::MalformedRatio {
            ratio: ratio.as_str().to_string(),
            expected: N,
            actual: terms.len(),
        })
}

/// Apply the pool ratio: `(cn, treasury_a, treasury_b)`.
pub fn split_by_ratio(
    params: &ProtocolParameters,
    source: &BigUint,
) -> Result<(BigUint, BigUint, BigUint), RewardError> {
    let ratio = parse_ratio(&params.ratio, POOL_RATIO_PARTS)?;
    let [cn, a, b] = into_terms::<POOL_RATIO_PARTS>(&ratio, source)?;
    Ok((cn, a, b))
}

/// Apply the proposer/staker ratio: `(proposer, stakers)`.
pub fn split_by_proposer_staker_ratio(
    params: &ProtocolParameters,
    source: &BigUint,
) -> Result<(BigUint, BigUint), RewardError> {
    let ratio = parse_ratio(&params.proposer_staker_ratio, PROPOSER_STAKER_RATIO_PARTS)?;
    let [proposer, stakers] = into_terms::<PROPOSER_STAKER_RATIO_PARTS>(&ratio, source)?;
    Ok((proposer, stakers))
}

/// The proposer's portion of the minting amount alone (no fees), under the
/// three-way split.
pub fn proposer_minted_share(params: &ProtocolParameters) -> Result<BigUint, RewardError> {
    let (cn, _, _) = split_by_ratio(params, &params.minting_amount)?;
    let (proposer, _) = split_by_proposer_staker_ratio(params, &cn)?;
    Ok(proposer)
}

pub fn split_legacy(
    params: &ProtocolParameters,
    minted: &BigUint,
    reward_fee: &BigUint,
) -> Result<PoolSplit, RewardError> {
    let source = minted + reward_fee;
    let (cn, treasury_a, treasury_b) = split_by_ratio(params, &source)?;
    let remainder = &source - &treasury_a - &treasury_b - &cn;

    debug!(
        target: "reward",
        %cn, %treasury_a, %treasury_b, %remainder,
        "legacy split"
    );

    Ok(PoolSplit {
        proposer: cn,
        stakers: BigUint::zero(),
        treasury_a,
        treasury_b,
        remainder,
    })
}

pub fn split_three_way(
    params: &ProtocolParameters,
    minted: &BigUint,
    reward_fee: &BigUint,
) -> Result<PoolSplit, RewardError> {
    let (cn, treasury_a, treasury_b) = split_by_ratio(params, minted)?;
    let (proposer, stakers) = split_by_proposer_staker_ratio(params, &cn)?;
    let proposer = proposer + reward_fee;

    let remainder = minted + reward_fee - &treasury_a - &treasury_b - &proposer - &stakers;

    debug!(
        target: "reward",
        %proposer, %stakers, %treasury_a, %treasury_b, %remainder,
        "three-way split"
    );

    Ok(PoolSplit {
        proposer,
        stakers,
        treasury_a,
        treasury_b,
        remainder,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(ratio: &str, sub: &str, minted: u64) -> ProtocolParameters {
        ProtocolParameters {
            minting_amount: BigUint::from(minted),
            ratio: ratio.to_string(),
            proposer_staker_ratio: sub.to_string(),
            ..Default::default()
        }
    }

    fn n(v: u64) -> BigUint {
        BigUint::from(v)
    }

    #[test]
    fn legacy_split_without_fee() {
        let p = params("50/25/25", "80/20", 1000);
        let s = split(&p, ForkRegime::Legacy, &n(1000), &n(0)).unwrap();
        assert_eq!(s.proposer, n(500));
        assert_eq!(s.treasury_a, n(250));
        assert_eq!(s.treasury_b, n(250));
        assert_eq!(s.stakers, n(0));
        assert_eq!(s.remainder, n(0));
    }

    #[test]
    fn legacy_split_shares_fee_with_treasuries() {
        let p = params("34/54/12", "20/80", 1000);
        let s = split(&p, ForkRegime::Magma, &n(1000), &n(1)).unwrap();
        // 1001 * 34 / 100 = 340, 1001 * 54 / 100 = 540, 1001 * 12 / 100 = 120
        assert_eq!(s.proposer, n(340));
        assert_eq!(s.treasury_a, n(540));
        assert_eq!(s.treasury_b, n(120));
        assert_eq!(s.remainder, n(1));
        assert_eq!(s.total(), n(1001));
    }

    #[test]
    fn three_way_split_gives_fee_to_proposer() {
        let p = params("50/25/25", "80/20", 1000);
        let s = split(&p, ForkRegime::Kore, &n(1000), &n(100)).unwrap();
        assert_eq!(s.proposer, n(500));
        assert_eq!(s.stakers, n(100));
        assert_eq!(s.treasury_a, n(250));
        assert_eq!(s.treasury_b, n(250));
        assert_eq!(s.remainder, n(0));
        assert_eq!(s.total(), n(1100));
    }

    #[test]
    fn three_way_remainder_collects_both_stages() {
        let p = params("34/54/12", "20/80", 999);
        let s = split(&p, ForkRegime::Kore, &n(999), &n(7)).unwrap();
        // cn = 339 (339.66), a = 539 (539.46), b = 119 (119.88)
        // proposer = 67 (67.8) + 7, stakers = 271 (271.2)
        assert_eq!(s.treasury_a, n(539));
        assert_eq!(s.treasury_b, n(119));
        assert_eq!(s.proposer, n(74));
        assert_eq!(s.stakers, n(271));
        assert_eq!(s.remainder, n(3));
        assert_eq!(s.total(), n(1006));
    }

    #[test]
    fn proposer_share_of_minting_ignores_fees() {
        let p = params("50/25/25", "80/20", 1000);
        assert_eq!(proposer_minted_share(&p).unwrap(), n(400));
    }

    #[test]
    fn legacy_does_not_parse_sub_ratio() {
        let p = params("50/25/25", "garbage", 1000);
        assert!(split(&p, ForkRegime::Legacy, &n(1000), &n(0)).is_ok());
        assert!(matches!(
            split(&p, ForkRegime::Kore, &n(1000), &n(0)),
            Err(RewardError::MalformedRatio { .. })
        ));
    }

    #[test]
    fn zero_ratio_total_is_fatal() {
        let p = params("0/0/0", "80/20", 1000);
        assert!(matches!(
            split(&p, ForkRegime::Legacy, &n(1000), &n(0)),
            Err(RewardError::ZeroRatioTotal { .. })
        ));
    }
}
