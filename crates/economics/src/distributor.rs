//! Block reward entry points.
//!
//! Surrounding components (block processing, query handlers) talk to this
//! module only. Governance and staking lookups are reached through the narrow
//! [`GovernanceSource`] and [`StakingSource`] traits so that this crate never
//! depends on the modules that own those snapshots.

use crate::aggregate::aggregate;
use crate::errors::{CollaboratorError, RewardError};
use crate::fee::{deferred_fee_split, half_fee_burn, total_fee};
use crate::fork::{ForkRegime, ForkSchedule};
use crate::reward::{increment, RewardSpec, Rewards};
use crate::shares::allocate_shares;
use crate::split::split;
use crate::staking::StakingSnapshot;
use blockreward_types::{BlockNumber, ChainConfig, Header, ProtocolParameters};
use num_bigint::BigUint;
use num_traits::Zero;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Governance parameter snapshots by block number.
pub trait GovernanceSource {
    fn params_at(&self, block: BlockNumber) -> Result<ProtocolParameters, CollaboratorError>;
}

/// Staking snapshots by block number; `None` before staking is active.
pub trait StakingSource {
    fn staking_snapshot_at(
        &self,
        block: BlockNumber,
    ) -> Result<Option<Arc<StakingSnapshot>>, CollaboratorError>;
}

/// Uses the reward parameters embedded in the chain configuration.
impl GovernanceSource for ChainConfig {
    fn params_at(&self, _block: BlockNumber) -> Result<ProtocolParameters, CollaboratorError> {
        Ok(self.governance.reward.clone())
    }
}

/// Fixed parameters for every block.
#[derive(Debug, Clone, Default)]
pub struct StaticGovernance(pub ProtocolParameters);

impl GovernanceSource for StaticGovernance {
    fn params_at(&self, _block: BlockNumber) -> Result<ProtocolParameters, CollaboratorError> {
        Ok(self.0.clone())
    }
}

/// Chains without staking information.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStaking;

impl StakingSource for NoStaking {
    fn staking_snapshot_at(
        &self,
        _block: BlockNumber,
    ) -> Result<Option<Arc<StakingSnapshot>>, CollaboratorError> {
        Ok(None)
    }
}

/// The same snapshot for every block.
#[derive(Debug, Clone, Default)]
pub struct StaticStaking(pub Option<Arc<StakingSnapshot>>);

impl StaticStaking {
    pub fn new(snapshot: StakingSnapshot) -> Self {
        Self(Some(Arc::new(snapshot)))
    }
}

impl StakingSource for StaticStaking {
    fn staking_snapshot_at(
        &self,
        _block: BlockNumber,
    ) -> Result<Option<Arc<StakingSnapshot>>, CollaboratorError> {
        Ok(self.0.clone())
    }
}

/// Reward of a round-robin / sticky chain: everything to the proposer.
///
/// Independent of fee deferral and of the proposer cap burn. Under base-fee
/// pricing both the burnt and the rewarded fee are `total / 2` (truncated).
pub fn calc_deferred_reward_simple(
    header: &Header,
    params: &ProtocolParameters,
    regime: ForkRegime,
) -> Result<RewardSpec, RewardError> {
    let minted = params.minting_amount.clone();
    let total = total_fee(header, params, regime)?;

    let (reward_fee, burnt) = if regime.burns_half_fee() {
        (half_fee_burn(&total), half_fee_burn(&total))
    } else {
        (total.clone(), BigUint::zero())
    };

    let proposer = &minted + &reward_fee;
    let mut rewards = Rewards::new();
    increment(&mut rewards, header.rewardbase, &proposer);

    Ok(RewardSpec {
        minted,
        fee: total,
        burnt,
        proposer,
        rewards,
        ..Default::default()
    })
}

/// Full deferred reward: fee burn, pool split, stake shares, aggregation.
pub fn calc_deferred_reward(
    header: &Header,
    params: &ProtocolParameters,
    regime: ForkRegime,
    snapshot: Option<&StakingSnapshot>,
) -> Result<RewardSpec, RewardError> {
    let minted = &params.minting_amount;

    let fee = deferred_fee_split(header, params, regime)?;
    let pools = split(params, regime, minted, &fee.reward)?;
    let allocation = allocate_shares(params, snapshot, &pools.stakers);

    let spec = aggregate(header.rewardbase, minted, fee, pools, allocation, snapshot);
    debug!(target: "reward", block = header.number, ?spec, "deferred reward");
    Ok(spec)
}

/// Dispatch on proposer policy and compensate for fees paid at execution.
fn compute_block_reward<S: StakingSource + ?Sized>(
    header: &Header,
    config: &ChainConfig,
    params: &ProtocolParameters,
    staking: &S,
) -> Result<RewardSpec, RewardError> {
    let consensus = config
        .consensus
        .as_ref()
        .ok_or(RewardError::MissingConsensusConfig)?;
    let regime = config.regime_at(header.number)?;

    if consensus.proposer_policy.pays_proposer_only() {
        return calc_deferred_reward_simple(header, params, regime);
    }

    let snapshot = staking.staking_snapshot_at(header.number)?;
    let mut spec = calc_deferred_reward(header, params, regime, snapshot.as_deref())?;

    // Deferred accounting saw no fee; the proposer was paid it during execution.
    if !params.deferred_tx_fee {
        let block_fee = total_fee(header, params, regime)?;
        spec.proposer += &block_fee;
        increment(&mut spec.rewards, header.rewardbase, &block_fee);
    }

    Ok(spec)
}

/// Reward actually paid in `header`'s block, using the chain configuration's
/// own reward parameters.
pub fn get_block_reward<S: StakingSource + ?Sized>(
    header: &Header,
    config: &ChainConfig,
    staking: &S,
) -> Result<RewardSpec, RewardError> {
    compute_block_reward(header, config, &config.governance.reward, staking)
}

/// Block reward computation bound to its governance and staking sources.
#[derive(Debug, Clone)]
pub struct RewardDistributor<G, S> {
    governance: G,
    staking: S,
}

impl<G: GovernanceSource, S: StakingSource> RewardDistributor<G, S> {
    pub fn new(governance: G, staking: S) -> Self {
        Self {
            governance,
            staking,
        }
    }

    pub fn governance(&self) -> &G {
        &self.governance
    }

    pub fn staking(&self) -> &S {
        &self.staking
    }

    /// Reward actually paid in the block, with parameters from governance.
    pub fn block_reward(
        &self,
        header: &Header,
        config: &ChainConfig,
    ) -> Result<RewardSpec, RewardError> {
        let params = self.governance.params_at(header.number)?;
        compute_block_reward(header, config, &params, &self.staking)
    }

    /// The deferred computation alone, without policy dispatch or fee
    /// compensation.
    pub fn deferred_reward(
        &self,
        header: &Header,
        config: &ChainConfig,
    ) -> Result<RewardSpec, RewardError> {
        let params = self.governance.params_at(header.number)?;
        let regime = config.regime_at(header.number)?;
        let snapshot = self.staking.staking_snapshot_at(header.number)?;
        calc_deferred_reward(header, &params, regime, snapshot.as_deref())
    }

    /// [`Self::deferred_reward`] together with how long it took.
    pub fn deferred_reward_timed(
        &self,
        header: &Header,
        config: &ChainConfig,
    ) -> Result<(RewardSpec, Duration), RewardError> {
        let start = Instant::now();
        let spec = self.deferred_reward(header, config)?;
        Ok((spec, start.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockreward_types::{Address, ConsensusConfig, ProposerPolicy};

    fn addr(b: u8) -> Address {
        Address([b; 20])
    }

    fn n(v: u64) -> BigUint {
        BigUint::from(v)
    }

    fn config(policy: ProposerPolicy, deferred: bool) -> ChainConfig {
        ChainConfig {
            consensus: Some(ConsensusConfig {
                epoch: 30,
                proposer_policy: policy,
            }),
            magma_compatible_block: Some(10),
            kore_compatible_block: Some(20),
            governance: blockreward_types::GovernanceConfig {
                reward: ProtocolParameters {
                    minting_amount: n(1000),
                    ratio: "50/25/25".to_string(),
                    proposer_staker_ratio: "80/20".to_string(),
                    minimum_stake: 1000,
                    deferred_tx_fee: deferred,
                    unit_price: 1,
                },
            },
            ..Default::default()
        }
    }

    struct FailingGovernance;

    impl GovernanceSource for FailingGovernance {
        fn params_at(&self, block: BlockNumber) -> Result<ProtocolParameters, CollaboratorError> {
            Err(CollaboratorError::new("governance", format!("no params at {block}")))
        }
    }

    #[test]
    fn missing_consensus_config_is_fatal() {
        let mut c = config(ProposerPolicy::WeightedRandom, true);
        c.consensus = None;
        let header = Header::new(1, 0, addr(1));
        assert!(matches!(
            get_block_reward(&header, &c, &NoStaking),
            Err(RewardError::MissingConsensusConfig)
        ));
    }

    #[test]
    fn simple_policy_pays_minted_and_fee_to_proposer() {
        let c = config(ProposerPolicy::RoundRobin, false);
        // legacy block: whole fee rewarded, deferral flag ignored
        let header = Header::new(5, 100, addr(1));
        let spec = get_block_reward(&header, &c, &NoStaking).unwrap();
        assert_eq!(spec.proposer, n(1100));
        assert_eq!(spec.fee, n(100));
        assert_eq!(spec.burnt, n(0));
        assert_eq!(spec.rewards.len(), 1);

        // kore block: half burnt, no proposer cap burn
        let header = Header::new(25, 101, addr(1)).with_base_fee(1u32);
        let spec = get_block_reward(&header, &c, &NoStaking).unwrap();
        assert_eq!(spec.fee, n(101));
        assert_eq!(spec.burnt, n(50));
        assert_eq!(spec.proposer, n(1050));
        assert_eq!(spec.treasury_a, n(0));
        assert_eq!(spec.stakers, n(0));
    }

    #[test]
    fn disabled_deferral_is_compensated() {
        let c = config(ProposerPolicy::WeightedRandom, false);
        let header = Header::new(25, 100, addr(1)).with_base_fee(2u32);
        let staking = StaticStaking::new(StakingSnapshot {
            treasury_a_addr: addr(2),
            treasury_b_addr: addr(3),
            ..Default::default()
        });
        let spec = get_block_reward(&header, &c, &staking).unwrap();
        // deferred part: cn 500 -> proposer 400 + unallocated stakers 100; plus fee 200
        assert_eq!(spec.fee, n(0));
        assert_eq!(spec.burnt, n(0));
        assert_eq!(spec.proposer, n(700));
        assert_eq!(spec.reward_of(&addr(1)), Some(&n(700)));
        assert_eq!(spec.reward_of(&addr(2)), Some(&n(250)));
    }

    #[test]
    fn collaborator_failure_propagates() {
        let distributor = RewardDistributor::new(FailingGovernance, NoStaking);
        let c = config(ProposerPolicy::WeightedRandom, true);
        let err = distributor
            .block_reward(&Header::new(1, 0, addr(1)), &c)
            .unwrap_err();
        match err {
            RewardError::Collaborator(e) => assert_eq!(e.source_name, "governance"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn timed_reward_matches_untimed() {
        let c = config(ProposerPolicy::WeightedRandom, true);
        let distributor = RewardDistributor::new(c.clone(), NoStaking);
        let header = Header::new(25, 10, addr(1)).with_base_fee(1u32);
        let (timed, _elapsed) = distributor.deferred_reward_timed(&header, &c).unwrap();
        assert_eq!(timed, distributor.deferred_reward(&header, &c).unwrap());
        assert_eq!(distributor.governance(), &c);
        assert!(distributor.staking().staking_snapshot_at(25).unwrap().is_none());
    }

    #[test]
    fn unknown_policy_code_takes_deferred_path() {
        let c = config(ProposerPolicy::from_code(7), true);
        let header = Header::new(5, 0, addr(1));
        let staking = StaticStaking::new(StakingSnapshot {
            treasury_a_addr: addr(2),
            treasury_b_addr: addr(3),
            ..Default::default()
        });
        let spec = get_block_reward(&header, &c, &staking).unwrap();
        assert_eq!(spec.proposer, n(500));
        assert_eq!(spec.reward_of(&addr(2)), Some(&n(250)));
        assert_eq!(spec.reward_of(&addr(3)), Some(&n(250)));
    }
}
