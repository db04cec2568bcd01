//! Chain configuration: consensus policy, fork activation and genesis
//! governance parameters.

use crate::block::BlockNumber;
use crate::params::ProtocolParameters;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{fork} fork at block {block} requires {requires}, which is not scheduled")]
    MissingPrerequisite {
        fork: &'static str,
        block: BlockNumber,
        requires: &'static str,
    },
    #[error("{fork} fork at block {block} precedes {requires} at block {requires_block}")]
    ForkOrder {
        fork: &'static str,
        block: BlockNumber,
        requires: &'static str,
        requires_block: BlockNumber,
    },
    #[error("unknown proposer policy {0:?}")]
    UnknownProposerPolicy(String),
}

/// Proposer-selection policy of the consensus engine.
///
/// Deserializes from either the numeric code stored in genesis files or the
/// snake_case name. Codes other than 0, 1 and 2 are kept as [`Self::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicyRepr", into = "PolicyRepr")]
pub enum ProposerPolicy {
    RoundRobin,
    Sticky,
    #[default]
    WeightedRandom,
    /// Unrecognised code; rewarded like weighted random.
    Other(u64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum PolicyRepr {
    Code(u64),
    Name(String),
}

impl TryFrom<PolicyRepr> for ProposerPolicy {
    type Error = ConfigError;

    fn try_from(repr: PolicyRepr) -> Result<Self, Self::Error> {
        match repr {
            PolicyRepr::Code(code) => Ok(ProposerPolicy::from_code(code)),
            PolicyRepr::Name(name) => match name.trim() {
                "round_robin" => Ok(ProposerPolicy::RoundRobin),
                "sticky" => Ok(ProposerPolicy::Sticky),
                "weighted_random" => Ok(ProposerPolicy::WeightedRandom),
                // environment overrides arrive as text
                other => other
                    .parse::<u64>()
                    .map(ProposerPolicy::from_code)
                    .map_err(|_| ConfigError::UnknownProposerPolicy(name.clone())),
            },
        }
    }
}

impl From<ProposerPolicy> for PolicyRepr {
    fn from(policy: ProposerPolicy) -> Self {
        match policy {
            ProposerPolicy::RoundRobin => PolicyRepr::Name("round_robin".to_string()),
            ProposerPolicy::Sticky => PolicyRepr::Name("sticky".to_string()),
            ProposerPolicy::WeightedRandom => PolicyRepr::Name("weighted_random".to_string()),
            ProposerPolicy::Other(code) => PolicyRepr::Code(code),
        }
    }
}

impl ProposerPolicy {
    /// Numeric policy code as stored in genesis files.
    pub fn code(self) -> u64 {
        match self {
            ProposerPolicy::RoundRobin => 0,
            ProposerPolicy::Sticky => 1,
            ProposerPolicy::WeightedRandom => 2,
            ProposerPolicy::Other(code) => code,
        }
    }

    pub fn from_code(code: u64) -> Self {
        match code {
            0 => ProposerPolicy::RoundRobin,
            1 => ProposerPolicy::Sticky,
            2 => ProposerPolicy::WeightedRandom,
            other => ProposerPolicy::Other(other),
        }
    }

    /// Policies without a staking pool pay everything to the proposer.
    pub fn pays_proposer_only(self) -> bool {
        matches!(self, ProposerPolicy::RoundRobin | ProposerPolicy::Sticky)
    }
}

/// Consensus engine section of the chain configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusConfig {
    #[serde(default)]
    pub epoch: u64,
    #[serde(default)]
    pub proposer_policy: ProposerPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    #[serde(default)]
    pub reward: ProtocolParameters,
}

/// Which fee/split rule sets are active at a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkFlags {
    /// Base-fee pricing with half of the fee burnt.
    pub magma: bool,
    /// Three-way split with proposer/staker sub-split and proposer fee cap burn.
    pub kore: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(default)]
    pub chain_id: u64,
    /// Absent on chains without a BFT consensus section; reward computation
    /// refuses such chains.
    #[serde(default)]
    pub consensus: Option<ConsensusConfig>,
    #[serde(default)]
    pub magma_compatible_block: Option<BlockNumber>,
    #[serde(default)]
    pub kore_compatible_block: Option<BlockNumber>,
    #[serde(default)]
    pub governance: GovernanceConfig,
}

fn is_forked(activation: Option<BlockNumber>, number: BlockNumber) -> bool {
    activation.is_some_and(|block| block <= number)
}

impl ChainConfig {
    pub fn is_magma_fork_enabled(&self, number: BlockNumber) -> bool {
        is_forked(self.magma_compatible_block, number)
    }

    pub fn is_kore_fork_enabled(&self, number: BlockNumber) -> bool {
        is_forked(self.kore_compatible_block, number)
    }

    pub fn fork_flags(&self, number: BlockNumber) -> ForkFlags {
        ForkFlags {
            magma: self.is_magma_fork_enabled(number),
            kore: self.is_kore_fork_enabled(number),
        }
    }

    /// Rejects fork schedules where kore could activate without magma.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(kore) = self.kore_compatible_block {
            match self.magma_compatible_block {
                None => {
                    return Err(ConfigError::MissingPrerequisite {
                        fork: "kore",
                        block: kore,
                        requires: "magma",
                    })
                }
                Some(magma) if magma > kore => {
                    return Err(ConfigError::ForkOrder {
                        fork: "kore",
                        block: kore,
                        requires: "magma",
                        requires_block: magma,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
