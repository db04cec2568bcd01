//! Fork regime resolution.

use crate::errors::RewardError;
use blockreward_types::{BlockNumber, ChainConfig, ForkFlags};

/// Rule set governing fee pricing, burning and splitting at a block.
///
/// Resolved once per block from [`ForkFlags`]; everything downstream asks
/// the regime rather than inspecting flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForkRegime {
    /// Fixed unit price, no burn, single-stage split of minted + fee.
    Legacy,
    /// Base-fee pricing, half of the fee burnt.
    Magma,
    /// Magma rules plus the proposer fee-cap burn and the three-way split.
    Kore,
}

impl ForkRegime {
    pub fn resolve(block: BlockNumber, flags: ForkFlags) -> Result<Self, RewardError> {
        match (flags.magma, flags.kore) {
            (false, false) => Ok(ForkRegime::Legacy),
            (true, false) => Ok(ForkRegime::Magma),
            (true, true) => Ok(ForkRegime::Kore),
            (false, true) => Err(RewardError::InconsistentForkFlags { block }),
        }
    }

    /// Fees are `gas_used * base_fee` instead of `gas_used * unit_price`.
    pub fn base_fee_pricing(self) -> bool {
        !matches!(self, ForkRegime::Legacy)
    }

    pub fn burns_half_fee(self) -> bool {
        !matches!(self, ForkRegime::Legacy)
    }

    /// Burn the remaining fee up to the proposer's share of minting.
    pub fn caps_proposer_fee(self) -> bool {
        matches!(self, ForkRegime::Kore)
    }

    pub fn three_way_split(self) -> bool {
        matches!(self, ForkRegime::Kore)
    }
}

/// Source of fork activation flags per block.
pub trait ForkSchedule {
    fn fork_flags_at(&self, block: BlockNumber) -> ForkFlags;

    fn regime_at(&self, block: BlockNumber) -> Result<ForkRegime, RewardError> {
        ForkRegime::resolve(block, self.fork_flags_at(block))
    }
}

impl ForkSchedule for ChainConfig {
    fn fork_flags_at(&self, block: BlockNumber) -> ForkFlags {
        self.fork_flags(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_consistent_combination() {
        let flags = |magma, kore| ForkFlags { magma, kore };
        assert_eq!(ForkRegime::resolve(1, flags(false, false)).unwrap(), ForkRegime::Legacy);
        assert_eq!(ForkRegime::resolve(1, flags(true, false)).unwrap(), ForkRegime::Magma);
        assert_eq!(ForkRegime::resolve(1, flags(true, true)).unwrap(), ForkRegime::Kore);
        assert!(matches!(
            ForkRegime::resolve(9, flags(false, true)),
            Err(RewardError::InconsistentForkFlags { block: 9 })
        ));
    }

    #[test]
    fn regime_predicates() {
        assert!(!ForkRegime::Legacy.base_fee_pricing());
        assert!(!ForkRegime::Legacy.burns_half_fee());
        assert!(ForkRegime::Magma.burns_half_fee());
        assert!(!ForkRegime::Magma.caps_proposer_fee());
        assert!(!ForkRegime::Magma.three_way_split());
        assert!(ForkRegime::Kore.caps_proposer_fee());
        assert!(ForkRegime::Kore.three_way_split());
    }

    #[test]
    fn chain_config_schedule() {
        let config = ChainConfig {
            magma_compatible_block: Some(100),
            kore_compatible_block: Some(200),
            ..Default::default()
        };
        assert_eq!(config.regime_at(99).unwrap(), ForkRegime::Legacy);
        assert_eq!(config.regime_at(150).unwrap(), ForkRegime::Magma);
        assert_eq!(config.regime_at(200).unwrap(), ForkRegime::Kore);
    }
}
