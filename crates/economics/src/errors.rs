use blockreward_types::{BlockNumber, ConfigError};
use thiserror::Error;

/// Errors that abort reward computation for a block.
///
/// None of them is recoverable locally; no partial result is produced.
#[derive(Debug, Error)]
pub enum RewardError {
    #[error("consensus configuration is missing")]
    MissingConsensusConfig,

    #[error("malformed ratio {ratio:?}: expected {expected} parts, got {actual}")]
    MalformedRatio {
        ratio: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid ratio value {part:?} in {ratio:?}")]
    InvalidRatioValue { ratio: String, part: String },

    #[error("division by zero: ratio {ratio:?} has a zero total")]
    ZeroRatioTotal { ratio: String },

    #[error("block {block} is priced by base fee but its header carries none")]
    MissingBaseFee { block: BlockNumber },

    #[error("block {block}: kore rules reported active without magma")]
    InconsistentForkFlags { block: BlockNumber },

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Failure reported by a governance or staking lookup, carried verbatim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{source_name} lookup failed: {message}")]
pub struct CollaboratorError {
    pub source_name: &'static str,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(source_name: &'static str, message: impl Into<String>) -> Self {
        Self {
            source_name,
            message: message.into(),
        }
    }
}

/// Configuration problems found by [`crate::validate_config`].
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Reward(#[from] RewardError),
}
