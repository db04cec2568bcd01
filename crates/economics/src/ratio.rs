//! Parsing of `/`-delimited governance weight strings.

use crate::errors::RewardError;
use num_bigint::BigUint;

/// Number of terms in the pool ratio (`cn/treasuryA/treasuryB`).
pub const POOL_RATIO_PARTS: usize = 3;

/// Number of terms in the proposer/staker ratio.
pub const PROPOSER_STAKER_RATIO_PARTS: usize = 2;

/// Parsed integer weights together with their sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ratio {
    raw: String,
    weights: Vec<u64>,
    total: u128,
}

/// Parse `ratio` into exactly `expected_parts` base-10 weights.
///
/// The total is not checked for zero here; [`Ratio::apply`] reports it.
pub fn parse_ratio(ratio: &str, expected_parts: usize) -> Result<Ratio, RewardError> {
    let parts: Vec<&str> = ratio.split('/').collect();
    if parts.len() != expected_parts {
        return Err(RewardError::MalformedRatio {
            ratio: ratio.to_string(),
            expected: expected_parts,
            actual: parts.len(),
        });
    }

    let weights = parts
        .iter()
        .map(|part| {
            part.parse::<u64>()
                .map_err(|_| RewardError::InvalidRatioValue {
                    ratio: ratio.to_string(),
                    part: part.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let total = weights.iter().map(|w| u128::from(*w)).sum();

    Ok(Ratio {
        raw: ratio.to_string(),
        weights,
        total,
    })
}

impl Ratio {
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    pub fn total(&self) -> u128 {
        self.total
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// `floor(source * weight / total)` for every weight, independently.
    ///
    /// Truncation remainders are dropped; callers account for them.
    pub fn apply(&self, source: &BigUint) -> Result<Vec<BigUint>, RewardError> {
        if self.total == 0 {
            return Err(RewardError::ZeroRatioTotal {
                ratio: self.raw.clone(),
            });
        }
        let total = BigUint::from(self.total);
        Ok(self
            .weights
            .iter()
            .map(|weight| source * *weight / &total)
            .collect())
    }
}
