//! Shared types for deferred block reward computation.
//!
//! Addresses, the header fields the reward engine reads, the governance
//! parameter snapshot and the chain configuration with its fork schedule.

pub mod address;
pub mod amount;
pub mod block;
pub mod chain_config;
pub mod params;

pub use address::*;
pub use amount::Amount;
pub use block::*;
pub use chain_config::*;
pub use params::*;
