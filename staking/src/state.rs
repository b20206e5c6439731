//! Per-account stake records and pool-wide totals.

use serde::{Deserialize, Serialize};
use tinybank_types::BlockHeight;

/// Stake state for a single account.
///
/// Accounts that never staked read as the default record: nothing staked,
/// last claimed at genesis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    /// Tokens currently locked by this account.
    pub staked_amount: u128,
    /// Block up to which reward has been settled. Never decreases.
    pub last_claimed_block: BlockHeight,
}

impl StakeRecord {
    /// Whether this account has anything locked.
    pub fn is_active(&self) -> bool {
        self.staked_amount > 0
    }
}

/// Pool-wide totals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakePool {
    /// Running sum of every record's `staked_amount`.
    pub total_staked: u128,
    /// Reward minted per block, split across stakers by share.
    pub reward_per_block: u128,
}

impl StakePool {
    pub fn new(reward_per_block: u128) -> Self {
        Self {
            total_staked: 0,
            reward_per_block,
        }
    }
}
