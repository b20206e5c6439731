//! Block height — the clock every reward computation is denominated in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block number. Monotonically non-decreasing over the life of a chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockHeight(u64);

impl BlockHeight {
    /// The genesis block.
    pub const GENESIS: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Blocks elapsed from `self` up to `now`, or `None` if `now` precedes `self`.
    pub fn blocks_until(&self, now: BlockHeight) -> Option<u64> {
        now.0.checked_sub(self.0)
    }

    /// The height `blocks` after this one, saturating at `u64::MAX`.
    pub fn advanced_by(&self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }
}

impl fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
