//! Nullable chain — deterministic block height for testing.

use std::cell::Cell;
use tinybank_types::BlockHeight;

/// A deterministic block producer for testing.
///
/// Height only advances when you tell it to.
pub struct NullChain {
    current: Cell<u64>,
}

impl NullChain {
    pub fn new(initial_height: u64) -> Self {
        Self {
            current: Cell::new(initial_height),
        }
    }

    /// Get the current block height.
    pub fn now(&self) -> BlockHeight {
        BlockHeight::new(self.current.get())
    }

    /// Mine `blocks` empty blocks. Height stops at `u64::MAX`.
    pub fn advance(&self, blocks: u64) {
        self.current.set(self.current.get().saturating_add(blocks));
    }

    /// Mine one block and return the new height.
    pub fn mine(&self) -> BlockHeight {
        self.advance(1);
        self.now()
    }

    /// Jump to a specific height.
    pub fn set(&self, height: u64) {
        self.current.set(height);
    }
}

impl Default for NullChain {
    fn default() -> Self {
        Self::new(1)
    }
}
