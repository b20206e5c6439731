//! Staking ledger and block-denominated reward accrual.
//!
//! Accounts lock tokens in the ledger and earn reward for every block their
//! stake sits there:
//! `reward = elapsed_blocks × reward_per_block × staked / total_staked`
//!
//! This crate handles:
//! - Stake and withdraw with settle-before-mutate ordering
//! - Reward computation against the current pool total (no accumulator)
//! - Reward payout by minting through the token ledger
//! - All-or-nothing rollback of ledger and token state on failure

pub mod engine;
pub mod error;
pub mod event;
pub mod reward;
pub mod state;

pub use engine::StakeLedger;
pub use error::StakingError;
pub use event::StakingEvent;
pub use reward::accrued_reward;
pub use state::{StakePool, StakeRecord};
