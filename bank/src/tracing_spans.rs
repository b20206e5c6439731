//! Pre-built [`tracing::Span`] constructors for bank entry points.
//!
//! Consistent span names and field sets make it easy to filter and correlate
//! the logs of one call across the staking, governance, and vault crates.

use tinybank_types::{Account, BlockHeight};
use tracing::{info_span, Span};

/// Span covering a single `stake` call.
pub fn stake_span(caller: &Account, amount: u128, now: BlockHeight) -> Span {
    info_span!("stake", caller = %caller, amount, block = %now)
}

/// Span covering a single `withdraw` call.
pub fn withdraw_span(caller: &Account, amount: u128, now: BlockHeight) -> Span {
    info_span!("withdraw", caller = %caller, amount, block = %now)
}

/// Span covering a manager confirmation.
pub fn confirm_span(caller: &Account) -> Span {
    info_span!("confirm", caller = %caller)
}

/// Span covering a reward-rate change attempt.
pub fn rate_change_span(caller: &Account, new_rate: u128) -> Span {
    info_span!("set_reward_per_block", caller = %caller, new_rate)
}

/// Span covering one native vault call.
pub fn vault_span(op: &'static str, account: &Account) -> Span {
    info_span!("vault", op, account = %account)
}
