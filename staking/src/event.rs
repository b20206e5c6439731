//! Events produced by stake ledger operations.

use serde::{Deserialize, Serialize};
use tinybank_types::Account;

/// Emitted only when the enclosing operation commits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StakingEvent {
    Staked { account: Account, amount: u128 },
    Withdrawal { account: Account, amount: u128 },
    RewardPaid { account: Account, amount: u128 },
}
