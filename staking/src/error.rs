//! Staking-specific errors.

use thiserror::Error;
use tinybank_token::TokenError;
use tinybank_types::{BlockHeight, ErrorKind};
use tinybank_utils::ReentrantCall;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakingError {
    #[error("amount must be non-zero")]
    InvalidAmount,

    #[error("insufficient staked token: requested {requested}, staked {staked}")]
    InsufficientStake { requested: u128, staked: u128 },

    #[error("token ledger rejected the transfer: {0}")]
    Token(#[from] TokenError),

    /// Only produced if a token re-enters the ledger mid-call, which no
    /// in-tree token can do.
    #[error("reentrant call into the stake ledger")]
    ReentrantCall,

    #[error("block height went backwards: last claimed {last_claimed}, now {now}")]
    BlockRegression {
        last_claimed: BlockHeight,
        now: BlockHeight,
    },

    #[error("arithmetic overflow in reward computation")]
    Overflow,

    #[error("ledger invariant violated: {0}")]
    InvariantViolation(String),
}

impl From<ReentrantCall> for StakingError {
    fn from(_: ReentrantCall) -> Self {
        Self::ReentrantCall
    }
}

impl StakingError {
    /// The user-facing kind, or `None` for fatal internal failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::InvalidAmount => Some(ErrorKind::InvalidAmount),
            Self::InsufficientStake { .. } => Some(ErrorKind::InsufficientStake),
            Self::Token(e) => e.kind(),
            Self::ReentrantCall => Some(ErrorKind::ReentrantCall),
            Self::BlockRegression { .. } | Self::Overflow | Self::InvariantViolation(_) => None,
        }
    }
}
