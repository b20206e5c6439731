//! User-facing error taxonomy shared across crates.
//!
//! Each crate keeps its own `thiserror` enum with rich context; every
//! variant a caller can trigger maps onto one of these kinds so that
//! front-ends get a stable reason string regardless of which crate failed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of failure an external caller can observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidAmount,
    InsufficientStake,
    InsufficientBalance,
    InsufficientAllowance,
    NotManager,
    QuorumNotMet,
    AlreadyConfirmed,
    ReentrantCall,
    TransferFailed,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 9] = [
        Self::InvalidAmount,
        Self::InsufficientStake,
        Self::InsufficientBalance,
        Self::InsufficientAllowance,
        Self::NotManager,
        Self::QuorumNotMet,
        Self::AlreadyConfirmed,
        Self::ReentrantCall,
        Self::TransferFailed,
    ];

    /// Stable human-readable reason, suitable for display without context.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidAmount => "invalid amount",
            Self::InsufficientStake => "insufficient staked token",
            Self::InsufficientBalance => "insufficient balance",
            Self::InsufficientAllowance => "insufficient allowance",
            Self::NotManager => "you are not a manager",
            Self::QuorumNotMet => "not all managers confirmed yet",
            Self::AlreadyConfirmed => "manager already confirmed",
            Self::ReentrantCall => "reentrant call",
            Self::TransferFailed => "transfer failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}
