//! Token-ledger errors.

use thiserror::Error;
use tinybank_types::{Account, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("insufficient allowance: need {needed}, approved {approved}")]
    InsufficientAllowance { needed: u128, approved: u128 },

    #[error("{0} is not the token manager")]
    NotManager(Account),

    #[error("arithmetic overflow in token ledger")]
    Overflow,
}

impl TokenError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::InsufficientBalance { .. } => Some(ErrorKind::InsufficientBalance),
            Self::InsufficientAllowance { .. } => Some(ErrorKind::InsufficientAllowance),
            Self::NotManager(_) => Some(ErrorKind::NotManager),
            Self::Overflow => None,
        }
    }
}
