use thiserror::Error;
use tinybank_types::ErrorKind;
use tinybank_utils::ReentrantCall;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("reentrant call into the vault")]
    ReentrantCall,

    /// The receiver failed while accepting funds; the cause is kept.
    #[error("transfer failed: {0}")]
    TransferFailed(Box<VaultError>),

    #[error("receiver rejected the funds: {0}")]
    ReceiverRejected(String),

    #[error("arithmetic overflow in vault balance")]
    Overflow,

    #[error("vault invariant violated: {0}")]
    InvariantViolation(String),
}

impl From<ReentrantCall> for VaultError {
    fn from(_: ReentrantCall) -> Self {
        Self::ReentrantCall
    }
}

impl VaultError {
    /// The user-facing kind, or `None` for fatal internal failures.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::InsufficientBalance => Some(ErrorKind::InsufficientBalance),
            Self::ReentrantCall => Some(ErrorKind::ReentrantCall),
            Self::TransferFailed(_) | Self::ReceiverRejected(_) => Some(ErrorKind::TransferFailed),
            Self::Overflow | Self::InvariantViolation(_) => None,
        }
    }

    /// The innermost error behind any `TransferFailed` wrapping.
    pub fn root_cause(&self) -> &VaultError {
        match self {
            Self::TransferFailed(inner) => inner.root_cause(),
            other => other,
        }
    }
}
