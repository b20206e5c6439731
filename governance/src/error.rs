use thiserror::Error;
use tinybank_types::{Account, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    #[error("{0} is not a manager")]
    NotManager(Account),

    #[error("quorum not met: {confirmed} of {required} managers confirmed")]
    QuorumNotMet { confirmed: usize, required: usize },

    #[error("manager {0} has already confirmed")]
    AlreadyConfirmed(Account),

    #[error("a quorum needs at least one manager")]
    NoManagers,

    #[error("manager {0} is listed more than once")]
    DuplicateManager(Account),
}

impl GovernanceError {
    /// The user-facing kind, or `None` for construction errors.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::NotManager(_) => Some(ErrorKind::NotManager),
            Self::QuorumNotMet { .. } => Some(ErrorKind::QuorumNotMet),
            Self::AlreadyConfirmed(_) => Some(ErrorKind::AlreadyConfirmed),
            Self::NoManagers | Self::DuplicateManager(_) => None,
        }
    }
}
