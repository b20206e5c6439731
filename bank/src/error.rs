use thiserror::Error;
use tinybank_governance::GovernanceError;
use tinybank_staking::StakingError;
use tinybank_token::TokenError;
use tinybank_types::{Account, ErrorKind};
use tinybank_vault::VaultError;

#[derive(Debug, Error)]
pub enum BankError {
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("staking error: {0}")]
    Staking(#[from] StakingError),

    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0} is the bank's custody account")]
    CustodyAccount(Account),
}

impl BankError {
    /// The user-facing kind, or `None` for errors raised by the bank's own
    /// surface rather than a contract rule.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Token(e) => e.kind(),
            Self::Staking(e) => e.kind(),
            Self::Governance(e) => e.kind(),
            Self::Vault(e) => e.kind(),
            Self::Config(_) | Self::CustodyAccount(_) => None,
        }
    }

    /// Stable reason string for the user-facing kind, if any.
    pub fn reason(&self) -> Option<&'static str> {
        self.kind().map(|kind| kind.reason())
    }
}
