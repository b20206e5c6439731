//! Account identity type with `0x` hex rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A TinyBank account — an opaque 20-byte identity.
///
/// Accounts carry no attributes beyond identity. They are never created or
/// destroyed; every ledger treats an unknown account as zero-valued.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Account([u8; 20]);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountParseError {
    #[error("account must start with 0x")]
    MissingPrefix,

    #[error("account must be 20 bytes, got {0}")]
    WrongLength(usize),

    #[error("account is not valid hex: {0}")]
    InvalidHex(String),
}

impl Account {
    /// The standard prefix for rendered accounts.
    pub const PREFIX: &'static str = "0x";

    /// The all-zero account.
    pub const ZERO: Self = Self([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build an account whose trailing bytes encode `n`.
    ///
    /// Handy for deterministic fixtures: `from_low_u64(1)` renders as
    /// `0x0000…0001`.
    pub fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, hex::encode(self.0))
    }
}

impl FromStr for Account {
    type Err = AccountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(Self::PREFIX)
            .ok_or(AccountParseError::MissingPrefix)?;
        let raw = hex::decode(digits).map_err(|e| AccountParseError::InvalidHex(e.to_string()))?;
        let bytes: [u8; 20] = raw
            .as_slice()
            .try_into()
            .map_err(|_| AccountParseError::WrongLength(raw.len()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Account {
    type Error = AccountParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Account> for String {
    fn from(account: Account) -> Self {
        account.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_prefixed_lowercase_hex() {
        let account = Account::from_low_u64(0xabc);
        assert_eq!(
            account.to_string(),
            "0x0000000000000000000000000000000000000abc"
        );
    }

    #[test]
    fn parse_accepts_display_output() {
        let account = Account::from_low_u64(42);
        let parsed: Account = account.to_string().parse().expect("should parse");
        assert_eq!(parsed, account);
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        let err = "1111111111111111111111111111111111111111"
            .parse::<Account>()
            .unwrap_err();
        assert_eq!(err, AccountParseError::MissingPrefix);
    }

    #[test]
    fn parse_rejects_short_account() {
        let err = "0x1234".parse::<Account>().unwrap_err();
        assert_eq!(err, AccountParseError::WrongLength(2));
    }

    #[test]
    fn parse_rejects_non_hex() {
        let err = "0xzz11111111111111111111111111111111111111"
            .parse::<Account>()
            .unwrap_err();
        assert!(matches!(err, AccountParseError::InvalidHex(_)));
    }

    #[test]
    fn serde_uses_string_form() {
        let account = Account::from_low_u64(7);
        let json = serde_json::to_string(&account).unwrap();
        assert_eq!(json, format!("\"{}\"", account));
        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(back, account);
    }

    #[test]
    fn zero_account_is_zero() {
        assert!(Account::ZERO.is_zero());
        assert!(!Account::from_low_u64(1).is_zero());
    }
}
