//! The narrow interface the bank depends on.

use crate::error::TokenError;
use tinybank_types::Account;

/// A fungible-token ledger: account → balance, plus allowances and minting.
///
/// Every mutating call names the account on whose behalf it runs (the
/// message sender). Implementations enforce their own access control on
/// `mint`.
pub trait TokenLedger {
    fn balance_of(&self, account: &Account) -> u128;

    fn allowance(&self, owner: &Account, spender: &Account) -> u128;

    /// Move `amount` from `sender` to `to`.
    fn transfer(&mut self, sender: &Account, to: &Account, amount: u128)
        -> Result<(), TokenError>;

    /// Move `amount` from `from` to `to`, spending `spender`'s allowance.
    fn transfer_from(
        &mut self,
        spender: &Account,
        from: &Account,
        to: &Account,
        amount: u128,
    ) -> Result<(), TokenError>;

    /// Set `spender`'s allowance over `owner`'s balance to `amount`.
    fn approve(&mut self, owner: &Account, spender: &Account, amount: u128)
        -> Result<(), TokenError>;

    /// Create `amount` new tokens for `to`. Only the token manager may mint.
    fn mint(&mut self, caller: &Account, amount: u128, to: &Account) -> Result<(), TokenError>;
}
