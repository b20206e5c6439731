//! MyToken — the reference in-memory fungible token.
//!
//! The deployer receives `initial_supply × 10^decimals` raw units and starts
//! out as the token manager, the only account allowed to mint. Deployments
//! hand the manager role to the bank so it can mint staking rewards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tinybank_types::Account;
use tinybank_utils::Revertible;
use tracing::debug;

use crate::error::TokenError;
use crate::ledger::TokenLedger;

/// Static token description.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Logs emitted by the token, in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    /// Tokens moved. Mints are transfers from [`Account::ZERO`].
    Transfer {
        from: Account,
        to: Account,
        amount: u128,
    },
    Approval {
        owner: Account,
        spender: Account,
        amount: u128,
    },
}

/// Balances, allowances, supply and manager: everything a rollback restores.
#[derive(Clone, Debug, Default)]
struct Books {
    total_supply: u128,
    balances: HashMap<Account, u128>,
    allowances: HashMap<(Account, Account), u128>,
    manager: Account,
}

/// Rollback image of a [`MyToken`].
///
/// Logs are append-only, so only their length is recorded; restoring
/// truncates anything emitted after the snapshot.
#[derive(Clone, Debug)]
pub struct TokenSnapshot {
    books: Books,
    log_len: usize,
}

pub struct MyToken {
    metadata: TokenMetadata,
    books: Books,
    logs: Vec<TokenEvent>,
}

impl MyToken {
    /// Deploy a new token, minting `initial_supply` whole tokens to `deployer`.
    pub fn deploy(
        deployer: Account,
        metadata: TokenMetadata,
        initial_supply: u128,
    ) -> Result<Self, TokenError> {
        let unit = 10u128
            .checked_pow(u32::from(metadata.decimals))
            .ok_or(TokenError::Overflow)?;
        let raw_supply = initial_supply
            .checked_mul(unit)
            .ok_or(TokenError::Overflow)?;

        let mut token = Self {
            metadata,
            books: Books {
                manager: deployer,
                ..Books::default()
            },
            logs: Vec::new(),
        };
        token.credit_minted(raw_supply, &deployer)?;
        Ok(token)
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn total_supply(&self) -> u128 {
        self.books.total_supply
    }

    pub fn manager(&self) -> &Account {
        &self.books.manager
    }

    /// Logs emitted since the last [`MyToken::drain_logs`].
    pub fn logs(&self) -> &[TokenEvent] {
        &self.logs
    }

    /// Hand the pending logs to the caller, leaving none behind.
    pub fn drain_logs(&mut self) -> Vec<TokenEvent> {
        std::mem::take(&mut self.logs)
    }

    /// Hand the minting role to `new_manager`. Only the current manager may do this.
    pub fn set_manager(&mut self, caller: &Account, new_manager: Account) -> Result<(), TokenError> {
        self.ensure_manager(caller)?;
        debug!(old = %self.books.manager, new = %new_manager, "token manager changed");
        self.books.manager = new_manager;
        Ok(())
    }

    fn ensure_manager(&self, caller: &Account) -> Result<(), TokenError> {
        if *caller != self.books.manager {
            return Err(TokenError::NotManager(*caller));
        }
        Ok(())
    }

    fn credit_minted(&mut self, amount: u128, to: &Account) -> Result<(), TokenError> {
        let supply = self
            .books
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.books.total_supply = supply;
        self.books.balances.insert(*to, balance);
        self.logs.push(TokenEvent::Transfer {
            from: Account::ZERO,
            to: *to,
            amount,
        });
        Ok(())
    }

    fn move_balance(&mut self, from: &Account, to: &Account, amount: u128) -> Result<(), TokenError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        if from != to {
            let credited = self
                .balance_of(to)
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
            self.books.balances.insert(*from, available - amount);
            self.books.balances.insert(*to, credited);
        }
        self.logs.push(TokenEvent::Transfer {
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }
}

impl TokenLedger for MyToken {
    fn balance_of(&self, account: &Account) -> u128 {
        self.books.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Account, spender: &Account) -> u128 {
        self.books
            .allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(&mut self, sender: &Account, to: &Account, amount: u128) -> Result<(), TokenError> {
        self.move_balance(sender, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Account,
        from: &Account,
        to: &Account,
        amount: u128,
    ) -> Result<(), TokenError> {
        let approved = self.allowance(from, spender);
        if approved < amount {
            return Err(TokenError::InsufficientAllowance {
                needed: amount,
                approved,
            });
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                needed: amount,
                available,
            });
        }
        self.books
            .allowances
            .insert((*from, *spender), approved - amount);
        self.move_balance(from, to, amount)
    }

    fn approve(&mut self, owner: &Account, spender: &Account, amount: u128) -> Result<(), TokenError> {
        self.books.allowances.insert((*owner, *spender), amount);
        self.logs.push(TokenEvent::Approval {
            owner: *owner,
            spender: *spender,
            amount,
        });
        Ok(())
    }

    fn mint(&mut self, caller: &Account, amount: u128, to: &Account) -> Result<(), TokenError> {
        self.ensure_manager(caller)?;
        self.credit_minted(amount, to)
    }
}

impl Revertible for MyToken {
    type Snapshot = TokenSnapshot;

    fn snapshot(&self) -> TokenSnapshot {
        TokenSnapshot {
            books: self.books.clone(),
            log_len: self.logs.len(),
        }
    }

    fn restore(&mut self, snapshot: TokenSnapshot) {
        self.books = snapshot.books;
        self.logs.truncate(snapshot.log_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u128 = 1_000_000_000_000_000_000;

    fn deployer() -> Account {
        Account::from_low_u64(1)
    }

    fn other() -> Account {
        Account::from_low_u64(2)
    }

    fn my_token() -> MyToken {
        MyToken::deploy(
            deployer(),
            TokenMetadata {
                name: "MyToken".into(),
                symbol: "MT".into(),
                decimals: 18,
            },
            100,
        )
        .unwrap()
    }

    #[test]
    fn deploy_sets_metadata_and_mints_supply_to_deployer() {
        let token = my_token();
        assert_eq!(token.name(), "MyToken");
        assert_eq!(token.symbol(), "MT");
        assert_eq!(token.decimals(), 18);
        assert_eq!(token.total_supply(), 100 * ONE);
        assert_eq!(token.balance_of(&deployer()), 100 * ONE);
        assert_eq!(token.manager(), &deployer());
    }

    #[test]
    fn transfer_moves_balance_and_logs() {
        let mut token = my_token();
        token.transfer(&deployer(), &other(), ONE / 2).unwrap();
        assert_eq!(token.balance_of(&other()), ONE / 2);
        assert_eq!(token.balance_of(&deployer()), 100 * ONE - ONE / 2);
        assert_eq!(
            token.logs().last(),
            Some(&TokenEvent::Transfer {
                from: deployer(),
                to: other(),
                amount: ONE / 2,
            })
        );
    }

    #[test]
    fn transfer_beyond_balance_fails() {
        let mut token = my_token();
        let err = token.transfer(&deployer(), &other(), 101 * ONE).unwrap_err();
        assert!(matches!(err, TokenError::InsufficientBalance { .. }));
        assert_eq!(err.kind().unwrap().reason(), "insufficient balance");
    }

    #[test]
    fn self_transfer_preserves_balance() {
        let mut token = my_token();
        token.transfer(&deployer(), &deployer(), ONE).unwrap();
        assert_eq!(token.balance_of(&deployer()), 100 * ONE);
    }

    #[test]
    fn approve_then_transfer_from_spends_allowance() {
        let mut token = my_token();
        token.approve(&deployer(), &other(), 3 * ONE / 10).unwrap();
        assert_eq!(token.allowance(&deployer(), &other()), 3 * ONE / 10);

        token
            .transfer_from(&other(), &deployer(), &other(), 3 * ONE / 10)
            .unwrap();
        assert_eq!(token.balance_of(&deployer()), 100 * ONE - 3 * ONE / 10);
        assert_eq!(token.balance_of(&other()), 3 * ONE / 10);
        assert_eq!(token.allowance(&deployer(), &other()), 0);
    }

    #[test]
    fn transfer_from_without_allowance_fails() {
        let mut token = my_token();
        let err = token
            .transfer_from(&other(), &deployer(), &other(), ONE)
            .unwrap_err();
        assert_eq!(
            err,
            TokenError::InsufficientAllowance {
                needed: ONE,
                approved: 0,
            }
        );
        assert_eq!(err.kind().unwrap().reason(), "insufficient allowance");
    }

    #[test]
    fn transfer_from_with_allowance_but_no_balance_keeps_allowance() {
        let mut token = my_token();
        token.approve(&other(), &deployer(), ONE).unwrap();
        let err = token
            .transfer_from(&deployer(), &other(), &deployer(), ONE)
            .unwrap_err();
        assert!(matches!(err, TokenError::InsufficientBalance { .. }));
        assert_eq!(token.allowance(&other(), &deployer()), ONE);
    }

    #[test]
    fn only_manager_can_mint() {
        let mut token = my_token();
        let err = token.mint(&other(), 5, &other()).unwrap_err();
        assert_eq!(err, TokenError::NotManager(other()));

        token.mint(&deployer(), 5, &other()).unwrap();
        assert_eq!(token.balance_of(&other()), 5);
        assert_eq!(token.total_supply(), 100 * ONE + 5);
    }

    #[test]
    fn set_manager_hands_over_minting() {
        let mut token = my_token();
        token.set_manager(&deployer(), other()).unwrap();
        assert!(token.mint(&deployer(), 1, &deployer()).is_err());
        token.mint(&other(), 1, &deployer()).unwrap();
    }

    #[test]
    fn restore_discards_balances_and_logs() {
        let mut token = my_token();
        let snapshot = token.snapshot();
        let logs_before = token.logs().len();
        token.transfer(&deployer(), &other(), ONE).unwrap();
        token.restore(snapshot);
        assert_eq!(token.balance_of(&other()), 0);
        assert_eq!(token.logs().len(), logs_before);
    }

    #[test]
    fn restore_keeps_logs_from_before_the_snapshot() {
        let mut token = my_token();
        token.approve(&deployer(), &other(), ONE).unwrap();
        let snapshot = token.snapshot();
        token.transfer(&deployer(), &other(), ONE).unwrap();
        token.mint(&deployer(), 1, &other()).unwrap();
        assert_eq!(token.logs().len(), 4);

        token.restore(snapshot);
        assert_eq!(token.logs().len(), 2);
        assert!(matches!(token.logs()[1], TokenEvent::Approval { .. }));
        assert_eq!(token.total_supply(), 100 * ONE);
    }

    #[test]
    fn drained_logs_do_not_come_back() {
        let mut token = my_token();
        token.transfer(&deployer(), &other(), ONE).unwrap();
        let drained = token.drain_logs();
        assert_eq!(drained.len(), 2);
        assert!(token.logs().is_empty());

        let snapshot = token.snapshot();
        token.transfer(&other(), &deployer(), ONE).unwrap();
        token.restore(snapshot);
        assert!(token.logs().is_empty());
        assert_eq!(token.balance_of(&other()), ONE);
    }

    #[test]
    fn deploy_rejects_overflowing_supply() {
        let result = MyToken::deploy(
            deployer(),
            TokenMetadata {
                name: "Huge".into(),
                symbol: "HG".into(),
                decimals: 18,
            },
            u128::MAX,
        );
        assert!(matches!(result, Err(TokenError::Overflow)));
    }
}
