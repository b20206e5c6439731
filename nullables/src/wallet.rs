//! Nullable native receivers — scripted counterparties for vault tests.

use tinybank_types::Account;
use tinybank_vault::{NativeReceiver, NativeVault, VaultError};

/// An externally owned account: accepts every payment and tracks its balance.
#[derive(Debug, Default)]
pub struct NullWallet {
    balance: u128,
}

impl NullWallet {
    pub fn new(balance: u128) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> u128 {
        self.balance
    }

    /// Spend `amount` out of the wallet, e.g. to fund a vault deposit.
    ///
    /// # Panics
    /// Panics if the wallet holds less than `amount`.
    pub fn spend(&mut self, amount: u128) -> u128 {
        assert!(self.balance >= amount, "wallet overdrawn");
        self.balance -= amount;
        amount
    }
}

impl NativeReceiver for NullWallet {
    fn on_receive(&mut self, _vault: &mut NativeVault, amount: u128) -> Result<(), VaultError> {
        self.balance += amount;
        Ok(())
    }
}

/// A contract account without a payable fallback: refuses every payment.
#[derive(Debug, Default)]
pub struct RejectingWallet;

impl NativeReceiver for RejectingWallet {
    fn on_receive(&mut self, _vault: &mut NativeVault, _amount: u128) -> Result<(), VaultError> {
        Err(VaultError::ReceiverRejected(
            "receiver has no payable fallback".into(),
        ))
    }
}

/// A hostile contract account that calls `withdraw` again from inside the
/// payment callback, hoping to be paid twice.
#[derive(Debug)]
pub struct ReentrantWallet {
    account: Account,
    balance: u128,
    attempts: u32,
    last_reentry: Option<Result<u128, VaultError>>,
}

impl ReentrantWallet {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            balance: 0,
            attempts: 0,
            last_reentry: None,
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn balance(&self) -> u128 {
        self.balance
    }

    /// How many times the callback tried to re-enter.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// What the vault answered the most recent re-entry.
    pub fn last_reentry(&self) -> Option<&Result<u128, VaultError>> {
        self.last_reentry.as_ref()
    }
}

impl NativeReceiver for ReentrantWallet {
    fn on_receive(&mut self, vault: &mut NativeVault, amount: u128) -> Result<(), VaultError> {
        self.attempts += 1;
        let account = self.account;
        let mut accomplice = NullWallet::default();
        let reentry = vault.withdraw(&account, &mut accomplice);
        self.last_reentry = Some(reentry.clone());
        reentry?;
        self.balance += amount + accomplice.balance();
        Ok(())
    }
}
