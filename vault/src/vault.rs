//! The native vault ledger.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tinybank_types::Account;
use tinybank_utils::ReentrancyGuard;
use tracing::{info, trace, warn};

use crate::error::VaultError;
use crate::receiver::NativeReceiver;

/// Logs emitted by the vault, in emission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultEvent {
    Deposited { account: Account, amount: u128 },
    Withdrawn { account: Account, amount: u128 },
}

#[derive(Clone, Debug, Default)]
struct Books {
    balances: HashMap<Account, u128>,
    /// Native currency physically held; always Σ balances.
    total_held: u128,
}

/// Where a withdrawal started from. Never leaves this module, so a receiver
/// holding `&mut NativeVault` has no way to rewind the books.
struct Checkpoint {
    books: Books,
    log_len: usize,
}

#[derive(Debug, Default)]
pub struct NativeVault {
    books: Books,
    logs: Vec<VaultEvent>,
    guard: ReentrancyGuard,
}

impl NativeVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Account) -> u128 {
        self.books.balances.get(account).copied().unwrap_or(0)
    }

    pub fn total_held(&self) -> u128 {
        self.books.total_held
    }

    /// Logs emitted since the last [`NativeVault::drain_logs`].
    pub fn logs(&self) -> &[VaultEvent] {
        &self.logs
    }

    /// Hand over every buffered log, leaving the buffer empty.
    pub fn drain_logs(&mut self) -> Vec<VaultEvent> {
        std::mem::take(&mut self.logs)
    }

    /// Whether a withdrawal is currently in flight.
    pub fn is_locked(&self) -> bool {
        self.guard.is_locked()
    }

    /// Credit `amount` of incoming native currency to `sender`.
    ///
    /// Stands in for the implicit receive hook: value arrives with the call
    /// and is credited unconditionally, zero included.
    pub fn deposit(&mut self, sender: &Account, amount: u128) -> Result<(), VaultError> {
        let balance = self
            .balance_of(sender)
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;
        let total_held = self
            .books
            .total_held
            .checked_add(amount)
            .ok_or(VaultError::Overflow)?;
        self.books.balances.insert(*sender, balance);
        self.books.total_held = total_held;
        self.logs.push(VaultEvent::Deposited {
            account: *sender,
            amount,
        });
        info!(account = %sender, amount, "native deposit");
        Ok(())
    }

    /// Send `caller`'s entire balance to `receiver`. Returns the amount sent.
    ///
    /// The balance is zeroed before `receiver` runs. If the receiver fails,
    /// including by re-entering this method, the error comes back wrapped in
    /// [`VaultError::TransferFailed`] and every vault change made during the
    /// call is undone.
    pub fn withdraw(
        &mut self,
        caller: &Account,
        receiver: &mut dyn NativeReceiver,
    ) -> Result<u128, VaultError> {
        let _entered = self.guard.enter().inspect_err(|_| {
            warn!(account = %caller, "reentrant withdraw rejected");
        })?;

        let checkpoint = self.checkpoint();
        let amount = match self.pay_out(caller, receiver) {
            Ok(amount) => amount,
            Err(err) => {
                trace!(error = %err, "withdrawal failed, rolling vault back");
                self.rollback(checkpoint);
                return Err(err);
            }
        };

        info!(account = %caller, amount, "native withdrawal");
        Ok(amount)
    }

    fn pay_out(
        &mut self,
        caller: &Account,
        receiver: &mut dyn NativeReceiver,
    ) -> Result<u128, VaultError> {
        let amount = self.balance_of(caller);
        if amount == 0 {
            return Err(VaultError::InsufficientBalance);
        }

        self.books.balances.remove(caller);
        self.books.total_held = self.books.total_held.checked_sub(amount).ok_or_else(|| {
            VaultError::InvariantViolation(format!(
                "total held {} below balance {}",
                self.books.total_held, amount
            ))
        })?;
        self.logs.push(VaultEvent::Withdrawn {
            account: *caller,
            amount,
        });

        receiver
            .on_receive(self, amount)
            .map_err(|e| VaultError::TransferFailed(Box::new(e)))?;
        Ok(amount)
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            books: self.books.clone(),
            log_len: self.logs.len(),
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.books = checkpoint.books;
        self.logs.truncate(checkpoint.log_len);
    }
}
