//! Native-currency side of the bank: the vault plus event publishing.

use tinybank_types::Account;
use tinybank_vault::{NativeReceiver, NativeVault};

use crate::event::{BankEvent, EventBus};
use crate::tracing_spans::vault_span;
use crate::BankError;

/// A [`NativeVault`] whose committed logs are forwarded to subscribers.
#[derive(Default)]
pub struct NativeBank {
    vault: NativeVault,
    events: EventBus,
}

impl NativeBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vault(&self) -> &NativeVault {
        &self.vault
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&BankEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub fn balance_of(&self, account: &Account) -> u128 {
        self.vault.balance_of(account)
    }

    pub fn total_held(&self) -> u128 {
        self.vault.total_held()
    }

    /// Credit native currency sent by `sender`.
    pub fn deposit(&mut self, sender: &Account, amount: u128) -> Result<(), BankError> {
        let _span = vault_span("deposit", sender).entered();
        self.vault.deposit(sender, amount)?;
        self.publish();
        Ok(())
    }

    /// Send `caller`'s whole balance to `receiver`. Returns the amount sent.
    pub fn withdraw(
        &mut self,
        caller: &Account,
        receiver: &mut dyn NativeReceiver,
    ) -> Result<u128, BankError> {
        let _span = vault_span("withdraw", caller).entered();
        let amount = self.vault.withdraw(caller, receiver)?;
        self.publish();
        Ok(amount)
    }

    fn publish(&mut self) {
        let committed = self.vault.drain_logs();
        self.events.emit_all(committed.into_iter().map(BankEvent::from));
    }
}
