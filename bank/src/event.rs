//! Events emitted by committed bank operations, for subscribers.

use serde::Serialize;
use tinybank_staking::StakingEvent;
use tinybank_types::Account;
use tinybank_vault::VaultEvent;

/// Bank-level events that observers can subscribe to via the [`EventBus`].
///
/// Published only after the producing operation commits; a failed call
/// emits nothing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum BankEvent {
    /// Tokens were locked.
    Staked { account: Account, amount: u128 },
    /// Tokens were released.
    Withdrawal { account: Account, amount: u128 },
    /// Accrued reward was minted to a staker.
    RewardPaid { account: Account, amount: u128 },
    /// The manager quorum changed the reward rate.
    RewardRateChanged { old_rate: u128, new_rate: u128 },
    /// Native currency was credited to the vault.
    Deposited { account: Account, amount: u128 },
    /// An account's whole vault balance was sent out.
    Withdrawn { account: Account, amount: u128 },
}

impl BankEvent {
    /// Render as a single JSON object, e.g. for an external indexer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<StakingEvent> for BankEvent {
    fn from(event: StakingEvent) -> Self {
        match event {
            StakingEvent::Staked { account, amount } => Self::Staked { account, amount },
            StakingEvent::Withdrawal { account, amount } => Self::Withdrawal { account, amount },
            StakingEvent::RewardPaid { account, amount } => Self::RewardPaid { account, amount },
        }
    }
}

impl From<VaultEvent> for BankEvent {
    fn from(event: VaultEvent) -> Self {
        match event {
            VaultEvent::Deposited { account, amount } => Self::Deposited { account, amount },
            VaultEvent::Withdrawn { account, amount } => Self::Withdrawn { account, amount },
        }
    }
}

type Listener = Box<dyn Fn(&BankEvent) + Send + Sync>;

/// Synchronous fan-out event bus for bank events.
///
/// Listeners are invoked inline on the emitting call, in subscription order.
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &BankEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn emit_all(&self, events: impl IntoIterator<Item = BankEvent>) {
        for event in events {
            self.emit(&event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
