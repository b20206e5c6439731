//! Native-currency vault.
//!
//! Accounts deposit native currency and later withdraw their whole balance.
//! Withdrawal hands value to caller-controlled code ([`NativeReceiver`]),
//! which may try to call back into the vault. Two layers keep that safe:
//! the balance is zeroed before the send (checks-effects-interactions), and
//! the withdraw surface is behind a reentrancy guard. A failed send rolls the
//! whole withdrawal back.

pub mod error;
pub mod receiver;
pub mod vault;

pub use error::VaultError;
pub use receiver::NativeReceiver;
pub use vault::{NativeVault, VaultEvent};
