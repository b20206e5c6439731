//! The receiving side of a native-currency send.

use crate::error::VaultError;
use crate::vault::NativeVault;

/// Code that runs when the vault sends native currency to an account.
///
/// This is the account's own logic, so it is untrusted: it gets the vault
/// back and may call anything on it, including `withdraw`. Returning an
/// error refuses the funds and fails the sending operation.
pub trait NativeReceiver {
    fn on_receive(&mut self, vault: &mut NativeVault, amount: u128) -> Result<(), VaultError>;
}

impl<F> NativeReceiver for F
where
    F: FnMut(&mut NativeVault, u128) -> Result<(), VaultError>,
{
    fn on_receive(&mut self, vault: &mut NativeVault, amount: u128) -> Result<(), VaultError> {
        self(vault, amount)
    }
}
