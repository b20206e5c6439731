//! Fungible token ledger.
//!
//! The bank only ever talks to a token through the [`TokenLedger`] trait:
//! balance lookups, pushes, allowance-checked pulls, and manager-gated
//! minting for reward payout. [`MyToken`] is the reference in-memory
//! implementation used by deployments and tests.

pub mod error;
pub mod ledger;
pub mod my_token;

pub use error::TokenError;
pub use ledger::TokenLedger;
pub use my_token::{MyToken, TokenEvent, TokenMetadata, TokenSnapshot};
