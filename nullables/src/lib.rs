//! Nullable infrastructure for deterministic testing.
//!
//! The bank's outside world is the chain's block height and whatever code
//! sits behind an account that receives native currency. This crate provides
//! test-friendly stand-ins that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Model hostile counterparties on demand
//!
//! Usage: swap real collaborators for nullables in tests.

pub mod chain;
pub mod wallet;

pub use chain::NullChain;
pub use wallet::{NullWallet, ReentrantWallet, RejectingWallet};
