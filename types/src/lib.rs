//! Fundamental types for TinyBank.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account identities, block heights, and the user-facing error taxonomy.

pub mod account;
pub mod block;
pub mod error;

pub use account::{Account, AccountParseError};
pub use block::BlockHeight;
pub use error::ErrorKind;
