//! TinyBank — staking, reward governance, and a native vault.
//!
//! The bank is the outer surface that:
//! - Accepts stakes and withdrawals and settles block rewards
//! - Gates reward-rate changes behind an N-of-N manager quorum
//! - Holds native currency with guarded withdraw-all
//! - Publishes committed events to subscribers
//! - Loads its deployment parameters from TOML

pub mod bank;
pub mod config;
pub mod error;
pub mod event;
pub mod native;
pub mod tracing_spans;

pub use bank::TinyBank;
pub use config::{BankConfig, TokenConfig, DEFAULT_BANK_ACCOUNT};
pub use error::BankError;
pub use event::{BankEvent, EventBus};
pub use native::NativeBank;
