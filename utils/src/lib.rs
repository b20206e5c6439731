//! Shared utilities for TinyBank.

pub mod guard;
pub mod logging;
pub mod revert;

pub use guard::{Entered, ReentrancyGuard, ReentrantCall};
pub use logging::{init_logging, init_tracing, LogFormat};
pub use revert::{atomically, Revertible};
