//! Manager quorum governance for TinyBank.
//!
//! A fixed set of N managers guards the reward-rate parameter. Every manager
//! must confirm (N-of-N) before any one of them may change the rate, and a
//! successful change clears all confirmations: the quorum is a one-shot
//! gate, not a standing permission.

pub mod error;
pub mod quorum;

pub use error::GovernanceError;
pub use quorum::{ManagerQuorum, QuorumPhase};
