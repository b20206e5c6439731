//! Unanimous manager confirmation.
//!
//! Lifecycle per rate-change cycle:
//! `Collecting` (0 ≤ confirmed < N) → `Ready` (confirmed == N) → `Collecting`
//! (after [`ManagerQuorum::consume`] clears every flag).

use std::collections::{HashMap, HashSet};

use crate::error::GovernanceError;
use serde::{Deserialize, Serialize};
use tinybank_types::Account;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuorumPhase {
    /// Some managers have not confirmed yet.
    Collecting,
    /// Every manager has confirmed; the next gated call may proceed.
    Ready,
}

/// The manager set and its confirmation flags.
///
/// Owned by the contract instance. The methods below are the only way the
/// flags change, and `confirmed_count` always equals the number of set flags.
#[derive(Clone, Debug)]
pub struct ManagerQuorum {
    /// Managers in construction order.
    managers: Vec<Account>,
    confirmed: HashMap<Account, bool>,
    confirmed_count: usize,
}

impl ManagerQuorum {
    /// Build a quorum over `managers`, which must be non-empty and distinct.
    pub fn new(managers: Vec<Account>) -> Result<Self, GovernanceError> {
        if managers.is_empty() {
            return Err(GovernanceError::NoManagers);
        }
        let mut seen = HashSet::new();
        for manager in &managers {
            if !seen.insert(*manager) {
                return Err(GovernanceError::DuplicateManager(*manager));
            }
        }
        let confirmed = managers.iter().map(|m| (*m, false)).collect();
        Ok(Self {
            managers,
            confirmed,
            confirmed_count: 0,
        })
    }

    pub fn managers(&self) -> &[Account] {
        &self.managers
    }

    /// N — the number of confirmations a gated call needs.
    pub fn required(&self) -> usize {
        self.managers.len()
    }

    pub fn confirmed_count(&self) -> usize {
        self.confirmed_count
    }

    pub fn is_manager(&self, account: &Account) -> bool {
        self.confirmed.contains_key(account)
    }

    pub fn is_confirmed(&self, account: &Account) -> bool {
        self.confirmed.get(account).copied().unwrap_or(false)
    }

    pub fn phase(&self) -> QuorumPhase {
        if self.confirmed_count == self.required() {
            QuorumPhase::Ready
        } else {
            QuorumPhase::Collecting
        }
    }

    /// Record `caller`'s confirmation. Returns the new confirmation count.
    ///
    /// A second confirmation from the same manager before the next reset is
    /// rejected with [`GovernanceError::AlreadyConfirmed`] and changes nothing.
    pub fn confirm(&mut self, caller: &Account) -> Result<usize, GovernanceError> {
        let flag = self
            .confirmed
            .get_mut(caller)
            .ok_or(GovernanceError::NotManager(*caller))?;
        if *flag {
            return Err(GovernanceError::AlreadyConfirmed(*caller));
        }
        *flag = true;
        self.confirmed_count += 1;
        debug!(
            manager = %caller,
            confirmed = self.confirmed_count,
            required = self.required(),
            "manager confirmed"
        );
        Ok(self.confirmed_count)
    }

    /// Check that `caller` may run a gated action right now.
    pub fn ensure_ready(&self, caller: &Account) -> Result<(), GovernanceError> {
        if !self.is_manager(caller) {
            return Err(GovernanceError::NotManager(*caller));
        }
        if self.confirmed_count < self.required() {
            return Err(GovernanceError::QuorumNotMet {
                confirmed: self.confirmed_count,
                required: self.required(),
            });
        }
        Ok(())
    }

    /// Spend the quorum: check readiness, then clear every confirmation.
    ///
    /// On error nothing changes, so confirmations survive failed attempts.
    pub fn consume(&mut self, caller: &Account) -> Result<(), GovernanceError> {
        self.ensure_ready(caller)?;
        for flag in self.confirmed.values_mut() {
            *flag = false;
        }
        self.confirmed_count = 0;
        info!(manager = %caller, "quorum consumed, confirmations reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(i: u64) -> Account {
        Account::from_low_u64(i)
    }

    fn three_managers() -> ManagerQuorum {
        ManagerQuorum::new(vec![manager(1), manager(2), manager(3)]).unwrap()
    }

    fn outsider() -> Account {
        Account::from_low_u64(99)
    }

    #[test]
    fn empty_manager_set_is_rejected() {
        assert_eq!(
            ManagerQuorum::new(Vec::new()).unwrap_err(),
            GovernanceError::NoManagers
        );
    }

    #[test]
    fn duplicate_manager_is_rejected() {
        let err = ManagerQuorum::new(vec![manager(1), manager(2), manager(1)]).unwrap_err();
        assert_eq!(err, GovernanceError::DuplicateManager(manager(1)));
    }

    #[test]
    fn new_quorum_is_collecting_with_no_confirmations() {
        let quorum = three_managers();
        assert_eq!(quorum.required(), 3);
        assert_eq!(quorum.confirmed_count(), 0);
        assert_eq!(quorum.phase(), QuorumPhase::Collecting);
        assert_eq!(quorum.managers(), &[manager(1), manager(2), manager(3)]);
    }

    #[test]
    fn outsider_cannot_confirm() {
        let mut quorum = three_managers();
        assert_eq!(
            quorum.confirm(&outsider()).unwrap_err(),
            GovernanceError::NotManager(outsider())
        );
        assert_eq!(quorum.confirmed_count(), 0);
    }

    #[test]
    fn repeat_confirmation_is_rejected_without_double_counting() {
        let mut quorum = three_managers();
        assert_eq!(quorum.confirm(&manager(1)).unwrap(), 1);
        let err = quorum.confirm(&manager(1)).unwrap_err();
        assert_eq!(err, GovernanceError::AlreadyConfirmed(manager(1)));
        assert_eq!(quorum.confirmed_count(), 1);
    }

    #[test]
    fn consume_requires_every_manager() {
        let mut quorum = three_managers();
        for (i, m) in [manager(1), manager(2)].iter().enumerate() {
            assert_eq!(
                quorum.consume(&manager(3)).unwrap_err(),
                GovernanceError::QuorumNotMet {
                    confirmed: i,
                    required: 3
                }
            );
            quorum.confirm(m).unwrap();
        }
        assert!(matches!(
            quorum.consume(&manager(3)),
            Err(GovernanceError::QuorumNotMet { confirmed: 2, .. })
        ));
        // The failed attempts did not clear anything.
        assert!(quorum.is_confirmed(&manager(1)));
        assert!(quorum.is_confirmed(&manager(2)));

        quorum.confirm(&manager(3)).unwrap();
        assert_eq!(quorum.phase(), QuorumPhase::Ready);
        quorum.consume(&manager(3)).unwrap();
    }

    #[test]
    fn consume_resets_every_flag() {
        let mut quorum = three_managers();
        for i in 1..=3 {
            quorum.confirm(&manager(i)).unwrap();
        }
        quorum.consume(&manager(2)).unwrap();

        assert_eq!(quorum.confirmed_count(), 0);
        assert_eq!(quorum.phase(), QuorumPhase::Collecting);
        for i in 1..=3 {
            assert!(!quorum.is_confirmed(&manager(i)));
        }
        // Fresh round: a manager may confirm again.
        assert_eq!(quorum.confirm(&manager(1)).unwrap(), 1);
    }

    #[test]
    fn outsider_cannot_consume_a_ready_quorum() {
        let mut quorum = three_managers();
        for i in 1..=3 {
            quorum.confirm(&manager(i)).unwrap();
        }
        assert_eq!(
            quorum.consume(&outsider()).unwrap_err(),
            GovernanceError::NotManager(outsider())
        );
        assert_eq!(quorum.phase(), QuorumPhase::Ready);
    }

    #[test]
    fn single_manager_quorum() {
        let mut quorum = ManagerQuorum::new(vec![manager(7)]).unwrap();
        quorum.confirm(&manager(7)).unwrap();
        assert_eq!(quorum.phase(), QuorumPhase::Ready);
        quorum.consume(&manager(7)).unwrap();
        assert_eq!(quorum.phase(), QuorumPhase::Collecting);
    }
}
