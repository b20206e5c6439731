//! Core stake ledger.

use std::collections::HashMap;

use crate::error::StakingError;
use crate::event::StakingEvent;
use crate::reward::accrued_reward;
use crate::state::{StakePool, StakeRecord};
use tinybank_token::TokenLedger;
use tinybank_types::{Account, BlockHeight};
use tinybank_utils::{atomically, ReentrancyGuard, Revertible};
use tracing::{debug, info, warn};

/// The stake ledger — locks tokens, settles reward, releases tokens.
///
/// `bank` is the ledger's own identity on the token: pulled stake is held
/// there, withdrawals are paid from there, and rewards are minted by it.
/// The token must have made `bank` its manager for payouts to succeed.
pub struct StakeLedger {
    bank: Account,
    pool: StakePool,
    records: HashMap<Account, StakeRecord>,
    /// Defense in depth only. `&mut self` is exclusive and [`TokenLedger`]
    /// never calls back into the ledger, so with the in-tree token this
    /// guard cannot trip; it keeps `stake`/`withdraw` non-reentrant should a
    /// token implementation ever gain callbacks through shared state.
    guard: ReentrancyGuard,
}

/// Rollback image of a [`StakeLedger`]: the records and pool only.
#[derive(Clone, Debug)]
struct LedgerSnapshot {
    pool: StakePool,
    records: HashMap<Account, StakeRecord>,
}

/// One stake or withdraw in flight: the ledger and the token it moves,
/// committed or rolled back together.
struct Transaction<'a, T> {
    ledger: &'a mut StakeLedger,
    token: &'a mut T,
}

impl<T: Revertible> Revertible for Transaction<'_, T> {
    type Snapshot = (LedgerSnapshot, T::Snapshot);

    fn snapshot(&self) -> Self::Snapshot {
        (self.ledger.snapshot(), self.token.snapshot())
    }

    fn restore(&mut self, (ledger, token): (LedgerSnapshot, T::Snapshot)) {
        self.ledger.restore(ledger);
        self.token.restore(token);
    }
}

impl StakeLedger {
    /// Create an empty ledger. The initial reward rate is always explicit.
    pub fn new(bank: Account, reward_per_block: u128) -> Self {
        Self {
            bank,
            pool: StakePool::new(reward_per_block),
            records: HashMap::new(),
            guard: ReentrancyGuard::new(),
        }
    }

    pub fn bank(&self) -> &Account {
        &self.bank
    }

    pub fn record(&self, account: &Account) -> StakeRecord {
        self.records.get(account).copied().unwrap_or_default()
    }

    pub fn staked(&self, account: &Account) -> u128 {
        self.record(account).staked_amount
    }

    pub fn last_claimed_block(&self, account: &Account) -> BlockHeight {
        self.record(account).last_claimed_block
    }

    pub fn total_staked(&self) -> u128 {
        self.pool.total_staked
    }

    pub fn reward_per_block(&self) -> u128 {
        self.pool.reward_per_block
    }

    pub fn pool(&self) -> &StakePool {
        &self.pool
    }

    /// Replace the reward rate, returning the previous one.
    ///
    /// Access control lives with the caller (the manager quorum); the ledger
    /// applies whatever it is given. Blocks not yet settled are paid at the
    /// new rate.
    pub fn set_reward_per_block(&mut self, new_rate: u128) -> u128 {
        let old = self.pool.reward_per_block;
        self.pool.reward_per_block = new_rate;
        old
    }

    /// Reward `account` would receive if it settled at `now`.
    pub fn pending_reward(&self, account: &Account, now: BlockHeight) -> Result<u128, StakingError> {
        let record = self.record(account);
        self.reward_for(&record, now)
    }

    /// Lock `amount` tokens from `caller`.
    ///
    /// Settles reward owed on the caller's existing stake first (skipped on
    /// the caller's first stake), then pulls the tokens, then grows the
    /// stake and moves the claim pointer to `now`. The caller must have
    /// approved the ledger's `bank` account for at least `amount`.
    pub fn stake<T>(
        &mut self,
        token: &mut T,
        caller: &Account,
        amount: u128,
        now: BlockHeight,
    ) -> Result<Vec<StakingEvent>, StakingError>
    where
        T: TokenLedger + Revertible,
    {
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }
        let _entered = self.guard.enter().inspect_err(|_| {
            warn!(account = %caller, "reentrant stake rejected");
        })?;
        let events = self.transact(token, |ledger, token| {
            ledger.apply_stake(token, caller, amount, now)
        })?;
        info!(account = %caller, amount, block = %now, total = self.pool.total_staked, "staked");
        Ok(events)
    }

    /// Release `amount` tokens back to `caller`.
    ///
    /// Settles reward at the pre-withdrawal stake, shrinks the stake, moves
    /// the claim pointer to `now`, then pushes the tokens. `amount == 0` is a
    /// pure reward claim.
    pub fn withdraw<T>(
        &mut self,
        token: &mut T,
        caller: &Account,
        amount: u128,
        now: BlockHeight,
    ) -> Result<Vec<StakingEvent>, StakingError>
    where
        T: TokenLedger + Revertible,
    {
        let staked = self.staked(caller);
        if amount > staked {
            return Err(StakingError::InsufficientStake {
                requested: amount,
                staked,
            });
        }
        let _entered = self.guard.enter().inspect_err(|_| {
            warn!(account = %caller, "reentrant withdraw rejected");
        })?;
        let events = self.transact(token, |ledger, token| {
            ledger.apply_withdraw(token, caller, amount, now)
        })?;
        info!(account = %caller, amount, block = %now, total = self.pool.total_staked, "withdrew");
        Ok(events)
    }

    /// Recompute Σ staked and check it against the running total.
    pub fn audit(&self) -> Result<(), StakingError> {
        let sum = self
            .records
            .values()
            .try_fold(0u128, |acc, r| acc.checked_add(r.staked_amount))
            .ok_or(StakingError::Overflow)?;
        if sum != self.pool.total_staked {
            return Err(StakingError::InvariantViolation(format!(
                "sum of stakes {} != total_staked {}",
                sum, self.pool.total_staked
            )));
        }
        Ok(())
    }

    /// Run `body`, restoring both the ledger and the token if it fails.
    fn transact<T, R>(
        &mut self,
        token: &mut T,
        body: impl FnOnce(&mut Self, &mut T) -> Result<R, StakingError>,
    ) -> Result<R, StakingError>
    where
        T: TokenLedger + Revertible,
    {
        let mut txn = Transaction {
            ledger: self,
            token,
        };
        atomically(&mut txn, |txn| body(&mut *txn.ledger, &mut *txn.token)).inspect_err(|err| {
            debug!(error = %err, "stake ledger operation rolled back");
        })
    }

    fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            pool: self.pool,
            records: self.records.clone(),
        }
    }

    fn restore(&mut self, snapshot: LedgerSnapshot) {
        self.pool = snapshot.pool;
        self.records = snapshot.records;
    }

    fn apply_stake<T: TokenLedger>(
        &mut self,
        token: &mut T,
        caller: &Account,
        amount: u128,
        now: BlockHeight,
    ) -> Result<Vec<StakingEvent>, StakingError> {
        let mut events = Vec::new();
        let record = self.record(caller);
        self.ensure_not_regressed(&record, now)?;

        // First stake: nothing has accrued, so there is nothing to settle.
        if record.is_active() {
            events.extend(self.settle_and_pay(token, caller, &record, now)?);
        }

        token.transfer_from(&self.bank, caller, &self.bank, amount)?;

        let staked_amount = record
            .staked_amount
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        let total_staked = self
            .pool
            .total_staked
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        self.records.insert(
            *caller,
            StakeRecord {
                staked_amount,
                last_claimed_block: now,
            },
        );
        self.pool.total_staked = total_staked;

        events.push(StakingEvent::Staked {
            account: *caller,
            amount,
        });
        Ok(events)
    }

    fn apply_withdraw<T: TokenLedger>(
        &mut self,
        token: &mut T,
        caller: &Account,
        amount: u128,
        now: BlockHeight,
    ) -> Result<Vec<StakingEvent>, StakingError> {
        let mut events = Vec::new();
        let record = self.record(caller);
        self.ensure_not_regressed(&record, now)?;

        events.extend(self.settle_and_pay(token, caller, &record, now)?);

        let staked_amount = record.staked_amount.checked_sub(amount).ok_or_else(|| {
            StakingError::InsufficientStake {
                requested: amount,
                staked: record.staked_amount,
            }
        })?;
        let total_staked = self.pool.total_staked.checked_sub(amount).ok_or_else(|| {
            StakingError::InvariantViolation(format!(
                "total_staked {} below withdrawal {}",
                self.pool.total_staked, amount
            ))
        })?;
        self.records.insert(
            *caller,
            StakeRecord {
                staked_amount,
                last_claimed_block: now,
            },
        );
        self.pool.total_staked = total_staked;

        token.transfer(&self.bank, caller, amount)?;

        events.push(StakingEvent::Withdrawal {
            account: *caller,
            amount,
        });
        Ok(events)
    }

    /// Mint the reward owed on `record` up to `now`. Pool state must not yet
    /// reflect the current operation's stake delta.
    fn settle_and_pay<T: TokenLedger>(
        &self,
        token: &mut T,
        caller: &Account,
        record: &StakeRecord,
        now: BlockHeight,
    ) -> Result<Option<StakingEvent>, StakingError> {
        let reward = self.reward_for(record, now)?;
        if reward == 0 {
            return Ok(None);
        }
        token.mint(&self.bank, reward, caller)?;
        debug!(
            account = %caller,
            reward,
            from = %record.last_claimed_block,
            to = %now,
            "reward paid"
        );
        Ok(Some(StakingEvent::RewardPaid {
            account: *caller,
            amount: reward,
        }))
    }

    fn reward_for(&self, record: &StakeRecord, now: BlockHeight) -> Result<u128, StakingError> {
        let elapsed = self.ensure_not_regressed(record, now)?;
        accrued_reward(
            elapsed,
            self.pool.reward_per_block,
            record.staked_amount,
            self.pool.total_staked,
        )
        .ok_or(StakingError::Overflow)
    }

    fn ensure_not_regressed(&self, record: &StakeRecord, now: BlockHeight) -> Result<u64, StakingError> {
        record
            .last_claimed_block
            .blocks_until(now)
            .ok_or(StakingError::BlockRegression {
                last_claimed: record.last_claimed_block,
                now,
            })
    }
}
