//! The TinyBank contract — wires the stake ledger, the manager quorum, and
//! the token ledger together behind the public entry points.

use tinybank_governance::ManagerQuorum;
use tinybank_staking::{StakeLedger, StakeRecord};
use tinybank_token::{MyToken, TokenLedger};
use tinybank_types::{Account, BlockHeight};
use tinybank_utils::Revertible;
use tracing::{info, warn};

use crate::config::BankConfig;
use crate::event::{BankEvent, EventBus};
use crate::tracing_spans::{confirm_span, rate_change_span, stake_span, withdraw_span};
use crate::BankError;

/// A deployed staking bank over token ledger `T`.
///
/// Every entry point takes the caller and, where rewards are involved, the
/// current block height. Events reach subscribers only after the call
/// commits.
pub struct TinyBank<T> {
    account: Account,
    token: T,
    ledger: StakeLedger,
    quorum: ManagerQuorum,
    events: EventBus,
}

impl<T> TinyBank<T>
where
    T: TokenLedger + Revertible,
{
    /// Deploy a bank at `account` over `token`.
    ///
    /// `managers` must be non-empty and distinct. The token should have made
    /// `account` its manager, otherwise every reward payout fails.
    pub fn new(
        account: Account,
        token: T,
        managers: Vec<Account>,
        reward_per_block: u128,
    ) -> Result<Self, BankError> {
        let quorum = ManagerQuorum::new(managers)?;
        info!(
            bank = %account,
            managers = quorum.required(),
            reward_per_block,
            "bank deployed"
        );
        Ok(Self {
            account,
            token,
            ledger: StakeLedger::new(account, reward_per_block),
            quorum,
            events: EventBus::new(),
        })
    }

    /// Deploy from a validated config.
    pub fn deploy(config: &BankConfig, token: T) -> Result<Self, BankError> {
        config.validate()?;
        Self::new(
            config.bank_account,
            token,
            config.managers.clone(),
            u128::from(config.reward_per_block),
        )
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn token(&self) -> &T {
        &self.token
    }

    /// Let `owner` approve `spender` on the token, typically the bank's own
    /// account ahead of a stake.
    pub fn approve(
        &mut self,
        owner: &Account,
        spender: &Account,
        amount: u128,
    ) -> Result<(), BankError> {
        self.ensure_not_custody(owner)?;
        Ok(self.token.approve(owner, spender, amount)?)
    }

    /// Plain token transfer between holders. The bank's custody account
    /// only moves tokens through [`TinyBank::withdraw`].
    pub fn transfer_tokens(
        &mut self,
        sender: &Account,
        to: &Account,
        amount: u128,
    ) -> Result<(), BankError> {
        self.ensure_not_custody(sender)?;
        Ok(self.token.transfer(sender, to, amount)?)
    }

    fn ensure_not_custody(&self, account: &Account) -> Result<(), BankError> {
        if *account == self.account {
            warn!(account = %account, "token call on the custody account rejected");
            return Err(BankError::CustodyAccount(*account));
        }
        Ok(())
    }

    pub fn ledger(&self) -> &StakeLedger {
        &self.ledger
    }

    pub fn quorum(&self) -> &ManagerQuorum {
        &self.quorum
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&BankEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Staking ────────────────────────────────────────────────────────

    /// Lock `amount` tokens from `caller`, settling any reward owed first.
    pub fn stake(
        &mut self,
        caller: &Account,
        amount: u128,
        now: BlockHeight,
    ) -> Result<(), BankError> {
        let _span = stake_span(caller, amount, now).entered();
        let events = self.ledger.stake(&mut self.token, caller, amount, now)?;
        self.events.emit_all(events.into_iter().map(BankEvent::from));
        Ok(())
    }

    /// Release `amount` tokens to `caller`, settling any reward owed first.
    pub fn withdraw(
        &mut self,
        caller: &Account,
        amount: u128,
        now: BlockHeight,
    ) -> Result<(), BankError> {
        let _span = withdraw_span(caller, amount, now).entered();
        let events = self.ledger.withdraw(&mut self.token, caller, amount, now)?;
        self.events.emit_all(events.into_iter().map(BankEvent::from));
        Ok(())
    }

    pub fn staked(&self, account: &Account) -> u128 {
        self.ledger.staked(account)
    }

    pub fn total_staked(&self) -> u128 {
        self.ledger.total_staked()
    }

    pub fn last_claimed_block(&self, account: &Account) -> BlockHeight {
        self.ledger.last_claimed_block(account)
    }

    pub fn stake_record(&self, account: &Account) -> StakeRecord {
        self.ledger.record(account)
    }

    /// Reward `account` would be paid if it settled at `now`.
    pub fn pending_reward(&self, account: &Account, now: BlockHeight) -> Result<u128, BankError> {
        Ok(self.ledger.pending_reward(account, now)?)
    }

    pub fn reward_per_block(&self) -> u128 {
        self.ledger.reward_per_block()
    }

    // ── Governance ─────────────────────────────────────────────────────

    /// Record a manager's confirmation. Returns the confirmation count.
    pub fn confirm(&mut self, caller: &Account) -> Result<usize, BankError> {
        let _span = confirm_span(caller).entered();
        self.quorum.confirm(caller).map_err(|e| {
            warn!(error = %e, "confirmation rejected");
            BankError::from(e)
        })
    }

    /// Change the reward rate once every manager has confirmed.
    ///
    /// On success all confirmations are cleared, so the next change needs a
    /// full fresh round. On failure confirmations are kept.
    pub fn set_reward_per_block(
        &mut self,
        caller: &Account,
        new_rate: u128,
    ) -> Result<(), BankError> {
        let _span = rate_change_span(caller, new_rate).entered();
        self.quorum.consume(caller).map_err(|e| {
            warn!(error = %e, "reward rate change rejected");
            BankError::from(e)
        })?;
        let old_rate = self.ledger.set_reward_per_block(new_rate);
        info!(old_rate, new_rate, "reward rate changed");
        self.events.emit(&BankEvent::RewardRateChanged { old_rate, new_rate });
        Ok(())
    }
}

impl TinyBank<MyToken> {
    /// Deploy the reference token and a bank over it, the way the standard
    /// deployment does: `deployer` receives the initial supply, then hands
    /// the token's minting rights to the bank.
    pub fn deploy_reference(config: &BankConfig, deployer: Account) -> Result<Self, BankError> {
        let mut token = MyToken::deploy(
            deployer,
            config.token.metadata(),
            u128::from(config.token.initial_supply),
        )?;
        token.set_manager(&deployer, config.bank_account)?;
        Self::deploy(config, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tinybank_governance::QuorumPhase;
    use tinybank_token::TokenMetadata;
    use tinybank_types::ErrorKind;

    fn deployer() -> Account {
        Account::from_low_u64(0xd0)
    }

    fn manager(i: u64) -> Account {
        Account::from_low_u64(i)
    }

    fn config() -> BankConfig {
        let mut config = BankConfig::new(vec![manager(1), manager(2), manager(3)], 1);
        config.token.decimals = 0;
        config
    }

    fn at(height: u64) -> BlockHeight {
        BlockHeight::new(height)
    }

    /// Reference deployment with `deployer` holding 100 tokens and a full
    /// approval to the bank.
    fn bank() -> TinyBank<MyToken> {
        let mut bank = TinyBank::deploy_reference(&config(), deployer()).unwrap();
        let account = *bank.account();
        bank.approve(&deployer(), &account, 100).unwrap();
        bank
    }

    fn recorder(bank: &mut TinyBank<MyToken>) -> Arc<Mutex<Vec<BankEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bank.subscribe(Box::new(move |event| sink.lock().unwrap().push(event.clone())));
        seen
    }

    #[test]
    fn reference_deploy_hands_minting_to_bank() {
        let bank = bank();
        assert_eq!(bank.token().manager(), bank.account());
        assert_eq!(bank.token().balance_of(&deployer()), 100);
        assert_eq!(bank.token().symbol(), "MT");
        assert_eq!(bank.reward_per_block(), 1);
        assert_eq!(bank.quorum().required(), 3);
    }

    #[test]
    fn deploy_rejects_invalid_config() {
        let token = MyToken::deploy(
            deployer(),
            TokenMetadata {
                name: "T".into(),
                symbol: "T".into(),
                decimals: 0,
            },
            1,
        )
        .unwrap();
        let config = BankConfig::new(Vec::new(), 1);
        assert!(matches!(
            TinyBank::deploy(&config, token),
            Err(BankError::Config(_))
        ));
    }

    #[test]
    fn stake_and_withdraw_publish_committed_events() {
        let mut bank = bank();
        let seen = recorder(&mut bank);

        bank.stake(&deployer(), 50, at(10)).unwrap();
        bank.withdraw(&deployer(), 50, at(15)).unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                BankEvent::Staked {
                    account: deployer(),
                    amount: 50
                },
                BankEvent::RewardPaid {
                    account: deployer(),
                    amount: 5
                },
                BankEvent::Withdrawal {
                    account: deployer(),
                    amount: 50
                },
            ]
        );
        assert_eq!(bank.token().balance_of(&deployer()), 105);
    }

    #[test]
    fn failed_call_publishes_nothing() {
        let mut bank = bank();
        let seen = recorder(&mut bank);

        let err = bank.stake(&deployer(), 0, at(1)).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::InvalidAmount));
        let err = bank.withdraw(&deployer(), 1, at(1)).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::InsufficientStake));
        let err = bank.set_reward_per_block(&manager(1), 9).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::QuorumNotMet));

        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn rate_change_publishes_old_and_new_rate() {
        let mut bank = bank();
        let seen = recorder(&mut bank);
        for i in 1..=3 {
            assert_eq!(bank.confirm(&manager(i)).unwrap(), i as usize);
        }
        assert_eq!(bank.quorum().phase(), QuorumPhase::Ready);

        bank.set_reward_per_block(&manager(2), 7).unwrap();

        assert_eq!(bank.reward_per_block(), 7);
        assert_eq!(bank.quorum().confirmed_count(), 0);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![BankEvent::RewardRateChanged {
                old_rate: 1,
                new_rate: 7
            }]
        );
    }

    #[test]
    fn pending_reward_matches_payout() {
        let mut bank = bank();
        bank.stake(&deployer(), 40, at(1)).unwrap();
        assert_eq!(bank.pending_reward(&deployer(), at(4)).unwrap(), 3);

        bank.withdraw(&deployer(), 0, at(4)).unwrap();
        assert_eq!(bank.token().balance_of(&deployer()), 60 + 3);
        assert_eq!(bank.last_claimed_block(&deployer()), at(4));
        assert_eq!(bank.stake_record(&deployer()).staked_amount, 40);
    }

    #[test]
    fn custody_account_tokens_cannot_be_moved_directly() {
        let mut bank = bank();
        let account = *bank.account();
        bank.stake(&deployer(), 60, at(1)).unwrap();

        let err = bank.transfer_tokens(&account, &deployer(), 60).unwrap_err();
        assert!(matches!(err, BankError::CustodyAccount(a) if a == account));
        let err = bank.approve(&account, &deployer(), u128::MAX).unwrap_err();
        assert!(matches!(err, BankError::CustodyAccount(_)));

        assert_eq!(bank.token().balance_of(&account), bank.total_staked());
        assert_eq!(bank.token().balance_of(&deployer()), 40);
        bank.withdraw(&deployer(), 60, at(1)).unwrap();
        assert_eq!(bank.token().balance_of(&deployer()), 100);
    }

    #[test]
    fn holders_can_still_transfer_between_themselves() {
        let mut bank = bank();
        let carol = Account::from_low_u64(0xc0);
        bank.transfer_tokens(&deployer(), &carol, 30).unwrap();
        assert_eq!(bank.token().balance_of(&carol), 30);
        let err = bank.transfer_tokens(&carol, &deployer(), 31).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::InsufficientBalance));
    }
}
