//! Bank configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use tinybank_token::TokenMetadata;
use tinybank_types::Account;
use tinybank_utils::LogFormat;

use crate::BankError;

/// Configuration for a TinyBank deployment.
///
/// Can be loaded from a TOML file via [`BankConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). The manager list and the initial
/// reward rate have no defaults and must always be given.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankConfig {
    /// Accounts allowed to confirm and change the reward rate, in order.
    pub managers: Vec<Account>,

    /// Reward minted per block, shared among stakers.
    pub reward_per_block: u64,

    /// The bank contract's own identity on the token ledger.
    #[serde(default = "default_bank_account")]
    pub bank_account: Account,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Reference token deployed alongside the bank.
    #[serde(default)]
    pub token: TokenConfig,
}

/// The `[token]` section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_token_name")]
    pub name: String,

    #[serde(default = "default_token_symbol")]
    pub symbol: String,

    #[serde(default = "default_token_decimals")]
    pub decimals: u8,

    /// Whole tokens minted to the deployer (scaled by `10^decimals`).
    #[serde(default = "default_initial_supply")]
    pub initial_supply: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

/// Bank identity used when a config does not name one.
pub const DEFAULT_BANK_ACCOUNT: Account = Account::new([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xba, 0x4c,
]);

fn default_bank_account() -> Account {
    DEFAULT_BANK_ACCOUNT
}

fn default_token_name() -> String {
    "MyToken".to_string()
}

fn default_token_symbol() -> String {
    "MT".to_string()
}

fn default_token_decimals() -> u8 {
    18
}

fn default_initial_supply() -> u64 {
    100
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl BankConfig {
    /// A config with the given managers and rate, everything else defaulted.
    pub fn new(managers: Vec<Account>, reward_per_block: u64) -> Self {
        Self {
            managers,
            reward_per_block,
            bank_account: default_bank_account(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            token: TokenConfig::default(),
        }
    }

    /// Load and validate configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| BankError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, BankError> {
        let config: Self = toml::from_str(s).map_err(|e| BankError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, BankError> {
        toml::to_string_pretty(self).map_err(|e| BankError::Config(e.to_string()))
    }

    /// Reject manager lists the quorum could never be built from.
    pub fn validate(&self) -> Result<(), BankError> {
        if self.managers.is_empty() {
            return Err(BankError::Config("at least one manager is required".into()));
        }
        let mut seen = HashSet::with_capacity(self.managers.len());
        for manager in &self.managers {
            if !seen.insert(manager) {
                return Err(BankError::Config(format!("duplicate manager {manager}")));
            }
        }
        self.parsed_log_format()?;
        Ok(())
    }

    pub fn parsed_log_format(&self) -> Result<LogFormat, BankError> {
        self.log_format.parse().map_err(BankError::Config)
    }

    /// Install the global tracing subscriber described by this config.
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber has already been set.
    pub fn init_logging(&self) -> Result<(), BankError> {
        tinybank_utils::init_logging(self.parsed_log_format()?, &self.log_level);
        Ok(())
    }
}

impl TokenConfig {
    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: default_token_name(),
            symbol: default_token_symbol(),
            decimals: default_token_decimals(),
            initial_supply: default_initial_supply(),
        }
    }
}
