//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file; the wallet secret is always taken from the
//! `WALLET_SECRET` environment variable rather than the file, so it never ends up on disk
//! alongside the rest of the settings.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;
use solana_sdk::commitment_config::CommitmentLevel;
use solana_sdk::pubkey::Pubkey;
use tracing_subscriber::{fmt, EnvFilter};

use crate::core::exchange::{ExecutorMode, SubscriptionConfig};
use crate::error::{ConfigError, Result};

fn parse_pubkey(field: &'static str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value)
        .map_err(|e| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: e.to_string(),
        }
        .into())
}

/// Pipe-delimited RPC/websocket endpoint lists plus the commitment level all connections use.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    pub rpc_urls: String,
    pub ws_urls: String,
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

impl EndpointsConfig {
    pub fn commitment_level(&self) -> Result<CommitmentLevel> {
        match self.commitment.as_str() {
            "processed" => Ok(CommitmentLevel::Processed),
            "confirmed" => Ok(CommitmentLevel::Confirmed),
            "finalized" => Ok(CommitmentLevel::Finalized),
            other => Err(ConfigError::InvalidValue {
                field: "commitment".to_string(),
                reason: format!("must be one of processed|confirmed|finalized, got {other}"),
            }
            .into()),
        }
    }
}

/// Wallet secret source: either a 64-byte JSON keyfile path or (via `WALLET_SECRET`) a
/// base58-encoded string. Never stored in the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletConfig {
    pub keyfile: Option<PathBuf>,
    #[serde(skip)]
    pub secret_env: Option<String>,
}

/// Trade sizing, retry, and timing knobs (§6).
#[derive(Debug, Clone, Deserialize)]
pub struct TradeConfig {
    pub quote_mint: String,
    pub quote_amount: Decimal,
    #[serde(default)]
    pub auto_sell: bool,
    #[serde(default)]
    pub auto_buy_delay_ms: u64,
    #[serde(default)]
    pub auto_sell_delay_ms: u64,
    #[serde(default = "default_retries")]
    pub max_buy_retries: u32,
    #[serde(default = "default_retries")]
    pub max_sell_retries: u32,
    #[serde(default)]
    pub unit_limit: u32,
    #[serde(default)]
    pub unit_price: u64,
    pub take_profit_pct: Decimal,
    pub stop_loss_pct: Decimal,
    pub buy_slippage_pct: Decimal,
    pub sell_slippage_pct: Decimal,
    #[serde(default)]
    pub price_check_interval_ms: u64,
    #[serde(default)]
    pub price_check_duration_ms: u64,
    #[serde(default)]
    pub one_token_at_a_time: bool,
}

fn default_retries() -> u32 {
    3
}

impl TradeConfig {
    pub fn quote_mint(&self) -> Result<Pubkey> {
        parse_pubkey("quote_mint", &self.quote_mint)
    }

    #[must_use]
    pub fn auto_buy_delay(&self) -> Duration {
        Duration::from_millis(self.auto_buy_delay_ms)
    }

    #[must_use]
    pub fn auto_sell_delay(&self) -> Duration {
        Duration::from_millis(self.auto_sell_delay_ms)
    }

    #[must_use]
    pub fn price_check_interval(&self) -> Duration {
        Duration::from_millis(self.price_check_interval_ms)
    }

    #[must_use]
    pub fn price_check_duration(&self) -> Duration {
        Duration::from_millis(self.price_check_duration_ms)
    }
}

/// Pool-eligibility filter toggles and thresholds (§4.4, §6).
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub check_renounced: bool,
    #[serde(default)]
    pub check_freezable: bool,
    #[serde(default)]
    pub check_burned: bool,
    #[serde(default)]
    pub check_from_pump_fun: bool,
    #[serde(default)]
    pub min_pool_size: Decimal,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: Decimal,
    #[serde(default)]
    pub filter_check_interval_ms: u64,
    #[serde(default)]
    pub filter_check_duration_ms: u64,
    #[serde(default = "default_consecutive_match_count")]
    pub consecutive_match_count: u32,
    pub pump_fun_authority: Option<String>,
}

fn default_max_pool_size() -> Decimal {
    Decimal::from(u64::MAX / 2)
}

fn default_consecutive_match_count() -> u32 {
    1
}

impl FilterConfig {
    #[must_use]
    pub fn filter_check_interval(&self) -> Duration {
        Duration::from_millis(self.filter_check_interval_ms)
    }

    #[must_use]
    pub fn filter_check_duration(&self) -> Duration {
        Duration::from_millis(self.filter_check_duration_ms)
    }

    pub fn pump_fun_authority(&self) -> Result<Option<Pubkey>> {
        self.pump_fun_authority
            .as_deref()
            .map(|v| parse_pubkey("pump_fun_authority", v))
            .transpose()
    }
}

/// Allow-list / deny-list toggles and file paths (§4.1, §6).
#[derive(Debug, Clone, Deserialize)]
pub struct ListsConfig {
    #[serde(default)]
    pub use_snipe_list: bool,
    #[serde(default)]
    pub use_avoid_list: bool,
    #[serde(default = "default_allow_list_path")]
    pub allow_list_path: PathBuf,
    #[serde(default = "default_deny_list_path")]
    pub deny_list_path: PathBuf,
}

fn default_allow_list_path() -> PathBuf {
    PathBuf::from("snipe-list.txt")
}

fn default_deny_list_path() -> PathBuf {
    PathBuf::from("avoid-list.txt")
}

/// On-chain program addresses and account-size parameters needed to establish the subscription
/// layer's program-account-change filters (§4.5, §6).
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramsConfig {
    pub amm_program_id: String,
    pub openbook_program_id: String,
    #[serde(default = "default_pool_state_size")]
    pub pool_state_size: u64,
    pub market_state_size: Option<u64>,
    pub cpmm_program_id: Option<String>,
    pub cpmm_state_size: Option<u64>,
    #[serde(default)]
    pub cache_markets: bool,
}

fn default_pool_state_size() -> u64 {
    752
}

impl ProgramsConfig {
    pub fn amm_program_id(&self) -> Result<Pubkey> {
        parse_pubkey("programs.amm_program_id", &self.amm_program_id)
    }

    pub fn openbook_program_id(&self) -> Result<Pubkey> {
        parse_pubkey("programs.openbook_program_id", &self.openbook_program_id)
    }

    pub fn cpmm_program_id(&self) -> Result<Option<Pubkey>> {
        self.cpmm_program_id
            .as_deref()
            .map(|v| parse_pubkey("programs.cpmm_program_id", v))
            .transpose()
    }

    /// Builds the subscription-layer configuration from the programs/trade settings plus the
    /// caller-supplied wallet public key, which is never persisted in the TOML file itself.
    pub fn to_subscription_config(&self, quote_mint: Pubkey, wallet_public_key: Option<Pubkey>) -> Result<SubscriptionConfig> {
        Ok(SubscriptionConfig {
            amm_program_id: self.amm_program_id()?,
            openbook_program_id: self.openbook_program_id()?,
            quote_mint,
            pool_state_size: self.pool_state_size,
            market_state_size: self.market_state_size,
            cpmm_program_id: self.cpmm_program_id()?,
            cpmm_state_size: self.cpmm_state_size,
            wallet_public_key,
            cache_markets: self.cache_markets,
        })
    }
}

/// Transaction-executor selection and relay parameters (§4.3, §6).
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default = "default_executor_mode")]
    pub mode: String,
    pub relay_url: Option<String>,
    pub fee_recipient: Option<String>,
    #[serde(default)]
    pub fee_lamports: u64,
    #[serde(default)]
    pub tip_recipients: Vec<String>,
    #[serde(default)]
    pub tip_lamports: u64,
    #[serde(default = "default_inclusion_timeout_ms")]
    pub inclusion_timeout_ms: u64,
}

fn default_executor_mode() -> String {
    "default".to_string()
}

fn default_inclusion_timeout_ms() -> u64 {
    30_000
}

impl ExecutorConfig {
    pub fn mode(&self) -> Result<ExecutorMode> {
        ExecutorMode::parse(&self.mode)
    }

    pub fn fee_recipient(&self) -> Result<Option<Pubkey>> {
        self.fee_recipient
            .as_deref()
            .map(|v| parse_pubkey("fee_recipient", v))
            .transpose()
    }

    pub fn tip_recipients(&self) -> Result<Vec<Pubkey>> {
        self.tip_recipients
            .iter()
            .map(|v| parse_pubkey("tip_recipients", v))
            .collect()
    }

    #[must_use]
    pub fn inclusion_timeout(&self) -> Duration {
        Duration::from_millis(self.inclusion_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    pub trade: TradeConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub lists: ListsConfig,
    pub programs: ProgramsConfig,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            check_renounced: false,
            check_freezable: false,
            check_burned: false,
            check_from_pump_fun: false,
            min_pool_size: Decimal::ZERO,
            max_pool_size: default_max_pool_size(),
            filter_check_interval_ms: 0,
            filter_check_duration_ms: 0,
            consecutive_match_count: default_consecutive_match_count(),
            pump_fun_authority: None,
        }
    }
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self {
            use_snipe_list: false,
            use_avoid_list: false,
            allow_list_path: default_allow_list_path(),
            deny_list_path: default_deny_list_path(),
        }
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            mode: default_executor_mode(),
            relay_url: None,
            fee_recipient: None,
            fee_lamports: 0,
            tip_recipients: Vec::new(),
            tip_lamports: 0,
            inclusion_timeout_ms: default_inclusion_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;

        let mut config: Self = toml::from_str(&content)?;
        config.wallet.secret_env = std::env::var("WALLET_SECRET").ok();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let rpc_count = self.endpoints.rpc_urls.split('|').filter(|s| !s.is_empty()).count();
        let ws_count = self.endpoints.ws_urls.split('|').filter(|s| !s.is_empty()).count();
        if rpc_count == 0 {
            return Err(ConfigError::MissingField { field: "endpoints.rpc_urls" }.into());
        }
        if rpc_count != ws_count {
            return Err(ConfigError::InvalidValue {
                field: "endpoints.ws_urls".to_string(),
                reason: format!("{ws_count} ws endpoints but {rpc_count} rpc endpoints"),
            }
            .into());
        }
        self.endpoints.commitment_level()?;

        if self.wallet.keyfile.is_none() && self.wallet.secret_env.is_none() {
            return Err(ConfigError::MissingField { field: "wallet.keyfile or WALLET_SECRET" }.into());
        }

        self.trade.quote_mint()?;
        self.filter.pump_fun_authority()?;
        self.executor.mode()?;
        self.executor.fee_recipient()?;
        self.executor.tip_recipients()?;
        self.programs.amm_program_id()?;
        self.programs.openbook_program_id()?;
        self.programs.cpmm_program_id()?;

        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), contents).unwrap();
        file
    }

    const MINIMAL: &str = r#"
[endpoints]
rpc_urls = "https://rpc.example.com"
ws_urls = "wss://rpc.example.com"

[wallet]
keyfile = "wallet.json"

[trade]
quote_mint = "So11111111111111111111111111111111111111112"
quote_amount = "0.05"
take_profit_pct = "50"
stop_loss_pct = "20"
buy_slippage_pct = "5"
sell_slippage_pct = "10"

[programs]
amm_program_id = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8"
openbook_program_id = "srmqPvymJeFKQ4zGQed1GFppgkRHL9kaELCbyksJtPX"
"#;

    #[test]
    fn loads_minimal_config_with_defaults() {
        let file = write_config(MINIMAL);
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.filter.consecutive_match_count, 1);
        assert_eq!(config.executor.mode, "default");
        assert!(!config.trade.one_token_at_a_time);
    }

    #[test]
    fn rejects_mismatched_endpoint_counts() {
        let contents = MINIMAL.replace(
            "rpc_urls = \"https://rpc.example.com\"",
            "rpc_urls = \"https://a.com|https://b.com\"",
        );
        let file = write_config(&contents);
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn rejects_missing_wallet_source() {
        let contents = MINIMAL.replace("keyfile = \"wallet.json\"", "");
        let file = write_config(&contents);
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn rejects_invalid_commitment() {
        let contents = MINIMAL.replacen("[endpoints]\n", "[endpoints]\ncommitment = \"nope\"\n", 1);
        let file = write_config(&contents);
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn rejects_unparseable_program_id() {
        let contents = MINIMAL.replace(
            "amm_program_id = \"675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8\"",
            "amm_program_id = \"not-a-pubkey\"",
        );
        let file = write_config(&contents);
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn builds_subscription_config_with_default_pool_state_size() {
        let file = write_config(MINIMAL);
        let config = Config::load(file.path()).unwrap();
        let quote_mint = config.trade.quote_mint().unwrap();

        let sub_config = config.programs.to_subscription_config(quote_mint, None).unwrap();
        assert_eq!(sub_config.pool_state_size, 752);
        assert_eq!(sub_config.quote_mint, quote_mint);
        assert!(!sub_config.cache_markets);
        assert!(sub_config.wallet_public_key.is_none());
    }
}
