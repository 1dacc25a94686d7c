//! The five independent eligibility predicates (§4.4).

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::debug;

use super::chain_reader::ChainReader;
use crate::core::domain::PoolKeys;

/// The outcome of one filter's evaluation against a pool.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub ok: bool,
    pub message: Option<String>,
}

impl FilterOutcome {
    #[must_use]
    pub fn pass() -> Self {
        Self { ok: true, message: None }
    }

    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}

/// A single boolean eligibility predicate evaluated against a candidate pool.
#[async_trait]
pub trait PoolFilter: Send + Sync {
    async fn execute(&self, keys: &PoolKeys) -> FilterOutcome;

    fn name(&self) -> &'static str;
}

/// The LP-mint supply must be zero: liquidity has been burned and cannot be rugged by
/// withdrawal.
pub struct BurntLiquidityFilter {
    reader: Arc<dyn ChainReader>,
}

impl BurntLiquidityFilter {
    #[must_use]
    pub fn new(reader: Arc<dyn ChainReader>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl PoolFilter for BurntLiquidityFilter {
    async fn execute(&self, keys: &PoolKeys) -> FilterOutcome {
        match self.reader.mint_supply(&keys.lp_mint).await {
            Ok(0) => FilterOutcome::pass(),
            Ok(supply) => FilterOutcome::fail(format!("LP mint supply is {supply}, not burned")),
            Err(err) => {
                debug!(error = %err, "burnt-liquidity filter fetch failed");
                FilterOutcome::fail(format!("failed to fetch LP mint supply: {err}"))
            }
        }
    }

    fn name(&self) -> &'static str {
        "burnt_liquidity"
    }
}

/// The base mint's mint-authority must be null: no one can mint additional supply.
pub struct RenouncedMintAuthorityFilter {
    reader: Arc<dyn ChainReader>,
}

impl RenouncedMintAuthorityFilter {
    #[must_use]
    pub fn new(reader: Arc<dyn ChainReader>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl PoolFilter for RenouncedMintAuthorityFilter {
    async fn execute(&self, keys: &PoolKeys) -> FilterOutcome {
        match self.reader.mint_authorities(keys.base_mint.as_pubkey()).await {
            Ok(authorities) if authorities.mint_authority.is_none() => FilterOutcome::pass(),
            Ok(_) => FilterOutcome::fail("mint authority has not been renounced"),
            Err(err) => {
                debug!(error = %err, "renounced-mint-authority filter fetch failed");
                FilterOutcome::fail(format!("failed to fetch mint authority: {err}"))
            }
        }
    }

    fn name(&self) -> &'static str {
        "renounced_mint_authority"
    }
}

/// The base mint's freeze-authority must be null; reject if present.
pub struct FreezableFilter {
    reader: Arc<dyn ChainReader>,
}

impl FreezableFilter {
    #[must_use]
    pub fn new(reader: Arc<dyn ChainReader>) -> Self {
        Self { reader }
    }
}

#[async_trait]
impl PoolFilter for FreezableFilter {
    async fn execute(&self, keys: &PoolKeys) -> FilterOutcome {
        match self.reader.mint_authorities(keys.base_mint.as_pubkey()).await {
            Ok(authorities) if authorities.freeze_authority.is_none() => FilterOutcome::pass(),
            Ok(_) => FilterOutcome::fail("base mint retains a freeze authority"),
            Err(err) => {
                debug!(error = %err, "freezable filter fetch failed");
                FilterOutcome::fail(format!("failed to fetch freeze authority: {err}"))
            }
        }
    }

    fn name(&self) -> &'static str {
        "freezable"
    }
}

/// The quote-vault balance must fall within `[min_pool_size, max_pool_size]`, expressed in the
/// quote asset's native units.
pub struct PoolSizeFilter {
    reader: Arc<dyn ChainReader>,
    min_pool_size: Decimal,
    max_pool_size: Decimal,
}

impl PoolSizeFilter {
    #[must_use]
    pub fn new(reader: Arc<dyn ChainReader>, min_pool_size: Decimal, max_pool_size: Decimal) -> Self {
        Self {
            reader,
            min_pool_size,
            max_pool_size,
        }
    }
}

#[async_trait]
impl PoolFilter for PoolSizeFilter {
    async fn execute(&self, keys: &PoolKeys) -> FilterOutcome {
        match self.reader.token_account_balance(&keys.quote_vault).await {
            Ok(balance) => {
                let balance = Decimal::from(balance);
                if balance >= self.min_pool_size && balance <= self.max_pool_size {
                    FilterOutcome::pass()
                } else {
                    FilterOutcome::fail(format!(
                        "quote vault balance {balance} outside [{}, {}]",
                        self.min_pool_size, self.max_pool_size
                    ))
                }
            }
            Err(err) => {
                debug!(error = %err, "pool-size filter fetch failed");
                FilterOutcome::fail(format!("failed to fetch quote vault balance: {err}"))
            }
        }
    }

    fn name(&self) -> &'static str {
        "pool_size"
    }
}

/// The base mint's metadata must indicate a pump.fun origin: its URI contains `pump.fun`, its
/// mint address ends in the literal suffix `pump`, or its update authority matches the
/// published pump-fun authority.
pub struct PumpFunOriginFilter {
    reader: Arc<dyn ChainReader>,
    pump_fun_authority: solana_sdk::pubkey::Pubkey,
}

impl PumpFunOriginFilter {
    #[must_use]
    pub fn new(reader: Arc<dyn ChainReader>, pump_fun_authority: solana_sdk::pubkey::Pubkey) -> Self {
        Self {
            reader,
            pump_fun_authority,
        }
    }
}

#[async_trait]
impl PoolFilter for PumpFunOriginFilter {
    async fn execute(&self, keys: &PoolKeys) -> FilterOutcome {
        let mint_pubkey: solana_sdk::pubkey::Pubkey = keys.base_mint.as_pubkey().to_owned();
        if mint_pubkey.to_string().ends_with("pump") {
            return FilterOutcome::pass();
        }

        match self.reader.metadata_for_mint(&mint_pubkey).await {
            Ok(Some(metadata)) => {
                if metadata.uri.contains("pump.fun") || metadata.update_authority == self.pump_fun_authority {
                    FilterOutcome::pass()
                } else {
                    FilterOutcome::fail("metadata does not indicate a pump.fun origin")
                }
            }
            Ok(None) => FilterOutcome::fail("no metadata account found for base mint"),
            Err(err) => {
                debug!(error = %err, "pump-fun-origin filter fetch failed");
                FilterOutcome::fail(format!("failed to fetch mint metadata: {err}"))
            }
        }
    }

    fn name(&self) -> &'static str {
        "pump_fun_origin"
    }
}
