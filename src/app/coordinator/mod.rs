//! Trade coordinator: the bot. Owns every long-lived collaborator (endpoint pool, executor,
//! filter engine, storages, list caches, subscription layer) and drives the buy/sell paths in
//! response to subscription events (§4.7).
//!
//! `oneTokenAtATime` mode is enforced with a single trade mutex plus an atomic
//! `sellExecutionCount`; a sell in flight pauses the subscription layer so no new buy events
//! arrive while it runs, mirroring the teacher's `run_with_shutdown` + `ExecutionLockGuard`
//! pause/resume convention (`app/orchestrator/mod.rs`, `app/orchestrator/execution.rs`).

mod buy;
mod price_watcher;
mod sell;
mod swap;

use std::sync::atomic::AtomicU32;
use std::sync::Arc;

use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::app::config::Config;
use crate::app::wallet::Wallet;
use crate::core::domain::MintId;
use crate::core::exchange::{
    decode_market_account, decode_pool_account, AmmInstructionBuilder, EndpointPool,
    ExecutorFactory, ExecutorMode, RelayConfig, RpcAmmClient, SubscriptionLayer, TransactionExecutor,
};
use crate::core::filter::{
    BurntLiquidityFilter, ChainReader, FilterEngine, FreezableFilter, PoolFilter, PoolSizeFilter,
    PumpFunOriginFilter, RenouncedMintAuthorityFilter, RpcChainReader,
};
use crate::core::list_cache::ListCache;
use crate::core::storage::{MarketStorage, PoolStorage};
use crate::error::{ConfigError, Result};

/// Assumed native-unit scale for the quote asset (9 decimals, matching wrapped SOL). The exact
/// decimals for an arbitrary SPL mint are only discoverable via an extra RPC round trip this
/// spec's data model has no slot for; every teacher-lineage sizing field is itself denominated in
/// whole-SOL units, so this crate makes the same assumption explicit here instead of silently.
const QUOTE_NATIVE_DECIMALS: u32 = 9;

fn quote_amount_native(amount: Decimal) -> u64 {
    let scaled = amount * Decimal::from(10u64.pow(QUOTE_NATIVE_DECIMALS));
    scaled.trunc().try_into().unwrap_or(0)
}

fn native_to_decimal(native: u64) -> Decimal {
    Decimal::from(native) / Decimal::from(10u64.pow(QUOTE_NATIVE_DECIMALS))
}

/// Owns every collaborator the buy/sell paths need and the `oneTokenAtATime` serialization state.
pub struct Coordinator {
    config: Arc<Config>,
    wallet: Arc<Wallet>,
    endpoint_pool: Arc<EndpointPool>,
    executor: Arc<dyn TransactionExecutor>,
    amm: Arc<dyn AmmInstructionBuilder>,
    filter_engine: Arc<FilterEngine>,
    market_storage: Arc<MarketStorage>,
    pool_storage: Arc<PoolStorage>,
    allow_list: Option<Arc<ListCache>>,
    deny_list: Option<Arc<ListCache>>,
    subscriptions: Arc<SubscriptionLayer>,
    quote_mint: Pubkey,
    trade_mutex: Mutex<()>,
    sell_execution_count: AtomicU32,
}

impl Coordinator {
    /// Builds every collaborator from `config` and `wallet`. Initializes and starts the
    /// background reload task for whichever list caches are enabled; does not yet start the
    /// subscription layer — call [`Self::run_with_shutdown`] for that.
    pub async fn new(config: Config, wallet: Wallet) -> Result<Arc<Self>> {
        let config = Arc::new(config);
        let wallet = Arc::new(wallet);

        let endpoint_pool = Arc::new(EndpointPool::from_pipe_delimited(
            &config.endpoints.rpc_urls,
            &config.endpoints.ws_urls,
            &config.endpoints.commitment,
        )?);
        let endpoint = endpoint_pool.current();

        let mode = config.executor.mode()?;
        let relay_config = match mode {
            ExecutorMode::Default => None,
            _ => {
                let relay_url = config
                    .executor
                    .relay_url
                    .clone()
                    .ok_or(ConfigError::MissingField { field: "executor.relay_url" })?;
                let fee_recipient = config
                    .executor
                    .fee_recipient()?
                    .ok_or(ConfigError::MissingField { field: "executor.fee_recipient" })?;
                Some(RelayConfig {
                    relay_url,
                    fee_recipient,
                    fee_lamports: config.executor.fee_lamports,
                    tip_recipients: config.executor.tip_recipients()?,
                    tip_lamports: config.executor.tip_lamports,
                    inclusion_timeout: config.executor.inclusion_timeout(),
                })
            }
        };
        let executor = ExecutorFactory::create(mode, Arc::clone(&endpoint_pool), relay_config.as_ref())?;

        let chain_reader: Arc<dyn ChainReader> = Arc::new(RpcChainReader::new(endpoint.rpc_url.clone()));
        let mut filters: Vec<Box<dyn PoolFilter>> = Vec::new();
        if config.filter.check_burned {
            filters.push(Box::new(BurntLiquidityFilter::new(Arc::clone(&chain_reader))));
        }
        if config.filter.check_renounced {
            filters.push(Box::new(RenouncedMintAuthorityFilter::new(Arc::clone(&chain_reader))));
        }
        if config.filter.check_freezable {
            filters.push(Box::new(FreezableFilter::new(Arc::clone(&chain_reader))));
        }
        if !config.filter.min_pool_size.is_zero() || config.filter.max_pool_size < Decimal::from(u64::MAX) {
            filters.push(Box::new(PoolSizeFilter::new(
                Arc::clone(&chain_reader),
                config.filter.min_pool_size,
                config.filter.max_pool_size,
            )));
        }
        if config.filter.check_from_pump_fun {
            if let Some(authority) = config.filter.pump_fun_authority()? {
                filters.push(Box::new(PumpFunOriginFilter::new(Arc::clone(&chain_reader), authority)));
            }
        }
        let filter_engine = Arc::new(FilterEngine::new(filters));

        let amm: Arc<dyn AmmInstructionBuilder> = Arc::new(RpcAmmClient::new(
            endpoint.rpc_url.clone(),
            config.programs.amm_program_id()?,
        ));

        let market_storage = Arc::new(MarketStorage::new(None));
        let pool_storage = Arc::new(PoolStorage::new(None));

        let allow_list = if config.lists.use_snipe_list {
            let cache = Arc::new(ListCache::allow_list(config.lists.allow_list_path.clone()));
            cache.init().await?;
            cache.spawn_reload_task();
            Some(cache)
        } else {
            None
        };
        let deny_list = if config.lists.use_avoid_list {
            let cache = Arc::new(ListCache::deny_list(config.lists.deny_list_path.clone()));
            cache.init().await?;
            cache.spawn_reload_task();
            Some(cache)
        } else {
            None
        };

        let subscriptions = Arc::new(SubscriptionLayer::new(Arc::clone(&endpoint_pool)));
        let quote_mint = config.trade.quote_mint()?;

        Ok(Arc::new(Self {
            config,
            wallet,
            endpoint_pool,
            executor,
            amm,
            filter_engine,
            market_storage,
            pool_storage,
            allow_list,
            deny_list,
            subscriptions,
            quote_mint,
            trade_mutex: Mutex::new(()),
            sell_execution_count: AtomicU32::new(0),
        }))
    }

    /// Starts the subscription layer and runs the event loop until `shutdown` reports `true` or
    /// is dropped. Each inbound event is handled on its own spawned task so a slow buy/sell does
    /// not stall delivery of the next event.
    pub async fn run_with_shutdown(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let mut pool_rx = self
            .subscriptions
            .take_pool_receiver()
            .await
            .expect("pool receiver taken exactly once, at startup");
        let mut market_rx = self
            .subscriptions
            .take_market_receiver()
            .await
            .expect("market receiver taken exactly once, at startup");
        let mut wallet_rx = self
            .subscriptions
            .take_wallet_receiver()
            .await
            .expect("wallet receiver taken exactly once, at startup");

        let wallet_public_key = self.config.trade.auto_sell.then(|| self.wallet.pubkey());
        let subscription_config = self
            .config
            .programs
            .to_subscription_config(self.quote_mint, wallet_public_key)?;
        self.subscriptions.start(Some(subscription_config)).await?;

        info!("trade coordinator started");

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    match result {
                        Ok(()) if *shutdown.borrow() => {
                            info!("shutdown signal received");
                            break;
                        }
                        Ok(()) => {}
                        Err(_) => {
                            info!("shutdown channel closed");
                            break;
                        }
                    }
                }
                event = pool_rx.recv() => {
                    let Some(event) = event else {
                        warn!("pool event stream ended");
                        break;
                    };
                    let Some(pool) = decode_pool_account(event.account_id, &event.data, event.is_cpmm) else {
                        debug!(account = %event.account_id, "failed to decode pool account, skipping");
                        continue;
                    };
                    self.pool_storage.save(pool.base_mint, pool.clone());
                    let coordinator = Arc::clone(&self);
                    tokio::spawn(async move { coordinator.buy(pool).await });
                }
                event = market_rx.recv() => {
                    let Some(event) = event else {
                        warn!("market event stream ended");
                        break;
                    };
                    if let Some(market) = decode_market_account(event.account_id, &event.data) {
                        self.market_storage.save(market.id, market);
                    } else {
                        debug!(account = %event.account_id, "failed to decode market account, skipping");
                    }
                }
                event = wallet_rx.recv() => {
                    let Some(event) = event else {
                        warn!("wallet event stream ended");
                        break;
                    };
                    match spl_token::state::Account::unpack(&event.data) {
                        Ok(account) => {
                            let coordinator = Arc::clone(&self);
                            let mint = MintId::new(account.mint);
                            tokio::spawn(async move { coordinator.sell(event.account_id, mint, account.amount).await });
                        }
                        Err(err) => {
                            debug!(account = %event.account_id, error = %err, "failed to decode wallet token account, skipping");
                        }
                    }
                }
            }
        }

        self.subscriptions.stop().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_amount_native_scales_by_nine_decimals() {
        assert_eq!(quote_amount_native(Decimal::new(5, 2)), 50_000_000);
    }

    #[test]
    fn native_to_decimal_is_the_inverse_of_quote_amount_native() {
        let amount = Decimal::new(123, 2);
        let native = quote_amount_native(amount);
        assert_eq!(native_to_decimal(native), amount);
    }

    #[test]
    fn quote_amount_native_truncates_rather_than_rounds() {
        // 1 native lamport short of the next unit must not round up.
        let amount = Decimal::new(1, 9) * Decimal::new(15, 1) / Decimal::from(10);
        assert!(quote_amount_native(amount) <= 2);
    }
}
