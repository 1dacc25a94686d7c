//! Subscription layer: translates program-account-change notifications into typed domain events.
//!
//! Each subscription kind (pool, market, constant-product pool, wallet) gets its own
//! `tokio::mpsc` channel rather than a generic event-name dispatcher, so consumers can read
//! exactly the event stream they need and the pause/resume protocol (§4.7, §5) has no
//! cross-kind ordering to reason about.

mod events;
mod filters;
mod task;

pub use events::{MarketEvent, PoolEvent, WalletEvent};
pub use filters::SubscriptionConfig;

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

use crate::core::exchange::EndpointPool;
use crate::error::Result;

/// A live subscription: the task handle plus the oneshot used to ask it to unsubscribe.
struct Handle {
    kind: &'static str,
    stop: tokio::sync::oneshot::Sender<()>,
    join: tokio::task::JoinHandle<()>,
}

struct Inner {
    handles: Vec<Handle>,
    last_config: Option<SubscriptionConfig>,
}

/// Owns the set of live subscription handles and the typed channel senders/receivers consumers
/// read domain events from.
pub struct SubscriptionLayer {
    endpoint_pool: Arc<EndpointPool>,
    inner: Mutex<Inner>,
    pool_tx: mpsc::UnboundedSender<PoolEvent>,
    market_tx: mpsc::UnboundedSender<MarketEvent>,
    wallet_tx: mpsc::UnboundedSender<WalletEvent>,
    pool_rx: Mutex<Option<mpsc::UnboundedReceiver<PoolEvent>>>,
    market_rx: Mutex<Option<mpsc::UnboundedReceiver<MarketEvent>>>,
    wallet_rx: Mutex<Option<mpsc::UnboundedReceiver<WalletEvent>>>,
}

impl SubscriptionLayer {
    #[must_use]
    pub fn new(endpoint_pool: Arc<EndpointPool>) -> Self {
        let (pool_tx, pool_rx) = mpsc::unbounded_channel();
        let (market_tx, market_rx) = mpsc::unbounded_channel();
        let (wallet_tx, wallet_rx) = mpsc::unbounded_channel();
        Self {
            endpoint_pool,
            inner: Mutex::new(Inner {
                handles: Vec::new(),
                last_config: None,
            }),
            pool_tx,
            market_tx,
            wallet_tx,
            pool_rx: Mutex::new(Some(pool_rx)),
            market_rx: Mutex::new(Some(market_rx)),
            wallet_rx: Mutex::new(Some(wallet_rx)),
        }
    }

    /// Takes ownership of the `pool` event receiver. Callable exactly once; subsequent calls
    /// return `None`.
    pub async fn take_pool_receiver(&self) -> Option<mpsc::UnboundedReceiver<PoolEvent>> {
        self.pool_rx.lock().await.take()
    }

    /// Takes ownership of the `market` event receiver.
    pub async fn take_market_receiver(&self) -> Option<mpsc::UnboundedReceiver<MarketEvent>> {
        self.market_rx.lock().await.take()
    }

    /// Takes ownership of the `wallet` event receiver.
    pub async fn take_wallet_receiver(&self) -> Option<mpsc::UnboundedReceiver<WalletEvent>> {
        self.wallet_rx.lock().await.take()
    }

    /// Whether any subscription handle is currently held.
    pub async fn is_started(&self) -> bool {
        !self.inner.lock().await.handles.is_empty()
    }

    /// Establishes up to four subscriptions per `config`. `config = None` restarts using the
    /// configuration of the previous `start` call. Calling `start` while already started first
    /// calls [`Self::stop`] and then resubscribes.
    pub async fn start(&self, config: Option<SubscriptionConfig>) -> Result<()> {
        if self.is_started().await {
            self.stop().await;
        }

        let config = match config {
            Some(c) => c,
            None => {
                let guard = self.inner.lock().await;
                guard
                    .last_config
                    .clone()
                    .ok_or(crate::error::SubscriptionError::NoPriorConfig)?
            }
        };

        let endpoint = self.endpoint_pool.current();
        let mut handles = Vec::new();

        handles.push(task::spawn_pool_subscription(&endpoint.ws_url, &config, self.pool_tx.clone()));

        if config.cache_markets {
            if let Some(h) = task::spawn_market_subscription(&endpoint.ws_url, &config, self.market_tx.clone()) {
                handles.push(h);
            }
        }

        if let (Some(_), Some(_)) = (config.cpmm_program_id, config.cpmm_state_size) {
            if let Some(h) = task::spawn_cpmm_subscription(&endpoint.ws_url, &config, self.pool_tx.clone()) {
                handles.push(h);
            }
        }

        if config.wallet_public_key.is_some() {
            if let Some(h) = task::spawn_wallet_subscription(&endpoint.ws_url, &config, self.wallet_tx.clone()) {
                handles.push(h);
            }
        }

        let mut guard = self.inner.lock().await;
        guard.handles = handles;
        guard.last_config = Some(config);
        info!(count = guard.handles.len(), "subscription layer started");
        Ok(())
    }

    /// Unsubscribes every handle in parallel. Individual unsubscribe errors are logged and
    /// swallowed; the handle list is always empty afterward.
    pub async fn stop(&self) {
        let handles = {
            let mut guard = self.inner.lock().await;
            std::mem::take(&mut guard.handles)
        };

        let mut joins = Vec::with_capacity(handles.len());
        for handle in handles {
            let kind = handle.kind;
            let _ = handle.stop.send(());
            joins.push(async move {
                if let Err(err) = handle.join.await {
                    warn!(kind, error = %err, "subscription task panicked during stop");
                }
            });
        }
        futures_util::future::join_all(joins).await;
        info!("subscription layer stopped");
    }
}

pub use filters::{decode_market_account, decode_pool_account};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exchange::endpoint_pool::EndpointConfig;
    use solana_sdk::pubkey::Pubkey;

    fn layer() -> SubscriptionLayer {
        let pool = Arc::new(EndpointPool::new(vec![EndpointConfig {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            ws_url: "wss://api.mainnet-beta.solana.com".to_string(),
            commitment: "confirmed".to_string(),
        }]));
        SubscriptionLayer::new(pool)
    }

    #[tokio::test]
    async fn starts_with_no_handles() {
        assert!(!layer().is_started().await);
    }

    #[tokio::test]
    async fn start_without_config_and_without_prior_start_fails() {
        let layer = layer();
        assert!(layer.start(None).await.is_err());
    }

    #[tokio::test]
    async fn pool_and_wallet_receivers_are_each_taken_exactly_once() {
        let layer = layer();
        assert!(layer.take_pool_receiver().await.is_some());
        assert!(layer.take_pool_receiver().await.is_none());
        assert!(layer.take_wallet_receiver().await.is_some());
        assert!(layer.take_wallet_receiver().await.is_none());
    }

    #[tokio::test]
    async fn stop_on_a_never_started_layer_is_a_no_op() {
        let layer = layer();
        layer.stop().await;
        assert!(!layer.is_started().await);
    }

    fn sample_config() -> SubscriptionConfig {
        SubscriptionConfig {
            amm_program_id: Pubkey::new_unique(),
            openbook_program_id: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            pool_state_size: 752,
            market_state_size: None,
            cpmm_program_id: None,
            cpmm_state_size: None,
            wallet_public_key: None,
            cache_markets: false,
        }
    }

    #[test]
    fn sample_config_has_no_optional_subscriptions_enabled() {
        let config = sample_config();
        assert!(!config.cache_markets);
        assert!(config.wallet_public_key.is_none());
    }
}
