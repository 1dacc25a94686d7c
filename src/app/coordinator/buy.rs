//! Buy path (§4.7): entered whenever the subscription layer decodes a new pool account.

use std::sync::atomic::Ordering;

use tracing::{debug, info, trace, warn};

use super::{quote_amount_native, Coordinator};
use crate::core::domain::{PoolDescriptor, TradeDirection, TradeIntent};

impl Coordinator {
    pub(super) async fn buy(&self, pool: PoolDescriptor) {
        if !pool.is_consistent() {
            debug!(pool = %pool.id, "pool descriptor is internally inconsistent, skipping");
            return;
        }

        let base_mint = pool.base_mint.to_string();
        if self.config.lists.use_snipe_list {
            let in_list = match &self.allow_list {
                Some(allow) => allow.is_in_list(&base_mint),
                None => false,
            };
            if !in_list {
                trace!(mint = %base_mint, "mint is not on the snipe list, skipping");
                return;
            }
        }
        if self.config.lists.use_avoid_list {
            if let Some(deny) = &self.deny_list {
                if deny.is_in_list(&base_mint) {
                    trace!(mint = %base_mint, "mint is on the avoid list, skipping");
                    return;
                }
            }
        }

        let delay = self.config.trade.auto_buy_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        // `oneTokenAtATime`: a sell in flight pauses subscriptions and takes priority. The
        // early-return below does not restart subscriptions itself even when it was the one that
        // stopped them — the concurrent sell's own finally block is responsible (§9 Open
        // Question 1, implemented literally).
        let _mutex_guard = if self.config.trade.one_token_at_a_time {
            let sell_in_progress = self.sell_execution_count.load(Ordering::SeqCst) > 0;
            if sell_in_progress {
                self.subscriptions.stop().await;
            }
            let Ok(guard) = self.trade_mutex.try_lock() else {
                debug!(mint = %base_mint, "trade mutex already held, abandoning buy");
                return;
            };
            if sell_in_progress {
                drop(guard);
                debug!(mint = %base_mint, "sell in progress, abandoning buy without restarting subscriptions");
                return;
            }
            Some(guard)
        } else {
            None
        };

        let Some(market_id) = pool.market_id else {
            debug!(mint = %base_mint, "constant-product pool has no market id, skipping buy");
            return;
        };

        let market = match self.market_storage.get(market_id).await {
            Ok(market) => market,
            Err(err) => {
                debug!(mint = %base_mint, error = %err, "market lookup failed, abandoning buy");
                return;
            }
        };

        let keys = pool.to_keys(market.as_ref());

        if !self.config.lists.use_snipe_list {
            let passed = self
                .filter_engine
                .await_consecutive_match(
                    &keys,
                    self.config.filter.filter_check_duration(),
                    self.config.filter.filter_check_interval(),
                    self.config.filter.consecutive_match_count,
                )
                .await;
            if !passed {
                info!(mint = %base_mint, "pool failed filter checks, abandoning buy");
                return;
            }
        }

        let input_amount = quote_amount_native(self.config.trade.quote_amount);
        let mut intent = TradeIntent::new(
            TradeDirection::Buy,
            input_amount,
            keys.quote_mint,
            keys.base_mint,
            self.config.trade.buy_slippage_pct,
            pool,
        );
        for _ in 0..self.config.trade.max_buy_retries {
            match self.swap(&keys, &mut intent).await {
                Ok(None) => break,
                Ok(Some(result)) if result.confirmed => {
                    info!(
                        mint = %base_mint,
                        signature = result.signature.as_deref().unwrap_or(""),
                        "buy confirmed"
                    );
                    break;
                }
                Ok(Some(result)) => {
                    warn!(
                        mint = %base_mint,
                        attempt = intent.attempt,
                        error = result.error.as_deref().unwrap_or(""),
                        "buy attempt failed"
                    );
                    self.endpoint_pool.refresh();
                }
                Err(err) => {
                    warn!(mint = %base_mint, attempt = intent.attempt, error = %err, "buy attempt errored");
                    self.endpoint_pool.refresh();
                }
            }
        }
    }
}
