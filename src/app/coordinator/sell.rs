//! Sell path (§4.7): entered whenever the wallet subscription reports a token-account balance.

use std::sync::atomic::Ordering;

use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info, trace, warn};

use super::Coordinator;
use crate::core::domain::{MintId, TradeDirection, TradeIntent};

impl Coordinator {
    pub(super) async fn sell(&self, token_account: Pubkey, mint: MintId, amount: u64) {
        if self.config.trade.one_token_at_a_time
            && self.sell_execution_count.fetch_add(1, Ordering::SeqCst) == 0
        {
            // First sell to enter while none were running: subscriptions must stay stopped as
            // long as any sell is in flight (§5 pause-on-sell), so only this transition pauses
            // them. Whichever sell later brings the count back to zero restarts them below,
            // which may not be this call if others arrived in the meantime.
            self.subscriptions.stop().await;
        }

        self.sell_inner(token_account, mint, amount).await;

        if self.config.trade.one_token_at_a_time
            && self.sell_execution_count.fetch_sub(1, Ordering::SeqCst) == 1
        {
            if let Err(err) = self.subscriptions.start(None).await {
                warn!(error = %err, "failed to restart subscriptions after sell");
            }
        }
    }

    async fn sell_inner(&self, token_account: Pubkey, mint: MintId, amount: u64) {
        let Ok(Some(pool)) = self.pool_storage.get(mint).await else {
            trace!(%token_account, %mint, "no pool cached for mint, skipping sell");
            return;
        };

        if amount == 0 {
            trace!(%mint, "zero token balance, nothing to sell");
            return;
        }

        let delay = self.config.trade.auto_sell_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let market = match pool.market_id {
            Some(id) => self.market_storage.get(id).await.ok().flatten(),
            None => None,
        };
        let keys = pool.to_keys(market.as_ref());

        self.price_watcher(&keys, amount).await;

        let mut intent = TradeIntent::new(
            TradeDirection::Sell,
            amount,
            keys.base_mint,
            keys.quote_mint,
            self.config.trade.sell_slippage_pct,
            pool,
        );
        for _ in 0..self.config.trade.max_sell_retries {
            match self.swap(&keys, &mut intent).await {
                Ok(None) => break,
                Ok(Some(result)) if result.confirmed => {
                    info!(
                        %mint,
                        signature = result.signature.as_deref().unwrap_or(""),
                        "sell confirmed"
                    );
                    break;
                }
                Ok(Some(result)) => {
                    warn!(
                        %mint,
                        attempt = intent.attempt,
                        error = result.error.as_deref().unwrap_or(""),
                        "sell attempt failed"
                    );
                    self.endpoint_pool.refresh();
                }
                Err(err) => {
                    warn!(%mint, attempt = intent.attempt, error = %err, "sell attempt errored");
                    self.endpoint_pool.refresh();
                }
            }
        }
        debug!(%token_account, "sell attempt loop finished");
    }
}
