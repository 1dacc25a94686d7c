//! Take-profit / stop-loss polling loop entered from the sell path (§4.8).

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::{native_to_decimal, Coordinator};
use crate::core::domain::PoolKeys;
use crate::core::exchange::amm::minimum_output;

impl Coordinator {
    /// Polls the expected sell output for `input_amount` (base-asset native units) every
    /// `priceCheckInterval` until take-profit or stop-loss triggers, or `priceCheckDuration`
    /// elapses. Either knob being zero disables watching entirely.
    ///
    /// Always returns, trigger or not (§9 Open Question 2) — the sell path proceeds to its own
    /// retry loop unconditionally either way, so exhaustion is not treated as a failure here.
    pub(super) async fn price_watcher(&self, keys: &PoolKeys, input_amount: u64) {
        let duration = self.config.trade.price_check_duration();
        let interval = self.config.trade.price_check_interval();
        if duration.is_zero() || interval.is_zero() {
            return;
        }

        let quote_amount = self.config.trade.quote_amount;
        let hundred = Decimal::from(100);
        let take_profit = quote_amount + quote_amount * self.config.trade.take_profit_pct / hundred;
        let stop_loss = quote_amount - quote_amount * self.config.trade.stop_loss_pct / hundred;

        let iterations = (duration.as_millis() / interval.as_millis().max(1)) as u32;
        for _ in 0..iterations {
            match self.amm.reserves(keys).await {
                Ok(reserves) => {
                    let output_native = minimum_output(
                        reserves.base_reserve,
                        reserves.quote_reserve,
                        input_amount,
                        self.config.trade.sell_slippage_pct,
                    );
                    let output = native_to_decimal(output_native);
                    if output <= stop_loss || output >= take_profit {
                        debug!(%output, %take_profit, %stop_loss, "price watcher exit condition met");
                        return;
                    }
                }
                Err(err) => {
                    warn!(error = %err, "price watcher iteration failed, continuing");
                }
            }
            tokio::time::sleep(interval).await;
        }
    }
}
