//! Per-subscription-kind task spawning: connects, subscribes, and forwards matched accounts
//! onto the caller's typed channel until told to stop.

use futures_util::StreamExt;
use solana_client::nonblocking::pubsub_client::PubsubClient;
use solana_client::rpc_config::RpcProgramAccountsConfig;
use solana_sdk::pubkey::Pubkey;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

use super::events::{MarketEvent, PoolEvent, WalletEvent};
use super::filters::{self, SubscriptionConfig};
use super::Handle;

fn spawn_subscription<T, F>(
    kind: &'static str,
    ws_url: String,
    program_id: Pubkey,
    rpc_config: RpcProgramAccountsConfig,
    decode: F,
    tx: mpsc::UnboundedSender<T>,
) -> Handle
where
    T: Send + 'static,
    F: Fn(Pubkey, Vec<u8>) -> Option<T> + Send + 'static,
{
    let (stop_tx, mut stop_rx) = oneshot::channel();

    let join = tokio::spawn(async move {
        let client = match PubsubClient::new(&ws_url).await {
            Ok(c) => c,
            Err(err) => {
                error!(kind, error = %err, "failed to establish websocket connection for subscription");
                return;
            }
        };

        let (mut stream, unsubscribe) = match client.program_subscribe(&program_id, Some(rpc_config)).await {
            Ok(pair) => pair,
            Err(err) => {
                error!(kind, error = %err, "failed to subscribe to program account changes");
                return;
            }
        };

        info!(kind, program = %program_id, "subscription established");

        loop {
            tokio::select! {
                _ = &mut stop_rx => {
                    break;
                }
                maybe_update = stream.next() => {
                    match maybe_update {
                        Some(update) => {
                            let Ok(account_id) = update.value.pubkey.parse::<Pubkey>() else {
                                continue;
                            };
                            let Some(data) = update.value.account.data.decode() else {
                                continue;
                            };
                            if let Some(event) = decode(account_id, data) {
                                if tx.send(event).is_err() {
                                    break;
                                }
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        unsubscribe().await;
        info!(kind, "subscription unsubscribed");
    });

    Handle {
        kind,
        stop: stop_tx,
        join,
    }
}

pub fn spawn_pool_subscription(
    ws_url: &str,
    config: &SubscriptionConfig,
    tx: mpsc::UnboundedSender<PoolEvent>,
) -> Handle {
    let rpc_config = filters::pool_subscription_config(config);
    spawn_subscription(
        "pool",
        ws_url.to_string(),
        config.amm_program_id,
        rpc_config,
        |account_id, data| {
            Some(PoolEvent {
                account_id,
                data,
                is_cpmm: false,
            })
        },
        tx,
    )
}

pub fn spawn_market_subscription(
    ws_url: &str,
    config: &SubscriptionConfig,
    tx: mpsc::UnboundedSender<MarketEvent>,
) -> Option<Handle> {
    let state_size = config.market_state_size?;
    let rpc_config = filters::market_subscription_config(config, state_size);
    Some(spawn_subscription(
        "market",
        ws_url.to_string(),
        config.openbook_program_id,
        rpc_config,
        |account_id, data| Some(MarketEvent { account_id, data }),
        tx,
    ))
}

pub fn spawn_cpmm_subscription(
    ws_url: &str,
    config: &SubscriptionConfig,
    tx: mpsc::UnboundedSender<PoolEvent>,
) -> Option<Handle> {
    let program_id = config.cpmm_program_id?;
    let state_size = config.cpmm_state_size?;
    let rpc_config = filters::cpmm_subscription_config(state_size);
    Some(spawn_subscription(
        "cpmm_pool",
        ws_url.to_string(),
        program_id,
        rpc_config,
        |account_id, data| {
            Some(PoolEvent {
                account_id,
                data,
                is_cpmm: true,
            })
        },
        tx,
    ))
}

pub fn spawn_wallet_subscription(
    ws_url: &str,
    config: &SubscriptionConfig,
    tx: mpsc::UnboundedSender<WalletEvent>,
) -> Option<Handle> {
    let wallet = config.wallet_public_key?;
    let rpc_config = filters::wallet_subscription_config(wallet);
    // The wallet subscription watches the token program for accounts owned by `wallet`; the
    // token program id itself is a well-known constant, not part of the per-deployment config.
    Some(spawn_subscription(
        "wallet",
        ws_url.to_string(),
        spl_token::id(),
        rpc_config,
        |account_id, data| Some(WalletEvent { account_id, data }),
        tx,
    ))
}
