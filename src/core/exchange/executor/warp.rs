//! Warp transaction executor: forwards the user's transaction, alongside a small service-fee
//! transaction, to an external relay endpoint. The relay returns a signature for the user
//! transaction; confirmation is then awaited on the main endpoint pool exactly like
//! [`super::DefaultExecutor`].
//!
//! Invariant: when this variant is active, the coordinator must not prepend compute-budget
//! instructions to the user transaction — the relay supplies its own.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::system_instruction;
use solana_sdk::transaction::{Transaction, VersionedTransaction};
use tracing::debug;

use super::{extract_simulation_logs, LatestBlockhash, TransactionExecutor};
use crate::core::domain::SubmissionResult;
use crate::core::exchange::EndpointPool;
use crate::error::{ExecutionError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Settings for the Warp relay.
#[derive(Debug, Clone)]
pub struct WarpConfig {
    pub relay_url: String,
    pub fee_recipient: Pubkey,
    pub fee_lamports: u64,
}

#[derive(Serialize)]
struct RelaySubmitRequest {
    transactions: Vec<String>,
}

/// Forwards a user transaction plus a service-fee transaction to an external relay.
pub struct WarpExecutor {
    config: WarpConfig,
    http: reqwest::Client,
    endpoint_pool: Arc<EndpointPool>,
}

impl WarpExecutor {
    #[must_use]
    pub fn new(config: WarpConfig, endpoint_pool: Arc<EndpointPool>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            endpoint_pool,
        }
    }

    fn build_fee_transaction(&self, payer: &Keypair, blockhash: LatestBlockhash) -> Transaction {
        let instruction =
            system_instruction::transfer(&payer.pubkey(), &self.config.fee_recipient, self.config.fee_lamports);
        let message = Message::new(&[instruction], Some(&payer.pubkey()));
        let mut tx = Transaction::new_unsigned(message);
        tx.sign(&[payer], blockhash.blockhash);
        tx
    }
}

#[async_trait]
impl TransactionExecutor for WarpExecutor {
    async fn execute_and_confirm(
        &self,
        tx: VersionedTransaction,
        payer: &Keypair,
        blockhash: LatestBlockhash,
    ) -> Result<SubmissionResult> {
        let fee_tx = self.build_fee_transaction(payer, blockhash);

        let user_tx_b64 = encode_tx(&tx)?;
        let fee_tx_b64 = encode_tx(&VersionedTransaction::from(fee_tx))?;

        let request = RelaySubmitRequest {
            transactions: vec![user_tx_b64, fee_tx_b64],
        };

        let response = match self
            .http
            .post(format!("{}/submit", self.config.relay_url))
            .json(&request)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => return Ok(SubmissionResult::unconfirmed(err.to_string())),
        };

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Ok(SubmissionResult::unconfirmed(format!(
                "relay rejected submission: {body}"
            )));
        }

        #[derive(serde::Deserialize)]
        struct RelayResponse {
            signature: String,
        }
        let parsed: RelayResponse = response
            .json()
            .await
            .map_err(|e| ExecutionError::Relay(e))?;

        let client = self.endpoint_pool.current();
        let rpc = solana_client::nonblocking::rpc_client::RpcClient::new(client.rpc_url);
        let signature: solana_sdk::signature::Signature = parsed
            .signature
            .parse()
            .map_err(|_| ExecutionError::Rejected("relay returned an invalid signature".into()))?;

        loop {
            let current_height = rpc.get_block_height().await.unwrap_or(u64::MAX);
            if current_height > blockhash.last_valid_block_height {
                return Ok(SubmissionResult::sent_unconfirmed(
                    signature.to_string(),
                    "blockhash expired before confirmation".to_string(),
                ));
            }

            let statuses = match rpc.get_signature_statuses(&[signature]).await {
                Ok(s) => s,
                Err(err) => {
                    if let Some(logs) = extract_simulation_logs(&err) {
                        debug!(?logs, "simulation logs for warp submission");
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                    continue;
                }
            };

            if let Some(Some(status)) = statuses.value.into_iter().next() {
                if let Some(err) = status.err {
                    return Ok(SubmissionResult::sent_unconfirmed(
                        signature.to_string(),
                        err.to_string(),
                    ));
                }
                if status.confirmation_status.is_some() {
                    return Ok(SubmissionResult::confirmed(signature.to_string()));
                }
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    fn provides_compute_budget(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "warp"
    }
}

fn encode_tx(tx: &VersionedTransaction) -> Result<String> {
    let bytes = bincode::serialize(tx).map_err(|e| ExecutionError::Signing(e.to_string()))?;
    use base64::Engine;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exchange::endpoint_pool::EndpointConfig;

    #[test]
    fn warp_executor_relies_on_the_relays_compute_budget() {
        let pool = Arc::new(EndpointPool::new(vec![EndpointConfig {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            ws_url: "wss://api.mainnet-beta.solana.com".to_string(),
            commitment: "confirmed".to_string(),
        }]));
        let executor = WarpExecutor::new(
            WarpConfig {
                relay_url: "https://relay.example".to_string(),
                fee_recipient: Pubkey::new_unique(),
                fee_lamports: 1_000_000,
            },
            pool,
        );
        assert!(executor.provides_compute_budget());
        assert_eq!(executor.name(), "warp");
    }
}
