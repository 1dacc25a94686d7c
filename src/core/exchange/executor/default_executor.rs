//! Default transaction executor: submits directly through the endpoint pool's current RPC
//! connection and awaits confirmation bound by the blockhash's valid block-height window.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use solana_client::client_error::ClientErrorKind;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::VersionedTransaction;
use tracing::debug;

use super::{extract_simulation_logs, LatestBlockhash, TransactionExecutor};
use crate::core::domain::SubmissionResult;
use crate::core::exchange::EndpointPool;
use crate::error::Result;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Submits the raw serialized transaction through the endpoint pool's current connection.
pub struct DefaultExecutor {
    endpoint_pool: Arc<EndpointPool>,
}

impl DefaultExecutor {
    #[must_use]
    pub fn new(endpoint_pool: Arc<EndpointPool>) -> Self {
        Self { endpoint_pool }
    }

    fn client(&self) -> RpcClient {
        let endpoint = self.endpoint_pool.current();
        RpcClient::new_with_commitment(
            endpoint.rpc_url,
            CommitmentConfig::from_str_config(&endpoint.commitment)
                .unwrap_or_else(|| CommitmentConfig::confirmed()),
        )
    }
}

#[async_trait]
impl TransactionExecutor for DefaultExecutor {
    async fn execute_and_confirm(
        &self,
        tx: VersionedTransaction,
        payer: &Keypair,
        blockhash: LatestBlockhash,
    ) -> Result<SubmissionResult> {
        let client = self.client();
        let signature = match client
            .send_transaction_with_config(
                &tx,
                RpcSendTransactionConfig {
                    skip_preflight: false,
                    preflight_commitment: Some(client.commitment().commitment),
                    ..Default::default()
                },
            )
            .await
        {
            Ok(sig) => sig,
            Err(err) => {
                if let ClientErrorKind::RpcError(_) = &err.kind {
                    if let Some(logs) = extract_simulation_logs(&err) {
                        debug!(mint = %payer.pubkey(), ?logs, "simulation logs for rejected transaction");
                    }
                }
                return Ok(SubmissionResult::unconfirmed(err.to_string()));
            }
        };

        loop {
            let current_height = client.get_block_height().await.unwrap_or(u64::MAX);
            if current_height > blockhash.last_valid_block_height {
                return Ok(SubmissionResult::sent_unconfirmed(
                    signature.to_string(),
                    "blockhash expired before confirmation".to_string(),
                ));
            }

            let statuses = client
                .get_signature_statuses(&[signature])
                .await
                .map_err(|e| crate::error::ExecutionError::Rpc(e))?;

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
        false
    }

    fn name(&self) -> &'static str {
        "default"
    }
}
