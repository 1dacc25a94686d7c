//! Bundle/Tip transaction executor: adds a tip-transfer instruction routed to one of several
//! well-known recipients (chosen uniformly at random per submission) and forwards the user
//! transaction plus the tip transaction as a bundle to an external relay. Inclusion is confirmed
//! by polling the relay for the user transaction's signature, bounded by a timeout.
//!
//! Invariant: when this variant is active, the coordinator must not prepend compute-budget
//! instructions to the user transaction — the relay supplies its own.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Serialize;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::system_instruction;
use solana_sdk::transaction::{Transaction, VersionedTransaction};

use super::{LatestBlockhash, TransactionExecutor};
use crate::core::domain::SubmissionResult;
use crate::error::{ExecutionError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Settings for the Bundle relay.
#[derive(Debug, Clone)]
pub struct BundleConfig {
    pub relay_url: String,
    pub tip_recipients: Vec<Pubkey>,
    pub tip_lamports: u64,
    pub inclusion_timeout: Duration,
}

#[derive(Serialize)]
struct BundleSubmitRequest {
    transactions: Vec<String>,
}

/// Forwards a user transaction plus a randomly-recipient'd tip transaction as a bundle.
pub struct BundleExecutor {
    config: BundleConfig,
    http: reqwest::Client,
}

impl BundleExecutor {
    #[must_use]
    pub fn new(config: BundleConfig) -> Self {
        assert!(
            !config.tip_recipients.is_empty(),
            "BundleExecutor requires at least one tip recipient"
        );
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn pick_tip_recipient(&self) -> Pubkey {
        *self
            .config
            .tip_recipients
            .choose(&mut rand::thread_rng())
            .expect("non-empty tip_recipients enforced at construction")
    }

    fn build_tip_transaction(&self, payer: &Keypair, blockhash: LatestBlockhash) -> Transaction {
        let recipient = self.pick_tip_recipient();
        let instruction = system_instruction::transfer(&payer.pubkey(), &recipient, self.config.tip_lamports);
        let message = Message::new(&[instruction], Some(&payer.pubkey()));
        let mut tx = Transaction::new_unsigned(message);
        tx.sign(&[payer], blockhash.blockhash);
        tx
    }

    async fn poll_for_inclusion(&self, signature: &str) -> Result<bool> {
        #[derive(serde::Deserialize)]
        struct StatusResponse {
            included: bool,
        }

        let deadline = Instant::now() + self.config.inclusion_timeout;
        while Instant::now() < deadline {
            let response = self
                .http
                .get(format!("{}/status/{signature}", self.config.relay_url))
                .send()
                .await;

            if let Ok(resp) = response {
                if resp.status().is_success() {
                    if let Ok(status) = resp.json::<StatusResponse>().await {
                        if status.included {
                            return Ok(true);
                        }
                    }
                }
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
        Ok(false)
    }
}

#[async_trait]
impl TransactionExecutor for BundleExecutor {
    async fn execute_and_confirm(
        &self,
        tx: VersionedTransaction,
        payer: &Keypair,
        blockhash: LatestBlockhash,
    ) -> Result<SubmissionResult> {
        let tip_tx = self.build_tip_transaction(payer, blockhash);
        let signature = tx
            .signatures
            .first()
            .copied()
            .ok_or_else(|| ExecutionError::Signing("user transaction has no signature".into()))?;

        let user_tx_b64 = encode_tx(&tx)?;
        let tip_tx_b64 = encode_tx(&VersionedTransaction::from(tip_tx))?;

        let request = BundleSubmitRequest {
            transactions: vec![user_tx_b64, tip_tx_b64],
        };

        let response = match self
            .http
            .post(format!("{}/bundles", self.config.relay_url))
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
                "relay rejected bundle: {body}"
            )));
        }

        match self.poll_for_inclusion(&signature.to_string()).await {
            Ok(true) => Ok(SubmissionResult::confirmed(signature.to_string())),
            Ok(false) => Ok(SubmissionResult::sent_unconfirmed(
                signature.to_string(),
                "bundle not included before timeout".to_string(),
            )),
            Err(err) => Ok(SubmissionResult::sent_unconfirmed(signature.to_string(), err.to_string())),
        }
    }

    fn provides_compute_budget(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "bundle"
    }
}

fn encode_tx(tx: &VersionedTransaction) -> Result<String> {
    let bytes = bincode::serialize(tx).map_err(|e| ExecutionError::Signing(e.to_string()))?;
    use base64::Engine;
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}
