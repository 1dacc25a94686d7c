//! Builds, signs, and submits a single buy or sell transaction attempt (§4.7.3).

use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::compute_budget::ComputeBudgetInstruction;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::{v0, VersionedMessage};
use solana_sdk::transaction::VersionedTransaction;
use spl_associated_token_account::get_associated_token_address;
use tracing::warn;

use super::Coordinator;
use crate::core::domain::{PoolKeys, SubmissionResult, TradeDirection, TradeIntent};
use crate::core::exchange::amm::minimum_output;
use crate::core::exchange::executor::LatestBlockhash;
use crate::error::{ExecutionError, Result};

impl Coordinator {
    /// Fetches live reserves, computes the slippage-discounted minimum output, and — unless that
    /// amount is zero, in which case the swap aborts with no transaction sent — builds and
    /// submits one attempt via the configured [`TransactionExecutor`](crate::core::exchange::TransactionExecutor).
    ///
    /// Records the attempt on `intent` before submitting, so callers retain a single
    /// [`TradeIntent`] across the whole retry loop rather than a bare attempt counter.
    ///
    /// `Ok(None)` signals the zero-output abort; callers must not treat it as a retryable
    /// failure.
    pub(super) async fn swap(&self, keys: &PoolKeys, intent: &mut TradeIntent) -> Result<Option<SubmissionResult>> {
        intent.record_attempt();
        let direction = intent.direction;
        let input_amount = intent.input_amount;
        let slippage_pct = intent.slippage_pct;

        let reserves = self.amm.reserves(keys).await?;
        let (reserve_in, reserve_out) = match direction {
            TradeDirection::Buy => (reserves.quote_reserve, reserves.base_reserve),
            TradeDirection::Sell => (reserves.base_reserve, reserves.quote_reserve),
        };
        let minimum_out = minimum_output(reserve_in, reserve_out, input_amount, slippage_pct);
        if minimum_out == 0 {
            warn!(pool = %keys.pool_id, "computed minimum output is zero, aborting swap");
            return Ok(None);
        }

        let owner = self.wallet.pubkey();
        let (input_mint, output_mint) = match direction {
            TradeDirection::Buy => (*keys.quote_mint.as_pubkey(), *keys.base_mint.as_pubkey()),
            TradeDirection::Sell => (*keys.base_mint.as_pubkey(), *keys.quote_mint.as_pubkey()),
        };
        let input_ata = get_associated_token_address(&owner, &input_mint);

        let mut instructions: Vec<Instruction> = Vec::new();
        if !self.executor.provides_compute_budget() {
            instructions.push(ComputeBudgetInstruction::set_compute_unit_limit(self.config.trade.unit_limit));
            instructions.push(ComputeBudgetInstruction::set_compute_unit_price(self.config.trade.unit_price));
        }
        if direction == TradeDirection::Buy {
            instructions.push(spl_associated_token_account::instruction::create_associated_token_account_idempotent(
                &owner,
                &owner,
                &output_mint,
                &spl_token::id(),
            ));
        }
        instructions.push(self.amm.build_swap_instruction(keys, &owner, input_amount, minimum_out, direction));
        if direction == TradeDirection::Sell {
            instructions.push(
                spl_token::instruction::close_account(&spl_token::id(), &input_ata, &owner, &owner, &[])
                    .map_err(|err| ExecutionError::Signing(err.to_string()))?,
            );
        }

        let blockhash = self.latest_blockhash().await?;
        let message = v0::Message::try_compile(&owner, &instructions, &[], blockhash.blockhash)
            .map_err(|err| ExecutionError::Signing(err.to_string()))?;
        let tx = VersionedTransaction::try_new(VersionedMessage::V0(message), &[self.wallet.keypair()])
            .map_err(|err| ExecutionError::Signing(err.to_string()))?;

        let result = self
            .executor
            .execute_and_confirm(tx, self.wallet.keypair(), blockhash)
            .await?;
        Ok(Some(result))
    }

    async fn latest_blockhash(&self) -> Result<LatestBlockhash> {
        let endpoint = self.endpoint_pool.current();
        let client = solana_client::nonblocking::rpc_client::RpcClient::new(endpoint.rpc_url);
        let (blockhash, last_valid_block_height) = client
            .get_latest_blockhash_with_commitment(CommitmentConfig::confirmed())
            .await
            .map_err(crate::error::ExecutionError::Rpc)?;
        Ok(LatestBlockhash {
            blockhash,
            last_valid_block_height,
        })
    }
}
