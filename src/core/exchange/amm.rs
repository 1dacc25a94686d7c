//! Constant-product pricing and the inner swap instruction.
//!
//! The exact account layout and instruction discriminant for a given AMM program are defined by
//! that program's IDL; this module owns only the piece this crate controls directly — the
//! constant-product pricing math used to compute a minimum acceptable output — and exposes a
//! narrow seam, [`AmmInstructionBuilder`], for producing the inner swap instruction so the
//! coordinator's swap helper never has to know which concrete AMM program it is talking to.

use async_trait::async_trait;
use rust_decimal::Decimal;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

use crate::core::domain::{PoolKeys, TradeDirection};
use crate::error::Result;

/// Current base/quote vault reserves for a pool, in each token's native (smallest) units.
#[derive(Debug, Clone, Copy)]
pub struct PoolReserves {
    pub base_reserve: u64,
    pub quote_reserve: u64,
}

/// Applies the constant-product formula `x * y = k` to estimate the output amount for swapping
/// `input_amount` of the reserve-in asset, then discounts it by `slippage_pct`. Returns zero if
/// either reserve is zero or the discounted amount rounds to zero.
#[must_use]
pub fn minimum_output(reserve_in: u64, reserve_out: u64, input_amount: u64, slippage_pct: Decimal) -> u64 {
    if reserve_in == 0 || reserve_out == 0 || input_amount == 0 {
        return 0;
    }

    let reserve_in = Decimal::from(reserve_in);
    let reserve_out = Decimal::from(reserve_out);
    let input_amount = Decimal::from(input_amount);

    let k = reserve_in * reserve_out;
    let new_reserve_in = reserve_in + input_amount;
    let expected_out = reserve_out - (k / new_reserve_in);

    if expected_out <= Decimal::ZERO {
        return 0;
    }

    let discounted = expected_out * (Decimal::ONE - slippage_pct / Decimal::from(100));
    if discounted <= Decimal::ZERO {
        return 0;
    }

    discounted.trunc().try_into().unwrap_or(0)
}

/// Produces the inner instruction(s) that actually perform a swap against a given AMM program.
/// A thin seam so the coordinator can be unit-tested against a fake without depending on a real
/// on-chain program.
#[async_trait]
pub trait AmmInstructionBuilder: Send + Sync {
    async fn reserves(&self, keys: &PoolKeys) -> Result<PoolReserves>;

    fn build_swap_instruction(
        &self,
        keys: &PoolKeys,
        owner: &Pubkey,
        input_amount: u64,
        minimum_output_amount: u64,
        direction: crate::core::domain::TradeDirection,
    ) -> Instruction;
}

/// Production [`AmmInstructionBuilder`] backed by the Solana RPC client.
///
/// `reserves` reads the pool's base/quote vault token-account balances directly; the exact
/// instruction discriminant and account ordering a given AMM program expects are defined by that
/// program's IDL (§1 Out of scope), so `build_swap_instruction` emits a minimal, program-agnostic
/// encoding: a one-byte direction tag followed by the two little-endian `u64` amounts, against
/// the well-known accounts every swap needs.
pub struct RpcAmmClient {
    client: solana_client::nonblocking::rpc_client::RpcClient,
    program_id: Pubkey,
}

impl RpcAmmClient {
    #[must_use]
    pub fn new(rpc_url: impl Into<String>, program_id: Pubkey) -> Self {
        Self {
            client: solana_client::nonblocking::rpc_client::RpcClient::new(rpc_url.into()),
            program_id,
        }
    }
}

#[async_trait]
impl AmmInstructionBuilder for RpcAmmClient {
    async fn reserves(&self, keys: &PoolKeys) -> Result<PoolReserves> {
        let base_reserve = self
            .client
            .get_token_account_balance(&keys.base_vault)
            .await
            .map_err(crate::error::StorageError::Rpc)?
            .amount
            .parse()
            .map_err(|_| crate::error::StorageError::Decode("base vault balance".to_string()))?;

        let quote_reserve = self
            .client
            .get_token_account_balance(&keys.quote_vault)
            .await
            .map_err(crate::error::StorageError::Rpc)?
            .amount
            .parse()
            .map_err(|_| crate::error::StorageError::Decode("quote vault balance".to_string()))?;

        Ok(PoolReserves { base_reserve, quote_reserve })
    }

    fn build_swap_instruction(
        &self,
        keys: &PoolKeys,
        owner: &Pubkey,
        input_amount: u64,
        minimum_output_amount: u64,
        direction: TradeDirection,
    ) -> Instruction {
        let mut data = Vec::with_capacity(17);
        data.push(match direction {
            TradeDirection::Buy => 0,
            TradeDirection::Sell => 1,
        });
        data.extend_from_slice(&input_amount.to_le_bytes());
        data.extend_from_slice(&minimum_output_amount.to_le_bytes());

        let mut accounts = vec![
            AccountMeta::new(*keys.pool_id.as_pubkey(), false),
            AccountMeta::new(keys.base_vault, false),
            AccountMeta::new(keys.quote_vault, false),
            AccountMeta::new_readonly(keys.lp_mint, false),
            AccountMeta::new(*owner, true),
        ];
        if let Some(event_queue) = keys.market_event_queue {
            accounts.push(AccountMeta::new(event_queue, false));
        }
        if let Some(bids) = keys.market_bids {
            accounts.push(AccountMeta::new(bids, false));
        }
        if let Some(asks) = keys.market_asks {
            accounts.push(AccountMeta::new(asks, false));
        }

        Instruction { program_id: self.program_id, accounts, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn minimum_output_discounts_the_constant_product_estimate() {
        // reserves 1_000_000 / 1_000_000, input 10_000 -> expected out ~9901, 5% slippage.
        let output = minimum_output(1_000_000, 1_000_000, 10_000, dec!(5));
        assert!(output > 9_000 && output < 9_500, "got {output}");
    }

    #[test]
    fn minimum_output_is_zero_with_no_reserves() {
        assert_eq!(minimum_output(0, 1_000, 10, dec!(1)), 0);
        assert_eq!(minimum_output(1_000, 0, 10, dec!(1)), 0);
    }

    #[test]
    fn full_slippage_discount_zeroes_the_output() {
        let output = minimum_output(1_000_000, 1_000_000, 10_000, dec!(100));
        assert_eq!(output, 0);
    }

    fn sample_keys() -> PoolKeys {
        use crate::core::domain::{MintId, PoolId};
        PoolKeys {
            pool_id: PoolId::new(Pubkey::new_unique()),
            base_mint: MintId::new(Pubkey::new_unique()),
            quote_mint: MintId::new(Pubkey::new_unique()),
            base_vault: Pubkey::new_unique(),
            quote_vault: Pubkey::new_unique(),
            lp_mint: Pubkey::new_unique(),
            market_id: None,
            market_event_queue: None,
            market_bids: None,
            market_asks: None,
        }
    }

    #[test]
    fn build_swap_instruction_encodes_direction_and_amounts() {
        let program_id = Pubkey::new_unique();
        let client = RpcAmmClient::new("https://api.mainnet-beta.solana.com", program_id);
        let owner = Pubkey::new_unique();
        let keys = sample_keys();

        let ix = client.build_swap_instruction(&keys, &owner, 1_000, 900, TradeDirection::Buy);
        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.data[0], 0);
        assert_eq!(&ix.data[1..9], &1_000u64.to_le_bytes());
        assert_eq!(&ix.data[9..17], &900u64.to_le_bytes());

        let sell = client.build_swap_instruction(&keys, &owner, 1_000, 900, TradeDirection::Sell);
        assert_eq!(sell.data[0], 1);
    }

    #[test]
    fn build_swap_instruction_includes_market_accounts_when_present() {
        let program_id = Pubkey::new_unique();
        let client = RpcAmmClient::new("https://api.mainnet-beta.solana.com", program_id);
        let owner = Pubkey::new_unique();
        let mut keys = sample_keys();
        keys.market_event_queue = Some(Pubkey::new_unique());
        keys.market_bids = Some(Pubkey::new_unique());
        keys.market_asks = Some(Pubkey::new_unique());

        let without_market = client
            .build_swap_instruction(&sample_keys(), &owner, 1, 1, TradeDirection::Buy)
            .accounts
            .len();
        let with_market = client
            .build_swap_instruction(&keys, &owner, 1, 1, TradeDirection::Buy)
            .accounts
            .len();
        assert_eq!(with_market, without_market + 3);
    }
}
