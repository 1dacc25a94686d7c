//! Ephemeral trade-intent record for one buy or sell attempt.

use super::{MintId, PoolDescriptor};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Direction of a trade attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    Buy,
    Sell,
}

/// One buy or sell attempt in flight. Created on trade-coordinator entry, released when all
/// retries exhaust or one succeeds.
#[derive(Debug, Clone)]
pub struct TradeIntent {
    pub id: Uuid,
    pub direction: TradeDirection,
    pub input_amount: u64,
    pub input_mint: MintId,
    pub output_mint: MintId,
    pub slippage_pct: Decimal,
    pub pool: PoolDescriptor,
    pub attempt: u32,
}

impl TradeIntent {
    #[must_use]
    pub fn new(
        direction: TradeDirection,
        input_amount: u64,
        input_mint: MintId,
        output_mint: MintId,
        slippage_pct: Decimal,
        pool: PoolDescriptor,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            direction,
            input_amount,
            input_mint,
            output_mint,
            slippage_pct,
            pool,
            attempt: 0,
        }
    }

    pub fn record_attempt(&mut self) {
        self.attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{PoolId, PoolKind};
    use rust_decimal_macros::dec;
    use solana_sdk::pubkey::Pubkey;

    fn pool() -> PoolDescriptor {
        PoolDescriptor {
            id: PoolId::new(Pubkey::new_unique()),
            base_mint: MintId::new(Pubkey::new_unique()),
            quote_mint: MintId::new(Pubkey::new_unique()),
            base_vault: Pubkey::new_unique(),
            quote_vault: Pubkey::new_unique(),
            lp_mint: Pubkey::new_unique(),
            kind: PoolKind::ConstantProduct,
            market_id: None,
            open_time: 0,
        }
    }

    #[test]
    fn new_intent_starts_at_attempt_zero() {
        let intent = TradeIntent::new(
            TradeDirection::Buy,
            1_000_000,
            MintId::new(Pubkey::new_unique()),
            MintId::new(Pubkey::new_unique()),
            dec!(1.0),
            pool(),
        );
        assert_eq!(intent.attempt, 0);
    }

    #[test]
    fn record_attempt_increments() {
        let mut intent = TradeIntent::new(
            TradeDirection::Sell,
            1,
            MintId::new(Pubkey::new_unique()),
            MintId::new(Pubkey::new_unique()),
            dec!(0.5),
            pool(),
        );
        intent.record_attempt();
        intent.record_attempt();
        assert_eq!(intent.attempt, 2);
    }
}
