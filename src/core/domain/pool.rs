//! Pool descriptor and the account keys needed to build a swap instruction.

use super::{MarketDescriptor, MarketId, MintId, PoolId};
use solana_sdk::pubkey::Pubkey;

/// Which on-chain program layout a pool uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    /// Classical AMM with a companion order-book market.
    Classical,
    /// Constant-product pool with no order-book dependency.
    ConstantProduct,
}

/// Immutable liquidity-pool record. Inserted once on a `pool` event and never mutated;
/// removed only on process exit.
#[derive(Debug, Clone)]
pub struct PoolDescriptor {
    pub id: PoolId,
    pub base_mint: MintId,
    pub quote_mint: MintId,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    /// The pool's LP (liquidity-provider) mint, needed by the burnt-liquidity filter and by
    /// [`Self::to_keys`].
    pub lp_mint: Pubkey,
    pub kind: PoolKind,
    /// Present for `Classical` pools only; `None` for `ConstantProduct`.
    pub market_id: Option<MarketId>,
    pub open_time: i64,
}

impl PoolDescriptor {
    /// Enforces the invariant that exactly one of `market_id.is_some()` and
    /// `kind == ConstantProduct` holds.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        matches!(
            (self.market_id.is_some(), self.kind),
            (true, PoolKind::Classical) | (false, PoolKind::ConstantProduct)
        )
    }

    /// Builds the account keys needed for a swap against this pool, grafting in the companion
    /// order-book market's addresses when one is cached (§4.6, §4.7).
    #[must_use]
    pub fn to_keys(&self, market: Option<&MarketDescriptor>) -> PoolKeys {
        PoolKeys {
            pool_id: self.id,
            base_mint: self.base_mint,
            quote_mint: self.quote_mint,
            base_vault: self.base_vault,
            quote_vault: self.quote_vault,
            lp_mint: self.lp_mint,
            market_id: self.market_id,
            market_event_queue: market.map(|m| m.event_queue),
            market_bids: market.map(|m| m.bids),
            market_asks: market.map(|m| m.asks),
        }
    }
}

/// The account addresses required to build a swap instruction for a pool.
#[derive(Debug, Clone)]
pub struct PoolKeys {
    pub pool_id: PoolId,
    pub base_mint: MintId,
    pub quote_mint: MintId,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    /// The pool's LP (liquidity-provider) mint, used by the burnt-liquidity filter.
    pub lp_mint: Pubkey,
    pub market_id: Option<MarketId>,
    pub market_event_queue: Option<Pubkey>,
    pub market_bids: Option<Pubkey>,
    pub market_asks: Option<Pubkey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classical_pool() -> PoolDescriptor {
        PoolDescriptor {
            id: PoolId::new(Pubkey::new_unique()),
            base_mint: MintId::new(Pubkey::new_unique()),
            quote_mint: MintId::new(Pubkey::new_unique()),
            base_vault: Pubkey::new_unique(),
            quote_vault: Pubkey::new_unique(),
            lp_mint: Pubkey::new_unique(),
            kind: PoolKind::Classical,
            market_id: Some(MarketId::new(Pubkey::new_unique())),
            open_time: 0,
        }
    }

    #[test]
    fn classical_pool_requires_market_id() {
        assert!(classical_pool().is_consistent());

        let mut broken = classical_pool();
        broken.market_id = None;
        assert!(!broken.is_consistent());
    }

    #[test]
    fn constant_product_pool_forbids_market_id() {
        let mut cpmm = classical_pool();
        cpmm.kind = PoolKind::ConstantProduct;
        cpmm.market_id = None;
        assert!(cpmm.is_consistent());

        cpmm.market_id = Some(MarketId::new(Pubkey::new_unique()));
        assert!(!cpmm.is_consistent());
    }

    #[test]
    fn to_keys_omits_market_fields_without_a_market() {
        let pool = classical_pool();
        let keys = pool.to_keys(None);
        assert_eq!(keys.pool_id, pool.id);
        assert_eq!(keys.lp_mint, pool.lp_mint);
        assert_eq!(keys.market_id, pool.market_id);
        assert!(keys.market_event_queue.is_none());
        assert!(keys.market_bids.is_none());
        assert!(keys.market_asks.is_none());
    }

    #[test]
    fn to_keys_grafts_in_market_addresses() {
        let pool = classical_pool();
        let market = MarketDescriptor {
            id: pool.market_id.expect("classical pool has a market id"),
            event_queue: Pubkey::new_unique(),
            bids: Pubkey::new_unique(),
            asks: Pubkey::new_unique(),
        };

        let keys = pool.to_keys(Some(&market));
        assert_eq!(keys.market_event_queue, Some(market.event_queue));
        assert_eq!(keys.market_bids, Some(market.bids));
        assert_eq!(keys.market_asks, Some(market.asks));
    }
}
