//! In-memory market/pool caches, keyed by address, with get-or-fetch-and-cache semantics (§4.6).

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::core::domain::{MarketDescriptor, MarketId, MintId, PoolDescriptor};
use crate::error::Result;

/// Fetches a market descriptor directly from the chain when storage has no cached entry.
#[async_trait]
pub trait MarketFetcher: Send + Sync {
    async fn fetch_market(&self, id: MarketId) -> Result<MarketDescriptor>;
}

/// Fetches a pool descriptor directly from the chain when storage has no cached entry.
#[async_trait]
pub trait PoolFetcher: Send + Sync {
    async fn fetch_pool(&self, mint: MintId) -> Result<PoolDescriptor>;
}

/// `marketId -> MarketDescriptor` cache (§4.6). Misses fall back to `fetcher`, if supplied, and
/// cache the result on success.
pub struct MarketStorage {
    entries: DashMap<MarketId, MarketDescriptor>,
    fetcher: Option<Arc<dyn MarketFetcher>>,
}

impl MarketStorage {
    #[must_use]
    pub fn new(fetcher: Option<Arc<dyn MarketFetcher>>) -> Self {
        Self {
            entries: DashMap::new(),
            fetcher,
        }
    }

    pub fn save(&self, id: MarketId, value: MarketDescriptor) {
        self.entries.insert(id, value);
    }

    /// Returns the cached descriptor, or fetches and caches it on a miss. Returns `Ok(None)` on
    /// a miss with no configured fetcher.
    pub async fn get(&self, id: MarketId) -> Result<Option<MarketDescriptor>> {
        if let Some(entry) = self.entries.get(&id) {
            return Ok(Some(entry.clone()));
        }

        let Some(fetcher) = &self.fetcher else {
            return Ok(None);
        };

        let descriptor = fetcher.fetch_market(id).await?;
        self.entries.insert(id, descriptor.clone());
        Ok(Some(descriptor))
    }
}

/// `mintAddress -> PoolDescriptor` cache (§4.6).
pub struct PoolStorage {
    entries: DashMap<MintId, PoolDescriptor>,
    fetcher: Option<Arc<dyn PoolFetcher>>,
}

impl PoolStorage {
    #[must_use]
    pub fn new(fetcher: Option<Arc<dyn PoolFetcher>>) -> Self {
        Self {
            entries: DashMap::new(),
            fetcher,
        }
    }

    pub fn save(&self, mint: MintId, value: PoolDescriptor) {
        self.entries.insert(mint, value);
    }

    pub async fn get(&self, mint: MintId) -> Result<Option<PoolDescriptor>> {
        if let Some(entry) = self.entries.get(&mint) {
            return Ok(Some(entry.clone()));
        }

        let Some(fetcher) = &self.fetcher else {
            return Ok(None);
        };

        let descriptor = fetcher.fetch_pool(mint).await?;
        self.entries.insert(mint, descriptor.clone());
        Ok(Some(descriptor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::PoolKind;
    use solana_sdk::pubkey::Pubkey;

    fn market(id: MarketId) -> MarketDescriptor {
        MarketDescriptor {
            id,
            event_queue: Pubkey::new_unique(),
            bids: Pubkey::new_unique(),
            asks: Pubkey::new_unique(),
        }
    }

    fn pool() -> PoolDescriptor {
        PoolDescriptor {
            id: crate::core::domain::PoolId::new(Pubkey::new_unique()),
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

    #[tokio::test]
    async fn get_returns_saved_entry_without_fetching() {
        let storage = MarketStorage::new(None);
        let id = MarketId::new(Pubkey::new_unique());
        storage.save(id, market(id));

        let found = storage.get(id).await.unwrap();
        assert_eq!(found.unwrap().id, id);
    }

    #[tokio::test]
    async fn get_returns_none_on_miss_with_no_fetcher() {
        let storage = MarketStorage::new(None);
        let found = storage.get(MarketId::new(Pubkey::new_unique())).await.unwrap();
        assert!(found.is_none());
    }

    struct FakeMarketFetcher;
    #[async_trait]
    impl MarketFetcher for FakeMarketFetcher {
        async fn fetch_market(&self, id: MarketId) -> Result<MarketDescriptor> {
            Ok(market(id))
        }
    }

    #[tokio::test]
    async fn get_fetches_and_caches_on_miss() {
        let storage = MarketStorage::new(Some(Arc::new(FakeMarketFetcher)));
        let id = MarketId::new(Pubkey::new_unique());

        let fetched = storage.get(id).await.unwrap().unwrap();
        assert_eq!(fetched.id, id);

        // A second lookup must not need the fetcher; removing it would error if it were called.
        let cached = storage.get(id).await.unwrap().unwrap();
        assert_eq!(cached.id, id);
    }

    #[tokio::test]
    async fn pool_storage_save_and_get_roundtrip() {
        let storage = PoolStorage::new(None);
        let descriptor = pool();
        let mint = descriptor.base_mint;
        storage.save(mint, descriptor);

        let found = storage.get(mint).await.unwrap();
        assert!(found.is_some());
    }
}
