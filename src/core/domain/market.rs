//! Order-book market descriptor.

use super::MarketId;
use solana_sdk::pubkey::Pubkey;

/// Order-book market record. Inserted on a `market` event when market-caching is enabled,
/// otherwise lazily fetched on demand. Immutable once cached.
#[derive(Debug, Clone)]
pub struct MarketDescriptor {
    pub id: MarketId,
    pub event_queue: Pubkey,
    pub bids: Pubkey,
    pub asks: Pubkey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_descriptor_roundtrips_fields() {
        let id = MarketId::new(Pubkey::new_unique());
        let market = MarketDescriptor {
            id,
            event_queue: Pubkey::new_unique(),
            bids: Pubkey::new_unique(),
            asks: Pubkey::new_unique(),
        };
        assert_eq!(market.id, id);
    }
}
