//! Typed events emitted by the subscription layer.

use solana_sdk::pubkey::Pubkey;

/// A classical-AMM or constant-product pool account matched the pool-subscription filters.
///
/// Account-data decoding into a [`crate::core::domain::PoolDescriptor`] is the caller's
/// responsibility (mirrors an external on-chain codec; §1 Out of scope).
#[derive(Debug, Clone)]
pub struct PoolEvent {
    pub account_id: Pubkey,
    pub data: Vec<u8>,
    pub is_cpmm: bool,
}

/// An order-book market account matched the market-subscription filters.
#[derive(Debug, Clone)]
pub struct MarketEvent {
    pub account_id: Pubkey,
    pub data: Vec<u8>,
}

/// A token account owned by the configured wallet changed.
#[derive(Debug, Clone)]
pub struct WalletEvent {
    pub account_id: Pubkey,
    pub data: Vec<u8>,
}
