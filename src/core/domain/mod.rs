//! Core domain types: identifiers, pool/market descriptors, and trade records.
//!
//! ## Identifier Types
//!
//! - [`PoolId`] - opaque 32-byte pool account address
//! - [`MintId`] - SPL mint address
//! - [`MarketId`] - order-book market identifier
//!
//! ## Pool / Market Types
//!
//! - [`PoolDescriptor`] - immutable liquidity-pool record, inserted once on a `pool` event
//! - [`PoolKeys`] - the account addresses needed to build a swap instruction
//! - [`MarketDescriptor`] - order-book market record
//!
//! ## Trade Types
//!
//! - [`TradeIntent`] - one buy or sell attempt in flight
//! - [`SubmissionResult`] - outcome of one transaction-executor submission

mod ids;
mod market;
mod pool;
mod submission;
mod trade;

pub use ids::{MarketId, MintId, PoolId};
pub use market::MarketDescriptor;
pub use pool::{PoolDescriptor, PoolKeys, PoolKind};
pub use submission::SubmissionResult;
pub use trade::{TradeDirection, TradeIntent};
