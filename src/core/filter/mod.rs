//! Pool filter engine: a set of independent eligibility predicates plus the consecutive-match
//! polling window that decides whether a freshly-discovered pool is safe to buy (§4.4).

mod chain_reader;
mod engine;
mod filters;

pub use chain_reader::{ChainReader, MintAuthorities, MintMetadata, RpcChainReader};
pub use engine::FilterEngine;
pub use filters::{
    BurntLiquidityFilter, FilterOutcome, FreezableFilter, PoolFilter, PoolSizeFilter,
    PumpFunOriginFilter, RenouncedMintAuthorityFilter,
};
