//! Exchange abstraction layer: the round-robin endpoint pool, the pluggable transaction
//! executor, and the subscription layer that turns program-account-change notifications into
//! typed domain events.

pub mod amm;
pub mod endpoint_pool;
pub mod executor;
pub mod subscription;

pub use amm::{minimum_output, AmmInstructionBuilder, PoolReserves, RpcAmmClient};
pub use endpoint_pool::{EndpointConfig, EndpointPool};
pub use executor::{
    BundleConfig, ExecutorFactory, ExecutorMode, LatestBlockhash, RelayConfig, TransactionExecutor,
    WarpConfig,
};
pub use subscription::{
    decode_market_account, decode_pool_account, MarketEvent, PoolEvent, SubscriptionConfig,
    SubscriptionLayer, WalletEvent,
};
