//! Application layer: configuration loading, wallet loading, and the trade coordinator.

pub mod config;
pub mod coordinator;
pub mod wallet;

pub use config::Config;
pub use coordinator::Coordinator;
pub use wallet::Wallet;
