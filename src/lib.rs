//! snipelord - an automated Solana liquidity-pool sniping and auto-sell trading bot.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── core/             # Reusable library components
//! │   ├── domain/       # Pool/market/trade value types
//! │   ├── exchange/     # Endpoint pool, transaction executor, subscription layer
//! │   ├── filter/       # Pool eligibility filter engine
//! │   ├── list_cache/   # Allow-list / deny-list set membership
//! │   └── storage/      # In-memory market/pool descriptor caches
//! ├── app/              # Configuration, wallet loading, trade coordinator
//! └── cli/              # Command-line entry points (`run`, `check`, `wallet show`)
//! ```

pub mod app;
pub mod cli;
pub mod core;
pub mod error;
