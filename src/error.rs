//! Crate-wide error taxonomy.
//!
//! A top-level [`Error`] composes narrower sub-enums, one per concern, so call sites can match on
//! the specific failure mode while `?` still works uniformly across module boundaries.

use thiserror::Error;

/// Configuration is invalid or incomplete. Fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("required field missing: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("{0}")]
    Other(String),
}

/// A subscription could not be established or torn down cleanly.
#[derive(Error, Debug)]
pub enum SubscriptionError {
    #[error("failed to establish {kind} subscription: {source}")]
    Establish {
        kind: &'static str,
        #[source]
        source: solana_client::client_error::ClientError,
    },

    #[error("failed to unsubscribe {kind}: {reason}")]
    Unsubscribe { kind: &'static str, reason: String },

    #[error("subscription channel closed unexpectedly")]
    ChannelClosed,

    #[error("start(None) called with no prior start() to restart from")]
    NoPriorConfig,
}

/// A trade submission failed, either before or after it reached the network.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("transaction sent but not confirmed before blockhash expiry: {0}")]
    Unconfirmed(String),

    #[error("RPC error: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("computed minimum output was zero, aborting swap")]
    ZeroOutput,

    #[error("relay request failed: {0}")]
    Relay(#[from] reqwest::Error),

    #[error("signing error: {0}")]
    Signing(String),
}

/// Market or pool lookup failed.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("market {0} not found in storage or on-chain")]
    MarketNotFound(String),

    #[error("pool for mint {0} not found in storage or on-chain")]
    PoolNotFound(String),

    #[error("mint {0} not found or has no parseable supply/balance")]
    MintNotFound(String),

    #[error("failed to decode on-chain account data: {0}")]
    Decode(String),

    #[error("RPC error while fetching from storage: {0}")]
    Rpc(#[from] solana_client::client_error::ClientError),
}

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("subscription error: {0}")]
    Subscription(#[from] SubscriptionError),

    #[error("execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("wallet error: {0}")]
    Wallet(String),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
