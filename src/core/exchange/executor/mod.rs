//! Transaction executor: a polymorphic capability for submitting a signed transaction and
//! reporting confirmation.
//!
//! Three variants are selected at startup from configuration:
//!
//! - [`default_executor::DefaultExecutor`] — submits directly through the endpoint pool.
//! - [`warp::WarpExecutor`] — forwards to an external relay alongside a service-fee instruction.
//! - [`bundle::BundleExecutor`] — forwards a tip-bearing bundle to an external relay.
//!
//! Warp and Bundle both supply their own compute-budget instructions; the coordinator tests
//! [`TransactionExecutor::provides_compute_budget`] rather than matching on a concrete type to
//! decide whether to prepend compute-budget instructions to the user transaction.

mod bundle;
mod default_executor;
mod factory;
mod warp;

pub use bundle::{BundleConfig, BundleExecutor};
pub use default_executor::DefaultExecutor;
pub use factory::{ExecutorFactory, ExecutorMode, RelayConfig};
pub use warp::{WarpConfig, WarpExecutor};

use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Keypair;
use solana_sdk::transaction::VersionedTransaction;

use crate::core::domain::SubmissionResult;
use crate::error::Result;

/// A blockhash and the block height after which it becomes permanently ineligible.
#[derive(Debug, Clone, Copy)]
pub struct LatestBlockhash {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// Submits a signed transaction and reports whether it was confirmed.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    /// Submits `tx` and awaits confirmation bound by `blockhash.last_valid_block_height`.
    ///
    /// Fails with [`crate::error::ExecutionError`] on unrecoverable submission failure; a
    /// transaction that was submitted but never confirmed returns `confirmed = false` without an
    /// error.
    async fn execute_and_confirm(
        &self,
        tx: VersionedTransaction,
        payer: &Keypair,
        blockhash: LatestBlockhash,
    ) -> Result<SubmissionResult>;

    /// Whether this variant supplies its own compute-budget instructions (Warp and Bundle both
    /// do, via the relay). When `true`, the coordinator's swap builder must not prepend
    /// compute-budget instructions to the user transaction; when `false` (Default), the
    /// coordinator prepends them itself.
    fn provides_compute_budget(&self) -> bool;

    /// Human-readable variant name, used in log records.
    fn name(&self) -> &'static str;
}

/// Best-effort extraction of simulation logs from a client error, for a debug-level log record.
/// Shared by all three variants per the common error-reporting contract.
pub(crate) fn extract_simulation_logs(
    err: &solana_client::client_error::ClientError,
) -> Option<Vec<String>> {
    use solana_client::client_error::ClientErrorKind;
    match &err.kind {
        ClientErrorKind::RpcError(solana_client::rpc_request::RpcError::RpcResponseError {
            data,
            ..
        }) => match data {
            solana_client::rpc_request::RpcResponseErrorData::SendTransactionPreflightFailure(
                sim,
            ) => sim.logs.clone(),
            _ => None,
        },
        _ => None,
    }
}
