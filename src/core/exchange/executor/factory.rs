//! Executor factory: selects the Default, Warp, or Bundle transaction executor at startup based
//! on the configured executor mode.

use std::sync::Arc;
use std::time::Duration;

use solana_sdk::pubkey::Pubkey;

use super::{BundleExecutor, DefaultExecutor, TransactionExecutor, WarpExecutor};
use crate::core::exchange::executor::bundle::BundleConfig;
use crate::core::exchange::executor::warp::WarpConfig;
use crate::core::exchange::EndpointPool;
use crate::error::{ConfigError, Result};

/// Which transaction executor variant to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorMode {
    Default,
    Warp,
    Bundle,
}

impl ExecutorMode {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "default" => Ok(Self::Default),
            "warp" => Ok(Self::Warp),
            "bundle" => Ok(Self::Bundle),
            other => Err(ConfigError::InvalidValue {
                field: "executor_mode".to_string(),
                reason: format!("unknown executor mode {other:?}, expected default|warp|bundle"),
            }
            .into()),
        }
    }
}

/// Settings needed to build a Warp or Bundle executor. Unused fields are ignored for
/// [`ExecutorMode::Default`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub relay_url: String,
    pub fee_recipient: Pubkey,
    pub fee_lamports: u64,
    pub tip_recipients: Vec<Pubkey>,
    pub tip_lamports: u64,
    pub inclusion_timeout: Duration,
}

pub struct ExecutorFactory;

impl ExecutorFactory {
    /// Build the configured transaction executor.
    ///
    /// Fails with [`ConfigError::MissingField`] if `mode` requires relay settings that were not
    /// supplied.
    pub fn create(
        mode: ExecutorMode,
        endpoint_pool: Arc<EndpointPool>,
        relay: Option<&RelayConfig>,
    ) -> Result<Arc<dyn TransactionExecutor>> {
        match mode {
            ExecutorMode::Default => Ok(Arc::new(DefaultExecutor::new(endpoint_pool))),
            ExecutorMode::Warp => {
                let relay = relay.ok_or(ConfigError::MissingField { field: "relay" })?;
                Ok(Arc::new(WarpExecutor::new(
                    WarpConfig {
                        relay_url: relay.relay_url.clone(),
                        fee_recipient: relay.fee_recipient,
                        fee_lamports: relay.fee_lamports,
                    },
                    endpoint_pool,
                )))
            }
            ExecutorMode::Bundle => {
                let relay = relay.ok_or(ConfigError::MissingField { field: "relay" })?;
                if relay.tip_recipients.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "tip_recipients".to_string(),
                        reason: "bundle executor requires at least one tip recipient".to_string(),
                    }
                    .into());
                }
                Ok(Arc::new(BundleExecutor::new(BundleConfig {
                    relay_url: relay.relay_url.clone(),
                    tip_recipients: relay.tip_recipients.clone(),
                    tip_lamports: relay.tip_lamports,
                    inclusion_timeout: relay.inclusion_timeout,
                })))
            }
        }
    }
}
