//! Round-robin RPC/WebSocket endpoint pool.
//!
//! Holds an ordered sequence of endpoint configs and hands out the current selection on demand.
//! The pool never retries or fails over transparently: callers that observe a failed submission
//! are responsible for calling [`EndpointPool::refresh`] before their next attempt.

use parking_lot::RwLock;
use rand::Rng;
use tracing::warn;

use crate::error::{ConfigError, Result};

/// One RPC/WebSocket pairing and its commitment level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub rpc_url: String,
    pub ws_url: String,
    pub commitment: String,
}

fn default_endpoint() -> EndpointConfig {
    EndpointConfig {
        rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
        ws_url: "wss://api.mainnet-beta.solana.com".to_string(),
        commitment: "confirmed".to_string(),
    }
}

/// Ordered sequence of endpoint configs with a "last selected" index, `-1` (`None`) until the
/// first selection is made.
pub struct EndpointPool {
    endpoints: Vec<EndpointConfig>,
    selected: RwLock<Option<usize>>,
}

impl EndpointPool {
    /// Parse pipe-delimited RPC and WebSocket URL lists. Fails with
    /// [`ConfigError::InvalidValue`] if the lists are empty or their counts differ.
    pub fn from_pipe_delimited(
        rpc_urls: &str,
        ws_urls: &str,
        commitment: &str,
    ) -> Result<Self> {
        let rpc: Vec<&str> = rpc_urls.split('|').map(str::trim).filter(|s| !s.is_empty()).collect();
        let ws: Vec<&str> = ws_urls.split('|').map(str::trim).filter(|s| !s.is_empty()).collect();

        if rpc.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "rpc_endpoints".to_string(),
                reason: "must contain at least one URL".to_string(),
            }
            .into());
        }
        if rpc.len() != ws.len() {
            return Err(ConfigError::InvalidValue {
                field: "ws_endpoints".to_string(),
                reason: format!(
                    "endpoint count mismatch: {} rpc vs {} ws",
                    rpc.len(),
                    ws.len()
                ),
            }
            .into());
        }

        let mut endpoints = Vec::with_capacity(rpc.len());
        for (rpc_url, ws_url) in rpc.into_iter().zip(ws) {
            url::Url::parse(rpc_url)?;
            url::Url::parse(ws_url)?;
            endpoints.push(EndpointConfig {
                rpc_url: rpc_url.to_string(),
                ws_url: ws_url.to_string(),
                commitment: commitment.to_string(),
            });
        }

        Ok(Self::new(endpoints))
    }

    #[must_use]
    pub fn new(endpoints: Vec<EndpointConfig>) -> Self {
        Self {
            endpoints,
            selected: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Return the current selection, choosing index 0 if nothing has been selected yet.
    #[must_use]
    pub fn current(&self) -> EndpointConfig {
        let idx = {
            let mut selected = self.selected.write();
            if selected.is_none() {
                *selected = Some(0);
            }
            selected.unwrap()
        };
        self.endpoints[idx].clone()
    }

    /// Pick a uniformly random index in `[0, N)` that is not equal to the last-used index (or
    /// the sole index if `N=1`). Updates the last-used index and returns the new selection.
    pub fn refresh(&self) -> EndpointConfig {
        let n = self.endpoints.len();
        let mut selected = self.selected.write();
        let next = if n <= 1 {
            0
        } else {
            let previous = selected.unwrap_or(0);
            loop {
                let candidate = rand::thread_rng().gen_range(0..n);
                if candidate != previous {
                    break candidate;
                }
            }
        };
        *selected = Some(next);
        self.endpoints[next].clone()
    }

    /// Replace the current selection with a hard-coded default endpoint and log a warning.
    pub fn fallback(&self) -> EndpointConfig {
        warn!("endpoint pool exhausted, falling back to default public RPC");
        let fallback = default_endpoint();
        // The fallback endpoint is not part of the configured rotation, so there is no index
        // to record; the next `refresh()` call resumes from the configured pool.
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_of(n: usize) -> EndpointPool {
        let endpoints = (0..n)
            .map(|i| EndpointConfig {
                rpc_url: format!("https://rpc-{i}.example"),
                ws_url: format!("wss://ws-{i}.example"),
                commitment: "confirmed".to_string(),
            })
            .collect();
        EndpointPool::new(endpoints)
    }

    #[test]
    fn from_pipe_delimited_requires_matching_counts() {
        let err = EndpointPool::from_pipe_delimited(
            "https://a|https://b",
            "wss://a",
            "confirmed",
        )
        .unwrap_err();
        assert!(err.to_string().contains("endpoint count mismatch"));
    }

    #[test]
    fn from_pipe_delimited_rejects_empty_rpc_list() {
        assert!(EndpointPool::from_pipe_delimited("", "", "confirmed").is_err());
    }

    #[test]
    fn from_pipe_delimited_rejects_an_unparseable_url() {
        assert!(EndpointPool::from_pipe_delimited("not-a-url", "wss://a", "confirmed").is_err());
    }

    #[test]
    fn from_pipe_delimited_builds_paired_endpoints() {
        let pool =
            EndpointPool::from_pipe_delimited("https://a|https://b", "wss://a|wss://b", "processed")
                .unwrap();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.current().rpc_url, "https://a");
    }

    #[test]
    fn refresh_never_repeats_previous_index_with_multiple_endpoints() {
        let pool = pool_of(3);
        let mut previous = pool.current();
        for _ in 0..50 {
            let next = pool.refresh();
            assert_ne!(next.rpc_url, previous.rpc_url);
            previous = next;
        }
    }

    #[test]
    fn refresh_on_single_endpoint_returns_the_sole_entry() {
        let pool = pool_of(1);
        let first = pool.current();
        let second = pool.refresh();
        assert_eq!(first.rpc_url, second.rpc_url);
    }

    #[test]
    fn fallback_returns_a_usable_endpoint() {
        let pool = pool_of(2);
        let fallback = pool.fallback();
        assert!(fallback.rpc_url.starts_with("https://"));
    }
}
