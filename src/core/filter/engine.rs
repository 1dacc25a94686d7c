//! Filter engine: runs the configured filters concurrently and drives the consecutive-match
//! polling window (§4.4).

use std::time::Duration;

use tracing::info;

use super::filters::PoolFilter;
use crate::core::domain::PoolKeys;

/// The ordered set of filters to run against a candidate pool, built from the configured boolean
/// toggles (§6). Order does not affect the result — all filters run concurrently — but is
/// preserved for stable log ordering.
pub struct FilterEngine {
    filters: Vec<Box<dyn PoolFilter>>,
}

impl FilterEngine {
    #[must_use]
    pub fn new(filters: Vec<Box<dyn PoolFilter>>) -> Self {
        Self { filters }
    }

    /// Evaluates every configured filter concurrently. Returns `true` iff all of them passed.
    /// Failing filters are logged at info level with their message; an empty filter set (no
    /// toggles enabled) trivially returns `true` with no on-chain calls.
    pub async fn evaluate(&self, keys: &PoolKeys) -> bool {
        if self.filters.is_empty() {
            return true;
        }

        let outcomes = futures_util::future::join_all(self.filters.iter().map(|f| f.execute(keys))).await;

        let mut all_ok = true;
        for (filter, outcome) in self.filters.iter().zip(outcomes) {
            if !outcome.ok {
                all_ok = false;
                info!(
                    filter = filter.name(),
                    message = outcome.message.as_deref().unwrap_or(""),
                    "pool filter rejected candidate"
                );
            }
        }
        all_ok
    }

    /// Polls [`Self::evaluate`] up to `duration / interval` times, tracking consecutive
    /// successes. A single failure resets the counter to zero (anti-flicker, not cumulative).
    /// Returns `true` as soon as the counter reaches `consecutive_match_count`; returns `false`
    /// if the iteration bound is exhausted first. If either `duration` or `interval` is zero,
    /// the engine is bypassed entirely and the result is `true`.
    pub async fn await_consecutive_match(
        &self,
        keys: &PoolKeys,
        duration: Duration,
        interval: Duration,
        consecutive_match_count: u32,
    ) -> bool {
        if duration.is_zero() || interval.is_zero() || consecutive_match_count == 0 {
            return true;
        }

        let iterations = (duration.as_millis() / interval.as_millis().max(1)) as u32;
        let mut consecutive = 0u32;

        for _ in 0..iterations {
            if self.evaluate(keys).await {
                consecutive += 1;
                if consecutive >= consecutive_match_count {
                    return true;
                }
            } else {
                consecutive = 0;
            }
            tokio::time::sleep(interval).await;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{MarketId, MintId, PoolId};
    use async_trait::async_trait;
    use solana_sdk::pubkey::Pubkey;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn keys() -> PoolKeys {
        PoolKeys {
            pool_id: PoolId::new(Pubkey::new_unique()),
            base_mint: MintId::new(Pubkey::new_unique()),
            quote_mint: MintId::new(Pubkey::new_unique()),
            base_vault: Pubkey::new_unique(),
            quote_vault: Pubkey::new_unique(),
            lp_mint: Pubkey::new_unique(),
            market_id: Some(MarketId::new(Pubkey::new_unique())),
            market_event_queue: None,
            market_bids: None,
            market_asks: None,
        }
    }

    struct AlwaysPass;
    #[async_trait]
    impl PoolFilter for AlwaysPass {
        async fn execute(&self, _keys: &PoolKeys) -> super::super::filters::FilterOutcome {
            super::super::filters::FilterOutcome::pass()
        }
        fn name(&self) -> &'static str {
            "always_pass"
        }
    }

    struct AlwaysFail;
    #[async_trait]
    impl PoolFilter for AlwaysFail {
        async fn execute(&self, _keys: &PoolKeys) -> super::super::filters::FilterOutcome {
            super::super::filters::FilterOutcome::fail("never passes")
        }
        fn name(&self) -> &'static str {
            "always_fail"
        }
    }

    /// Passes on the Nth-or-later call, counted from 1.
    struct PassesFromCall {
        threshold: usize,
        calls: AtomicUsize,
    }
    #[async_trait]
    impl PoolFilter for PassesFromCall {
        async fn execute(&self, _keys: &PoolKeys) -> super::super::filters::FilterOutcome {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call >= self.threshold {
                super::super::filters::FilterOutcome::pass()
            } else {
                super::super::filters::FilterOutcome::fail("not yet")
            }
        }
        fn name(&self) -> &'static str {
            "passes_from_call"
        }
    }

    #[tokio::test]
    async fn empty_filter_set_passes_with_no_calls() {
        let engine = FilterEngine::new(vec![]);
        assert!(engine.evaluate(&keys()).await);
    }

    #[tokio::test]
    async fn evaluate_requires_every_filter_to_pass() {
        let engine = FilterEngine::new(vec![Box::new(AlwaysPass), Box::new(AlwaysFail)]);
        assert!(!engine.evaluate(&keys()).await);

        let engine = FilterEngine::new(vec![Box::new(AlwaysPass), Box::new(AlwaysPass)]);
        assert!(engine.evaluate(&keys()).await);
    }

    #[tokio::test]
    async fn zero_duration_bypasses_the_engine() {
        let engine = FilterEngine::new(vec![Box::new(AlwaysFail)]);
        let passed = engine
            .await_consecutive_match(&keys(), Duration::from_millis(0), Duration::from_millis(10), 3)
            .await;
        assert!(passed);
    }

    #[tokio::test]
    async fn zero_consecutive_match_count_bypasses_the_engine() {
        let engine = FilterEngine::new(vec![Box::new(AlwaysFail)]);
        let passed = engine
            .await_consecutive_match(&keys(), Duration::from_millis(100), Duration::from_millis(10), 0)
            .await;
        assert!(passed);
    }

    #[tokio::test]
    async fn consecutive_match_count_of_one_returns_on_first_success() {
        let engine = FilterEngine::new(vec![Box::new(AlwaysPass)]);
        let passed = engine
            .await_consecutive_match(&keys(), Duration::from_millis(100), Duration::from_millis(10), 1)
            .await;
        assert!(passed);
    }

    #[tokio::test]
    async fn a_single_failure_resets_the_consecutive_counter() {
        // Fails on call 1, then passes forever from call 2 onward. With consecutive_match_count
        // = 2, the loop needs calls 2 and 3 to both pass (reset after call 1's failure).
        let filter = PassesFromCall {
            threshold: 2,
            calls: AtomicUsize::new(0),
        };
        let engine = FilterEngine::new(vec![Box::new(filter)]);
        let passed = engine
            .await_consecutive_match(&keys(), Duration::from_millis(100), Duration::from_millis(1), 2)
            .await;
        assert!(passed);
    }

    #[tokio::test]
    async fn exhausting_the_iteration_bound_without_enough_successes_fails() {
        let engine = FilterEngine::new(vec![Box::new(AlwaysFail)]);
        let passed = engine
            .await_consecutive_match(&keys(), Duration::from_millis(30), Duration::from_millis(10), 5)
            .await;
        assert!(!passed);
    }
}
