//! Stage scheduler for per-chain RPC fan-out.
//!
//! Provides the fan-out/fan-in discipline used by every pipeline stage:
//! - All calls of a stage are launched together (optionally bounded)
//! - Results land in the slot of the call that produced them
//! - The first failure ends the stage; calls still in flight are dropped

use crate::error::Stage;
use futures::stream::{self, StreamExt, TryStreamExt};
use futures::{TryFutureExt, future};
use std::future::Future;
use std::num::NonZeroUsize;
use std::pin::pin;
use std::time::Instant;
use tracing::debug;

/// Runs the calls of one stage concurrently and joins them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageScheduler {
    /// Maximum calls in flight per stage; `None` launches all at once.
    max_in_flight: Option<NonZeroUsize>,
}

impl StageScheduler {
    /// Creates a scheduler with an optional in-flight bound.
    #[must_use]
    pub fn new(max_in_flight: Option<NonZeroUsize>) -> Self {
        Self { max_in_flight }
    }

    /// Scheduler that launches every call of a stage at once.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Configured in-flight bound.
    #[must_use]
    pub fn max_in_flight(&self) -> Option<NonZeroUsize> {
        self.max_in_flight
    }

    /// Runs `calls` and returns their outputs in input order.
    ///
    /// # Errors
    /// Returns the first error to occur; the remaining calls are not awaited.
    pub async fn run<T, E, Fut>(&self, stage: Stage, calls: Vec<Fut>) -> Result<Vec<T>, E>
    where
        Fut: Future<Output = Result<T, E>>,
    {
        let count = calls.len();
        if count == 0 {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        debug!(stage = %stage, calls = count, limit = ?self.max_in_flight, "Stage dispatched");

        let results = match self.max_in_flight {
            None => future::try_join_all(calls).await?,
            Some(limit) => {
                let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(count).collect();
                let mut completed = pin!(stream::iter(
                    calls
                        .into_iter()
                        .enumerate()
                        .map(|(slot, call)| call.map_ok(move |value| (slot, value))),
                )
                .buffer_unordered(limit.get()));

                while let Some((slot, value)) = completed.try_next().await? {
                    slots[slot] = Some(value);
                }

                slots.into_iter().flatten().collect()
            }
        };

        debug!(
            stage = %stage,
            calls = count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Stage joined"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use futures::future::BoxFuture;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn delayed(value: u32, delay_ms: u64) -> BoxFuture<'static, Result<u32, String>> {
        async move {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok(value)
        }
        .boxed()
    }

    fn bounded(limit: usize) -> StageScheduler {
        StageScheduler::new(NonZeroUsize::new(limit))
    }

    #[tokio::test]
    async fn test_results_keep_input_order() {
        for scheduler in [StageScheduler::unbounded(), bounded(2)] {
            let calls = vec![delayed(0, 30), delayed(1, 5), delayed(2, 15), delayed(3, 0)];
            let results = scheduler.run(Stage::Fetch, calls).await.unwrap();
            assert_eq!(results, vec![0, 1, 2, 3]);
        }
    }

    #[tokio::test]
    async fn test_empty_stage() {
        let calls: Vec<BoxFuture<'static, Result<u32, String>>> = Vec::new();
        let results = StageScheduler::unbounded()
            .run(Stage::Fee, calls)
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_first_failure_does_not_wait_for_pending_calls() {
        for scheduler in [StageScheduler::unbounded(), bounded(2)] {
            let calls: Vec<BoxFuture<'static, Result<u32, String>>> = vec![
                future::pending().boxed(),
                async { Err("execution reverted".to_string()) }.boxed(),
            ];

            let result =
                tokio::time::timeout(Duration::from_secs(5), scheduler.run(Stage::Enumeration, calls))
                    .await
                    .expect("stage should fail fast");
            assert_eq!(result, Err("execution reverted".to_string()));
        }
    }

    #[tokio::test]
    async fn test_bound_limits_calls_in_flight() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let calls: Vec<BoxFuture<'static, Result<usize, String>>> = (0..8)
            .map(|i| {
                let in_flight = in_flight.clone();
                let peak = peak.clone();
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok(i)
                }
                .boxed()
            })
            .collect();

        let results = bounded(3).run(Stage::Fetch, calls).await.unwrap();
        assert_eq!(results, (0..8).collect::<Vec<_>>());
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }
}
