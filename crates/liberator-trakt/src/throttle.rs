use liberator_models::{HiddenBatch, HiddenSection, HistoryBatch, WatchlistBatch};
use std::future::Future;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};
use tracing::debug;
use crate::api::ApiResponse;
use crate::error::TraktError;
use crate::traits::TraktApi;

/// Single-flight request gate.
///
/// The lock is held from the moment a call is admitted until its future
/// resolves, so at most one call runs at a time. Consecutive starts are at
/// least `min_interval` apart.
pub struct RequestGate {
    min_interval: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl RequestGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_start: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub async fn run<F, Fut, T>(&self, call: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut last_start = self.last_start.lock().await;

        if let Some(previous) = *last_start {
            let ready_at = previous + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                let wait = ready_at - now;
                debug!(wait_ms = wait.as_millis() as u64, "Waiting for request slot");
                sleep(wait).await;
            }
        }

        *last_start = Some(Instant::now());
        let output = call().await;
        drop(last_start);
        output
    }
}

/// Every Trakt operation of `A`, admitted one at a time through a [`RequestGate`]
pub struct RateLimitedClient<A> {
    inner: A,
    gate: RequestGate,
}

impl<A: TraktApi> RateLimitedClient<A> {
    pub fn new(inner: A, min_interval: std::time::Duration) -> Self {
        Self {
            inner,
            gate: RequestGate::new(min_interval),
        }
    }

    pub fn backend_name(&self) -> &str {
        self.inner.backend_name()
    }

    pub fn min_interval(&self) -> Duration {
        self.gate.min_interval()
    }

    /// Direct access to the backend, bypassing the gate
    #[cfg(test)]
    fn inner(&self) -> &A {
        &self.inner
    }

    pub async fn user_settings(&self) -> Result<ApiResponse, TraktError> {
        self.gate.run(|| self.inner.user_settings()).await
    }

    pub async fn add_to_watchlist(&self, batch: &WatchlistBatch) -> Result<ApiResponse, TraktError> {
        self.gate.run(|| self.inner.add_to_watchlist(batch)).await
    }

    pub async fn add_to_history(&self, batch: &HistoryBatch) -> Result<ApiResponse, TraktError> {
        self.gate.run(|| self.inner.add_to_history(batch)).await
    }

    pub async fn add_hidden_items(
        &self,
        section: HiddenSection,
        batch: &HiddenBatch,
    ) -> Result<ApiResponse, TraktError> {
        self.gate.run(|| self.inner.add_hidden_items(section, batch)).await
    }
}
