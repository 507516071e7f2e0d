//! Auto-refreshing subscriptions over async fetch operations
//!
//! A [`Subscription`] is an explicit resource handle: starting it runs one
//! fetch immediately and then one per interval tick until [`Subscription::stop`]
//! is called or the handle is dropped. The latest snapshot is observable at any
//! time, and [`Subscription::refresh`] runs an out-of-band cycle without
//! touching the timer.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::future::BoxFuture;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

/// Default refresh interval
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(30_000);

/// Observable state of a subscription
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_update_epoch_ms: Option<u64>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            last_update_epoch_ms: None,
        }
    }
}

type FetchFn<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, String>> + Send + Sync>;
type StateHandle<T> = Arc<RwLock<Snapshot<T>>>;

/// An auto-refreshing view over a no-argument async fetch operation
pub struct Subscription<T> {
    state: StateHandle<T>,
    fetch: FetchFn<T>,
    cancel: CancellationToken,
}

impl<T: Clone + Send + Sync + 'static> Subscription<T> {
    /// Start a subscription.
    ///
    /// With `enabled` false no polling task is spawned; the handle still
    /// serves snapshots and manual refreshes.
    pub fn start<F, Fut, E>(fetch: F, interval: Duration, enabled: bool) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: std::fmt::Display,
    {
        let fetch: FetchFn<T> = Arc::new(move || {
            let fut = fetch();
            Box::pin(async move { fut.await.map_err(|e| e.to_string()) })
        });
        let state: StateHandle<T> = Arc::new(RwLock::new(Snapshot::default()));
        let cancel = CancellationToken::new();

        if enabled {
            let fetch = Arc::clone(&fetch);
            let state = Arc::clone(&state);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                poll_loop(fetch, state, interval, cancel).await;
            });
        }

        Self {
            state,
            fetch,
            cancel,
        }
    }

    /// The latest snapshot
    pub async fn snapshot(&self) -> Snapshot<T> {
        self.state.read().await.clone()
    }

    /// Run one fetch cycle now, independent of the interval timer
    pub async fn refresh(&self) {
        run_cycle(&self.fetch, &self.state).await;
    }

    /// Stop future scheduled fetches. An in-flight cycle is not aborted; its
    /// result lands in the shared snapshot silently.
    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop<T>(
    fetch: FetchFn<T>,
    state: StateHandle<T>,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        run_cycle(&fetch, &state).await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => {
                tracing::debug!("Subscription polling loop cancelled");
                break;
            }
        }
    }
}

/// One fetch cycle. A failed fetch records its message and keeps the
/// previously stored value; overlapping cycles are last-writer-wins.
async fn run_cycle<T>(fetch: &FetchFn<T>, state: &StateHandle<T>) {
    {
        let mut snapshot = state.write().await;
        snapshot.loading = true;
        snapshot.error = None;
    }

    let result = fetch().await;

    let mut snapshot = state.write().await;
    match result {
        Ok(value) => {
            snapshot.data = Some(value);
            snapshot.last_update_epoch_ms = Some(current_epoch_ms());
        }
        Err(message) => {
            tracing::debug!("Fetch cycle failed: {}", message);
            snapshot.error = Some(message);
        }
    }
    snapshot.loading = false;
}

fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
