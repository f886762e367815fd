//! Periodic purge of expired generated-question sessions.
//!
//! Expired entries are already invisible to readers; this task frees their
//! memory on a fixed interval using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tunequiz_core::session_store::SessionStore;

/// Run the sweep loop until `cancel` is triggered.
pub async fn run(store: Arc<SessionStore>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        "Session sweep job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweep job stopping");
                break;
            }
            _ = ticker.tick() => {
                let removed = store.sweep();
                if removed > 0 {
                    tracing::info!(removed, remaining = store.len(), "Session sweep: purged expired questions");
                } else {
                    tracing::debug!("Session sweep: nothing to purge");
                }
            }
        }
    }
}
