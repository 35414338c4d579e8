//! Periodic removal of expired cache entries.
//!
//! Reads already drop expired entries lazily; this sweep bounds memory for
//! keys that are never read again (per-day limit counters, one-off results).

use std::sync::Arc;
use std::time::Duration;

use docent_core::cache::{TtlCache, SWEEP_INTERVAL_SECS};
use tokio_util::sync::CancellationToken;

/// Run the sweep loop until `cancel` is triggered.
pub async fn run(cache: Arc<TtlCache>, cancel: CancellationToken) {
    let period = Duration::from_secs(SWEEP_INTERVAL_SECS);
    tracing::info!(interval_secs = period.as_secs(), "Cache sweep started");

    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Cache sweep stopping");
                break;
            }
            _ = interval.tick() => {
                let removed = cache.sweep().await;
                if removed > 0 {
                    tracing::debug!(removed, "Cache sweep: dropped expired entries");
                }
            }
        }
    }
}
