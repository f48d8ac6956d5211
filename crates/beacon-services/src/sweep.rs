//! Staleness sweep — periodic eviction of entries that stopped refreshing.

use std::time::Duration;

use tokio::sync::broadcast;

use crate::store::ServerStore;

/// Sweep the store every `threshold / 2` until shutdown fires.
///
/// The half-threshold cadence bounds worst-case survival of a dead entry
/// at 1.5 × threshold without scanning the store per-request.
pub async fn sweep_loop(
    store: ServerStore,
    threshold: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    // interval() panics on a zero period; clamp in case of a zero threshold.
    let period = (threshold / 2).max(Duration::from_millis(1));
    let mut interval = tokio::time::interval(period);

    tracing::info!(
        threshold_secs = threshold.as_secs(),
        "staleness sweep starting"
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let removed = store.prune(threshold);
                if removed > 0 {
                    tracing::debug!(removed, "swept stale servers");
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("staleness sweep stopped");
                return;
            }
        }
    }
}
