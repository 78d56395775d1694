//! Expiry Sweeper
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Shortest period the sweeper will tick at.
const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(1);

/// Spawns a task that calls [`CacheStore::sweep_expired`] every `period`.
///
/// The first sweep happens one full period after spawning. A `period` below
/// one millisecond, including zero, is raised to one millisecond. Slow ticks are
/// delayed rather than bunched up. The task exits as soon as `shutdown` is
/// cancelled, so awaiting the returned handle completes promptly.
///
/// # Example
/// ```ignore
/// let shutdown = CancellationToken::new();
/// let handle = spawn_sweeper(cache.clone(), Duration::from_secs(1), shutdown.clone());
/// // Later, during shutdown:
/// shutdown.cancel();
/// handle.await?;
/// ```
pub fn spawn_sweeper(
    cache: Arc<CacheStore>,
    period: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    let period = period.max(MIN_SWEEP_PERIOD);
    tokio::spawn(async move {
        info!(period_ms = period.as_millis() as u64, "Starting expiry sweeper");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval() fires immediately; skip that tick
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Expiry sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let removed = cache.sweep_expired();
                    if removed > 0 {
                        info!(removed, remaining = cache.len(), "Swept expired entries");
                    } else {
                        debug!("Sweep found no expired entries");
                    }
                }
            }
        }
    })
}
