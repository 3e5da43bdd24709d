//! Periodic background jobs.
//!
//! Each job runs in its own tokio task on a fixed interval, scoped to
//! the server's lifetime through a cancellation token so shutdown
//! stops them instead of leaving timers running.

mod evict_idle_sessions;
mod purge_rate_limits;

pub use evict_idle_sessions::EvictIdleSessions;
pub use purge_rate_limits::PurgeRateLimits;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::api::AppState;

#[async_trait]
pub trait PeriodicJob: Send + Sync + 'static {
    fn interval(&self) -> Duration;
    async fn run_job(&self, state: &AppState);
}

/// Spawn a periodic job in its own tokio task. The task exits when
/// `shutdown` is cancelled.
pub fn spawn_periodic_job<J: PeriodicJob>(
    state: Arc<AppState>,
    shutdown: CancellationToken,
    job: J,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(job.interval());
        // The first tick fires immediately; skip it so jobs run one
        // full interval after startup.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => job.run_job(&state).await,
            }
        }
    });
}
