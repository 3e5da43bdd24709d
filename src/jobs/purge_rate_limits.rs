use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::PeriodicJob;
use crate::api::AppState;
use crate::core::AppConfig;

/// Reclaims expired rate limit records so the table stays bounded by
/// the identities seen within one window.
#[derive(Debug)]
pub struct PurgeRateLimits {
    every: Duration,
}

impl PurgeRateLimits {
    pub fn new(config: &AppConfig) -> Self {
        // A couple dozen sweeps per window keeps the table tight
        // without busy-looping for short test windows.
        Self {
            every: Duration::from_secs((config.rate_window_secs / 24).max(1)),
        }
    }
}

#[async_trait]
impl PeriodicJob for PurgeRateLimits {
    fn interval(&self) -> Duration {
        self.every
    }

    async fn run_job(&self, state: &AppState) {
        let purged = state.rate_limiter.purge_expired(Instant::now());
        if purged > 0 {
            tracing::debug!(purged, "purged expired rate limit records");
        }
    }
}
