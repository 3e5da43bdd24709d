use std::time::Duration;

use async_trait::async_trait;

use super::PeriodicJob;
use crate::api::AppState;
use crate::core::AppConfig;

/// Evicts sessions that have been idle past the configured timeout.
/// Without this, abandoned sessions would live until an explicit
/// reset.
#[derive(Debug)]
pub struct EvictIdleSessions {
    max_idle: Duration,
    every: Duration,
}

impl EvictIdleSessions {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            max_idle: Duration::from_secs(config.session_idle_secs),
            every: Duration::from_secs((config.session_idle_secs / 4).max(1)),
        }
    }
}

#[async_trait]
impl PeriodicJob for EvictIdleSessions {
    fn interval(&self) -> Duration {
        self.every
    }

    async fn run_job(&self, state: &AppState) {
        let evicted = state.sessions.evict_idle(self.max_idle);
        if evicted > 0 {
            tracing::info!(evicted, remaining = state.sessions.len(), "evicted idle sessions");
        }
    }
}
