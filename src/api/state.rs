use std::sync::Arc;
use std::time::Duration;

use crate::chat::SessionStore;
use crate::core::AppConfig;
use crate::openai::CompletionProvider;
use crate::ratelimit::RateLimiter;
use crate::transcript::TranscriptProvider;
use crate::youtube::VideoSearchProvider;

/// Shared server state: the two owned mutable components (session
/// table, rate limit table) plus the external collaborators behind
/// their trait seams so tests can swap in fakes.
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub rate_limiter: Arc<RateLimiter>,
    pub transcripts: Arc<dyn TranscriptProvider>,
    pub completions: Arc<dyn CompletionProvider>,
    pub video_search: Arc<dyn VideoSearchProvider>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        transcripts: Arc<dyn TranscriptProvider>,
        completions: Arc<dyn CompletionProvider>,
        video_search: Arc<dyn VideoSearchProvider>,
    ) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new()),
            rate_limiter: Arc::new(RateLimiter::new(
                config.rate_limit,
                Duration::from_secs(config.rate_window_secs),
            )),
            transcripts,
            completions,
            video_search,
            config,
        }
    }
}
