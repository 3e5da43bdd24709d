//! Public types for the videos API
use serde::{Deserialize, Serialize};

use crate::ratelimit::RateLimitSnapshot;
use crate::youtube::Video;

#[derive(Deserialize)]
pub struct VideoSearchParams {
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: u32,
}

fn default_search_limit() -> u32 {
    10
}

#[derive(Serialize)]
pub struct VideoSearchResponse {
    pub videos: Vec<Video>,
    pub rate_limit: RateLimitSnapshot,
}

/// Request for an AI-curated playlist about a topic
#[derive(Deserialize)]
pub struct RecommendRequest {
    pub topic: String,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    pub videos: Vec<Video>,
    pub explanation: String,
    pub rate_limit: RateLimitSnapshot,
}
