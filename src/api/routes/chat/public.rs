//! Public types for the chat API
use serde::{Deserialize, Serialize};

use crate::ratelimit::RateLimitSnapshot;

/// Request to start a chat session over a video's transcript
#[derive(Deserialize)]
pub struct StartSessionRequest {
    pub video_url: String,
}

#[derive(Serialize)]
pub struct StartSessionResponse {
    pub session_id: String,
    pub total_chunks: usize,
    pub video_url: String,
}

/// Request for one conversation turn
#[derive(Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
    /// 1-based index of the transcript chunk the reply came from
    pub current_chunk: usize,
    pub total_chunks: usize,
    pub rate_limit: RateLimitSnapshot,
}

#[derive(Serialize)]
pub struct ResetSessionResponse {
    pub message: String,
}
