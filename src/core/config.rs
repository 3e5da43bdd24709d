use std::env;

/// Default system message seeded into every chat session. The "I
/// don't see any information" phrasing matters: the chat engine
/// watches for it to decide that the current transcript chunk didn't
/// contain an answer and the next chunk should be tried.
pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful assistant that answers questions about a video using its transcript. \
     Format your responses using markdown when appropriate for tables, lists, and emphasis. \
     Always include timestamps when referencing specific parts of the video. \
     If the question is not covered by the current excerpt, say \
     \"I don't see any information about that in this part of the video.\"";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub youtube_api_key: String,
    pub system_message: String,
    /// Maximum total character length of a transcript chunk. A single
    /// transcript item longer than this becomes its own chunk.
    pub max_chunk_chars: usize,
    /// Requests allowed per identity within one rate limit window.
    pub rate_limit: u32,
    pub rate_window_secs: u64,
    /// Sessions idle longer than this are evicted by a background job.
    pub session_idle_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let openai_api_hostname =
            env::var("RECAP_LLM_HOST").unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_api_key =
            env::var("OPENAI_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
        let openai_model =
            env::var("RECAP_LLM_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string());
        let youtube_api_key =
            env::var("RECAP_YOUTUBE_API_KEY").expect("Missing env var RECAP_YOUTUBE_API_KEY");
        let system_message = env::var("RECAP_SYSTEM_MESSAGE")
            .unwrap_or_else(|_| DEFAULT_SYSTEM_MESSAGE.to_string());
        let max_chunk_chars = env::var("RECAP_MAX_CHUNK_CHARS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8000);
        let rate_limit = env::var("RECAP_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10_000);
        let rate_window_secs = env::var("RECAP_RATE_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60 * 60 * 24);
        let session_idle_secs = env::var("RECAP_SESSION_IDLE_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60 * 60);

        Self {
            openai_api_hostname,
            openai_api_key,
            openai_model,
            youtube_api_key,
            system_message,
            max_chunk_chars,
            rate_limit,
            rate_window_secs,
            session_idle_secs,
        }
    }
}
