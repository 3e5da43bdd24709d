//! Test utilities for integration tests
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;

use recap::api::{AppState, app};
use recap::core::{AppConfig, Result};
use recap::openai::{CompletionProvider, Message};
use recap::transcript::{TranscriptItem, TranscriptProvider};
use recap::youtube::{Video, VideoSearchProvider};

/// Transcript provider stub. Returns a short three item transcript
/// for any URL, or nothing when the URL mentions "no-transcript".
pub struct StubTranscripts;

#[async_trait]
impl TranscriptProvider for StubTranscripts {
    async fn fetch(&self, source: &str) -> Result<Vec<TranscriptItem>> {
        if source.contains("no-transcript") {
            return Ok(vec![]);
        }
        Ok(vec![
            TranscriptItem {
                text: "welcome to the video".to_string(),
                timestamp: 0.0,
                duration: 2.0,
            },
            TranscriptItem {
                text: "today we cover three things".to_string(),
                timestamp: 2.0,
                duration: 3.0,
            },
            TranscriptItem {
                text: "thanks for watching".to_string(),
                timestamp: 5.0,
                duration: 2.0,
            },
        ])
    }
}

/// Completion provider stub. Pops scripted replies in order and falls
/// back to a fixed phrase once the script runs out.
pub struct StubCompletions {
    replies: Mutex<VecDeque<String>>,
}

impl StubCompletions {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
        }
    }
}

#[async_trait]
impl CompletionProvider for StubCompletions {
    async fn complete(&self, _messages: &[Message]) -> Result<String> {
        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "This is a stub reply.".to_string()))
    }
}

/// Video search stub that fabricates `max_results` results per query.
pub struct StubVideoSearch;

#[async_trait]
impl VideoSearchProvider for StubVideoSearch {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Video>> {
        Ok((0..max_results)
            .map(|i| Video {
                id: format!("{}-{}", query, i),
                title: format!("{} video {}", query, i),
                description: "a stub result".to_string(),
                thumbnail: "https://img.example/stub.jpg".to_string(),
                channel_title: "stub channel".to_string(),
                search_term: None,
            })
            .collect())
    }
}

/// Creates a test application router with stubbed collaborators and
/// the given rate limit cap.
pub async fn test_app_with_limit(rate_limit: u32) -> Router {
    let app_config = AppConfig {
        openai_api_hostname: "https://api.openai.com".to_string(),
        openai_api_key: "test-api-key".to_string(),
        openai_model: "gpt-test".to_string(),
        youtube_api_key: "test-youtube-key".to_string(),
        system_message: "You are a helpful assistant.".to_string(),
        max_chunk_chars: 8000,
        rate_limit,
        rate_window_secs: 60 * 60 * 24,
        session_idle_secs: 60 * 60,
    };

    let app_state = AppState::new(
        app_config,
        Arc::new(StubTranscripts),
        Arc::new(StubCompletions::new(&[])),
        Arc::new(StubVideoSearch),
    );

    // Requests arrive through `oneshot` rather than a real listener,
    // so fake the peer address the admission check keys on.
    app(Arc::new(app_state)).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 3000))))
}

/// Creates a test application router with a high rate limit cap.
pub async fn test_app() -> Router {
    test_app_with_limit(10_000).await
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Response body was not utf-8")
}
