//! Transcript fetching by scraping YouTube's caption tracks.
//!
//! There is no official API for captions without OAuth, so this does
//! what the popular transcript libraries do: load the watch page,
//! pull the caption track list out of the embedded player config, and
//! fetch the referenced timedtext XML.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use crate::core::{Error, Result};
use crate::transcript::{TranscriptItem, TranscriptProvider};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtu\.be/|/v/|/e/|/embed/|/shorts/|u/\w+/|v=)([^#&?/]+)")
        .expect("video id pattern is valid")
});

static CAPTION_TRACKS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""captionTracks":(\[.*?\])"#).expect("caption tracks pattern is valid")
});

static TIMEDTEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<text start="([^"]+)"(?:\s+dur="([^"]+)")?[^>]*>(.*?)</text>"#)
        .expect("timedtext pattern is valid")
});

/// Pull the 11 character video id out of any of the common YouTube
/// URL shapes (watch, youtu.be, embed, shorts).
pub fn extract_video_id(url: &str) -> Option<String> {
    let id = VIDEO_ID_RE.captures(url)?.get(1)?.as_str();
    if id.len() == 11 {
        Some(id.to_string())
    } else {
        None
    }
}

#[derive(Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: Option<String>,
}

/// Find the timedtext URL for the best caption track in a watch page,
/// preferring English when available.
fn caption_track_url(page: &str) -> Option<String> {
    let raw = CAPTION_TRACKS_RE.captures(page)?.get(1)?.as_str();
    let tracks: Vec<CaptionTrack> = serde_json::from_str(raw).ok()?;

    let preferred = tracks
        .iter()
        .find(|track| track.language_code.as_deref() == Some("en"))
        .or_else(|| tracks.first())?;

    Some(preferred.base_url.clone())
}

fn unescape(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

fn parse_timedtext(xml: &str) -> Vec<TranscriptItem> {
    TIMEDTEXT_RE
        .captures_iter(xml)
        .filter_map(|caps| {
            let timestamp: f64 = caps.get(1)?.as_str().parse().ok()?;
            let duration: f64 = caps
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0.0);
            // Tracks double-escape entities (&amp;#39; and friends),
            // so unescape twice.
            let text = unescape(&unescape(caps.get(3)?.as_str().trim()));
            if text.is_empty() {
                return None;
            }
            Some(TranscriptItem {
                text,
                timestamp,
                duration,
            })
        })
        .collect()
}

fn request_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::CollaboratorTimeout(FETCH_TIMEOUT)
    } else {
        Error::Collaborator(err.into())
    }
}

/// Transcript provider backed by YouTube caption scraping.
pub struct YouTubeTranscripts {
    client: reqwest::Client,
}

impl YouTubeTranscripts {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for YouTubeTranscripts {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranscriptProvider for YouTubeTranscripts {
    async fn fetch(&self, source: &str) -> Result<Vec<TranscriptItem>> {
        let video_id = extract_video_id(source).ok_or_else(|| {
            Error::InvalidInput(format!("not a recognizable YouTube video URL: {}", source))
        })?;

        let watch_url = format!("https://www.youtube.com/watch?v={}", video_id);
        let page = self
            .client
            .get(&watch_url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(request_error)?
            .text()
            .await
            .map_err(request_error)?;

        let track_url = caption_track_url(&page).ok_or_else(|| {
            Error::NotFound(format!("no captions available for video {}", video_id))
        })?;

        let xml = self
            .client
            .get(&track_url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(request_error)?
            .text()
            .await
            .map_err(request_error)?;

        Ok(parse_timedtext(&xml))
    }
}
