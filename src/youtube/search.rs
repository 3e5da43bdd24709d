//! YouTube Data API v3 search client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";

/// A single video search result. `search_term` is set by the
/// recommendation pipeline to record which generated term surfaced
/// the video.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub channel_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

/// The video search collaborator.
#[async_trait]
pub trait VideoSearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Video>>;
}

// Response structures from the search.list API documentation
#[derive(Debug, Deserialize)]
struct SearchListResponse {
    items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: ResultId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct ResultId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    description: String,
    thumbnails: Thumbnails,
    #[serde(rename = "channelTitle")]
    channel_title: String,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

fn map_results(response: SearchListResponse) -> Vec<Video> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            // search.list can also return channels and playlists;
            // only keep results with a video id.
            let id = item.id.video_id?;
            let thumbnail = item
                .snippet
                .thumbnails
                .medium
                .or(item.snippet.thumbnails.default)
                .map(|t| t.url)
                .unwrap_or_default();
            Some(Video {
                id,
                title: item.snippet.title,
                description: item.snippet.description,
                thumbnail,
                channel_title: item.snippet.channel_title,
                search_term: None,
            })
        })
        .collect()
}

fn request_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::CollaboratorTimeout(SEARCH_TIMEOUT)
    } else {
        Error::Collaborator(err.into())
    }
}

/// Video search backed by the YouTube Data API.
pub struct YouTubeSearch {
    api_key: String,
    client: reqwest::Client,
}

impl YouTubeSearch {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl VideoSearchProvider for YouTubeSearch {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Video>> {
        let max_results = max_results.to_string();
        let response: SearchListResponse = self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .map_err(request_error)?
            .error_for_status()
            .map_err(request_error)?
            .json()
            .await
            .map_err(request_error)?;

        Ok(map_results(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Tests mapping a search.list payload into videos, skipping
    /// non-video results and falling back across thumbnail sizes
    #[test]
    fn it_maps_search_results_to_videos() {
        let payload = json!({
            "items": [
                {
                    "id": { "kind": "youtube#video", "videoId": "abc123def45" },
                    "snippet": {
                        "title": "A video",
                        "description": "About things",
                        "channelTitle": "A channel",
                        "thumbnails": { "medium": { "url": "https://img/medium.jpg" } }
                    }
                },
                {
                    "id": { "kind": "youtube#channel" },
                    "snippet": {
                        "title": "A channel result",
                        "description": "",
                        "channelTitle": "Someone",
                        "thumbnails": {}
                    }
                },
                {
                    "id": { "kind": "youtube#video", "videoId": "xyz987uvw65" },
                    "snippet": {
                        "title": "Default thumb only",
                        "description": "",
                        "channelTitle": "Another channel",
                        "thumbnails": { "default": { "url": "https://img/default.jpg" } }
                    }
                }
            ]
        });

        let response: SearchListResponse = serde_json::from_value(payload).unwrap();
        let videos = map_results(response);

        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].id, "abc123def45");
        assert_eq!(videos[0].thumbnail, "https://img/medium.jpg");
        assert_eq!(videos[1].thumbnail, "https://img/default.jpg");
        assert!(videos.iter().all(|v| v.search_term.is_none()));
    }
}
