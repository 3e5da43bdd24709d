//! YouTube collaborators: transcript scraping and Data API v3 search.

mod search;
mod transcript;

pub use search::{Video, VideoSearchProvider, YouTubeSearch};
pub use transcript::{YouTubeTranscripts, extract_video_id};
