//! Playlist recommendation pipeline.
//!
//! Three dependent steps: ask the LLM for search terms, run a video
//! search per term, then ask the LLM to organize and explain the
//! collected list. A failing search term fails the whole pipeline; a
//! malformed term response does not (it degrades to line splitting).

use futures_util::future::try_join_all;

use crate::core::Result;
use crate::openai::{CompletionProvider, Message, Role};
use crate::youtube::{Video, VideoSearchProvider};

/// How many search terms to request for a topic.
const TERM_COUNT: usize = 5;

/// How many videos to pull per search term.
const RESULTS_PER_TERM: u32 = 2;

#[derive(Clone, Debug)]
pub struct Recommendation {
    pub videos: Vec<Video>,
    pub explanation: String,
}

/// Parse the term-generation reply. The model is asked for a JSON
/// array; when it returns anything else, fall back to splitting on
/// line breaks and keep at most `TERM_COUNT` non-blank lines. The
/// fallback never fails — a malformed response degrades to fewer,
/// blunter terms rather than failing the pipeline.
fn parse_search_terms(raw: &str) -> Vec<String> {
    if let Ok(terms) = serde_json::from_str::<Vec<String>>(raw.trim()) {
        return terms.into_iter().take(TERM_COUNT).collect();
    }

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .take(TERM_COUNT)
        .collect()
}

async fn suggest_search_terms(
    topic: &str,
    completions: &dyn CompletionProvider,
) -> Result<Vec<String>> {
    let messages = vec![
        Message::new(
            Role::System,
            "You are a helpful assistant that suggests video search terms for creating a \
             playlist about a specific topic. Format your response as a JSON array of 5 \
             specific search terms. Make the search terms specific and varied to create a \
             well-rounded playlist.",
        ),
        Message::new(
            Role::User,
            &format!(
                "Suggest 5 specific search terms for creating a video playlist about: {}",
                topic
            ),
        ),
    ];

    let raw = completions.complete(&messages).await?;
    Ok(parse_search_terms(&raw))
}

async fn search_for_term(
    search: &dyn VideoSearchProvider,
    term: &str,
) -> Result<Vec<Video>> {
    let mut videos = search.search(term, RESULTS_PER_TERM).await?;
    for video in &mut videos {
        video.search_term = Some(term.to_string());
    }
    Ok(videos)
}

/// Build a recommended playlist for `topic` with an explanation of
/// why each video is included.
pub async fn recommend_playlist(
    topic: &str,
    completions: &dyn CompletionProvider,
    search: &dyn VideoSearchProvider,
) -> Result<Recommendation> {
    let terms = suggest_search_terms(topic, completions).await?;
    tracing::debug!(topic, ?terms, "generated playlist search terms");

    // Searches run concurrently; try_join_all keeps results in term
    // order and fails the pipeline on the first failed term.
    let per_term = terms.iter().map(|term| search_for_term(search, term));
    let videos: Vec<Video> = try_join_all(per_term)
        .await?
        .into_iter()
        .flatten()
        .collect();

    let titles = videos
        .iter()
        .map(|video| video.title.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let messages = vec![
        Message::new(
            Role::System,
            "You are a helpful assistant that organizes and explains video playlists.",
        ),
        Message::new(
            Role::User,
            &format!(
                "Here's a list of videos for a {} playlist. Please organize them and \
                 explain why each video is included:\n{}",
                topic, titles
            ),
        ),
    ];
    let explanation = completions.complete(&messages).await?;

    Ok(Recommendation { videos, explanation })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::anyhow;
    use async_trait::async_trait;

    use super::*;
    use crate::core::Error;

    struct FakeCompletions {
        replies: Mutex<Vec<String>>,
    }

    impl FakeCompletions {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for FakeCompletions {
        async fn complete(&self, _messages: &[Message]) -> Result<String> {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Err(Error::Collaborator(anyhow!("no scripted reply left")));
            }
            Ok(replies.remove(0))
        }
    }

    struct FakeSearch {
        fail_on: Option<String>,
    }

    #[async_trait]
    impl VideoSearchProvider for FakeSearch {
        async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Video>> {
            if self.fail_on.as_deref() == Some(query) {
                return Err(Error::Collaborator(anyhow!("search blew up")));
            }
            Ok((0..max_results)
                .map(|i| Video {
                    id: format!("{}-{}", query, i),
                    title: format!("{} video {}", query, i),
                    description: String::new(),
                    thumbnail: String::new(),
                    channel_title: "test channel".to_string(),
                    search_term: None,
                })
                .collect())
        }
    }

    /// Tests term parsing from a JSON array, capped at five
    #[test]
    fn it_parses_json_search_terms() {
        let terms = parse_search_terms(r#"["a", "b", "c", "d", "e", "f"]"#);
        assert_eq!(terms, vec!["a", "b", "c", "d", "e"]);
    }

    /// Tests the line-split fallback for a non-JSON reply
    #[test]
    fn it_falls_back_to_line_splitting() {
        let terms = parse_search_terms("yoga basics\n\n  morning yoga  \nyoga for flexibility\n");
        assert_eq!(
            terms,
            vec!["yoga basics", "morning yoga", "yoga for flexibility"]
        );
    }

    /// Tests the full pipeline: five terms, two videos each, tagged
    /// and ordered by term, plus an explanation
    #[tokio::test]
    async fn it_builds_a_playlist_in_term_order() {
        let completions = FakeCompletions::new(&[
            r#"["t1", "t2", "t3", "t4", "t5"]"#,
            "Here is why each video made the cut.",
        ]);
        let search = FakeSearch { fail_on: None };

        let rec = recommend_playlist("rust programming", &completions, &search)
            .await
            .unwrap();

        assert_eq!(rec.videos.len(), 10);
        assert_eq!(rec.videos[0].id, "t1-0");
        assert_eq!(rec.videos[1].id, "t1-1");
        assert_eq!(rec.videos[8].id, "t5-0");
        assert_eq!(rec.videos[2].search_term.as_deref(), Some("t2"));
        assert_eq!(rec.explanation, "Here is why each video made the cut.");
    }

    /// Tests that a malformed term response still yields a playlist
    /// via the fallback parser
    #[tokio::test]
    async fn it_survives_a_malformed_term_response() {
        let completions = FakeCompletions::new(&[
            "1. yoga for beginners\n2. gentle stretching\n3. breathing exercises",
            "Organized as requested.",
        ]);
        let search = FakeSearch { fail_on: None };

        let rec = recommend_playlist("yoga for beginners", &completions, &search)
            .await
            .unwrap();

        assert_eq!(rec.videos.len(), 6);
        assert!(rec.videos.len() <= TERM_COUNT * RESULTS_PER_TERM as usize);
        assert_eq!(
            rec.videos[0].search_term.as_deref(),
            Some("1. yoga for beginners")
        );
    }

    /// Tests that one failing search term fails the whole pipeline
    #[tokio::test]
    async fn it_fails_when_a_search_term_fails() {
        let completions = FakeCompletions::new(&[r#"["good", "bad"]"#, "unused"]);
        let search = FakeSearch {
            fail_on: Some("bad".to_string()),
        };

        let err = recommend_playlist("anything", &completions, &search)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Collaborator(_)));
    }
}
