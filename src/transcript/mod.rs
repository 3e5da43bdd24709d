//! Transcript types and chunking.
//!
//! A transcript is an ordered sequence of timed text items. Because a
//! full transcript is usually too long for a single completion
//! context, it is partitioned once, at session creation, into
//! bounded-size chunks that the chat engine walks through.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::Result;

/// A single timed line of a transcript. `timestamp` and `duration`
/// are in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptItem {
    pub text: String,
    pub timestamp: f64,
    pub duration: f64,
}

/// A time-contiguous, non-empty run of transcript items whose total
/// text length fits `max_chunk_chars`, except when a single item is
/// longer than the limit on its own. Chunk boundaries are computed
/// once and never change for the life of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub items: Vec<TranscriptItem>,
}

impl Chunk {
    pub fn char_len(&self) -> usize {
        self.items.iter().map(|item| item.text.len()).sum()
    }

    /// Render the chunk as completion context, one `[12s] <text>`
    /// line per item.
    pub fn context_text(&self) -> String {
        self.items
            .iter()
            .map(|item| format!("[{}s] {}", item.timestamp.floor() as u64, item.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Partition `items` into chunks with a greedy linear scan:
/// accumulate items while the running character count stays within
/// `max_chunk_chars`, otherwise close the current chunk and start a
/// new one. Items are never split or dropped, so an item longer than
/// the limit becomes a chunk of its own. Deterministic: the same
/// input always produces the same boundaries.
pub fn chunk_transcript(items: Vec<TranscriptItem>, max_chunk_chars: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<TranscriptItem> = Vec::new();
    let mut current_len = 0usize;

    for item in items {
        let item_len = item.text.len();
        if !current.is_empty() && current_len + item_len > max_chunk_chars {
            chunks.push(Chunk {
                items: std::mem::take(&mut current),
            });
            current_len = 0;
        }
        current_len += item_len;
        current.push(item);
    }

    if !current.is_empty() {
        chunks.push(Chunk { items: current });
    }

    chunks
}

/// Source of transcripts, e.g. scraping captions for a video URL.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn fetch(&self, source: &str) -> Result<Vec<TranscriptItem>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str, timestamp: f64) -> TranscriptItem {
        TranscriptItem {
            text: text.to_string(),
            timestamp,
            duration: 1.0,
        }
    }

    /// Tests that a 9000 char transcript with an 8000 char limit
    /// splits into two chunks with the remainder in the second
    #[test]
    fn it_splits_at_the_char_limit() {
        let items = vec![
            item(&"a".repeat(4000), 0.0),
            item(&"b".repeat(3900), 10.0),
            item(&"c".repeat(1100), 20.0),
        ];

        let chunks = chunk_transcript(items, 8000);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].char_len(), 7900);
        assert_eq!(chunks[1].char_len(), 1100);
    }

    /// Tests that every chunk respects the limit unless it holds a
    /// single oversized item
    #[test]
    fn it_bounds_every_chunk() {
        let items: Vec<TranscriptItem> = (0..50)
            .map(|i| item(&"x".repeat(100 + i * 7), i as f64))
            .collect();

        for chunk in chunk_transcript(items, 500) {
            assert!(chunk.char_len() <= 500 || chunk.items.len() == 1);
        }
    }

    /// Tests that an item longer than the limit is kept whole as its
    /// own chunk, never split or dropped
    #[test]
    fn it_keeps_oversized_items_whole() {
        let items = vec![
            item(&"a".repeat(100), 0.0),
            item(&"b".repeat(9000), 10.0),
            item(&"c".repeat(100), 20.0),
        ];

        let chunks = chunk_transcript(items, 8000);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].items.len(), 1);
        assert_eq!(chunks[1].char_len(), 9000);
    }

    /// Tests that chunking is deterministic and lossless: repeated
    /// runs agree and concatenating chunks reproduces the input
    #[test]
    fn it_is_deterministic_and_lossless() {
        let items: Vec<TranscriptItem> = (0..30)
            .map(|i| item(&"word ".repeat(i + 1), i as f64))
            .collect();

        let first = chunk_transcript(items.clone(), 300);
        let second = chunk_transcript(items.clone(), 300);
        assert_eq!(first, second);

        let flattened: Vec<TranscriptItem> = first
            .into_iter()
            .flat_map(|chunk| chunk.items)
            .collect();
        assert_eq!(flattened, items);
    }

    /// Tests that an empty transcript yields no chunks
    #[test]
    fn it_returns_no_chunks_for_an_empty_transcript() {
        assert!(chunk_transcript(vec![], 8000).is_empty());
    }

    /// Tests the context rendering with per-item timestamps
    #[test]
    fn it_renders_timestamped_context() {
        let chunk = Chunk {
            items: vec![item("hello", 12.7), item("world", 15.0)],
        };

        assert_eq!(chunk.context_text(), "[12s] hello\n[15s] world");
    }
}
