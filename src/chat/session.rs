use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::core::{Error, Result};
use crate::openai::{Message, Role};
use crate::transcript::Chunk;

/// A conversation bound to one chunked transcript. The first history
/// entry is always the system instruction message the session was
/// seeded with; the store treats it as opaque.
pub struct Session {
    pub id: String,
    pub chunks: Vec<Chunk>,
    pub current_chunk: usize,
    pub history: Vec<Message>,
    pub last_active: Instant,
}

struct SessionSlot {
    // Serializes whole chat turns on one session. Async so it can be
    // held across the completion call without blocking the runtime.
    turn_gate: Arc<AsyncMutex<()>>,
    // Guards the session data itself. Only ever held for short
    // synchronous sections, never across an await.
    session: Mutex<Session>,
}

/// Exclusive hold on a session's turn gate. Dropping it lets the next
/// queued turn proceed.
pub struct TurnGuard {
    _gate: OwnedMutexGuard<()>,
}

/// Everything the chat engine needs to run one completion against the
/// session's current chunk, snapshotted under the data lock.
#[derive(Clone, Debug)]
pub struct ChunkContext {
    pub system_message: String,
    /// Prior turns, excluding the leading system message.
    pub history: Vec<Message>,
    pub context_text: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// In-memory session table. Sessions are exclusively owned by the
/// store; all mutation goes through its methods, which are atomic per
/// session id. There is no persistence: sessions live until reset or
/// idle eviction.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<SessionSlot>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Store a new session over `chunks`, seeded with the given
    /// system instruction. Returns the generated session id and the
    /// chunk count.
    pub fn create(&self, chunks: Vec<Chunk>, system_message: &str) -> Result<(String, usize)> {
        if chunks.is_empty() {
            return Err(Error::InvalidInput(
                "transcript produced no chunks".to_string(),
            ));
        }
        let total_chunks = chunks.len();

        let mut sessions = self.sessions.write().expect("session table lock poisoned");

        // v4 collisions are vanishingly rare, but ids must be unique
        // among live sessions.
        let mut id = Uuid::new_v4().to_string();
        while sessions.contains_key(&id) {
            id = Uuid::new_v4().to_string();
        }

        let session = Session {
            id: id.clone(),
            chunks,
            current_chunk: 0,
            history: vec![Message::new(Role::System, system_message)],
            last_active: Instant::now(),
        };
        sessions.insert(
            id.clone(),
            Arc::new(SessionSlot {
                turn_gate: Arc::new(AsyncMutex::new(())),
                session: Mutex::new(session),
            }),
        );

        Ok((id, total_chunks))
    }

    fn slot(&self, id: &str) -> Result<Arc<SessionSlot>> {
        self.sessions
            .read()
            .expect("session table lock poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("session {} not found", id)))
    }

    /// Acquire the session's turn gate, waiting behind any in-flight
    /// turn. Concurrent turns on the same session would otherwise
    /// race the chunk cursor and interleave history out of turn
    /// order.
    pub async fn begin_turn(&self, id: &str) -> Result<TurnGuard> {
        let slot = self.slot(id)?;
        let gate = Arc::clone(&slot.turn_gate);
        Ok(TurnGuard {
            _gate: gate.lock_owned().await,
        })
    }

    /// Snapshot the current chunk context and prior history.
    pub fn context_for(&self, id: &str) -> Result<ChunkContext> {
        let slot = self.slot(id)?;
        let session = slot.session.lock().expect("session lock poisoned");

        let chunk = &session.chunks[session.current_chunk];
        Ok(ChunkContext {
            system_message: session
                .history
                .first()
                .map(|m| m.content.clone())
                .unwrap_or_default(),
            history: session.history.iter().skip(1).cloned().collect(),
            context_text: chunk.context_text(),
            chunk_index: session.current_chunk,
            total_chunks: session.chunks.len(),
        })
    }

    /// Append an accepted turn to the session history, user message
    /// first.
    pub fn append_turn(&self, id: &str, user_text: &str, assistant_text: &str) -> Result<()> {
        let slot = self.slot(id)?;
        let mut session = slot.session.lock().expect("session lock poisoned");

        session.history.push(Message::new(Role::User, user_text));
        session
            .history
            .push(Message::new(Role::Assistant, assistant_text));
        session.last_active = Instant::now();
        Ok(())
    }

    /// Move the chunk cursor forward. Returns false when the session
    /// is already at its last chunk, which callers must treat as an
    /// end condition, not an error.
    pub fn advance_chunk(&self, id: &str) -> Result<bool> {
        let slot = self.slot(id)?;
        let mut session = slot.session.lock().expect("session lock poisoned");

        if session.current_chunk + 1 < session.chunks.len() {
            session.current_chunk += 1;
            session.last_active = Instant::now();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Remove the session entirely.
    pub fn reset(&self, id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().expect("session table lock poisoned");
        sessions
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("session {} not found", id)))
    }

    /// Drop sessions idle for longer than `max_idle`, returning how
    /// many were removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().expect("session table lock poisoned");
        let before = sessions.len();
        sessions.retain(|_, slot| {
            let session = slot.session.lock().expect("session lock poisoned");
            now.duration_since(session.last_active) < max_idle
        });
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .expect("session table lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TranscriptItem;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            items: vec![TranscriptItem {
                text: text.to_string(),
                timestamp: 0.0,
                duration: 1.0,
            }],
        }
    }

    /// Tests that creating a session with no chunks is rejected and
    /// nothing is stored
    #[test]
    fn it_rejects_empty_chunk_lists() {
        let store = SessionStore::new();

        let err = store.create(vec![], "system").unwrap_err();

        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(store.is_empty());
    }

    /// Tests that the chunk cursor only moves forward and stops at
    /// the last chunk
    #[test]
    fn it_advances_monotonically_to_the_last_chunk() {
        let store = SessionStore::new();
        let (id, total) = store
            .create(vec![chunk("one"), chunk("two")], "system")
            .unwrap();
        assert_eq!(total, 2);

        assert!(store.advance_chunk(&id).unwrap());
        assert!(!store.advance_chunk(&id).unwrap());
        assert!(!store.advance_chunk(&id).unwrap());
        assert_eq!(store.context_for(&id).unwrap().chunk_index, 1);
    }

    /// Tests that the context snapshot excludes the seeded system
    /// message from history but carries its content
    #[test]
    fn it_snapshots_context_without_the_system_message() {
        let store = SessionStore::new();
        let (id, _) = store.create(vec![chunk("hello")], "be helpful").unwrap();
        store.append_turn(&id, "hi", "hello back").unwrap();

        let ctx = store.context_for(&id).unwrap();

        assert_eq!(ctx.system_message, "be helpful");
        assert_eq!(ctx.history.len(), 2);
        assert_eq!(ctx.history[0].content, "hi");
        assert_eq!(ctx.context_text, "[0s] hello");
        assert_eq!(ctx.total_chunks, 1);
    }

    /// Tests that reset removes the session and a second reset
    /// reports not found
    #[test]
    fn it_resets_a_session_once() {
        let store = SessionStore::new();
        let (id, _) = store.create(vec![chunk("hello")], "system").unwrap();

        store.reset(&id).unwrap();

        assert!(matches!(store.reset(&id).unwrap_err(), Error::NotFound(_)));
        assert!(matches!(
            store.context_for(&id).unwrap_err(),
            Error::NotFound(_)
        ));
    }

    /// Tests idle eviction removes only sessions past the idle limit
    #[test]
    fn it_evicts_idle_sessions() {
        let store = SessionStore::new();
        let (stale, _) = store.create(vec![chunk("a")], "system").unwrap();
        std::thread::sleep(Duration::from_millis(30));
        let (fresh, _) = store.create(vec![chunk("b")], "system").unwrap();

        let evicted = store.evict_idle(Duration::from_millis(20));

        assert_eq!(evicted, 1);
        assert!(matches!(
            store.context_for(&stale).unwrap_err(),
            Error::NotFound(_)
        ));
        assert!(store.context_for(&fresh).is_ok());
    }

    /// Tests that distinct sessions get distinct ids
    #[test]
    fn it_generates_unique_session_ids() {
        let store = SessionStore::new();
        let (a, _) = store.create(vec![chunk("a")], "system").unwrap();
        let (b, _) = store.create(vec![chunk("b")], "system").unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }
}
