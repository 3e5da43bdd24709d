//! Conversation sessions over chunked transcripts.

pub mod engine;
mod session;

pub use session::{ChunkContext, Session, SessionStore, TurnGuard};
