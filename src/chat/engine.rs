//! The chunk-advancing chat engine.
//!
//! A question is answered against the session's current transcript
//! chunk. When the model replies that the excerpt holds no answer and
//! more chunks remain, the cursor advances and the same question is
//! retried against the next chunk. The loop is bounded: the cursor
//! only moves forward and stops at the last chunk.

use crate::chat::SessionStore;
use crate::core::Result;
use crate::openai::{CompletionProvider, Message, Role};

/// Substring (matched case-insensitively) that marks a reply as "no
/// answer in this excerpt".
pub const NO_ANSWER_SENTINEL: &str = "i don't see any information";

#[derive(Clone, Debug)]
pub struct ChatTurn {
    pub reply: String,
    /// 1-based index of the chunk that produced the reply, as
    /// reported to clients.
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// Run one conversation turn. The history append happens only after
/// an answer is accepted; a rejected answer (sentinel match with
/// chunks remaining) advances the cursor and leaves no trace in
/// history. If every remaining chunk is exhausted, the last chunk's
/// answer is returned as-is, sentinel and all.
pub async fn ask(
    store: &SessionStore,
    session_id: &str,
    user_text: &str,
    completions: &dyn CompletionProvider,
) -> Result<ChatTurn> {
    // Serialize turns per session. Data locks below are never held
    // across the completion call.
    let _turn = store.begin_turn(session_id).await?;

    loop {
        let ctx = store.context_for(session_id)?;

        let system = format!(
            "{}\nCurrent transcript chunk ({}/{}):\n{}",
            ctx.system_message,
            ctx.chunk_index + 1,
            ctx.total_chunks,
            ctx.context_text
        );
        let mut messages = vec![Message::new(Role::System, &system)];
        messages.extend(ctx.history.iter().cloned());
        messages.push(Message::new(Role::User, user_text));

        let reply = completions.complete(&messages).await?;

        if reply.to_lowercase().contains(NO_ANSWER_SENTINEL)
            && store.advance_chunk(session_id)?
        {
            tracing::debug!(
                session_id,
                chunk = ctx.chunk_index + 1,
                total = ctx.total_chunks,
                "no answer in chunk, advancing"
            );
            continue;
        }

        store.append_turn(session_id, user_text, &reply)?;

        return Ok(ChatTurn {
            reply,
            chunk_index: ctx.chunk_index + 1,
            total_chunks: ctx.total_chunks,
        });
    }
}
