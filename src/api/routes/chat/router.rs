//! Router for the chat API

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{ConnectInfo, Path, State},
    response::Json,
    routing::{delete, post},
};
use http::HeaderMap;

use super::public;
use crate::api::state::AppState;
use crate::api::utils::admit_client;
use crate::chat::engine;
use crate::core::Error;
use crate::transcript::chunk_transcript;

type SharedState = Arc<AppState>;

/// Fetch and chunk the transcript for a video, then store a new
/// session over it
async fn start_session(
    State(state): State<SharedState>,
    Json(payload): Json<public::StartSessionRequest>,
) -> Result<Json<public::StartSessionResponse>, crate::api::public::ApiError> {
    // A source with no usable transcript is the caller's problem, not
    // ours, so both "bad URL" and "no captions" surface as bad
    // requests here.
    let items = state
        .transcripts
        .fetch(&payload.video_url)
        .await
        .map_err(|err| match err {
            Error::NotFound(msg) => Error::InvalidInput(msg),
            other => other,
        })?;

    if items.is_empty() {
        return Err(Error::InvalidInput(format!(
            "no transcript found for {}",
            payload.video_url
        ))
        .into());
    }

    let chunks = chunk_transcript(items, state.config.max_chunk_chars);
    let (session_id, total_chunks) = state
        .sessions
        .create(chunks, &state.config.system_message)?;

    tracing::debug!(%session_id, total_chunks, "started chat session");

    Ok(Json(public::StartSessionResponse {
        session_id,
        total_chunks,
        video_url: payload.video_url,
    }))
}

/// Run one conversation turn against the session's current transcript
/// chunk
async fn chat_turn(
    State(state): State<SharedState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(payload): Json<public::ChatRequest>,
) -> Result<Json<public::ChatResponse>, crate::api::public::ApiError> {
    // Admission first, before any session or collaborator work.
    let rate_limit = admit_client(&state, &headers, peer)?;

    let turn = engine::ask(
        &state.sessions,
        &payload.session_id,
        &payload.message,
        state.completions.as_ref(),
    )
    .await?;

    Ok(Json(public::ChatResponse {
        reply: turn.reply,
        current_chunk: turn.chunk_index,
        total_chunks: turn.total_chunks,
        rate_limit,
    }))
}

/// Remove a session
async fn reset_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<public::ResetSessionResponse>, crate::api::public::ApiError> {
    state.sessions.reset(&id)?;

    Ok(Json(public::ResetSessionResponse {
        message: "Session reset successfully".to_string(),
    }))
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(chat_turn))
        .route("/sessions", post(start_session))
        .route("/sessions/{id}", delete(reset_session))
}
