//! Router for the videos API

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{ConnectInfo, Query, State},
    response::Json,
    routing::{get, post},
};
use http::HeaderMap;

use super::public;
use crate::api::state::AppState;
use crate::api::utils::admit_client;
use crate::core::Error;
use crate::recommend::recommend_playlist;

type SharedState = Arc<AppState>;

/// Search for videos matching a query
async fn search_videos(
    State(state): State<SharedState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(params): Query<public::VideoSearchParams>,
) -> Result<Json<public::VideoSearchResponse>, crate::api::public::ApiError> {
    let rate_limit = admit_client(&state, &headers, peer)?;

    let videos = state
        .video_search
        .search(&params.query, params.limit)
        .await?;

    Ok(Json(public::VideoSearchResponse { videos, rate_limit }))
}

/// Build an AI-curated playlist with an explanation
async fn recommend(
    State(state): State<SharedState>,
    headers: HeaderMap,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(payload): Json<public::RecommendRequest>,
) -> Result<Json<public::RecommendResponse>, crate::api::public::ApiError> {
    let rate_limit = admit_client(&state, &headers, peer)?;

    if payload.topic.trim().is_empty() {
        return Err(Error::InvalidInput("topic must not be empty".to_string()).into());
    }

    let recommendation = recommend_playlist(
        &payload.topic,
        state.completions.as_ref(),
        state.video_search.as_ref(),
    )
    .await?;

    Ok(Json(public::RecommendResponse {
        videos: recommendation.videos,
        explanation: recommendation.explanation,
        rate_limit,
    }))
}

/// Create the videos router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/search", get(search_videos))
        .route("/recommend", post(recommend))
}
