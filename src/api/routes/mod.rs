//! API routes module

pub mod chat;
pub mod videos;

use std::sync::Arc;

use axum::Router;

use crate::api::state::AppState;

type SharedState = Arc<AppState>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Transcript chat routes
        .nest("/chat", chat::router())
        // Video search and recommendation routes
        .nest("/videos", videos::router())
}
