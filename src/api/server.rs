use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use super::routes;
use crate::api::state::AppState;
use crate::core::AppConfig;
use crate::jobs::{EvictIdleSessions, PurgeRateLimits, spawn_periodic_job};
use crate::openai::OpenAiCompletions;
use crate::youtube::{YouTubeSearch, YouTubeTranscripts};

pub fn app(shared_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        // API routes
        .nest("/api", routes::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::clone(&shared_state))
}

// Run the server
pub async fn serve(host: String, port: String, config: AppConfig) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format! {
                    "{}=debug,tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME")
                }
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let transcripts = Arc::new(YouTubeTranscripts::new());
    let completions = Arc::new(OpenAiCompletions::new(
        &config.openai_api_hostname,
        &config.openai_api_key,
        &config.openai_model,
    ));
    let video_search = Arc::new(YouTubeSearch::new(&config.youtube_api_key));

    let shared_state = Arc::new(AppState::new(
        config,
        transcripts,
        completions,
        video_search,
    ));
    let app = app(Arc::clone(&shared_state));

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port))
        .await
        .unwrap();

    tracing::debug!(
        "Server started. Listening on {}",
        listener.local_addr().unwrap()
    );

    // Run background jobs. Each job is spawned in it's own tokio task
    // in a loop, stopped through the shutdown token.
    let shutdown = CancellationToken::new();
    spawn_periodic_job(
        Arc::clone(&shared_state),
        shutdown.clone(),
        PurgeRateLimits::new(&shared_state.config),
    );
    spawn_periodic_job(
        Arc::clone(&shared_state),
        shutdown.clone(),
        EvictIdleSessions::new(&shared_state.config),
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = tokio::signal::ctrl_c().await;
        shutdown.cancel();
    })
    .await
    .unwrap();
}
