//! Public API types

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

use crate::core::Error;

// Errors

pub struct ApiError(Error);

/// Convert `ApiError` into an Axum compatible response, mapping each
/// error kind to its status code.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Always log the error
        tracing::error!("{}", self.0);

        let status = match &self.0 {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Error::CollaboratorTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Error::Collaborator(_) => StatusCode::BAD_GATEWAY,
        };

        let mut body = json!({ "error": self.0.to_string() });
        if let Error::RateLimited { retry_after_secs } = &self.0 {
            body["retry_after_secs"] = json!(retry_after_secs);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_, Error>` to
/// turn them into `Result<_, ApiError>`
impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

// Re-export public types from each route

pub mod chat {
    pub use crate::api::routes::chat::public::*;
}

pub mod videos {
    pub use crate::api::routes::videos::public::*;
}
