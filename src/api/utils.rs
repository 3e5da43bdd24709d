use std::net::SocketAddr;
use std::time::Instant;

use http::HeaderMap;

use crate::api::state::AppState;
use crate::core::{Error, Result};
use crate::ratelimit::{Admission, RateLimitSnapshot};

/// Resolve the client identity used for admission control: the first
/// `x-forwarded-for` entry when a proxy fronts us, otherwise the
/// connection's peer address.
pub fn client_identity(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    peer.ip().to_string()
}

/// Run the admission check for a request. Must be called before any
/// downstream work in a rate limited handler.
pub fn admit_client(
    state: &AppState,
    headers: &HeaderMap,
    peer: SocketAddr,
) -> Result<RateLimitSnapshot> {
    let identity = client_identity(headers, peer);
    match state.rate_limiter.admit(&identity, Instant::now()) {
        Admission::Allowed(snapshot) => Ok(snapshot),
        Admission::Rejected { retry_after_secs } => {
            tracing::warn!(%identity, retry_after_secs, "rate limit exceeded");
            Err(Error::RateLimited { retry_after_secs })
        }
    }
}
