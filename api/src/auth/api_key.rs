//! API key authentication middleware
//!
//! When an API key is configured, every mutating request (anything other
//! than GET, HEAD or OPTIONS) must carry `Authorization: Bearer <key>`.
//! Read routes stay public.

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::AppState;

/// Hash an API key for comparison
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Extract the API key from the Authorization header
fn extract_api_key(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn is_read_only(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Authentication middleware for mutating routes
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected_hash) = state.api_key_hash.as_deref() else {
        return Ok(next.run(request).await);
    };

    if is_read_only(request.method()) {
        return Ok(next.run(request).await);
    }

    let api_key = extract_api_key(&request).ok_or(AppError::Unauthorized)?;
    if hash_api_key(api_key) != expected_hash {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected request with invalid API key"
        );
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
