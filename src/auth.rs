//! Token authentication
//!
//! The `Authorization` header carries a system's raw API token, matched
//! verbatim against the stored value. No scheme prefix, no sessions.

use crate::error::{Error, Result};
use crate::systems::{System, SystemStore};
use axum::http::{header, HeaderMap};

/// The system whose token is in the Authorization header. Missing header or
/// unknown token both fail the same way.
pub async fn authed_system(headers: &HeaderMap, store: &SystemStore) -> Result<System> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(Error::Unauthorized)?;
    store
        .system_by_token(token)
        .await
        .ok_or(Error::Unauthorized)
}

/// Like [`authed_system`], but tolerates an absent header for routes that
/// are public yet still honor `@me` when credentials are supplied. A header
/// that is present but wrong is still an error.
pub async fn maybe_authed_system(
    headers: &HeaderMap,
    store: &SystemStore,
) -> Result<Option<System>> {
    if !headers.contains_key(header::AUTHORIZATION) {
        return Ok(None);
    }
    authed_system(headers, store).await.map(Some)
}
