// SPDX-License-Identifier: MIT

//! Session gate for the protected API routes.
//!
//! This is a single-user device deployment: the session is the persisted
//! `is_authenticated` flag, not a per-user token.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Middleware that requires an active session.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let authenticated = state
        .store
        .is_authenticated()
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !authenticated {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}
