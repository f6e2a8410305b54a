// SPDX-License-Identifier: MIT

//! Login/logout routes.
//!
//! The school uses one shared passcode; identity comes from the typed name
//! resolved against the staff directory. A successful login overwrites the
//! stored profile and raises the session flag.

use crate::error::{AppError, Result};
use crate::models::ProfileUpdate;
use crate::AppState;
use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(session))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub success: bool,
    /// Resolved official display name
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest(
            "username and password are required".to_string(),
        ));
    }

    if request.password != state.config.login_passcode {
        tracing::info!(username = %request.username.trim(), "Login rejected: wrong passcode");
        return Err(AppError::Unauthorized);
    }

    let profile = state.directory.resolve(&request.username);
    tracing::info!(name = %profile.name, role = ?profile.role, "Login accepted");

    let saved = state
        .store
        .save_profile(ProfileUpdate {
            name: profile.name,
            staff_id: profile.staff_id,
            photo: profile.photo,
            role: profile.role,
        })
        .await?;

    state.store.set_authenticated(true).await?;

    Ok(Json(LoginResponse {
        success: true,
        name: saved.name,
        role: saved.role,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub authenticated: bool,
}

async fn session(State(state): State<Arc<AppState>>) -> Result<Json<SessionResponse>> {
    let authenticated = state.store.is_authenticated().await?;
    Ok(Json(SessionResponse { authenticated }))
}

async fn logout(State(state): State<Arc<AppState>>) -> Result<Json<SessionResponse>> {
    state.store.set_authenticated(false).await?;
    Ok(Json(SessionResponse {
        authenticated: false,
    }))
}
