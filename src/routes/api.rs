// SPDX-License-Identifier: MIT

//! API routes for an authenticated session.

use crate::error::{AppError, Result};
use crate::models::{AttendanceRecord, DailyStatus, ProfileUpdate, RecordKind, TravelDetails};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const DEFAULT_LIST_LIMIT: usize = 100;
const MAX_LIST_LIMIT: usize = 500;

/// API routes (session required; the gate is applied in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_profile).put(update_profile))
        .route("/api/records", get(get_records).post(submit_record))
        .route("/api/records/today", get(get_today_records))
        .route("/api/status", get(get_status))
        .route("/api/geofence", get(check_geofence))
        .route("/api/advisory", post(generate_advisory))
        .route("/api/history", delete(clear_history))
}

// ─── Profile ─────────────────────────────────────────────────

/// Stored profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub name: String,
    pub staff_id: String,
    pub photo: Option<String>,
    pub role: Option<String>,
}

async fn get_profile(State(state): State<Arc<AppState>>) -> Result<Json<ProfileResponse>> {
    let profile = state
        .store
        .get_profile()
        .await?
        .ok_or_else(|| AppError::NotFound("no profile stored".to_string()))?;

    Ok(Json(ProfileResponse {
        name: profile.name,
        staff_id: profile.staff_id,
        photo: profile.photo,
        role: profile.role,
    }))
}

async fn update_profile(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>> {
    if update.name.trim().is_empty() || update.staff_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "name and staffId are required".to_string(),
        ));
    }

    let merged = state.store.save_profile(update).await?;
    Ok(Json(ProfileResponse {
        name: merged.name,
        staff_id: merged.staff_id,
        photo: merged.photo,
        role: merged.role,
    }))
}

// ─── Records ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct RecordsQuery {
    /// Filter by staff identifier
    staff_id: Option<String>,
    /// Cap on returned records (newest-first)
    limit: Option<usize>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecordsResponse {
    pub records: Vec<AttendanceRecord>,
    pub total: usize,
}

/// Full history, newest-first.
async fn get_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordsQuery>,
) -> Result<Json<RecordsResponse>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);

    let mut records = state.store.list_all().await?;
    if let Some(staff_id) = params.staff_id.as_deref() {
        records.retain(|r| r.staff_id == staff_id);
    }
    let total = records.len();
    records.truncate(limit);

    Ok(Json(RecordsResponse { records, total }))
}

/// Today's records, optionally for one staff member. Backs the recap view.
async fn get_today_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordsQuery>,
) -> Result<Json<RecordsResponse>> {
    let records = state.store.list_today(params.staff_id.as_deref()).await?;
    let total = records.len();
    Ok(Json(RecordsResponse { records, total }))
}

async fn clear_history(State(state): State<Arc<AppState>>) -> Result<StatusCode> {
    tracing::info!("Clearing record history");
    state.store.clear_history().await?;
    Ok(StatusCode::NO_CONTENT)
}

// ─── Daily Status ────────────────────────────────────────────

#[derive(Deserialize)]
struct StatusQuery {
    /// Defaults to the stored profile's staff identifier
    staff_id: Option<String>,
}

async fn get_status(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatusQuery>,
) -> Result<Json<DailyStatus>> {
    let staff_id = match params.staff_id {
        Some(id) => id,
        None => state
            .store
            .get_profile()
            .await?
            .map(|p| p.staff_id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                AppError::BadRequest("no staff_id given and no profile stored".to_string())
            })?,
    };

    let status = state.store.daily_status(&staff_id).await?;
    Ok(Json(status))
}

// ─── Geofence preview ────────────────────────────────────────

#[derive(Deserialize)]
struct GeofenceQuery {
    lat: f64,
    lng: f64,
}

/// Live distance check for the attendance form.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GeofenceResponse {
    /// Rounded distance in meters; None when it could not be computed
    pub distance_m: Option<f64>,
    pub within_range: bool,
    pub radius_m: f64,
}

async fn check_geofence(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeofenceQuery>,
) -> Result<Json<GeofenceResponse>> {
    let verdict = state.geofence.evaluate(params.lat, params.lng);
    Ok(Json(GeofenceResponse {
        distance_m: (!verdict.is_unknown()).then(|| verdict.distance_m.round()),
        within_range: verdict.within_range,
        radius_m: state.geofence.radius_m(),
    }))
}

// ─── Submission ──────────────────────────────────────────────

/// A submission exactly as composed on the form.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub kind: RecordKind,
    pub staff_name: String,
    pub staff_id: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub travel: Option<TravelDetails>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SubmitResponse {
    pub success: bool,
    pub id: String,
    pub kind: RecordKind,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_label: Option<String>,
    pub message: String,
}

/// Run the submission workflow for any record kind.
async fn submit_record(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>)> {
    let draft = crate::services::SubmissionDraft {
        kind: request.kind,
        staff_name: request.staff_name,
        staff_id: request.staff_id,
        latitude: request.latitude,
        longitude: request.longitude,
        photo: request.photo,
        notes: request.notes,
        start_date: request.start_date,
        end_date: request.end_date,
        travel: request.travel,
    };

    let record = state.workflow.submit(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            id: record.id.clone(),
            kind: record.kind,
            timestamp: record.timestamp,
            location_label: record.location_label.clone(),
            message: "Record saved locally.".to_string(),
        }),
    ))
}

// ─── Advisory pre-fill ───────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryRequest {
    pub destination: String,
    pub activity_type: String,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AdvisoryResponse {
    pub text: String,
}

/// Pre-fill helper for the SPPD result summary.
async fn generate_advisory(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AdvisoryRequest>,
) -> Result<Json<AdvisoryResponse>> {
    if request.destination.trim().is_empty() || request.activity_type.trim().is_empty() {
        return Err(AppError::BadRequest(
            "destination and activityType are required".to_string(),
        ));
    }

    let duration = request
        .duration
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| "the scheduled period".to_string());

    let text = state
        .advisory
        .generate(&request.destination, &request.activity_type, &duration)
        .await;

    Ok(Json(AdvisoryResponse { text }))
}
