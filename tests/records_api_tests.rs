// SPDX-License-Identifier: MIT

//! Read-side API tests: profile, record listing, geofence preview, and the
//! advisory pre-fill endpoint.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use hadir_tracker::config::{DEFAULT_SCHOOL_LATITUDE, DEFAULT_SCHOOL_LONGITUDE};
use hadir_tracker::models::{AttendanceRecord, RecordKind};
use tower::ServiceExt;

mod common;

const STAFF_NAME: &str = "RAHMAT HIDAYAT, S.Pd";
const STAFF_ID: &str = "198803032012021003";

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn record(kind: RecordKind, timestamp: i64, staff_id: &str) -> AttendanceRecord {
    AttendanceRecord {
        id: timestamp.to_string(),
        kind,
        timestamp,
        latitude: None,
        longitude: None,
        location_label: None,
        photo: None,
        notes: None,
        start_date: None,
        end_date: None,
        staff_name: STAFF_NAME.to_string(),
        staff_id: staff_id.to_string(),
        travel: None,
    }
}

#[tokio::test]
async fn test_profile_get_and_update_preserves_photo() {
    let (app, state) = common::create_test_app();
    common::sign_in(&state, STAFF_NAME, STAFF_ID).await;

    state
        .store
        .save_profile(hadir_tracker::models::ProfileUpdate {
            name: STAFF_NAME.to_string(),
            staff_id: STAFF_ID.to_string(),
            photo: Some("https://example.com/photo.jpg".to_string()),
            role: Some("Guru PJOK".to_string()),
        })
        .await
        .unwrap();

    // An identity-only update must not wipe photo or role.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/api/profile")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({ "name": STAFF_NAME, "staffId": STAFF_ID }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/profile")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["photo"], "https://example.com/photo.jpg");
    assert_eq!(body["role"], "Guru PJOK");
}

#[tokio::test]
async fn test_records_are_listed_newest_first_with_filter_and_limit() {
    let (app, state) = common::create_test_app();
    common::sign_in(&state, STAFF_NAME, STAFF_ID).await;

    let now = chrono::Utc::now().timestamp_millis();
    state
        .store
        .append(&record(RecordKind::CheckIn, now - 2_000, STAFF_ID))
        .await
        .unwrap();
    state
        .store
        .append(&record(RecordKind::CheckOut, now - 1_000, STAFF_ID))
        .await
        .unwrap();
    state
        .store
        .append(&record(RecordKind::CheckIn, now, "199900001111222233"))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/api/records")).await.unwrap();
    let body = common::read_json(response).await;
    assert_eq!(body["total"], 3);
    // Prepend order: the last append comes first.
    assert_eq!(body["records"][0]["staffId"], "199900001111222233");

    let uri = format!("/api/records?staff_id={STAFF_ID}&limit=1");
    let response = app.oneshot(get(&uri)).await.unwrap();
    let body = common::read_json(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["records"].as_array().unwrap().len(), 1);
    assert_eq!(body["records"][0]["kind"], "CHECK_OUT");
}

#[tokio::test]
async fn test_today_listing_excludes_other_days() {
    let (app, state) = common::create_test_app();
    common::sign_in(&state, STAFF_NAME, STAFF_ID).await;

    let now = chrono::Utc::now().timestamp_millis();
    let two_days_ago = now - 2 * 24 * 3600 * 1000;
    state
        .store
        .append(&record(RecordKind::CheckIn, two_days_ago, STAFF_ID))
        .await
        .unwrap();
    state
        .store
        .append(&record(RecordKind::CheckIn, now, STAFF_ID))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/records/today")).await.unwrap();
    let body = common::read_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["records"][0]["timestamp"], now);
}

#[tokio::test]
async fn test_status_without_profile_or_query_is_a_bad_request() {
    let (app, state) = common::create_test_app();
    state.store.set_authenticated(true).await.unwrap();

    let response = app.oneshot(get("/api/status")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_geofence_preview_reports_distance() {
    let (app, state) = common::create_test_app();
    common::sign_in(&state, STAFF_NAME, STAFF_ID).await;

    let uri = format!(
        "/api/geofence?lat={}&lng={}",
        DEFAULT_SCHOOL_LATITUDE, DEFAULT_SCHOOL_LONGITUDE
    );
    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    assert_eq!(body["withinRange"], true);
    assert_eq!(body["distanceM"], 0.0);
    assert_eq!(body["radiusM"], 100.0);

    // Roughly 1.1 km north.
    let uri = format!(
        "/api/geofence?lat={}&lng={}",
        DEFAULT_SCHOOL_LATITUDE + 0.01,
        DEFAULT_SCHOOL_LONGITUDE
    );
    let response = app.oneshot(get(&uri)).await.unwrap();
    let body = common::read_json(response).await;
    assert_eq!(body["withinRange"], false);
    assert!(body["distanceM"].as_f64().unwrap() > 1_000.0);
}

#[tokio::test]
async fn test_advisory_endpoint_always_produces_text() {
    let (app, state) = common::create_test_app();
    common::sign_in(&state, STAFF_NAME, STAFF_ID).await;

    // No API key is configured, so the deterministic fallback answers.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/advisory",
            serde_json::json!({
                "destination": "Dinas Pendidikan",
                "activityType": "Rapat koordinasi",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::read_json(response).await;
    let text = body["text"].as_str().unwrap();
    assert!(text.contains("Dinas Pendidikan"));
    assert!(text.contains("Rapat koordinasi"));

    let response = app
        .oneshot(post_json(
            "/api/advisory",
            serde_json::json!({ "destination": "", "activityType": "" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
