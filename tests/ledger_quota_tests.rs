// SPDX-License-Identifier: MIT

//! Quota behavior of the record store, exercised through the HTTP API.
//!
//! The byte budgets below leave room for the stored profile, the session
//! flag, and one record, but not two.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use hadir_tracker::config::{Config, DEFAULT_SCHOOL_LATITUDE, DEFAULT_SCHOOL_LONGITUDE};
use hadir_tracker::db::{MemoryBackend, QuotaPolicy};
use tower::ServiceExt;

mod common;

const STAFF_NAME: &str = "SITI AMINAH, S.Pd.I";
const STAFF_ID: &str = "197502022000122002";
const QUOTA_BYTES: usize = 480;

fn submit(kind: &str) -> Request<Body> {
    let body = serde_json::json!({
        "kind": kind,
        "staffName": STAFF_NAME,
        "staffId": STAFF_ID,
        "latitude": DEFAULT_SCHOOL_LATITUDE,
        "longitude": DEFAULT_SCHOOL_LONGITUDE,
        "photo": "data:image/jpeg;base64,aGVsbG8=",
    });
    Request::builder()
        .method(Method::POST)
        .uri("/api/records")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_full_store_rejects_with_actionable_error() {
    let (app, state) = common::create_test_app_with_backend(Box::new(
        MemoryBackend::with_quota(QUOTA_BYTES),
    ));
    common::sign_in(&state, STAFF_NAME, STAFF_ID).await;

    let response = app.clone().oneshot(submit("CHECK_IN")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The second record does not fit.
    let response = app.clone().oneshot(submit("CHECK_OUT")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INSUFFICIENT_STORAGE);
    let body = common::read_json(response).await;
    assert_eq!(body["error"], "storage_full");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("clear old history"));

    // The check-in survived untouched.
    assert_eq!(state.store.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_clearing_history_recovers_a_full_store() {
    let (app, state) = common::create_test_app_with_backend(Box::new(
        MemoryBackend::with_quota(QUOTA_BYTES),
    ));
    common::sign_in(&state, STAFF_NAME, STAFF_ID).await;

    let response = app.clone().oneshot(submit("CHECK_IN")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(submit("CHECK_OUT")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INSUFFICIENT_STORAGE);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The retry goes through; the session flag and profile survive.
    let response = app.oneshot(submit("CHECK_OUT")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(state.store.is_authenticated().await.unwrap());
    assert!(state.store.get_profile().await.unwrap().is_some());
}

#[tokio::test]
async fn test_trim_policy_drops_old_history_for_the_new_record() {
    let config = Config {
        quota_policy: QuotaPolicy::TrimHistory { keep: 0 },
        ..Config::test_default()
    };
    let (app, state) = common::create_test_app_with(
        config,
        Box::new(MemoryBackend::with_quota(QUOTA_BYTES)),
    );
    common::sign_in(&state, STAFF_NAME, STAFF_ID).await;

    let response = app.clone().oneshot(submit("CHECK_IN")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // No room for both; the trim policy sacrifices the old record.
    let response = app.oneshot(submit("CHECK_OUT")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let records = state.store.list_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind.to_string(), "check-out");
}
