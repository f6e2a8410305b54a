// SPDX-License-Identifier: MIT

use hadir_tracker::config::Config;
use hadir_tracker::db::{MemoryBackend, StorageBackend};
use hadir_tracker::routes::create_router;
use hadir_tracker::services::StaffDirectory;
use hadir_tracker::AppState;
use std::sync::Arc;

const TEST_DIRECTORY: &str = r#"[
  { "name": "BUDI SANTOSO, S.Pd", "role": "Kepala Sekolah", "staffId": "196801011990031001" },
  { "name": "SITI AMINAH, S.Pd.I", "role": "Guru Kelas", "staffId": "197502022000122002" },
  { "name": "RAHMAT HIDAYAT, S.Pd", "role": "Guru PJOK", "staffId": "198803032012021003" }
]"#;

/// Create a test app over an in-memory backend.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with_backend(Box::new(MemoryBackend::new()))
}

/// Create a test app over a caller-supplied backend (e.g. one with a
/// byte quota).
#[allow(dead_code)]
pub fn create_test_app_with_backend(
    backend: Box<dyn StorageBackend>,
) -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default(), backend)
}

/// Create a test app from an explicit config and backend.
#[allow(dead_code)]
pub fn create_test_app_with(
    config: Config,
    backend: Box<dyn StorageBackend>,
) -> (axum::Router, Arc<AppState>) {
    let directory =
        StaffDirectory::load_from_json(TEST_DIRECTORY).expect("test directory must parse");
    let state = Arc::new(AppState::new(config, backend).with_directory(directory));
    (create_router(state.clone()), state)
}

/// Raise the session flag and store a profile, as a successful login would.
#[allow(dead_code)]
pub async fn sign_in(state: &Arc<AppState>, name: &str, staff_id: &str) {
    state
        .store
        .save_profile(hadir_tracker::models::ProfileUpdate {
            name: name.to_string(),
            staff_id: staff_id.to_string(),
            photo: None,
            role: None,
        })
        .await
        .expect("save_profile");
    state
        .store
        .set_authenticated(true)
        .await
        .expect("set_authenticated");
}

/// Read a JSON response body.
#[allow(dead_code)]
pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("body must be JSON")
}
