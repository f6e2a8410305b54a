// SPDX-License-Identifier: MIT

//! Hadir-Tracker API Server
//!
//! Records geofence-validated attendance, leave/sick declarations and
//! duty-travel (SPPD) reports for school staff, persisting to local storage
//! with best-effort spreadsheet sync.

use hadir_tracker::{
    config::Config,
    db::FileBackend,
    services::StaffDirectory,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Hadir-Tracker API");

    // Open the local key-value store
    let backend = FileBackend::new(config.data_dir.clone(), None)
        .expect("Failed to open the local data store");
    tracing::info!(dir = %config.data_dir.display(), "Local store opened");

    // Load the staff directory
    let directory_path = config.staff_directory_path.clone();
    tracing::info!(path = %directory_path, "Loading staff directory");
    let directory =
        StaffDirectory::load_from_file(&directory_path).expect("Failed to load staff directory");

    tracing::info!(
        lat = config.school_latitude,
        lng = config.school_longitude,
        radius_m = config.geofence_radius_m,
        "Geofence configured"
    );

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), Box::new(backend)).with_directory(directory));
    if state.config.sheet_sync_url.is_none() {
        tracing::info!("Sheet sync disabled (no endpoint configured)");
    }

    // Build router
    let app = hadir_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hadir_tracker=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
