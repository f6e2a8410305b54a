// SPDX-License-Identifier: MIT

//! Hadir-Tracker: attendance and duty-travel reporting for school staff
//!
//! This crate provides the backend for recording geofence-validated
//! check-ins/check-outs with photo proof, leave/sick declarations, and
//! duty-travel (SPPD) reports, persisted locally with best-effort sync to a
//! remote spreadsheet endpoint.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::LocalStore;
use services::{AdvisoryService, GeofenceService, SheetSync, StaffDirectory, SubmissionWorkflow};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: LocalStore,
    pub geofence: GeofenceService,
    pub directory: StaffDirectory,
    pub advisory: AdvisoryService,
    pub workflow: SubmissionWorkflow,
}

impl AppState {
    /// Wire up the full service graph from a config and a storage backend.
    pub fn new(config: Config, backend: Box<dyn db::StorageBackend>) -> Self {
        let store = LocalStore::new(backend, config.quota_policy, config.utc_offset_hours);
        let geofence = GeofenceService::new(
            config.school_latitude,
            config.school_longitude,
            config.geofence_radius_m,
        );
        let sync = SheetSync::new(config.sheet_sync_url.clone());
        let advisory = AdvisoryService::new(
            config.advisory_api_url.clone(),
            config.advisory_api_key.clone(),
        );
        let workflow = SubmissionWorkflow::new(
            store.clone(),
            geofence.clone(),
            sync,
            config.max_photo_bytes,
        );

        Self {
            config,
            store,
            geofence,
            directory: StaffDirectory::default(),
            advisory,
            workflow,
        }
    }

    pub fn with_directory(mut self, directory: StaffDirectory) -> Self {
        self.directory = directory;
        self
    }
}
