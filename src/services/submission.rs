// SPDX-License-Identifier: MIT

//! Submission workflow for attendance, absence and duty-travel records.
//!
//! The core flow:
//! 1. Re-read today's status and run the guards against the fresh snapshot
//! 2. Evaluate the geofence for presence submissions
//! 3. Construct the record (identity frozen by value, time-derived id)
//! 4. Append to the ledger, honoring the quota policy
//! 5. Merge-update the profile and fire the best-effort sheet sync
//!
//! Guard failures are user-input errors: nothing is persisted and the
//! caller keeps the draft, so a retry never re-enters fields.

use crate::db::store::{LedgerError, LocalStore};
use crate::models::record::MAX_TRAVEL_ATTACHMENTS;
use crate::models::{AttendanceRecord, ProfileUpdate, RecordKind, TravelDetails};
use crate::services::geofence::GeofenceService;
use crate::services::photo::{validate_photo, PhotoError};
use crate::services::sync::SheetSync;

/// An un-persisted submission, exactly as composed on the form.
#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    pub kind: RecordKind,
    pub staff_name: String,
    pub staff_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub photo: Option<String>,
    pub notes: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub travel: Option<TravelDetails>,
}

/// Why a submission was blocked. These are recoverable user-input errors;
/// every message states cause and next action.
#[derive(Debug, thiserror::Error)]
pub enum BlockReason {
    #[error("a {0} for today already exists")]
    DuplicateToday(RecordKind),

    #[error("staff name and staff ID are required")]
    MissingIdentity,

    #[error("a live photo and a detected location are required")]
    MissingProof,

    #[error("location could not be determined; move to open sky and retry")]
    UnknownLocation,

    #[error(
        "out of range: {distance} m from school, allowed radius is {radius} m; move closer and retry",
        distance = .distance_m.round(),
        radius = .radius_m
    )]
    OutOfRange { distance_m: f64, radius_m: f64 },

    #[error("a photo, a reason note, and a date range are required")]
    MissingAbsenceDetails,

    #[error("activity type and a result summary are required")]
    MissingTravelDetails,

    #[error("at most {MAX_TRAVEL_ATTACHMENTS} attachments are allowed")]
    TooManyAttachments,

    #[error("{0}")]
    InvalidPhoto(#[from] PhotoError),
}

/// Submission failures: `Blocked` halts before any write, `Storage` means
/// the append itself failed and retrying the same draft is safe.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("{0}")]
    Blocked(#[from] BlockReason),

    #[error(transparent)]
    Storage(#[from] LedgerError),
}

/// Orchestrates validation and persistence of one submission.
#[derive(Clone)]
pub struct SubmissionWorkflow {
    store: LocalStore,
    geofence: GeofenceService,
    sync: SheetSync,
    max_photo_bytes: usize,
}

impl SubmissionWorkflow {
    pub fn new(
        store: LocalStore,
        geofence: GeofenceService,
        sync: SheetSync,
        max_photo_bytes: usize,
    ) -> Self {
        Self {
            store,
            geofence,
            sync,
            max_photo_bytes,
        }
    }

    /// Run the full workflow. On success the record is in the ledger, the
    /// profile carries the submitted identity, and a sheet sync has been
    /// queued.
    pub async fn submit(
        &self,
        draft: SubmissionDraft,
    ) -> Result<AttendanceRecord, SubmissionError> {
        // Guards run against a status snapshot taken now, not at form-open
        // time, to close the window where the user lingers before hitting
        // submit.
        self.run_guards(&draft).await?;

        let record = self.build_record(&draft);

        tracing::info!(
            record_id = %record.id,
            kind = %record.kind,
            staff_id = %record.staff_id,
            "Appending record"
        );
        self.store.append(&record).await?;

        // The ledger write is the source of truth; a profile merge failure
        // after it is logged, not surfaced.
        let profile_update = ProfileUpdate {
            name: record.staff_name.clone(),
            staff_id: record.staff_id.clone(),
            photo: None,
            role: None,
        };
        if let Err(e) = self.store.save_profile(profile_update).await {
            tracing::warn!(error = %e, "Profile merge after append failed");
        }

        self.sync.spawn_sync(&record);

        Ok(record)
    }

    async fn run_guards(&self, draft: &SubmissionDraft) -> Result<(), SubmissionError> {
        if draft.staff_name.trim().is_empty() || draft.staff_id.trim().is_empty() {
            return Err(BlockReason::MissingIdentity.into());
        }

        // Same-day duplicate guard, re-checked immediately before the write.
        if draft.kind.requires_presence_proof() {
            let status = self.store.daily_status(draft.staff_id.trim()).await?;
            let duplicate = match draft.kind {
                RecordKind::CheckIn => status.has_checked_in,
                RecordKind::CheckOut => status.has_checked_out,
                _ => false,
            };
            if duplicate {
                return Err(BlockReason::DuplicateToday(draft.kind).into());
            }
        }

        if let Some(photo) = draft.photo.as_deref() {
            validate_photo(photo, self.max_photo_bytes).map_err(BlockReason::from)?;
        }

        match draft.kind {
            RecordKind::CheckIn | RecordKind::CheckOut => {
                let (Some(lat), Some(lng)) = (draft.latitude, draft.longitude) else {
                    return Err(BlockReason::MissingProof.into());
                };
                if draft.photo.is_none() {
                    return Err(BlockReason::MissingProof.into());
                }

                let verdict = self.geofence.evaluate(lat, lng);
                if verdict.is_unknown() {
                    return Err(BlockReason::UnknownLocation.into());
                }
                if !verdict.within_range {
                    return Err(BlockReason::OutOfRange {
                        distance_m: verdict.distance_m,
                        radius_m: self.geofence.radius_m(),
                    }
                    .into());
                }
            }
            RecordKind::Leave | RecordKind::Sick => {
                let has_note = draft.notes.as_deref().is_some_and(|n| !n.trim().is_empty());
                let has_range = draft.start_date.as_deref().is_some_and(|d| !d.is_empty())
                    && draft.end_date.as_deref().is_some_and(|d| !d.is_empty());
                if draft.photo.is_none() || !has_note || !has_range {
                    return Err(BlockReason::MissingAbsenceDetails.into());
                }
            }
            RecordKind::TravelReport => {
                let Some(travel) = draft.travel.as_ref() else {
                    return Err(BlockReason::MissingTravelDetails.into());
                };
                if travel.activity_type.trim().is_empty()
                    || travel.result_summary.trim().is_empty()
                {
                    return Err(BlockReason::MissingTravelDetails.into());
                }
                if travel.attachments.len() > MAX_TRAVEL_ATTACHMENTS {
                    return Err(BlockReason::TooManyAttachments.into());
                }
                for attachment in &travel.attachments {
                    validate_photo(attachment, self.max_photo_bytes)
                        .map_err(BlockReason::from)?;
                }
            }
        }

        Ok(())
    }

    /// Freeze the draft into a ledger record. Identity is copied by value;
    /// it never tracks later profile edits.
    fn build_record(&self, draft: &SubmissionDraft) -> AttendanceRecord {
        let now = chrono::Utc::now();
        let location_label = self.location_label(draft);

        AttendanceRecord {
            id: AttendanceRecord::derive_id(now),
            kind: draft.kind,
            timestamp: now.timestamp_millis(),
            latitude: draft.kind.requires_presence_proof().then(|| draft.latitude).flatten(),
            longitude: draft
                .kind
                .requires_presence_proof()
                .then(|| draft.longitude)
                .flatten(),
            location_label,
            photo: draft.photo.clone(),
            notes: draft.notes.clone(),
            start_date: draft.start_date.clone(),
            end_date: draft.end_date.clone(),
            staff_name: draft.staff_name.trim().to_string(),
            staff_id: draft.staff_id.trim().to_string(),
            travel: draft.travel.clone(),
        }
    }

    fn location_label(&self, draft: &SubmissionDraft) -> Option<String> {
        match draft.kind {
            RecordKind::CheckIn | RecordKind::CheckOut => {
                let (lat, lng) = (draft.latitude?, draft.longitude?);
                let verdict = self.geofence.evaluate(lat, lng);
                Some(format!(
                    "{:.5}, {:.5} ({} m from school)",
                    lat,
                    lng,
                    verdict.distance_m.round()
                ))
            }
            RecordKind::Leave | RecordKind::Sick => Some("Leave/sick declaration".to_string()),
            RecordKind::TravelReport => None,
        }
    }
}
