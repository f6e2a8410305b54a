// SPDX-License-Identifier: MIT

//! Typed operations over the persisted key-value state.
//!
//! Provides high-level operations for:
//! - the record ledger (`records` key, JSON array, newest-first)
//! - the user profile (`user_profile` key)
//! - the session flag (`is_authenticated` key)
//!
//! All read-modify-write sequences run under one mutex so they behave as
//! atomic units within the process. There is no cross-process
//! compare-and-swap; duplicate prevention relies on the workflow re-checking
//! status immediately before the write.

use crate::db::backend::{StorageBackend, StoreError};
use crate::db::keys;
use crate::models::status::{project_daily_status, DailyStatus};
use crate::models::{AttendanceRecord, ProfileUpdate, UserProfile};
use crate::time_utils;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What `append` does when the backend reports a full store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaPolicy {
    /// Refuse the write and surface an actionable error. Default.
    Reject,
    /// Retry after discarding all but the `keep` most recent prior records;
    /// if still full, keep only the new record. Deliberate data-loss
    /// trade-off favoring the newest event, so it is explicit opt-in.
    TrimHistory { keep: usize },
}

/// Ledger append failures.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("storage full, clear old history")]
    StorageFull,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::QuotaExceeded => LedgerError::StorageFull,
            StoreError::Io(msg) => LedgerError::Storage(msg),
        }
    }
}

/// Handle to the persisted state. Cheap to clone; all clones share one
/// backend behind one lock.
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<Mutex<Box<dyn StorageBackend>>>,
    quota_policy: QuotaPolicy,
    utc_offset_hours: i32,
}

impl LocalStore {
    pub fn new(
        backend: Box<dyn StorageBackend>,
        quota_policy: QuotaPolicy,
        utc_offset_hours: i32,
    ) -> Self {
        Self {
            backend: Arc::new(Mutex::new(backend)),
            quota_policy,
            utc_offset_hours,
        }
    }

    // ─── Record Ledger ───────────────────────────────────────────

    /// All records, newest-first as stored. An absent or unparseable blob
    /// reads as an empty ledger.
    pub async fn list_all(&self) -> Result<Vec<AttendanceRecord>, LedgerError> {
        let backend = self.backend.lock().await;
        Ok(read_records(&**backend)?)
    }

    /// Records whose timestamp falls on today's calendar day, optionally
    /// filtered to one staff member. Unfiltered, this backs the "all staff
    /// today" recap view.
    pub async fn list_today(
        &self,
        staff_id: Option<&str>,
    ) -> Result<Vec<AttendanceRecord>, LedgerError> {
        let now = time_utils::now_ms();
        let records = self.list_all().await?;
        Ok(records
            .into_iter()
            .filter(|r| time_utils::same_local_day(r.timestamp, now, self.utc_offset_hours))
            .filter(|r| staff_id.is_none_or(|id| r.staff_id == id))
            .collect())
    }

    /// Project today's check-in/check-out status for one staff member.
    pub async fn daily_status(&self, staff_id: &str) -> Result<DailyStatus, LedgerError> {
        let today = self.list_today(Some(staff_id)).await?;
        Ok(project_daily_status(&today))
    }

    /// Prepend a record to the ledger (full read-modify-write).
    ///
    /// The new record is never silently dropped: a full store either fails
    /// with an actionable message or, under `TrimHistory`, discards old
    /// history to make room and logs what was discarded.
    pub async fn append(&self, record: &AttendanceRecord) -> Result<(), LedgerError> {
        let mut backend = self.backend.lock().await;

        let prior = read_records(&**backend)?;
        let mut updated = Vec::with_capacity(prior.len() + 1);
        updated.push(record.clone());
        updated.extend(prior.iter().cloned());

        match write_records(&mut **backend, &updated) {
            Ok(()) => Ok(()),
            Err(StoreError::QuotaExceeded) => match self.quota_policy {
                QuotaPolicy::Reject => {
                    tracing::warn!(
                        record_id = %record.id,
                        kind = %record.kind,
                        "Record store full; refusing write (policy: reject)"
                    );
                    Err(LedgerError::StorageFull)
                }
                QuotaPolicy::TrimHistory { keep } => {
                    self.append_with_trim(&mut **backend, record, prior, keep)
                }
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Quota recovery: retry with trimmed history, then newest-only.
    fn append_with_trim(
        &self,
        backend: &mut dyn StorageBackend,
        record: &AttendanceRecord,
        prior: Vec<AttendanceRecord>,
        keep: usize,
    ) -> Result<(), LedgerError> {
        tracing::warn!(
            record_id = %record.id,
            prior = prior.len(),
            keep,
            "Record store full; trimming old history"
        );

        let mut trimmed = Vec::with_capacity(keep + 1);
        trimmed.push(record.clone());
        trimmed.extend(prior.into_iter().take(keep));

        match write_records(backend, &trimmed) {
            Ok(()) => Ok(()),
            Err(StoreError::QuotaExceeded) => {
                tracing::warn!(
                    record_id = %record.id,
                    "Record store still full after trim; keeping only the new record"
                );
                write_records(backend, std::slice::from_ref(record)).map_err(Into::into)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Drop all history. The remediation action behind "storage full, clear
    /// old history".
    pub async fn clear_history(&self) -> Result<(), LedgerError> {
        let mut backend = self.backend.lock().await;
        backend.remove(keys::RECORDS)?;
        Ok(())
    }

    /// Wipe everything: history, profile, session.
    pub async fn clear_all(&self) -> Result<(), LedgerError> {
        let mut backend = self.backend.lock().await;
        backend.remove(keys::RECORDS)?;
        backend.remove(keys::USER_PROFILE)?;
        backend.remove(keys::IS_AUTHENTICATED)?;
        Ok(())
    }

    // ─── Profile ─────────────────────────────────────────────────

    pub async fn get_profile(&self) -> Result<Option<UserProfile>, LedgerError> {
        let backend = self.backend.lock().await;
        read_profile(&**backend)
    }

    /// Merge-update the stored profile. Identity fields replace the stored
    /// values; photo/role survive unless the update carries new ones.
    pub async fn save_profile(&self, update: ProfileUpdate) -> Result<UserProfile, LedgerError> {
        let mut backend = self.backend.lock().await;
        let current = read_profile(&**backend)?.unwrap_or_default();
        let merged = current.merged_with(update);
        let blob = serde_json::to_string(&merged)
            .map_err(|e| LedgerError::Storage(e.to_string()))?;
        backend.put(keys::USER_PROFILE, &blob)?;
        Ok(merged)
    }

    // ─── Session flag ────────────────────────────────────────────

    pub async fn is_authenticated(&self) -> Result<bool, LedgerError> {
        let backend = self.backend.lock().await;
        Ok(backend.get(keys::IS_AUTHENTICATED)?.as_deref() == Some("true"))
    }

    pub async fn set_authenticated(&self, value: bool) -> Result<(), LedgerError> {
        let mut backend = self.backend.lock().await;
        if value {
            backend.put(keys::IS_AUTHENTICATED, "true")?;
        } else {
            backend.remove(keys::IS_AUTHENTICATED)?;
        }
        Ok(())
    }
}

fn read_records(backend: &dyn StorageBackend) -> Result<Vec<AttendanceRecord>, StoreError> {
    match backend.get(keys::RECORDS)? {
        None => Ok(Vec::new()),
        Some(blob) => match serde_json::from_str(&blob) {
            Ok(records) => Ok(records),
            Err(e) => {
                // A corrupt blob reads as empty rather than wedging every
                // view; the next successful append replaces it.
                tracing::warn!(error = %e, "Record blob unparseable; treating ledger as empty");
                Ok(Vec::new())
            }
        },
    }
}

fn write_records(
    backend: &mut dyn StorageBackend,
    records: &[AttendanceRecord],
) -> Result<(), StoreError> {
    let blob = serde_json::to_string(records).map_err(|e| StoreError::Io(e.to_string()))?;
    backend.put(keys::RECORDS, &blob)
}

fn read_profile(backend: &dyn StorageBackend) -> Result<Option<UserProfile>, LedgerError> {
    match backend.get(keys::USER_PROFILE)? {
        None => Ok(None),
        Some(blob) => serde_json::from_str(&blob)
            .map(Some)
            .map_err(|e| LedgerError::Storage(e.to_string())),
    }
}
