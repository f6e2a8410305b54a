// SPDX-License-Identifier: MIT

//! Best-effort spreadsheet sync.
//!
//! After a record is persisted locally, a copy is POSTed to a preconfigured
//! Apps Script endpoint. Fire-and-forget: runs on a detached task, outcome
//! is logged and never surfaced, and the local write does not depend on it.

use crate::models::AttendanceRecord;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the remote spreadsheet endpoint.
#[derive(Clone)]
pub struct SheetSync {
    http: reqwest::Client,
    endpoint: Option<String>,
}

impl SheetSync {
    /// `endpoint = None` disables sync entirely (offline-only deployment).
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Queue a record for sync on a detached task. Returns immediately.
    pub fn spawn_sync(&self, record: &AttendanceRecord) {
        let Some(endpoint) = self.endpoint.clone() else {
            return;
        };
        let http = self.http.clone();
        let record = record.clone();

        tokio::spawn(async move {
            if let Err(e) = send_record(&http, &endpoint, &record).await {
                tracing::warn!(
                    record_id = %record.id,
                    kind = %record.kind,
                    error = %e,
                    "Sheet sync failed; record remains local-only"
                );
            } else {
                tracing::debug!(record_id = %record.id, "Record synced to sheet");
            }
        });
    }
}

/// POST the record JSON plus the `action` discriminator the script expects.
/// Body goes out as `text/plain` because Apps Script web apps reject
/// preflighted content types.
async fn send_record(
    http: &reqwest::Client,
    endpoint: &str,
    record: &AttendanceRecord,
) -> Result<(), anyhow::Error> {
    let payload = sync_payload(record)?;

    http.post(endpoint)
        .timeout(REQUEST_TIMEOUT)
        .header("Content-Type", "text/plain;charset=utf-8")
        .body(payload)
        .send()
        .await?
        .error_for_status()?;

    Ok(())
}

fn sync_payload(record: &AttendanceRecord) -> Result<String, anyhow::Error> {
    let mut value = serde_json::to_value(record)?;
    let Some(map) = value.as_object_mut() else {
        anyhow::bail!("record did not serialize to an object");
    };
    map.insert(
        "action".to_string(),
        serde_json::Value::String("save_record".to_string()),
    );
    Ok(serde_json::to_string(&value)?)
}
