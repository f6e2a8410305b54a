// SPDX-License-Identifier: MIT

//! Attendance record model for storage and API.

use serde::{Deserialize, Serialize};

/// Event kind of a ledger record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    CheckIn,
    CheckOut,
    Leave,
    Sick,
    TravelReport,
}

impl RecordKind {
    /// Kinds that require a live photo and a captured coordinate.
    pub fn requires_presence_proof(self) -> bool {
        matches!(self, RecordKind::CheckIn | RecordKind::CheckOut)
    }

    /// Kinds that cover a date range instead of a single instant.
    pub fn is_absence(self) -> bool {
        matches!(self, RecordKind::Leave | RecordKind::Sick)
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RecordKind::CheckIn => "check-in",
            RecordKind::CheckOut => "check-out",
            RecordKind::Leave => "leave",
            RecordKind::Sick => "sick",
            RecordKind::TravelReport => "travel report",
        };
        f.write_str(label)
    }
}

/// A single ledger entry. Immutable once appended; the ledger is only ever
/// replaced wholesale or trimmed under storage pressure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Unique time-derived ID, assigned at creation
    pub id: String,
    pub kind: RecordKind,
    /// Creation instant, epoch milliseconds
    pub timestamp: i64,
    /// Captured coordinate (CHECK_IN/CHECK_OUT only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Human-readable location description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_label: Option<String>,
    /// Embedded compressed image (base64 data URL), proof of presence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Covered period (LEAVE/SICK/TRAVEL_REPORT), ISO dates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Identity frozen at submission time, never updated retroactively
    pub staff_name: String,
    pub staff_id: String,
    /// Duty-travel fields (TRAVEL_REPORT only)
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub travel: Option<TravelDetails>,
}

/// Extra fields carried by TRAVEL_REPORT (SPPD) records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelDetails {
    pub destination: String,
    pub activity_type: String,
    /// Free-text result summary, optionally pre-filled by the advisory
    /// generator
    pub result_summary: String,
    /// Up to four supporting images (base64 data URLs)
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// Maximum number of attachments on a travel report.
pub const MAX_TRAVEL_ATTACHMENTS: usize = 4;

impl AttendanceRecord {
    /// Derive a time-based record ID. Microsecond resolution keeps ids
    /// unique for any humanly possible submission rate.
    pub fn derive_id(now: chrono::DateTime<chrono::Utc>) -> String {
        now.timestamp_micros().to_string()
    }
}
