// SPDX-License-Identifier: MIT

//! Daily status projection over the record ledger.

use crate::models::record::{AttendanceRecord, RecordKind};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Whether the staff member has checked in/out during the current calendar
/// day. Recomputed on demand; never cached, because both the ledger and
/// "today" move underneath us.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyStatus {
    pub has_checked_in: bool,
    pub has_checked_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_out_time: Option<i64>,
}

/// Project today's status from records already filtered to the current
/// calendar day and staff member.
///
/// First match in stored (newest-first) order wins. The submission workflow
/// guarantees at most one CHECK_IN and one CHECK_OUT per day, so the
/// convention only matters for ledgers written outside the workflow.
pub fn project_daily_status(today_records: &[AttendanceRecord]) -> DailyStatus {
    let check_in = today_records
        .iter()
        .find(|r| r.kind == RecordKind::CheckIn);
    let check_out = today_records
        .iter()
        .find(|r| r.kind == RecordKind::CheckOut);

    DailyStatus {
        has_checked_in: check_in.is_some(),
        has_checked_out: check_out.is_some(),
        check_in_time: check_in.map(|r| r.timestamp),
        check_out_time: check_out.map(|r| r.timestamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: RecordKind, timestamp: i64) -> AttendanceRecord {
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
            staff_name: "HERNAWATI, S.Pd".to_string(),
            staff_id: "197800".to_string(),
            travel: None,
        }
    }

    #[test]
    fn test_empty_ledger_means_no_status() {
        let status = project_daily_status(&[]);
        assert!(!status.has_checked_in);
        assert!(!status.has_checked_out);
        assert!(status.check_in_time.is_none());
    }

    #[test]
    fn test_check_in_only() {
        let status = project_daily_status(&[record(RecordKind::CheckIn, 1_000)]);
        assert!(status.has_checked_in);
        assert!(!status.has_checked_out);
        assert_eq!(status.check_in_time, Some(1_000));
    }

    #[test]
    fn test_both_events_found_among_other_kinds() {
        let records = vec![
            record(RecordKind::CheckOut, 3_000),
            record(RecordKind::Leave, 2_500),
            record(RecordKind::CheckIn, 1_000),
        ];
        let status = project_daily_status(&records);
        assert!(status.has_checked_in);
        assert!(status.has_checked_out);
        assert_eq!(status.check_out_time, Some(3_000));
    }
}
