// SPDX-License-Identifier: MIT

//! Shared helpers for timestamps and calendar-day arithmetic.
//!
//! Record timestamps are epoch milliseconds. "Today" is evaluated in the
//! school's fixed UTC offset, not the server's local zone.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

/// Current instant as epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Fixed offset for the school's time zone.
pub fn school_offset(offset_hours: i32) -> FixedOffset {
    FixedOffset::east_opt(offset_hours * 3600).unwrap_or_else(|| Utc.fix())
}

/// True if the two epoch-millisecond timestamps fall on the same calendar
/// day in the given offset.
pub fn same_local_day(a_ms: i64, b_ms: i64, offset_hours: i32) -> bool {
    let offset = school_offset(offset_hours);
    local_date(a_ms, offset) == local_date(b_ms, offset)
}

fn local_date(ts_ms: i64, offset: FixedOffset) -> Option<chrono::NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(ts_ms).map(|dt| dt.with_timezone(&offset).date_naive())
}
