// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod profile;
pub mod record;
pub mod status;

pub use profile::{ProfileUpdate, UserProfile};
pub use record::{AttendanceRecord, RecordKind, TravelDetails};
pub use status::DailyStatus;
