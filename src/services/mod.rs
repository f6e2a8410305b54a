// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod advisory;
pub mod directory;
pub mod geofence;
pub mod photo;
pub mod submission;
pub mod sync;

pub use advisory::AdvisoryService;
pub use directory::{DirectoryError, StaffDirectory};
pub use geofence::{GeofenceService, GeofenceVerdict};
pub use submission::{BlockReason, SubmissionDraft, SubmissionError, SubmissionWorkflow};
pub use sync::SheetSync;
