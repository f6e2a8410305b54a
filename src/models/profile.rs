// SPDX-License-Identifier: MIT

//! User profile model for storage and API.

use serde::{Deserialize, Serialize};

/// The device's current user. Created/overwritten on login, merge-updated
/// on every successful record submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name, including academic titles
    pub name: String,
    /// NIP/NUPTK staff identifier
    pub staff_id: String,
    /// Profile photo URL or data URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Role at the school (e.g. "Kepala Sekolah", "Guru Kelas")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A partial profile write. `name` and `staff_id` always replace the stored
/// values; `photo` and `role` only when supplied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub staff_id: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserProfile {
    /// Apply a merge-update: identity fields are replaced, photo/role are
    /// preserved unless the update carries new values.
    pub fn merged_with(mut self, update: ProfileUpdate) -> Self {
        self.name = update.name;
        self.staff_id = update.staff_id;
        if update.photo.is_some() {
            self.photo = update.photo;
        }
        if update.role.is_some() {
            self.role = update.role;
        }
        self
    }
}
