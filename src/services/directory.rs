// SPDX-License-Identifier: MIT

//! Staff directory: known names, roles and profile photos.
//!
//! Loaded once at startup from a JSON file. Backs login auto-fill; staff
//! missing from the file still get a usable default profile.

use crate::models::UserProfile;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_ROLE: &str = "Guru Kelas";

/// One known staff member.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffEntry {
    /// Official display name including titles
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    /// NIP/NUPTK, when known
    #[serde(default)]
    pub staff_id: Option<String>,
}

/// In-memory staff directory.
#[derive(Debug, Default, Clone)]
pub struct StaffDirectory {
    entries: Vec<StaffEntry>,
}

impl StaffDirectory {
    /// Load the directory from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let json_data = fs::read_to_string(path.as_ref())
            .map_err(|e| DirectoryError::IoError(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load the directory from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, DirectoryError> {
        let entries: Vec<StaffEntry> = serde_json::from_str(json_data)
            .map_err(|e| DirectoryError::ParseError(e.to_string()))?;
        tracing::info!(count = entries.len(), "Loaded staff directory");
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[StaffEntry] {
        &self.entries
    }

    /// Resolve a login username to a profile.
    ///
    /// Matching is case-insensitive: an entry matches when its official
    /// name contains the typed username. Unmatched users get the uppercased
    /// raw name and the default role, so login never fails on an unknown
    /// name.
    pub fn resolve(&self, username: &str) -> UserProfile {
        let needle = username.trim().to_lowercase();

        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.name.to_lowercase().contains(&needle))
        {
            UserProfile {
                name: entry.name.clone(),
                staff_id: entry.staff_id.clone().unwrap_or_default(),
                photo: entry.photo.clone(),
                role: Some(
                    entry
                        .role
                        .clone()
                        .unwrap_or_else(|| DEFAULT_ROLE.to_string()),
                ),
            }
        } else {
            UserProfile {
                name: username.trim().to_uppercase(),
                staff_id: String::new(),
                photo: None,
                role: Some(DEFAULT_ROLE.to_string()),
            }
        }
    }
}

/// Errors from directory loading.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse staff directory: {0}")]
    ParseError(String),
}
