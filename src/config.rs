//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; handlers only ever see the parsed
//! `Config` struct through shared state.

use crate::db::store::QuotaPolicy;
use std::env;
use std::path::PathBuf;

/// Reference coordinate of the school site (geofence center).
pub const DEFAULT_SCHOOL_LATITUDE: f64 = -6.120984712911687;
pub const DEFAULT_SCHOOL_LONGITUDE: f64 = 106.22699260814291;
/// Geofence radius in meters.
pub const DEFAULT_GEOFENCE_RADIUS_M: f64 = 100.0;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Geofence center latitude
    pub school_latitude: f64,
    /// Geofence center longitude
    pub school_longitude: f64,
    /// Geofence radius in meters
    pub geofence_radius_m: f64,
    /// Directory holding the persisted key-value store
    pub data_dir: PathBuf,
    /// Path to the staff directory JSON file
    pub staff_directory_path: String,
    /// Shared login passcode for the school's staff
    pub login_passcode: String,
    /// Apps Script endpoint for best-effort spreadsheet sync (disabled if unset)
    pub sheet_sync_url: Option<String>,
    /// API key for the advisory text generator (fallback template if unset)
    pub advisory_api_key: Option<String>,
    /// Endpoint of the advisory text generator
    pub advisory_api_url: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// Fixed UTC offset in hours used for "calendar day" boundaries.
    /// The school runs on WIB (UTC+7) regardless of where the server sits.
    pub utc_offset_hours: i32,
    /// Maximum decoded size of an embedded photo, in bytes
    pub max_photo_bytes: usize,
    /// What to do when the record store hits its quota
    pub quota_policy: QuotaPolicy,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            school_latitude: DEFAULT_SCHOOL_LATITUDE,
            school_longitude: DEFAULT_SCHOOL_LONGITUDE,
            geofence_radius_m: DEFAULT_GEOFENCE_RADIUS_M,
            data_dir: PathBuf::from("./data/store"),
            staff_directory_path: "data/staff_directory.json".to_string(),
            login_passcode: "123456".to_string(),
            sheet_sync_url: None,
            advisory_api_key: None,
            advisory_api_url: "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            utc_offset_hours: 7,
            max_photo_bytes: 2 * 1024 * 1024,
            quota_policy: QuotaPolicy::Reject,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Config::default();

        Ok(Self {
            school_latitude: parse_var("SCHOOL_LATITUDE", defaults.school_latitude)?,
            school_longitude: parse_var("SCHOOL_LONGITUDE", defaults.school_longitude)?,
            geofence_radius_m: parse_var("GEOFENCE_RADIUS_M", defaults.geofence_radius_m)?,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            staff_directory_path: env::var("STAFF_DIRECTORY_PATH")
                .unwrap_or(defaults.staff_directory_path),
            login_passcode: env::var("LOGIN_PASSCODE")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("LOGIN_PASSCODE"))?,
            sheet_sync_url: env::var("SHEET_SYNC_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            advisory_api_key: env::var("ADVISORY_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            advisory_api_url: env::var("ADVISORY_API_URL").unwrap_or(defaults.advisory_api_url),
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            port: parse_var("PORT", defaults.port)?,
            utc_offset_hours: parse_var("UTC_OFFSET_HOURS", defaults.utc_offset_hours)?,
            max_photo_bytes: parse_var("MAX_PHOTO_BYTES", defaults.max_photo_bytes)?,
            quota_policy: quota_policy_from_env()?,
        })
    }

    /// Config suitable for tests: in-repo defaults, no remote endpoints.
    pub fn test_default() -> Self {
        Self::default()
    }
}

/// Parse an optional environment variable, falling back to a default.
fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Quota policy from `RECORD_QUOTA_POLICY` (`reject` or `trim`) plus
/// `RECORD_TRIM_KEEP` for the trim depth.
///
/// Trimming discards history on storage pressure, so it is opt-in; the
/// default refuses the write with an actionable message instead.
fn quota_policy_from_env() -> Result<QuotaPolicy, ConfigError> {
    match env::var("RECORD_QUOTA_POLICY") {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(QuotaPolicy::Reject),
            "trim" => Ok(QuotaPolicy::TrimHistory {
                keep: parse_var("RECORD_TRIM_KEEP", 10)?,
            }),
            _ => Err(ConfigError::Invalid("RECORD_QUOTA_POLICY")),
        },
        Err(_) => Ok(QuotaPolicy::Reject),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
