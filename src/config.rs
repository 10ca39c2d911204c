// src/config.rs

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Media types the user can toggle scanning for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Audio,
}

/// User settings as stored by the extension. Field names follow the stored
/// camelCase keys so a saved blob parses as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    #[serde(default = "default_dashboard_endpoint")]
    pub dashboard_endpoint: String,
    #[serde(default = "default_true")]
    pub auto_scan: bool,
    #[serde(default = "default_true")]
    pub notify_threats: bool,
    #[serde(default = "default_true")]
    pub scan_images: bool,
    #[serde(default = "default_true")]
    pub scan_videos: bool,
    #[serde(default)]
    pub scan_audio: bool,
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_true() -> bool { true }
fn default_api_endpoint() -> String { "http://localhost:8000/api".to_string() }
fn default_dashboard_endpoint() -> String { "http://localhost:8001/api".to_string() }
fn default_snapshot_path() -> PathBuf { PathBuf::from("mock/dashboard_summary.json") }
fn default_poll_interval_secs() -> u64 { 30 }
fn default_request_timeout_secs() -> u64 { 10 }

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_endpoint: default_api_endpoint(),
            dashboard_endpoint: default_dashboard_endpoint(),
            auto_scan: true,
            notify_threats: true,
            scan_images: true,
            scan_videos: true,
            scan_audio: false,
            snapshot_path: default_snapshot_path(),
            poll_interval_secs: default_poll_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Settings {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Defaults overridden by `SHIELD_*` environment variables. Unparseable
    /// numbers fall back to the default with a warning.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(key) = env::var("SHIELD_API_KEY") {
            settings.api_key = Some(key);
        }
        if let Ok(endpoint) = env::var("SHIELD_API_ENDPOINT") {
            settings.api_endpoint = endpoint;
        }
        if let Ok(endpoint) = env::var("SHIELD_DASHBOARD_ENDPOINT") {
            settings.dashboard_endpoint = endpoint;
        }
        if let Ok(path) = env::var("SHIELD_SNAPSHOT_PATH") {
            settings.snapshot_path = PathBuf::from(path);
        }
        if let Ok(raw) = env::var("SHIELD_POLL_INTERVAL_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => settings.poll_interval_secs = secs,
                _ => tracing::warn!("Ignoring invalid SHIELD_POLL_INTERVAL_SECS={}", raw),
            }
        }

        settings
    }

    pub fn allows(&self, media: MediaType) -> bool {
        match media {
            MediaType::Image => self.scan_images,
            MediaType::Video => self.scan_videos,
            MediaType::Audio => self.scan_audio,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_extension() {
        let settings = Settings::default();
        assert_eq!(settings.api_endpoint, "http://localhost:8000/api");
        assert!(settings.auto_scan);
        assert!(settings.allows(MediaType::Image));
        assert!(settings.allows(MediaType::Video));
        assert!(!settings.allows(MediaType::Audio));
        assert_eq!(settings.poll_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_stored_blob_parses() {
        let settings = Settings::from_json(
            r#"{"apiKey":"k-123","apiEndpoint":"http://10.0.0.2:5000/api","scanAudio":true,"autoScan":false}"#,
        )
        .unwrap();

        assert_eq!(settings.api_key.as_deref(), Some("k-123"));
        assert_eq!(settings.api_endpoint, "http://10.0.0.2:5000/api");
        assert!(!settings.auto_scan);
        assert!(settings.allows(MediaType::Audio));
        // Absent keys keep their defaults.
        assert!(settings.scan_images);
        assert_eq!(settings.dashboard_endpoint, "http://localhost:8001/api");
    }
}
