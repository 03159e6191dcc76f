//! Kiosk configuration file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use facegate_coordinator::RetryPolicy;
use facegate_core::constants::{
    DIALOG_AUTO_DISMISS_MS, RETRY_DELAY_FAILURE_MS, RETRY_DELAY_FAULT_MS, RETRY_DELAY_NO_FACE_MS,
};
use facegate_core::{Error, Result};

/// Runtime configuration, loaded from a JSON file.
///
/// Every field has a default matching the shipped kiosk tuning, and the file
/// only needs to name the fields it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KioskConfig {
    /// Retry delay after a "no face in frame" outcome, in milliseconds.
    pub retry_no_face_ms: u64,

    /// Retry delay after any other capture failure, in milliseconds.
    pub retry_failure_ms: u64,

    /// Retry delay after a backend fault, in milliseconds.
    pub retry_fault_ms: u64,

    /// Maximum failed attempts per capture run; absent means unbounded.
    pub max_attempts: Option<u32>,

    /// How long the success dialog stays visible, in milliseconds.
    pub dialog_dismiss_ms: u64,

    /// Directory holding opaque license blob files.
    pub license_dir: PathBuf,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            retry_no_face_ms: RETRY_DELAY_NO_FACE_MS,
            retry_failure_ms: RETRY_DELAY_FAILURE_MS,
            retry_fault_ms: RETRY_DELAY_FAULT_MS,
            max_attempts: None,
            dialog_dismiss_ms: DIALOG_AUTO_DISMISS_MS,
            license_dir: PathBuf::from("licenses"),
        }
    }
}

impl KioskConfig {
    /// Load the configuration from `path`.
    ///
    /// A missing file is not an error; the defaults apply. A file that exists
    /// but does not parse is a configuration error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a malformed file and [`Error::Io`] if an
    /// existing file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file; using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// The retry policy this configuration describes.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            no_sample_delay: Duration::from_millis(self.retry_no_face_ms),
            failure_delay: Duration::from_millis(self.retry_failure_ms),
            fault_delay: Duration::from_millis(self.retry_fault_ms),
            max_attempts: self.max_attempts,
        }
    }

    /// The success dialog duration this configuration describes.
    pub fn dialog_duration(&self) -> Duration {
        Duration::from_millis(self.dialog_dismiss_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = KioskConfig::load(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config, KioskConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facegate.json");
        std::fs::write(&path, r#"{"max_attempts": 5, "retry_no_face_ms": 250}"#).unwrap();

        let config = KioskConfig::load(&path).unwrap();
        assert_eq!(config.max_attempts, Some(5));
        assert_eq!(config.retry_no_face_ms, 250);
        assert_eq!(config.retry_failure_ms, RETRY_DELAY_FAILURE_MS);
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facegate.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(KioskConfig::load(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("facegate.json");
        std::fs::write(&path, r#"{"retry_nofail_ms": 250}"#).unwrap();

        assert!(KioskConfig::load(&path).is_err());
    }

    #[test]
    fn test_retry_policy_conversion() {
        let config = KioskConfig {
            max_attempts: Some(3),
            ..KioskConfig::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.no_sample_delay, Duration::from_millis(500));
        assert_eq!(policy.max_attempts, Some(3));
    }
}
