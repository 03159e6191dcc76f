//! Per-attempt capture session records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use facegate_capture::CaptureStatus;

/// Terminal result of a single capture attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum AttemptResult {
    /// The backend returned a usable sample.
    Succeeded { quality: u8 },

    /// The backend completed with a non-OK status.
    Failed { status: String },

    /// The submit call itself errored.
    Faulted { detail: String },

    /// The run was stopped before the attempt finished.
    Cancelled,
}

/// Record of one capture attempt, kept for the current run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureAttempt {
    /// Monotonic attempt counter, never reset for the life of the coordinator.
    pub attempt_id: u64,

    /// Device index the attempt was submitted against.
    pub device_index: usize,

    /// When the attempt was submitted.
    pub started_at: DateTime<Utc>,

    /// Outcome, filled in when the attempt finishes.
    pub result: Option<AttemptResult>,
}

impl CaptureAttempt {
    /// Start a new attempt record.
    pub fn begin(attempt_id: u64, device_index: usize) -> Self {
        Self {
            attempt_id,
            device_index,
            started_at: Utc::now(),
            result: None,
        }
    }

    /// Record the attempt outcome.
    pub fn finish(&mut self, result: AttemptResult) {
        self.result = Some(result);
    }

    /// Whether the attempt ended with a usable sample.
    pub fn succeeded(&self) -> bool {
        matches!(self.result, Some(AttemptResult::Succeeded { .. }))
    }
}

impl AttemptResult {
    /// Build a failure result from a backend status.
    pub fn failed(status: &CaptureStatus) -> Self {
        AttemptResult::Failed {
            status: status.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_lifecycle() {
        let mut attempt = CaptureAttempt::begin(7, 0);
        assert_eq!(attempt.attempt_id, 7);
        assert!(attempt.result.is_none());
        assert!(!attempt.succeeded());

        attempt.finish(AttemptResult::Succeeded { quality: 82 });
        assert!(attempt.succeeded());
    }

    #[test]
    fn test_failed_result_carries_status_text() {
        let result = AttemptResult::failed(&CaptureStatus::BadObject);
        assert_eq!(
            result,
            AttemptResult::Failed {
                status: "BAD_OBJECT".to_string()
            }
        );
    }

    #[test]
    fn test_result_serialization() {
        let json = serde_json::to_string(&AttemptResult::Succeeded { quality: 60 }).unwrap();
        assert!(json.contains("\"result\":\"succeeded\""));
        assert!(json.contains("\"quality\":60"));
    }
}
