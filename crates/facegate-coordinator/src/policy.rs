//! Retry policy for failed capture attempts.
//!
//! Each non-successful attempt outcome maps to a disposition: retry after a
//! status-specific delay, or suspend the run when the attempt budget is
//! exhausted. The delays are graduated so transient "no face in frame"
//! conditions poll faster than genuine device faults.

use std::time::Duration;

use facegate_capture::CaptureStatus;
use facegate_core::constants::{
    RETRY_DELAY_FAILURE_MS, RETRY_DELAY_FAULT_MS, RETRY_DELAY_NO_FACE_MS,
};

/// Graduated retry delays and an optional attempt budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay after a TIMEOUT or BAD_OBJECT outcome (no usable face in frame).
    pub no_sample_delay: Duration,

    /// Delay after any other non-OK status from the backend.
    pub failure_delay: Duration,

    /// Delay after a backend fault (the submit call itself errored).
    pub fault_delay: Duration,

    /// Maximum consecutive failed attempts in one run. `None` retries
    /// indefinitely.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            no_sample_delay: Duration::from_millis(RETRY_DELAY_NO_FACE_MS),
            failure_delay: Duration::from_millis(RETRY_DELAY_FAILURE_MS),
            fault_delay: Duration::from_millis(RETRY_DELAY_FAULT_MS),
            max_attempts: None,
        }
    }
}

/// What the coordinator should do after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptDisposition {
    /// Schedule another attempt after the given delay.
    Retry {
        delay: Duration,
        status_message: String,
    },

    /// The attempt budget is exhausted; stop the run.
    Suspend,
}

impl RetryPolicy {
    /// Create a policy with an attempt budget.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            ..Self::default()
        }
    }

    /// Decide the disposition after a non-OK backend status.
    ///
    /// `attempts_so_far` counts failed attempts in the current run including
    /// the one being classified.
    pub fn classify_status(
        &self,
        status: &CaptureStatus,
        attempts_so_far: u32,
    ) -> AttemptDisposition {
        if self.exhausted(attempts_so_far) {
            return AttemptDisposition::Suspend;
        }

        if status.is_no_sample() {
            AttemptDisposition::Retry {
                delay: self.no_sample_delay,
                status_message: facegate_core::constants::MSG_NO_FACE.to_string(),
            }
        } else {
            AttemptDisposition::Retry {
                delay: self.failure_delay,
                status_message: facegate_core::constants::MSG_CAPTURE_FAILED.to_string(),
            }
        }
    }

    /// Decide the disposition after the backend faulted outright.
    pub fn classify_fault(&self, attempts_so_far: u32) -> AttemptDisposition {
        if self.exhausted(attempts_so_far) {
            return AttemptDisposition::Suspend;
        }
        AttemptDisposition::Retry {
            delay: self.fault_delay,
            status_message: facegate_core::constants::MSG_CAPTURE_ERROR.to_string(),
        }
    }

    fn exhausted(&self, attempts_so_far: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempts_so_far >= max,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facegate_core::constants::{MSG_CAPTURE_ERROR, MSG_CAPTURE_FAILED, MSG_NO_FACE};

    #[test]
    fn test_no_sample_statuses_use_short_delay() {
        let policy = RetryPolicy::default();
        for status in [CaptureStatus::Timeout, CaptureStatus::BadObject] {
            match policy.classify_status(&status, 1) {
                AttemptDisposition::Retry {
                    delay,
                    status_message,
                } => {
                    assert_eq!(delay, Duration::from_millis(RETRY_DELAY_NO_FACE_MS));
                    assert_eq!(status_message, MSG_NO_FACE);
                }
                other => panic!("unexpected disposition: {:?}", other),
            }
        }
    }

    #[test]
    fn test_other_statuses_use_medium_delay() {
        let policy = RetryPolicy::default();
        let status = CaptureStatus::Other("MOTION_BLUR".to_string());
        match policy.classify_status(&status, 1) {
            AttemptDisposition::Retry {
                delay,
                status_message,
            } => {
                assert_eq!(delay, Duration::from_millis(RETRY_DELAY_FAILURE_MS));
                assert_eq!(status_message, MSG_CAPTURE_FAILED);
            }
            other => panic!("unexpected disposition: {:?}", other),
        }
    }

    #[test]
    fn test_fault_uses_long_delay() {
        let policy = RetryPolicy::default();
        match policy.classify_fault(1) {
            AttemptDisposition::Retry {
                delay,
                status_message,
            } => {
                assert_eq!(delay, Duration::from_millis(RETRY_DELAY_FAULT_MS));
                assert_eq!(status_message, MSG_CAPTURE_ERROR);
            }
            other => panic!("unexpected disposition: {:?}", other),
        }
    }

    #[test]
    fn test_unbounded_policy_never_suspends() {
        let policy = RetryPolicy::default();
        let disposition = policy.classify_status(&CaptureStatus::Timeout, 1_000_000);
        assert!(matches!(disposition, AttemptDisposition::Retry { .. }));
    }

    #[test]
    fn test_budget_exhaustion_suspends() {
        let policy = RetryPolicy::with_max_attempts(3);
        assert!(matches!(
            policy.classify_status(&CaptureStatus::Timeout, 2),
            AttemptDisposition::Retry { .. }
        ));
        assert_eq!(
            policy.classify_status(&CaptureStatus::Timeout, 3),
            AttemptDisposition::Suspend
        );
        assert_eq!(policy.classify_fault(3), AttemptDisposition::Suspend);
    }
}
