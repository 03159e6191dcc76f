//! Capture engine trait definitions.
//!
//! The [`CaptureBackend`] trait is the seam between the coordinator and the
//! vendor binding. It deliberately mirrors the shape of the vendor task API:
//! build a request naming the operations to perform, submit it, inspect the
//! returned status. The backend owns the device handle; the coordinator is
//! its single caller and never submits two requests concurrently.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{BackendConfig, DeviceDescriptor, FaceSample};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum sample quality score (scores range 0 to MAX_SAMPLE_QUALITY).
pub const MAX_SAMPLE_QUALITY: u8 = 100;

/// Operations a capture request can ask the engine to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CaptureOperation {
    /// Acquire a sample from the active device.
    Capture,

    /// Derive a biometric template from the captured sample.
    CreateTemplate,
}

/// One request-response cycle against the capture engine.
///
/// The kiosk flow always asks for capture and template derivation in a
/// single operation; [`CaptureRequest::capture_and_template`] builds that
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Operations to perform, in order.
    pub operations: Vec<CaptureOperation>,
}

impl CaptureRequest {
    /// Build the standard kiosk request: capture a sample and derive its
    /// template in one engine task.
    pub fn capture_and_template() -> Self {
        Self {
            operations: vec![CaptureOperation::Capture, CaptureOperation::CreateTemplate],
        }
    }

    /// Build a capture-only request.
    pub fn capture_only() -> Self {
        Self {
            operations: vec![CaptureOperation::Capture],
        }
    }
}

/// Terminal status of a completed capture task.
///
/// The engine never reports intermediate progress; a submitted task runs to
/// completion and lands on exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CaptureStatus {
    /// A usable sample was captured and the requested template derived.
    Ok,

    /// The engine gave up waiting for a usable sample.
    Timeout,

    /// Something was in view but no usable sample could be extracted.
    BadObject,

    /// The task was cancelled before completion.
    Cancelled,

    /// Any other vendor status, carried verbatim.
    Other(String),
}

impl CaptureStatus {
    /// True when the status means "almost succeeded, try again right away":
    /// the engine ran normally but produced no usable sample.
    pub fn is_no_sample(&self) -> bool {
        matches!(self, Self::Timeout | Self::BadObject)
    }

    /// True only for a successful capture.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for CaptureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::BadObject => write!(f, "BAD_OBJECT"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Other(code) => write!(f, "{}", code),
        }
    }
}

/// Result of a completed capture task: the terminal status plus the sample,
/// when one was produced.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    /// Terminal task status.
    pub status: CaptureStatus,

    /// Captured sample; present only for successful captures, and even then
    /// the binding may fail to convert it (in which case the status is still
    /// [`CaptureStatus::Ok`] with no sample attached).
    pub sample: Option<FaceSample>,
}

impl CaptureOutcome {
    /// Build a successful outcome carrying a sample.
    pub fn ok(sample: FaceSample) -> Self {
        Self {
            status: CaptureStatus::Ok,
            sample: Some(sample),
        }
    }

    /// Build a non-success outcome with no sample.
    pub fn status(status: CaptureStatus) -> Self {
        Self {
            status,
            sample: None,
        }
    }
}

/// Capture engine binding abstraction.
///
/// Implementations wrap a concrete biometric engine. The trait is consumed
/// generically or through [`AnyCaptureBackend`](crate::devices::AnyCaptureBackend)
/// (native async traits are not object-safe).
///
/// # Calling discipline
///
/// The coordinator is the single owner of a backend. `submit` is awaited to
/// completion before another request is issued; `cancel` is best-effort and
/// may be observed by an in-flight task as [`CaptureStatus::Cancelled`].
pub trait CaptureBackend: Send + Sync {
    /// Initialize the engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine or its native library cannot be
    /// brought up. This is a fatal setup failure; callers should not retry.
    async fn initialize(&mut self, config: &BackendConfig) -> Result<()>;

    /// Enumerate the capture devices currently visible to the engine.
    ///
    /// The returned order is stable for the lifetime of the engine and is
    /// the order device indices refer to.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized or device discovery
    /// fails. An empty list is not an error at this level; the caller
    /// decides whether that is fatal.
    async fn enumerate_devices(&mut self) -> Result<Vec<DeviceDescriptor>>;

    /// Select the device subsequent captures will use.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::DeviceOutOfRange`](crate::error::CaptureError::DeviceOutOfRange)
    /// if `index` is outside the enumerated registry.
    async fn select_device(&mut self, index: usize) -> Result<()>;

    /// Submit a capture task and wait for its terminal status.
    ///
    /// This call suspends for as long as the engine works on the task; no
    /// independent timeout is imposed here. Timeout detection is the
    /// engine's job and arrives as [`CaptureStatus::Timeout`].
    ///
    /// # Errors
    ///
    /// Returns an error only for faults in the binding itself (disconnect,
    /// disposed engine). Non-success task results are statuses, not errors.
    async fn submit(&mut self, request: CaptureRequest) -> Result<CaptureOutcome>;

    /// Best-effort cancellation of the in-flight task, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is unreachable.
    async fn cancel(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_and_template_request() {
        let request = CaptureRequest::capture_and_template();
        assert_eq!(
            request.operations,
            vec![CaptureOperation::Capture, CaptureOperation::CreateTemplate]
        );
    }

    #[test]
    fn test_capture_only_request() {
        let request = CaptureRequest::capture_only();
        assert_eq!(request.operations, vec![CaptureOperation::Capture]);
    }

    #[test]
    fn test_status_no_sample_classification() {
        assert!(CaptureStatus::Timeout.is_no_sample());
        assert!(CaptureStatus::BadObject.is_no_sample());
        assert!(!CaptureStatus::Ok.is_no_sample());
        assert!(!CaptureStatus::Cancelled.is_no_sample());
        assert!(!CaptureStatus::Other("INTERNAL_ERROR".into()).is_no_sample());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(CaptureStatus::Ok.to_string(), "OK");
        assert_eq!(CaptureStatus::Timeout.to_string(), "TIMEOUT");
        assert_eq!(CaptureStatus::BadObject.to_string(), "BAD_OBJECT");
        assert_eq!(
            CaptureStatus::Other("MOTION_BLUR".into()).to_string(),
            "MOTION_BLUR"
        );
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&CaptureStatus::BadObject).unwrap();
        assert_eq!(json, "\"bad_object\"");
        let back: CaptureStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CaptureStatus::BadObject);
    }

    #[test]
    fn test_outcome_constructors() {
        let outcome = CaptureOutcome::status(CaptureStatus::Timeout);
        assert_eq!(outcome.status, CaptureStatus::Timeout);
        assert!(outcome.sample.is_none());
    }
}
