//! Core behavior constants for the Facegate kiosk.
//!
//! This module centralizes the timing policy and user-facing status strings
//! shared by the capture coordinator, the license gate, and the kiosk shell.
//! Keeping them in one place makes the retry policy auditable and lets tests
//! assert on the exact messages the presentation layer will observe.
//!
//! # Retry timing
//!
//! The capture loop distinguishes three grades of non-success and pauses a
//! different amount of time before re-issuing the capture request:
//!
//! | Outcome | Delay | Meaning |
//! |---------|-------|---------|
//! | Timeout / bad object | [`RETRY_DELAY_NO_FACE_MS`] | Almost succeeded, retry quickly |
//! | Other non-success status | [`RETRY_DELAY_FAILURE_MS`] | Something went wrong |
//! | Backend fault | [`RETRY_DELAY_FAULT_MS`] | Avoid a hot failure loop |
//!
//! Modifying these values changes observable kiosk behavior; the defaults in
//! `RetryPolicy` and `KioskConfig` are derived from them.

// ============================================================================
// Retry timing
// ============================================================================

/// Delay before retrying after a timeout or "no usable sample" status, in
/// milliseconds.
pub const RETRY_DELAY_NO_FACE_MS: u64 = 500;

/// Delay before retrying after any other non-success status, in milliseconds.
pub const RETRY_DELAY_FAILURE_MS: u64 = 800;

/// Delay before retrying after a backend fault (the capture call itself
/// failed), in milliseconds.
pub const RETRY_DELAY_FAULT_MS: u64 = 1000;

// ============================================================================
// Dialog timing
// ============================================================================

/// How long the success dialog stays visible before it auto-dismisses and
/// navigation returns to the previous screen, in milliseconds.
pub const DIALOG_AUTO_DISMISS_MS: u64 = 5000;

// ============================================================================
// Licensing
// ============================================================================

/// License scope passed to the gate when obtaining components.
pub const LICENSE_SCOPE_LOCAL: &str = "/local";

/// Timeout for a single component activation attempt, in milliseconds.
pub const LICENSE_OBTAIN_TIMEOUT_MS: u64 = 5000;

/// Face detection license component.
pub const LICENSE_FACE_DETECTION: &str = "Biometrics.FaceDetection";

/// Face feature extraction license component.
pub const LICENSE_FACE_EXTRACTION: &str = "Biometrics.FaceExtraction";

/// Face matching license component.
pub const LICENSE_FACE_MATCHING: &str = "Biometrics.FaceMatching";

// ============================================================================
// Status messages
// ============================================================================

/// Published while a capture attempt is running.
pub const MSG_DETECTING: &str = "Detecting face...";

/// Published after a timeout or bad-object status.
pub const MSG_NO_FACE: &str = "No face detected. Please position your face...";

/// Published after any other non-success status.
pub const MSG_CAPTURE_FAILED: &str = "Capture failed. Retrying...";

/// Published after a backend fault.
pub const MSG_CAPTURE_ERROR: &str = "Capture error. Retrying...";

/// Published when a capture attempt succeeds.
pub const MSG_CAPTURE_SUCCESS: &str = "Face captured successfully!";

/// Published when initialization finds no capture devices. Fatal until reset.
pub const MSG_NO_CAMERA: &str = "No camera found";

/// Published once initialization completes and the capture loop is starting.
pub const MSG_READY: &str = "Ready. Position your face...";

/// Published when a device toggle is requested with a single registered
/// device.
pub const MSG_ONLY_ONE_CAMERA: &str = "Only one camera available";

/// Published when the configured attempt budget is exhausted.
pub const MSG_CAPTURE_SUSPENDED: &str = "Capture suspended. Tap to try again...";

/// Message carried by the success dialog.
pub const MSG_DIALOG_FACE_DETECTED: &str = "Face Detected Successfully!";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_delays_are_graduated() {
        assert!(RETRY_DELAY_NO_FACE_MS < RETRY_DELAY_FAILURE_MS);
        assert!(RETRY_DELAY_FAILURE_MS < RETRY_DELAY_FAULT_MS);
    }

    #[test]
    fn test_messages_are_non_empty() {
        for msg in [
            MSG_DETECTING,
            MSG_NO_FACE,
            MSG_CAPTURE_FAILED,
            MSG_CAPTURE_ERROR,
            MSG_CAPTURE_SUCCESS,
            MSG_NO_CAMERA,
            MSG_READY,
            MSG_ONLY_ONE_CAMERA,
            MSG_CAPTURE_SUSPENDED,
            MSG_DIALOG_FACE_DETECTED,
        ] {
            assert!(!msg.is_empty());
        }
    }
}
