//! Observable coordinator state.
//!
//! [`CoordinatorState`] and [`DialogState`] are snapshots published over
//! `tokio::sync::watch`; UI layers render whatever the latest snapshot says
//! and never mutate coordinator internals directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use facegate_capture::FaceSample;
use facegate_core::QualitySignal;

/// Per-aspect detection feedback shown alongside the live preview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionFeedback {
    pub lighting: QualitySignal,
    pub distance: QualitySignal,
    pub position: QualitySignal,
    pub quality: QualitySignal,
}

impl DetectionFeedback {
    /// Feedback with every aspect marked good, published on success.
    pub fn all_good() -> Self {
        Self {
            lighting: QualitySignal::Good,
            distance: QualitySignal::Good,
            position: QualitySignal::Good,
            quality: QualitySignal::Good,
        }
    }

    pub fn is_all_good(&self) -> bool {
        self.lighting.is_good()
            && self.distance.is_good()
            && self.position.is_good()
            && self.quality.is_good()
    }
}

/// Snapshot of the coordinator as seen by UI layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorState {
    /// Human-readable status line.
    pub status_message: String,

    /// True exactly while a capture run is active.
    pub is_capturing: bool,

    /// Index into the device registry of the currently selected camera, if
    /// initialization discovered any.
    pub active_device_index: Option<usize>,

    /// Latest per-aspect detection feedback.
    pub feedback: DetectionFeedback,
}

impl Default for CoordinatorState {
    fn default() -> Self {
        Self {
            status_message: String::new(),
            is_capturing: false,
            active_device_index: None,
            feedback: DetectionFeedback::default(),
        }
    }
}

/// Which kind of dialog is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogKind {
    /// Success dialog; auto-dismisses and navigates back.
    FaceDetected,

    /// Informational dialog; stays until hidden explicitly.
    Info,
}

/// Modal dialog state published alongside [`CoordinatorState`].
#[derive(Debug, Clone, Default)]
pub enum DialogState {
    /// No dialog showing.
    #[default]
    Idle,

    /// A dialog is showing.
    Showing {
        kind: DialogKind,
        message: String,
        /// Captured sample for the success dialog preview.
        sample: Option<FaceSample>,
        shown_at: DateTime<Utc>,
    },
}

impl DialogState {
    /// Build a success dialog carrying the captured sample.
    pub fn face_detected(message: impl Into<String>, sample: FaceSample) -> Self {
        DialogState::Showing {
            kind: DialogKind::FaceDetected,
            message: message.into(),
            sample: Some(sample),
            shown_at: Utc::now(),
        }
    }

    /// Build an informational dialog.
    pub fn info(message: impl Into<String>) -> Self {
        DialogState::Showing {
            kind: DialogKind::Info,
            message: message.into(),
            sample: None,
            shown_at: Utc::now(),
        }
    }

    pub fn is_showing(&self) -> bool {
        matches!(self, DialogState::Showing { .. })
    }

    /// Whether the showing dialog is the auto-dismissing success kind.
    pub fn auto_dismisses(&self) -> bool {
        matches!(
            self,
            DialogState::Showing {
                kind: DialogKind::FaceDetected,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FaceSample {
        FaceSample::new(vec![0u8; 64], 8, 8, 70).unwrap()
    }

    #[test]
    fn test_default_state_is_idle() {
        let state = CoordinatorState::default();
        assert!(!state.is_capturing);
        assert!(state.active_device_index.is_none());
        assert!(!state.feedback.is_all_good());
    }

    #[test]
    fn test_all_good_feedback() {
        assert!(DetectionFeedback::all_good().is_all_good());
    }

    #[test]
    fn test_only_face_detected_dialog_auto_dismisses() {
        let success = DialogState::face_detected("Face Detected Successfully!", sample());
        assert!(success.is_showing());
        assert!(success.auto_dismisses());

        let info = DialogState::info("Only one camera available");
        assert!(info.is_showing());
        assert!(!info.auto_dismisses());

        assert!(!DialogState::Idle.is_showing());
        assert!(!DialogState::Idle.auto_dismisses());
    }
}
