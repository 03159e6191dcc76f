//! Error types for capture engine operations.
//!
//! These cover faults in the binding itself. A completed capture attempt that
//! did not find a usable face is reported through
//! [`CaptureStatus`](crate::traits::CaptureStatus), not through an error.

/// Result type alias for capture engine operations.
pub type Result<T> = std::result::Result<T, CaptureError>;

/// Errors that can occur while driving the capture engine binding.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The engine or device is not connected or has been disposed.
    #[error("Engine disconnected: {detail}")]
    Disconnected { detail: String },

    /// Engine initialization failed.
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// A device index outside the enumerated registry was requested.
    #[error("No capture device at index {index} (registry has {available})")]
    DeviceOutOfRange { index: usize, available: usize },

    /// The binding was used before `initialize()`.
    #[error("Engine not initialized")]
    NotInitialized,

    /// Invalid data produced by or handed to the binding.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic fault with custom message.
    #[error("{0}")]
    Other(String),
}

impl CaptureError {
    /// Create a new disconnected error.
    pub fn disconnected(detail: impl Into<String>) -> Self {
        Self::Disconnected {
            detail: detail.into(),
        }
    }

    /// Create a new initialization failed error.
    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a generic fault with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_error_display() {
        let error = CaptureError::disconnected("outcome channel closed");
        assert!(matches!(error, CaptureError::Disconnected { .. }));
        assert_eq!(
            error.to_string(),
            "Engine disconnected: outcome channel closed"
        );
    }

    #[test]
    fn test_device_out_of_range_display() {
        let error = CaptureError::DeviceOutOfRange {
            index: 3,
            available: 1,
        };
        assert_eq!(
            error.to_string(),
            "No capture device at index 3 (registry has 1)"
        );
    }

    #[test]
    fn test_error_display_does_not_panic() {
        let errors = vec![
            CaptureError::NotInitialized,
            CaptureError::initialization_failed("no native library"),
            CaptureError::invalid_data("zero-sized sample"),
            CaptureError::other("unexpected"),
        ];

        for error in errors {
            let _ = format!("{}", error);
            let _ = format!("{:?}", error);
        }
    }
}
