//! Error types for licensing operations.

/// Result type alias for licensing operations.
pub type Result<T> = std::result::Result<T, LicenseError>;

/// Errors that can occur while loading or activating licenses.
#[derive(Debug, thiserror::Error)]
pub enum LicenseError {
    /// The licensing backend is unreachable or has been disposed.
    #[error("License gate unavailable: {detail}")]
    GateUnavailable { detail: String },

    /// A license blob was rejected by the gate.
    #[error("License rejected: {message}")]
    Rejected { message: String },

    /// Generic I/O error while reading license material.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LicenseError {
    /// Create a new gate-unavailable error.
    pub fn gate_unavailable(detail: impl Into<String>) -> Self {
        Self::GateUnavailable {
            detail: detail.into(),
        }
    }

    /// Create a new rejected error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}
