//! License gate trait and activation status value.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use std::fmt;

/// Outcome of a licensing run, threaded through initialization as a value.
///
/// Holders decide what to do with a denial; this crate never retries one,
/// since license failure is not transient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseStatus {
    /// All required components are activated.
    Activated,

    /// Activation failed; the reason is user-presentable.
    Denied { reason: String },
}

impl LicenseStatus {
    /// Build a denied status.
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied {
            reason: reason.into(),
        }
    }

    /// Check whether licensing succeeded.
    pub fn is_activated(&self) -> bool {
        matches!(self, Self::Activated)
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activated => write!(f, "activated"),
            Self::Denied { reason } => write!(f, "denied: {}", reason),
        }
    }
}

/// Vendor licensing call surface.
///
/// Mirrors the shape of the vendor licensing API: license material is added
/// as opaque text blobs, then named components are obtained against a scope
/// with a per-component timeout. Activation state can be queried at any time
/// and components released when the application shuts down.
pub trait LicenseGate: Send + Sync {
    /// Register one opaque license blob with the gate.
    ///
    /// # Errors
    ///
    /// Returns an error if the gate rejects the blob or is unreachable.
    async fn add_license(&mut self, content: &str) -> Result<()>;

    /// Attempt to activate a named component.
    ///
    /// Returns whether the component was granted. A `false` here is a normal
    /// outcome (no suitable license present), not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the gate itself is unreachable.
    async fn obtain_components(
        &mut self,
        scope: &str,
        timeout_ms: u64,
        component: &str,
    ) -> Result<bool>;

    /// Check whether a component is currently activated.
    fn is_component_activated(&self, component: &str) -> bool;

    /// Release previously obtained components.
    ///
    /// # Errors
    ///
    /// Returns an error if the gate is unreachable.
    async fn release_components(&mut self, components: &[&str]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        assert!(LicenseStatus::Activated.is_activated());
        assert!(!LicenseStatus::denied("no license files").is_activated());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(LicenseStatus::Activated.to_string(), "activated");
        assert_eq!(
            LicenseStatus::denied("components not granted").to_string(),
            "denied: components not granted"
        );
    }
}
