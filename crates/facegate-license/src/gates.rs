//! Enum wrapper for license gate dispatch.
//!
//! Native `async fn` in traits (RPITIT, Edition 2024) are not object-safe,
//! so `Box<dyn LicenseGate>` is not available. The enum wrapper provides
//! concrete dispatch at compile time, the same pattern used for every device
//! family in this workspace.

use crate::error::Result;
use crate::gate::LicenseGate;
use crate::mock::MockLicenseGate;

/// Enum wrapper for license gate dispatch.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyLicenseGate {
    /// Mock gate for development and testing.
    Mock(MockLicenseGate),
    // Vendor FFI binding variant goes here once a native build exists.
}

impl LicenseGate for AnyLicenseGate {
    async fn add_license(&mut self, content: &str) -> Result<()> {
        match self {
            Self::Mock(gate) => gate.add_license(content).await,
        }
    }

    async fn obtain_components(
        &mut self,
        scope: &str,
        timeout_ms: u64,
        component: &str,
    ) -> Result<bool> {
        match self {
            Self::Mock(gate) => gate.obtain_components(scope, timeout_ms, component).await,
        }
    }

    fn is_component_activated(&self, component: &str) -> bool {
        match self {
            Self::Mock(gate) => gate.is_component_activated(component),
        }
    }

    async fn release_components(&mut self, components: &[&str]) -> Result<()> {
        match self {
            Self::Mock(gate) => gate.release_components(components).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enum_dispatch_forwards_to_mock() {
        let mock = MockLicenseGate::granting(&["A"]);
        let mut any_gate = AnyLicenseGate::Mock(mock.clone());

        assert!(any_gate.obtain_components("/local", 5000, "A").await.unwrap());
        assert!(any_gate.is_component_activated("A"));
        assert_eq!(mock.obtain_calls(), 1);
    }
}
