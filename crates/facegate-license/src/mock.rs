//! Mock license gate for testing and development.

use crate::error::{LicenseError, Result};
use crate::gate::LicenseGate;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct GateState {
    grantable: HashSet<String>,
    activated: HashSet<String>,
    unreachable: bool,
    added_blobs: Vec<String>,
    obtain_calls: usize,
    check_calls: usize,
}

/// Mock gate with a scripted grant set and call counters.
///
/// Components named in the grant set are activated when obtained; everything
/// else is refused (returns `false`). The gate can also be made unreachable
/// to exercise fault paths.
///
/// State is shared across clones, so a clone retained by a test keeps
/// observing counters after the gate is moved into the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockLicenseGate {
    state: Arc<Mutex<GateState>>,
}

impl MockLicenseGate {
    /// Gate that grants exactly the named components.
    pub fn granting(components: &[&str]) -> Self {
        let gate = Self::default();
        gate.lock().grantable = components.iter().map(|c| c.to_string()).collect();
        gate
    }

    /// Gate that grants nothing.
    pub fn denying() -> Self {
        Self::default()
    }

    /// Gate that errors on every call, as if the vendor library is gone.
    pub fn unreachable() -> Self {
        let gate = Self::default();
        gate.lock().unreachable = true;
        gate
    }

    /// Number of obtain calls observed.
    pub fn obtain_calls(&self) -> usize {
        self.lock().obtain_calls
    }

    /// Number of activation checks observed.
    pub fn check_calls(&self) -> usize {
        self.lock().check_calls
    }

    /// Number of license blobs registered.
    pub fn add_calls(&self) -> usize {
        self.lock().added_blobs.len()
    }

    /// Blobs registered so far, in order.
    pub fn added_blobs(&self) -> Vec<String> {
        self.lock().added_blobs.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GateState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn check_reachable(state: &GateState) -> Result<()> {
        if state.unreachable {
            return Err(LicenseError::gate_unavailable("mock gate unreachable"));
        }
        Ok(())
    }
}

impl LicenseGate for MockLicenseGate {
    async fn add_license(&mut self, content: &str) -> Result<()> {
        let mut state = self.lock();
        Self::check_reachable(&state)?;
        state.added_blobs.push(content.to_string());
        Ok(())
    }

    async fn obtain_components(
        &mut self,
        _scope: &str,
        _timeout_ms: u64,
        component: &str,
    ) -> Result<bool> {
        let mut state = self.lock();
        Self::check_reachable(&state)?;
        state.obtain_calls += 1;

        if state.grantable.contains(component) {
            state.activated.insert(component.to_string());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn is_component_activated(&self, component: &str) -> bool {
        let mut state = self.lock();
        state.check_calls += 1;
        state.activated.contains(component)
    }

    async fn release_components(&mut self, components: &[&str]) -> Result<()> {
        let mut state = self.lock();
        Self::check_reachable(&state)?;
        for component in components {
            state.activated.remove(*component);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_granting_gate_activates_named_components() {
        let mut gate = MockLicenseGate::granting(&["A", "B"]);

        assert!(gate.obtain_components("/local", 5000, "A").await.unwrap());
        assert!(!gate.obtain_components("/local", 5000, "C").await.unwrap());

        assert!(gate.is_component_activated("A"));
        assert!(!gate.is_component_activated("B")); // granted but never obtained
        assert!(!gate.is_component_activated("C"));
        assert_eq!(gate.obtain_calls(), 2);
        assert_eq!(gate.check_calls(), 3);
    }

    #[tokio::test]
    async fn test_release_clears_activation() {
        let mut gate = MockLicenseGate::granting(&["A"]);
        gate.obtain_components("/local", 5000, "A").await.unwrap();

        gate.release_components(&["A"]).await.unwrap();
        assert!(!gate.is_component_activated("A"));
    }

    #[tokio::test]
    async fn test_unreachable_gate_errors() {
        let mut gate = MockLicenseGate::unreachable();
        assert!(gate.add_license("blob").await.is_err());
        assert!(gate.obtain_components("/local", 5000, "A").await.is_err());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let observer = MockLicenseGate::granting(&["A"]);
        let mut moved = observer.clone();

        moved.obtain_components("/local", 5000, "A").await.unwrap();

        assert_eq!(observer.obtain_calls(), 1);
        assert!(observer.is_component_activated("A"));
    }
}
