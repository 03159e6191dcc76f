//! Face component activation sequence.

use crate::error::Result;
use crate::gate::{LicenseGate, LicenseStatus};
use crate::store::LicenseStore;
use facegate_core::constants::{
    LICENSE_FACE_DETECTION, LICENSE_FACE_EXTRACTION, LICENSE_FACE_MATCHING,
    LICENSE_OBTAIN_TIMEOUT_MS, LICENSE_SCOPE_LOCAL,
};
use tracing::{debug, warn};

/// The three face components the kiosk needs.
///
/// Detection is requested alongside extraction and matching, but activation
/// is judged on extraction + matching: detection is bundled with extraction
/// in every license the vendor issues.
pub const FACE_COMPONENTS: [&str; 3] = [
    LICENSE_FACE_DETECTION,
    LICENSE_FACE_EXTRACTION,
    LICENSE_FACE_MATCHING,
];

/// Drives face license activation against any [`LicenseGate`].
pub struct FaceLicenses;

impl FaceLicenses {
    /// Run the activation sequence and report the outcome as a value.
    ///
    /// Already-activated gates are left alone. Otherwise every stored blob
    /// is registered, then each component is obtained individually; a
    /// component that fails to obtain is logged and skipped, and the final
    /// verdict comes from re-querying activation state.
    ///
    /// # Errors
    ///
    /// Returns an error only if the gate itself becomes unreachable.
    /// "No license granted" is a [`LicenseStatus::Denied`], not an error.
    pub async fn activate<G: LicenseGate>(
        gate: &mut G,
        store: &LicenseStore,
    ) -> Result<LicenseStatus> {
        if gate.is_component_activated(LICENSE_FACE_EXTRACTION)
            && gate.is_component_activated(LICENSE_FACE_MATCHING)
        {
            debug!("Face components already activated");
            return Ok(LicenseStatus::Activated);
        }

        for blob in store.blobs() {
            if let Err(e) = gate.add_license(blob).await {
                warn!(error = %e, "Failed to register license blob");
            }
        }

        for component in FACE_COMPONENTS {
            let granted = gate
                .obtain_components(LICENSE_SCOPE_LOCAL, LICENSE_OBTAIN_TIMEOUT_MS, component)
                .await?;
            debug!(component, granted, "Component activation");
        }

        if gate.is_component_activated(LICENSE_FACE_EXTRACTION)
            && gate.is_component_activated(LICENSE_FACE_MATCHING)
        {
            Ok(LicenseStatus::Activated)
        } else {
            Ok(LicenseStatus::denied(
                "Face extraction/matching components not granted",
            ))
        }
    }

    /// Release all face components.
    ///
    /// # Errors
    ///
    /// Returns an error if the gate is unreachable.
    pub async fn release<G: LicenseGate>(gate: &mut G) -> Result<()> {
        gate.release_components(&FACE_COMPONENTS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockLicenseGate;

    #[tokio::test]
    async fn test_activation_grants_components() {
        let mut gate = MockLicenseGate::granting(&FACE_COMPONENTS);
        let store = LicenseStore::new();

        let status = FaceLicenses::activate(&mut gate, &store).await.unwrap();
        assert!(status.is_activated());
        assert_eq!(gate.obtain_calls(), 3);
    }

    #[tokio::test]
    async fn test_activation_denied_when_nothing_granted() {
        let mut gate = MockLicenseGate::denying();
        let store = LicenseStore::new();

        let status = FaceLicenses::activate(&mut gate, &store).await.unwrap();
        assert!(!status.is_activated());
    }

    #[tokio::test]
    async fn test_already_activated_gate_is_left_alone() {
        let mut gate = MockLicenseGate::granting(&FACE_COMPONENTS);
        let store = LicenseStore::new();

        FaceLicenses::activate(&mut gate, &store).await.unwrap();
        let calls_after_first = gate.obtain_calls();

        let status = FaceLicenses::activate(&mut gate, &store).await.unwrap();
        assert!(status.is_activated());
        assert_eq!(gate.obtain_calls(), calls_after_first);
    }

    #[tokio::test]
    async fn test_detection_only_grant_is_denied() {
        // Matching missing: the verdict keys on extraction + matching.
        let mut gate = MockLicenseGate::granting(&[LICENSE_FACE_DETECTION]);
        let store = LicenseStore::new();

        let status = FaceLicenses::activate(&mut gate, &store).await.unwrap();
        assert!(!status.is_activated());
    }

    #[tokio::test]
    async fn test_blobs_are_registered_before_obtaining() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("site.lic"), "opaque").unwrap();
        let store = LicenseStore::load_dir(dir.path()).unwrap();

        let mut gate = MockLicenseGate::granting(&FACE_COMPONENTS);
        FaceLicenses::activate(&mut gate, &store).await.unwrap();

        assert_eq!(gate.add_calls(), 1);
    }

    #[tokio::test]
    async fn test_release_names_all_components() {
        let mut gate = MockLicenseGate::granting(&FACE_COMPONENTS);
        let store = LicenseStore::new();
        FaceLicenses::activate(&mut gate, &store).await.unwrap();

        FaceLicenses::release(&mut gate).await.unwrap();
        for component in FACE_COMPONENTS {
            assert!(!gate.is_component_activated(component));
        }
    }
}
