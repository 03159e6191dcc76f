//! License gate for the Facegate kiosk.
//!
//! The biometric engine is feature-gated by vendor licensing: face detection,
//! extraction, and matching are separate named components that must be
//! activated before the engine will perform them. This crate loads opaque
//! license blobs from a local directory, drives component activation through
//! the [`LicenseGate`] trait, and reports the result as a [`LicenseStatus`]
//! value.
//!
//! Licensing state is never held in process-global flags. Initialization
//! receives a gate, runs the activation sequence, and threads the resulting
//! status through to the caller, so tests can inject any outcome through
//! [`MockLicenseGate`].
//!
//! License failure is not transient: a denied status is surfaced as a fatal
//! setup error and is never retried automatically.

pub mod error;
pub mod face;
pub mod gate;
pub mod gates;
pub mod mock;
pub mod store;

pub use error::{LicenseError, Result};
pub use face::FaceLicenses;
pub use gate::{LicenseGate, LicenseStatus};
pub use gates::AnyLicenseGate;
pub use mock::MockLicenseGate;
pub use store::LicenseStore;
