//! Capture engine abstraction for the Facegate kiosk.
//!
//! This crate defines the trait boundary between the capture coordinator and
//! the proprietary biometric engine that performs the actual face detection,
//! feature extraction, and matching. The engine is opaque: the coordinator
//! only ever constructs a capture request, submits it, and inspects the
//! resulting status. Everything behind that boundary is replaceable, which is
//! what makes the retry policy testable with a deterministic mock.
//!
//! # Design Philosophy
//!
//! - **Async-first**: all engine calls are `async fn` in traits (Rust 1.90 +
//!   Edition 2024 RPITIT); the blocking vendor call is assumed to be wrapped
//!   by the binding.
//! - **Status, not errors**: a capture attempt that completes but finds no
//!   usable face is a [`CaptureStatus`], not an `Err`. Errors are reserved
//!   for faults in the binding itself (disconnects, initialization failures).
//! - **Enum dispatch**: native async traits are not object-safe, so backends
//!   are dispatched through [`AnyCaptureBackend`](devices::AnyCaptureBackend)
//!   rather than `Box<dyn CaptureBackend>`.
//!
//! # Example
//!
//! ```no_run
//! use facegate_capture::traits::{CaptureBackend, CaptureRequest, CaptureStatus};
//! use facegate_capture::error::Result;
//!
//! async fn try_once<B: CaptureBackend>(backend: &mut B) -> Result<bool> {
//!     let outcome = backend.submit(CaptureRequest::capture_and_template()).await?;
//!     Ok(outcome.status == CaptureStatus::Ok)
//! }
//! ```

pub mod devices;
pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

pub use error::{CaptureError, Result};
pub use traits::{
    CaptureBackend, CaptureOperation, CaptureOutcome, CaptureRequest, CaptureStatus,
    MAX_SAMPLE_QUALITY,
};
pub use types::{BackendConfig, DeviceDescriptor, DeviceRegistry, FaceSample};

pub use devices::AnyCaptureBackend;
pub use mock::{MockCaptureBackend, MockCaptureHandle};
