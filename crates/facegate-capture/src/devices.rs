//! Enum wrapper for capture backend dispatch.
//!
//! Native `async fn` in traits (RPITIT, Edition 2024) are not object-safe,
//! so `Box<dyn CaptureBackend>` is not available. The enum wrapper provides
//! concrete dispatch at compile time, the same pattern used for every device
//! family in this workspace.

use crate::error::Result;
use crate::mock::MockCaptureBackend;
use crate::traits::{CaptureBackend, CaptureOutcome, CaptureRequest};
use crate::types::{BackendConfig, DeviceDescriptor};

/// Enum wrapper for capture backend dispatch.
///
/// # Examples
///
/// ```
/// use facegate_capture::devices::AnyCaptureBackend;
/// use facegate_capture::mock::MockCaptureBackend;
///
/// let (backend, _handle) = MockCaptureBackend::new();
/// let any_backend = AnyCaptureBackend::Mock(backend);
/// ```
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyCaptureBackend {
    /// Mock engine for development and testing.
    Mock(MockCaptureBackend),
    // Vendor FFI binding variant goes here once a native build exists.
}

impl CaptureBackend for AnyCaptureBackend {
    async fn initialize(&mut self, config: &BackendConfig) -> Result<()> {
        match self {
            Self::Mock(backend) => backend.initialize(config).await,
        }
    }

    async fn enumerate_devices(&mut self) -> Result<Vec<DeviceDescriptor>> {
        match self {
            Self::Mock(backend) => backend.enumerate_devices().await,
        }
    }

    async fn select_device(&mut self, index: usize) -> Result<()> {
        match self {
            Self::Mock(backend) => backend.select_device(index).await,
        }
    }

    async fn submit(&mut self, request: CaptureRequest) -> Result<CaptureOutcome> {
        match self {
            Self::Mock(backend) => backend.submit(request).await,
        }
    }

    async fn cancel(&mut self) -> Result<()> {
        match self {
            Self::Mock(backend) => backend.cancel().await,
        }
    }
}
