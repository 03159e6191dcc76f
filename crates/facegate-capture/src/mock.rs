//! Mock capture engine for testing and development.
//!
//! The mock is scripted through a channel-backed handle: each queued result,
//! a [`CaptureOutcome`] or an engine fault, is consumed by one `submit` call.
//! When the script is empty, `submit` suspends until more results are queued,
//! which mirrors a real engine blocking inside its capture call and keeps
//! paused-clock tests deterministic.
//!
//! # Examples
//!
//! ```
//! use facegate_capture::mock::MockCaptureBackend;
//! use facegate_capture::traits::{CaptureBackend, CaptureRequest, CaptureStatus};
//! use facegate_capture::types::{BackendConfig, DeviceDescriptor};
//!
//! #[tokio::main]
//! async fn main() -> facegate_capture::Result<()> {
//!     let (mut backend, handle) =
//!         MockCaptureBackend::with_devices(vec![DeviceDescriptor::new("Front", "Mock Camera")]);
//!
//!     backend.initialize(&BackendConfig::default()).await?;
//!     handle.queue_status(CaptureStatus::Timeout).await?;
//!
//!     let outcome = backend.submit(CaptureRequest::capture_and_template()).await?;
//!     assert_eq!(outcome.status, CaptureStatus::Timeout);
//!     Ok(())
//! }
//! ```

use crate::error::{CaptureError, Result};
use crate::traits::{CaptureBackend, CaptureOutcome, CaptureRequest, CaptureStatus};
use crate::types::{BackendConfig, DeviceDescriptor, FaceSample};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::mpsc;

/// Shared counters the handle uses to observe the backend.
#[derive(Debug, Default)]
struct MockCounters {
    initialized: AtomicBool,
    enumerate_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    cancel_calls: AtomicUsize,
    selected_device: AtomicUsize,
}

/// Mock capture engine scripted through a [`MockCaptureHandle`].
#[derive(Debug)]
pub struct MockCaptureBackend {
    /// Scripted results, one per submit call.
    outcome_rx: mpsc::Receiver<Result<CaptureOutcome>>,

    /// Devices the mock reports from enumeration.
    devices: Vec<DeviceDescriptor>,

    /// Counters shared with the handle.
    counters: Arc<MockCounters>,
}

impl MockCaptureBackend {
    /// Create a mock backend reporting a single default device.
    pub fn new() -> (Self, MockCaptureHandle) {
        Self::with_devices(vec![DeviceDescriptor::new("Mock Camera", "Mock Camera v1.0")])
    }

    /// Create a mock backend reporting the given devices from enumeration.
    ///
    /// An empty list is allowed here: it simulates a machine with no camera
    /// attached, which callers must treat as a fatal setup failure.
    pub fn with_devices(devices: Vec<DeviceDescriptor>) -> (Self, MockCaptureHandle) {
        let (outcome_tx, outcome_rx) = mpsc::channel(32);
        let counters = Arc::new(MockCounters::default());

        let backend = Self {
            outcome_rx,
            devices,
            counters: Arc::clone(&counters),
        };

        let handle = MockCaptureHandle {
            outcome_tx,
            counters,
        };

        (backend, handle)
    }
}

impl CaptureBackend for MockCaptureBackend {
    async fn initialize(&mut self, _config: &BackendConfig) -> Result<()> {
        self.counters.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn enumerate_devices(&mut self) -> Result<Vec<DeviceDescriptor>> {
        if !self.counters.initialized.load(Ordering::SeqCst) {
            return Err(CaptureError::NotInitialized);
        }
        self.counters.enumerate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.devices.clone())
    }

    async fn select_device(&mut self, index: usize) -> Result<()> {
        if index >= self.devices.len() {
            return Err(CaptureError::DeviceOutOfRange {
                index,
                available: self.devices.len(),
            });
        }
        self.counters.selected_device.store(index, Ordering::SeqCst);
        Ok(())
    }

    async fn submit(&mut self, _request: CaptureRequest) -> Result<CaptureOutcome> {
        if !self.counters.initialized.load(Ordering::SeqCst) {
            return Err(CaptureError::NotInitialized);
        }
        self.counters.submit_calls.fetch_add(1, Ordering::SeqCst);

        match self.outcome_rx.recv().await {
            Some(result) => result,
            None => Err(CaptureError::disconnected("Outcome channel closed")),
        }
    }

    async fn cancel(&mut self) -> Result<()> {
        self.counters.cancel_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Handle for scripting and observing a [`MockCaptureBackend`].
#[derive(Debug, Clone)]
pub struct MockCaptureHandle {
    outcome_tx: mpsc::Sender<Result<CaptureOutcome>>,
    counters: Arc<MockCounters>,
}

impl MockCaptureHandle {
    /// Queue an outcome for the next submit call.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend has been dropped.
    pub async fn queue_outcome(&self, outcome: CaptureOutcome) -> Result<()> {
        self.outcome_tx
            .send(Ok(outcome))
            .await
            .map_err(|_| CaptureError::disconnected("Outcome channel closed"))
    }

    /// Queue an engine fault: the next submit call returns this error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend has been dropped.
    pub async fn queue_fault(&self, error: CaptureError) -> Result<()> {
        self.outcome_tx
            .send(Err(error))
            .await
            .map_err(|_| CaptureError::disconnected("Outcome channel closed"))
    }

    /// Queue a non-success status with no sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend has been dropped.
    pub async fn queue_status(&self, status: CaptureStatus) -> Result<()> {
        self.queue_outcome(CaptureOutcome::status(status)).await
    }

    /// Queue a successful capture carrying a small synthetic sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend has been dropped.
    pub async fn queue_success(&self, quality: u8) -> Result<()> {
        let sample = FaceSample::new(vec![0xAB; 64], 8, 8, quality)?;
        self.queue_outcome(CaptureOutcome::ok(sample)).await
    }

    /// Whether `initialize` has been called on the backend.
    pub fn is_initialized(&self) -> bool {
        self.counters.initialized.load(Ordering::SeqCst)
    }

    /// Number of enumeration calls observed.
    pub fn enumerate_calls(&self) -> usize {
        self.counters.enumerate_calls.load(Ordering::SeqCst)
    }

    /// Number of submit calls observed.
    pub fn submit_calls(&self) -> usize {
        self.counters.submit_calls.load(Ordering::SeqCst)
    }

    /// Number of cancel calls observed.
    pub fn cancel_calls(&self) -> usize {
        self.counters.cancel_calls.load(Ordering::SeqCst)
    }

    /// Index most recently passed to `select_device`.
    pub fn selected_device(&self) -> usize {
        self.counters.selected_device.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_submit_consumes_scripted_outcomes_in_order() {
        let (mut backend, handle) = MockCaptureBackend::new();
        backend.initialize(&BackendConfig::default()).await.unwrap();

        handle.queue_status(CaptureStatus::BadObject).await.unwrap();
        handle.queue_success(80).await.unwrap();

        let first = backend
            .submit(CaptureRequest::capture_and_template())
            .await
            .unwrap();
        assert_eq!(first.status, CaptureStatus::BadObject);
        assert!(first.sample.is_none());

        let second = backend
            .submit(CaptureRequest::capture_and_template())
            .await
            .unwrap();
        assert!(second.status.is_ok());
        assert_eq!(second.sample.unwrap().quality, 80);

        assert_eq!(handle.submit_calls(), 2);
    }

    #[tokio::test]
    async fn test_submit_reports_scripted_fault() {
        let (mut backend, handle) = MockCaptureBackend::new();
        backend.initialize(&BackendConfig::default()).await.unwrap();

        handle
            .queue_fault(CaptureError::other("Engine dropped the frame"))
            .await
            .unwrap();
        handle.queue_success(70).await.unwrap();

        let first = backend.submit(CaptureRequest::capture_and_template()).await;
        assert!(matches!(first, Err(CaptureError::Other(_))));

        let second = backend
            .submit(CaptureRequest::capture_and_template())
            .await
            .unwrap();
        assert!(second.status.is_ok());
        assert_eq!(handle.submit_calls(), 2);
    }

    #[tokio::test]
    async fn test_submit_before_initialize_fails() {
        let (mut backend, _handle) = MockCaptureBackend::new();
        let result = backend.submit(CaptureRequest::capture_and_template()).await;
        assert!(matches!(result, Err(CaptureError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_enumerate_reports_configured_devices() {
        let (mut backend, handle) = MockCaptureBackend::with_devices(vec![
            DeviceDescriptor::new("Front", "Mock"),
            DeviceDescriptor::new("Rear", "Mock"),
        ]);
        backend.initialize(&BackendConfig::default()).await.unwrap();

        let devices = backend.enumerate_devices().await.unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].display_name, "Front");
        assert_eq!(handle.enumerate_calls(), 1);
    }

    #[tokio::test]
    async fn test_select_device_out_of_range() {
        let (mut backend, handle) = MockCaptureBackend::new();
        backend.initialize(&BackendConfig::default()).await.unwrap();

        assert!(backend.select_device(0).await.is_ok());
        assert!(matches!(
            backend.select_device(5).await,
            Err(CaptureError::DeviceOutOfRange { index: 5, .. })
        ));
        assert_eq!(handle.selected_device(), 0);
    }

    #[tokio::test]
    async fn test_submit_fails_when_handle_dropped() {
        let (mut backend, handle) = MockCaptureBackend::new();
        backend.initialize(&BackendConfig::default()).await.unwrap();
        drop(handle);

        let result = backend.submit(CaptureRequest::capture_and_template()).await;
        assert!(matches!(result, Err(CaptureError::Disconnected { .. })));
    }

    #[tokio::test]
    async fn test_cancel_is_counted() {
        let (mut backend, handle) = MockCaptureBackend::new();
        backend.cancel().await.unwrap();
        backend.cancel().await.unwrap();
        assert_eq!(handle.cancel_calls(), 2);
    }
}
