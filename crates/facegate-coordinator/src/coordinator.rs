//! Capture coordinator task and handle.
//!
//! The coordinator owns the capture backend, the license gate, and all
//! capture-flow state, and runs as a single tokio task. Everything else talks
//! to it through a [`CoordinatorHandle`]: commands go in over an mpsc channel,
//! state snapshots come out over `watch` channels, and discrete events
//! (ordered status updates, navigation) arrive on an event stream.
//!
//! Single ownership is the concurrency story: there is no shared mutable
//! state, so "at most one capture in flight" and "one dialog at a time" are
//! properties of the task's control flow rather than of any lock.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use facegate_capture::{
    AnyCaptureBackend, BackendConfig, CaptureBackend, CaptureOutcome, CaptureRequest,
    CaptureStatus, DeviceRegistry,
};
use facegate_core::constants::{
    DIALOG_AUTO_DISMISS_MS, MSG_CAPTURE_SUCCESS, MSG_CAPTURE_SUSPENDED, MSG_DETECTING,
    MSG_DIALOG_FACE_DETECTED, MSG_NO_CAMERA, MSG_ONLY_ONE_CAMERA, MSG_READY,
};
use facegate_core::{Error, FlowId, Result};
use facegate_license::{AnyLicenseGate, FaceLicenses, LicenseStatus, LicenseStore};

use crate::phase::{CapturePhase, PhaseMachine};
use crate::policy::{AttemptDisposition, RetryPolicy};
use crate::session::{AttemptResult, CaptureAttempt};
use crate::state::{CoordinatorState, DetectionFeedback, DialogState};

/// Capacity of the command and event channels.
const CHANNEL_CAPACITY: usize = 64;

/// Commands accepted by the coordinator task.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Initialize,
    StartCapture,
    ToggleDevice,
    StopCapture,
    Reset,
    HideDialog,
    Shutdown,
}

/// Discrete events emitted by the coordinator, in order.
///
/// The `watch` state channels coalesce rapid updates; this stream does not,
/// so consumers that care about every status line (the UI log, tests) read
/// it instead of polling snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    /// A status message was published.
    Status(String),

    /// The success dialog expired; the shell should navigate back.
    NavigateBack,
}

/// What woke the coordinator out of an in-flight capture attempt.
enum AttemptWake {
    /// The backend finished the attempt.
    Finished(facegate_capture::Result<CaptureOutcome>),

    /// A run-terminating command arrived; handle it after cleanup.
    Interrupted(Command),

    /// All handles dropped while the attempt was in flight.
    Closed,
}

/// Builder for a coordinator task.
///
/// # Examples
///
/// ```no_run
/// use facegate_capture::{AnyCaptureBackend, MockCaptureBackend};
/// use facegate_coordinator::Coordinator;
/// use facegate_license::{AnyLicenseGate, LicenseStore, MockLicenseGate};
///
/// # async fn demo() -> facegate_core::Result<()> {
/// let (backend, _script) = MockCaptureBackend::new();
/// let gate = MockLicenseGate::granting(&facegate_license::face::FACE_COMPONENTS);
///
/// let handle = Coordinator::builder()
///     .spawn(
///         AnyCaptureBackend::Mock(backend),
///         AnyLicenseGate::Mock(gate),
///         LicenseStore::new(),
///     );
///
/// handle.initialize().await?;
/// handle.start_capture().await?;
/// # Ok(())
/// # }
/// ```
pub struct CoordinatorBuilder {
    policy: RetryPolicy,
    backend_config: BackendConfig,
    dialog_duration: Duration,
    sound: Option<Box<dyn Fn() + Send>>,
}

impl CoordinatorBuilder {
    fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            backend_config: BackendConfig::default(),
            dialog_duration: Duration::from_millis(DIALOG_AUTO_DISMISS_MS),
            sound: None,
        }
    }

    /// Override the retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the backend configuration applied at initialization.
    pub fn backend_config(mut self, config: BackendConfig) -> Self {
        self.backend_config = config;
        self
    }

    /// Override how long the success dialog stays up before auto-dismissing.
    pub fn dialog_duration(mut self, duration: Duration) -> Self {
        self.dialog_duration = duration;
        self
    }

    /// Register a callback invoked when a capture succeeds. The kiosk shell
    /// hooks its "face detected" tone here.
    pub fn on_face_detected(mut self, callback: impl Fn() + Send + 'static) -> Self {
        self.sound = Some(Box::new(callback));
        self
    }

    /// Spawn the coordinator task and return its handle.
    pub fn spawn(
        self,
        backend: AnyCaptureBackend,
        gate: AnyLicenseGate,
        store: LicenseStore,
    ) -> CoordinatorHandle {
        let (command_tx, command_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(CoordinatorState::default());
        let (dialog_tx, dialog_rx) = watch::channel(DialogState::Idle);

        let coordinator = Coordinator {
            backend,
            gate,
            store,
            policy: self.policy,
            backend_config: self.backend_config,
            dialog_duration: self.dialog_duration,
            sound: self.sound,
            phase: PhaseMachine::new(),
            registry: None,
            active_device: 0,
            attempt_counter: 0,
            failures_in_run: 0,
            flow: None,
            next_attempt_at: None,
            dialog_deadline: None,
            command_rx,
            event_tx,
            state_tx,
            dialog_tx,
        };

        tokio::spawn(coordinator.run());

        CoordinatorHandle {
            command_tx,
            event_rx,
            state_rx,
            dialog_rx,
        }
    }
}

/// The capture coordinator task state.
///
/// Constructed through [`Coordinator::builder`]; never used directly.
pub struct Coordinator {
    backend: AnyCaptureBackend,
    gate: AnyLicenseGate,
    store: LicenseStore,
    policy: RetryPolicy,
    backend_config: BackendConfig,
    dialog_duration: Duration,
    sound: Option<Box<dyn Fn() + Send>>,

    phase: PhaseMachine,
    registry: Option<DeviceRegistry>,
    active_device: usize,

    /// Monotonic attempt counter; never reset for the life of the task.
    attempt_counter: u64,

    /// Failed attempts in the current run, for the retry budget.
    failures_in_run: u32,

    /// Correlation id of the current capture run.
    flow: Option<FlowId>,

    /// Deadline of the scheduled retry, when one is pending.
    next_attempt_at: Option<Instant>,

    /// Deadline of the success dialog, when one is showing.
    dialog_deadline: Option<Instant>,

    command_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<CoordinatorEvent>,
    state_tx: watch::Sender<CoordinatorState>,
    dialog_tx: watch::Sender<DialogState>,
}

impl Coordinator {
    /// Start building a coordinator.
    pub fn builder() -> CoordinatorBuilder {
        CoordinatorBuilder::new()
    }

    async fn run(mut self) {
        debug!("Coordinator task started");

        loop {
            // Disabled select arms still evaluate their expression, so the
            // deadlines fall back to "now" when no timer is armed.
            let retry_at = self.next_attempt_at.unwrap_or_else(Instant::now);
            let dialog_at = self.dialog_deadline.unwrap_or_else(Instant::now);

            tokio::select! {
                command = self.command_rx.recv() => {
                    match command {
                        Some(command) => {
                            if !self.handle_command(command).await {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                _ = tokio::time::sleep_until(retry_at), if self.next_attempt_at.is_some() => {
                    self.next_attempt_at = None;
                    if !self.run_attempt().await {
                        break;
                    }
                }
                _ = tokio::time::sleep_until(dialog_at), if self.dialog_deadline.is_some() => {
                    self.dialog_deadline = None;
                    self.expire_dialog();
                }
            }
        }

        if let Err(e) = FaceLicenses::release(&mut self.gate).await {
            warn!(error = %e, "Failed to release license components on shutdown");
        }
        debug!("Coordinator task stopped");
    }

    /// Returns false when the task should stop.
    async fn handle_command(&mut self, command: Command) -> bool {
        debug!(?command, phase = %self.phase.current(), "Handling command");
        match command {
            Command::Initialize => self.initialize().await,
            Command::StartCapture => self.start_capture(),
            Command::ToggleDevice => self.toggle_device().await,
            Command::StopCapture => self.stop_capture(),
            Command::Reset => self.reset(),
            Command::HideDialog => self.hide_dialog(),
            Command::Shutdown => return false,
        }
        true
    }

    // ------------------------------------------------------------------
    // Initialization
    // ------------------------------------------------------------------

    async fn initialize(&mut self) {
        match self.phase.current() {
            CapturePhase::Uninitialized => {}
            CapturePhase::Fatal => {
                warn!("Initialize requested in Fatal phase; reset first");
                return;
            }
            phase => {
                debug!(%phase, "Already initialized; ignoring");
                return;
            }
        }

        if let Err(e) = self.phase.transition_to(CapturePhase::Initializing) {
            error!(error = %e, "Phase machine rejected Initializing");
            return;
        }

        match FaceLicenses::activate(&mut self.gate, &self.store).await {
            Ok(LicenseStatus::Activated) => {
                debug!("Face license components activated");
            }
            Ok(LicenseStatus::Denied { reason }) => {
                warn!(%reason, "License activation denied");
                self.fail_setup(&reason);
                self.dialog_tx.send_replace(DialogState::info(reason));
                return;
            }
            Err(e) => {
                error!(error = %e, "License gate unreachable");
                self.fail_setup(&format!("License error: {}", e));
                return;
            }
        }

        if let Err(e) = self.backend.initialize(&self.backend_config).await {
            error!(error = %e, "Capture backend initialization failed");
            self.fail_setup(&e.to_string());
            return;
        }

        let devices = match self.backend.enumerate_devices().await {
            Ok(devices) => devices,
            Err(e) => {
                error!(error = %e, "Device enumeration failed");
                self.fail_setup(&e.to_string());
                return;
            }
        };

        let registry = match DeviceRegistry::new(devices) {
            Ok(registry) => registry,
            Err(_) => {
                warn!("No capture devices found");
                self.fail_setup(MSG_NO_CAMERA);
                return;
            }
        };

        if let Err(e) = self.backend.select_device(0).await {
            error!(error = %e, "Initial device selection failed");
            self.fail_setup(&e.to_string());
            return;
        }

        info!(devices = registry.len(), "Coordinator initialized");
        self.registry = Some(registry);
        self.active_device = 0;

        if let Err(e) = self.phase.transition_to(CapturePhase::Ready) {
            error!(error = %e, "Phase machine rejected Ready");
            return;
        }

        self.state_tx.send_modify(|state| {
            state.active_device_index = Some(0);
        });
        self.publish_status(MSG_READY);
    }

    fn fail_setup(&mut self, message: &str) {
        if let Err(e) = self.phase.transition_to(CapturePhase::Fatal) {
            error!(error = %e, "Phase machine rejected Fatal");
        }
        self.state_tx.send_modify(|state| {
            state.is_capturing = false;
        });
        self.publish_status(message);
    }

    // ------------------------------------------------------------------
    // Capture run control
    // ------------------------------------------------------------------

    fn start_capture(&mut self) {
        match self.phase.current() {
            CapturePhase::Ready => {}
            CapturePhase::Capturing => {
                debug!("Capture already in flight; dropping start request");
                return;
            }
            phase => {
                warn!(%phase, "Cannot start capture");
                return;
            }
        }

        if let Err(e) = self.phase.transition_to(CapturePhase::Capturing) {
            error!(error = %e, "Phase machine rejected Capturing");
            return;
        }

        let flow = FlowId::new();
        info!(flow = %flow, device = self.active_device, "Capture run started");
        self.flow = Some(flow);
        self.failures_in_run = 0;

        self.state_tx.send_modify(|state| {
            state.is_capturing = true;
            state.feedback = DetectionFeedback::default();
        });
        self.next_attempt_at = Some(Instant::now());
    }

    // Leaves the status message as it was, so the UI keeps showing the last
    // thing that happened in the run.
    fn stop_capture(&mut self) {
        if self.phase.current() != CapturePhase::Capturing {
            debug!("No capture in flight to stop");
            return;
        }

        self.end_run();
    }

    /// Leave the Capturing phase and clear run bookkeeping.
    fn end_run(&mut self) {
        self.next_attempt_at = None;
        if let Some(flow) = self.flow.take() {
            info!(flow = %flow, "Capture run ended");
        }
        if let Err(e) = self.phase.transition_to(CapturePhase::Ready) {
            error!(error = %e, "Phase machine rejected Ready");
        }
        self.state_tx.send_modify(|state| {
            state.is_capturing = false;
        });
    }

    async fn toggle_device(&mut self) {
        if !self.phase.current().is_initialized() {
            warn!(phase = %self.phase.current(), "Cannot toggle device");
            return;
        }

        let (next, name) = match self.registry.as_ref() {
            Some(registry) if registry.len() >= 2 => {
                let next = registry.next_index(self.active_device);
                let name = registry
                    .get(next)
                    .map(|d| d.display_name.clone())
                    .unwrap_or_default();
                (next, name)
            }
            _ => {
                self.publish_status(MSG_ONLY_ONE_CAMERA);
                return;
            }
        };

        if self.phase.current() == CapturePhase::Capturing {
            self.end_run();
        }

        if let Err(e) = self.backend.select_device(next).await {
            error!(error = %e, index = next, "Device selection failed");
            self.publish_status(&e.to_string());
            return;
        }

        info!(index = next, device = %name, "Switched capture device");
        self.active_device = next;
        self.state_tx.send_modify(|state| {
            state.active_device_index = Some(next);
        });
        self.publish_status(&format!("Switched to {}", name));

        // Switching always (re)starts a run on the new device.
        self.start_capture();
    }

    fn reset(&mut self) {
        info!(phase = %self.phase.current(), "Coordinator reset");
        self.next_attempt_at = None;
        self.dialog_deadline = None;
        self.flow = None;
        self.failures_in_run = 0;
        self.registry = None;
        self.active_device = 0;
        self.phase.reset();
        self.dialog_tx.send_replace(DialogState::Idle);
        self.state_tx.send_replace(CoordinatorState::default());
    }

    // ------------------------------------------------------------------
    // Dialog lifecycle
    // ------------------------------------------------------------------

    fn hide_dialog(&mut self) {
        self.dialog_deadline = None;
        self.dialog_tx.send_replace(DialogState::Idle);
    }

    /// The success dialog timed out: hide it, reset, and navigate back.
    fn expire_dialog(&mut self) {
        if !self.dialog_tx.borrow().auto_dismisses() {
            return;
        }

        debug!("Success dialog expired");
        self.dialog_tx.send_replace(DialogState::Idle);
        self.reset();
        self.emit(CoordinatorEvent::NavigateBack);
    }

    // ------------------------------------------------------------------
    // Capture attempts
    // ------------------------------------------------------------------

    /// Run one capture attempt. Returns false when the task should stop.
    async fn run_attempt(&mut self) -> bool {
        if self.phase.current() != CapturePhase::Capturing {
            debug!("Attempt fired outside a capture run; ignoring");
            return true;
        }

        self.attempt_counter += 1;
        let mut attempt = CaptureAttempt::begin(self.attempt_counter, self.active_device);
        debug!(attempt = attempt.attempt_id, "Submitting capture attempt");

        self.publish_status(MSG_DETECTING);

        let wake = {
            let submit = self.backend.submit(CaptureRequest::capture_and_template());
            tokio::pin!(submit);

            loop {
                tokio::select! {
                    outcome = &mut submit => break AttemptWake::Finished(outcome),
                    command = self.command_rx.recv() => match command {
                        None => break AttemptWake::Closed,
                        Some(Command::StartCapture) => {
                            debug!("Capture already in flight; dropping start request");
                        }
                        Some(Command::Initialize) => {
                            debug!("Already initialized; ignoring");
                        }
                        Some(Command::HideDialog) => {
                            self.dialog_deadline = None;
                            self.dialog_tx.send_replace(DialogState::Idle);
                        }
                        Some(Command::ToggleDevice)
                            if self.registry.as_ref().is_none_or(|r| r.len() < 2) =>
                        {
                            self.state_tx.send_modify(|state| {
                                state.status_message = MSG_ONLY_ONE_CAMERA.to_string();
                            });
                            let _ = self.event_tx.try_send(CoordinatorEvent::Status(
                                MSG_ONLY_ONE_CAMERA.to_string(),
                            ));
                        }
                        Some(command) => break AttemptWake::Interrupted(command),
                    },
                }
            }
        };

        match wake {
            AttemptWake::Finished(Ok(outcome)) => {
                self.handle_outcome(&mut attempt, outcome);
                true
            }
            AttemptWake::Finished(Err(e)) => {
                warn!(error = %e, attempt = attempt.attempt_id, "Capture attempt faulted");
                attempt.finish(AttemptResult::Faulted {
                    detail: e.to_string(),
                });
                self.failures_in_run += 1;
                let disposition = self.policy.classify_fault(self.failures_in_run);
                self.apply_disposition(disposition);
                true
            }
            AttemptWake::Interrupted(command) => {
                attempt.finish(AttemptResult::Cancelled);
                if let Err(e) = self.backend.cancel().await {
                    warn!(error = %e, "Backend cancel failed");
                }
                self.handle_command(command).await
            }
            AttemptWake::Closed => false,
        }
    }

    fn handle_outcome(&mut self, attempt: &mut CaptureAttempt, outcome: CaptureOutcome) {
        match outcome.status {
            CaptureStatus::Ok => {
                let quality = outcome.sample.as_ref().map(|s| s.quality).unwrap_or(0);
                attempt.finish(AttemptResult::Succeeded { quality });
                info!(attempt = attempt.attempt_id, quality, "Face captured");
                self.succeed(outcome.sample);
            }
            status => {
                debug!(attempt = attempt.attempt_id, %status, "Capture attempt failed");
                attempt.finish(AttemptResult::failed(&status));
                self.failures_in_run += 1;
                let disposition = self
                    .policy
                    .classify_status(&status, self.failures_in_run);
                self.apply_disposition(disposition);
            }
        }
    }

    fn apply_disposition(&mut self, disposition: AttemptDisposition) {
        match disposition {
            AttemptDisposition::Retry {
                delay,
                status_message,
            } => {
                self.publish_status(&status_message);
                self.next_attempt_at = Some(Instant::now() + delay);
            }
            AttemptDisposition::Suspend => {
                warn!(failures = self.failures_in_run, "Retry budget exhausted");
                self.end_run();
                self.publish_status(MSG_CAPTURE_SUSPENDED);
            }
        }
    }

    fn succeed(&mut self, sample: Option<facegate_capture::FaceSample>) {
        if let Some(callback) = &self.sound {
            callback();
        }

        self.end_run();
        self.state_tx.send_modify(|state| {
            state.feedback = DetectionFeedback::all_good();
        });
        self.publish_status(MSG_CAPTURE_SUCCESS);

        let dialog = match sample {
            Some(sample) => DialogState::face_detected(MSG_DIALOG_FACE_DETECTED, sample),
            // The binding can report Ok without managing to convert the
            // display image; the dialog still shows, just without a preview.
            None => DialogState::Showing {
                kind: crate::state::DialogKind::FaceDetected,
                message: MSG_DIALOG_FACE_DETECTED.to_string(),
                sample: None,
                shown_at: chrono::Utc::now(),
            },
        };
        self.dialog_tx.send_replace(dialog);
        self.dialog_deadline = Some(Instant::now() + self.dialog_duration);
    }

    // ------------------------------------------------------------------
    // Publishing
    // ------------------------------------------------------------------

    fn publish_status(&mut self, message: &str) {
        self.state_tx.send_modify(|state| {
            state.status_message = message.to_string();
        });
        self.emit(CoordinatorEvent::Status(message.to_string()));
    }

    fn emit(&self, event: CoordinatorEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            debug!(error = %e, "Event receiver not keeping up; dropping event");
        }
    }
}

/// Handle to a running coordinator task.
pub struct CoordinatorHandle {
    command_tx: mpsc::Sender<Command>,
    event_rx: mpsc::Receiver<CoordinatorEvent>,
    state_rx: watch::Receiver<CoordinatorState>,
    dialog_rx: watch::Receiver<DialogState>,
}

impl CoordinatorHandle {
    /// Run license activation, backend initialization, and device discovery.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinatorStopped`] if the task has exited.
    pub async fn initialize(&self) -> Result<()> {
        self.send(Command::Initialize).await
    }

    /// Start a capture run. Dropped if one is already in flight.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinatorStopped`] if the task has exited.
    pub async fn start_capture(&self) -> Result<()> {
        self.send(Command::StartCapture).await
    }

    /// Switch to the next capture device and start a capture run on it,
    /// cancelling any run in flight on the old device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinatorStopped`] if the task has exited.
    pub async fn toggle_device(&self) -> Result<()> {
        self.send(Command::ToggleDevice).await
    }

    /// Stop the current capture run, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinatorStopped`] if the task has exited.
    pub async fn stop_capture(&self) -> Result<()> {
        self.send(Command::StopCapture).await
    }

    /// Tear down all acquired state; the next `initialize` starts from
    /// scratch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinatorStopped`] if the task has exited.
    pub async fn reset(&self) -> Result<()> {
        self.send(Command::Reset).await
    }

    /// Hide the current dialog without navigating.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinatorStopped`] if the task has exited.
    pub async fn hide_dialog(&self) -> Result<()> {
        self.send(Command::HideDialog).await
    }

    /// Stop the coordinator task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinatorStopped`] if the task has already exited.
    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }

    /// Latest coordinator state snapshot.
    pub fn state(&self) -> CoordinatorState {
        self.state_rx.borrow().clone()
    }

    /// Latest dialog state snapshot.
    pub fn dialog(&self) -> DialogState {
        self.dialog_rx.borrow().clone()
    }

    /// Wait for the coordinator state to change and return the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinatorStopped`] if the task has exited.
    pub async fn state_changed(&mut self) -> Result<CoordinatorState> {
        self.state_rx
            .changed()
            .await
            .map_err(|_| Error::CoordinatorStopped)?;
        Ok(self.state_rx.borrow_and_update().clone())
    }

    /// Next discrete coordinator event, in emission order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CoordinatorStopped`] if the task has exited and the
    /// event stream is drained.
    pub async fn next_event(&mut self) -> Result<CoordinatorEvent> {
        self.event_rx.recv().await.ok_or(Error::CoordinatorStopped)
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| Error::CoordinatorStopped)
    }
}
