//! Capture coordination for the Facegate kiosk.
//!
//! This crate owns the face-capture flow: it drives repeated capture attempts
//! against a [`CaptureBackend`](facegate_capture::CaptureBackend), translates
//! backend statuses into UI-observable state, and mediates the success dialog
//! with its timed auto-dismiss and navigation-back.
//!
//! # Architecture
//!
//! The [`Coordinator`] runs as a single tokio task that exclusively owns the
//! backend, the license gate, and all flow state. A [`CoordinatorHandle`]
//! is the only way in or out:
//!
//! - commands (`initialize`, `start_capture`, `toggle_device`, ...) travel
//!   over an mpsc channel;
//! - [`CoordinatorState`] and [`DialogState`] snapshots are published over
//!   `watch` channels;
//! - ordered [`CoordinatorEvent`]s (status lines, navigation) arrive on a
//!   separate stream, since `watch` coalesces rapid updates.
//!
//! Retries are scheduled as deferred deadlines inside the task's select loop,
//! never as blocking sleeps, so a stop or toggle command takes effect between
//! (and during) attempts.

pub mod coordinator;
pub mod phase;
pub mod policy;
pub mod session;
pub mod state;

pub use coordinator::{Coordinator, CoordinatorBuilder, CoordinatorEvent, CoordinatorHandle};
pub use phase::{CapturePhase, PhaseMachine, PhaseTransition};
pub use policy::{AttemptDisposition, RetryPolicy};
pub use session::{AttemptResult, CaptureAttempt};
pub use state::{CoordinatorState, DetectionFeedback, DialogKind, DialogState};
