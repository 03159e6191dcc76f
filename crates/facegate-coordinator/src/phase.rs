//! Coordinator lifecycle state machine.
//!
//! The coordinator moves through a small set of phases:
//!
//! - `Uninitialized`: nothing acquired yet; `initialize()` is the only way out
//! - `Initializing`: license acquisition and device discovery in progress
//! - `Ready`: initialized, no capture attempt in flight
//! - `Capturing`: a capture run is active (an attempt in flight or a retry
//!   scheduled)
//! - `Fatal`: a setup failure (license denied, no devices); terminal until
//!   an explicit reset
//!
//! # Valid transitions
//!
//! - Uninitialized → Initializing → Ready/Fatal
//! - Ready → Capturing
//! - Capturing → Ready
//! - any → Uninitialized, but only through [`PhaseMachine::reset`]
//!
//! Invalid transitions are rejected rather than silently applied; they
//! indicate a coordinator bug, not a runtime condition.

use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use facegate_core::{Error, Result};

/// Maximum number of phase transitions kept for debugging.
const MAX_HISTORY_SIZE: usize = 50;

/// Lifecycle phase of the capture coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapturePhase {
    /// Nothing acquired; initialization has not run (or a reset cleared it).
    Uninitialized,

    /// License acquisition and device discovery in progress.
    Initializing,

    /// Initialized and idle; a capture run can start.
    Ready,

    /// A capture run is active.
    Capturing,

    /// Setup failed; terminal until reset.
    Fatal,
}

impl fmt::Display for CapturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phase = match self {
            CapturePhase::Uninitialized => "Uninitialized",
            CapturePhase::Initializing => "Initializing",
            CapturePhase::Ready => "Ready",
            CapturePhase::Capturing => "Capturing",
            CapturePhase::Fatal => "Fatal",
        };
        write!(f, "{}", phase)
    }
}

impl CapturePhase {
    /// Check if transition to `target` is valid from this phase.
    ///
    /// # Examples
    ///
    /// ```
    /// use facegate_coordinator::phase::CapturePhase;
    ///
    /// assert!(CapturePhase::Ready.can_transition_to(&CapturePhase::Capturing));
    /// assert!(!CapturePhase::Fatal.can_transition_to(&CapturePhase::Ready));
    /// ```
    pub fn can_transition_to(&self, target: &CapturePhase) -> bool {
        matches!(
            (self, target),
            (CapturePhase::Uninitialized, CapturePhase::Initializing)
                | (CapturePhase::Initializing, CapturePhase::Ready | CapturePhase::Fatal)
                | (CapturePhase::Ready, CapturePhase::Capturing)
                | (CapturePhase::Capturing, CapturePhase::Ready)
        )
    }

    /// Whether the coordinator has completed initialization in this phase.
    pub fn is_initialized(&self) -> bool {
        matches!(self, CapturePhase::Ready | CapturePhase::Capturing)
    }
}

/// One recorded phase transition.
#[derive(Debug, Clone)]
pub struct PhaseTransition {
    /// The phase transitioned from.
    pub from: CapturePhase,

    /// The phase transitioned to.
    pub to: CapturePhase,

    /// When the transition occurred.
    pub timestamp: Instant,
}

impl PhaseTransition {
    fn new(from: CapturePhase, to: CapturePhase) -> Self {
        Self {
            from,
            to,
            timestamp: Instant::now(),
        }
    }
}

/// Phase holder enforcing valid transitions and keeping a short history.
///
/// Not thread-safe by design; the coordinator task is its single owner.
#[derive(Debug)]
pub struct PhaseMachine {
    current: CapturePhase,
    history: VecDeque<PhaseTransition>,
}

impl PhaseMachine {
    /// Create a machine in the Uninitialized phase.
    pub fn new() -> Self {
        Self {
            current: CapturePhase::Uninitialized,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    /// Get the current phase.
    pub fn current(&self) -> CapturePhase {
        self.current
    }

    /// Get the recorded transitions, oldest first.
    pub fn history(&self) -> &VecDeque<PhaseTransition> {
        &self.history
    }

    /// Transition to `target`, validating the move.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateTransition`] if the move is not allowed.
    pub fn transition_to(&mut self, target: CapturePhase) -> Result<PhaseTransition> {
        if !self.current.can_transition_to(&target) {
            return Err(Error::InvalidStateTransition {
                from: self.current.to_string(),
                to: target.to_string(),
            });
        }

        let transition = PhaseTransition::new(self.current, target);
        self.apply(target, transition.clone());
        Ok(transition)
    }

    /// Force the machine back to Uninitialized from any phase.
    ///
    /// This is the recovery path out of Fatal and the effect of an explicit
    /// coordinator reset.
    pub fn reset(&mut self) -> PhaseTransition {
        let transition = PhaseTransition::new(self.current, CapturePhase::Uninitialized);
        self.apply(CapturePhase::Uninitialized, transition.clone());
        transition
    }

    fn apply(&mut self, target: CapturePhase, transition: PhaseTransition) {
        self.current = target;
        self.history.push_back(transition);
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
    }
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_machine_starts_uninitialized() {
        let machine = PhaseMachine::new();
        assert_eq!(machine.current(), CapturePhase::Uninitialized);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut machine = PhaseMachine::new();
        machine.transition_to(CapturePhase::Initializing).unwrap();
        machine.transition_to(CapturePhase::Ready).unwrap();
        machine.transition_to(CapturePhase::Capturing).unwrap();
        machine.transition_to(CapturePhase::Ready).unwrap();

        assert_eq!(machine.current(), CapturePhase::Ready);
        assert_eq!(machine.history().len(), 4);
    }

    #[test]
    fn test_initializing_can_fail_fatally() {
        let mut machine = PhaseMachine::new();
        machine.transition_to(CapturePhase::Initializing).unwrap();
        machine.transition_to(CapturePhase::Fatal).unwrap();
        assert_eq!(machine.current(), CapturePhase::Fatal);
    }

    #[test]
    fn test_fatal_is_terminal_until_reset() {
        let mut machine = PhaseMachine::new();
        machine.transition_to(CapturePhase::Initializing).unwrap();
        machine.transition_to(CapturePhase::Fatal).unwrap();

        assert!(machine.transition_to(CapturePhase::Ready).is_err());
        assert!(machine.transition_to(CapturePhase::Capturing).is_err());
        assert!(machine.transition_to(CapturePhase::Initializing).is_err());

        let transition = machine.reset();
        assert_eq!(transition.from, CapturePhase::Fatal);
        assert_eq!(machine.current(), CapturePhase::Uninitialized);
        assert!(machine.transition_to(CapturePhase::Initializing).is_ok());
    }

    #[test]
    fn test_capture_cannot_start_before_ready() {
        let mut machine = PhaseMachine::new();
        assert!(machine.transition_to(CapturePhase::Capturing).is_err());
        machine.transition_to(CapturePhase::Initializing).unwrap();
        assert!(machine.transition_to(CapturePhase::Capturing).is_err());
    }

    #[test]
    fn test_is_initialized() {
        assert!(!CapturePhase::Uninitialized.is_initialized());
        assert!(!CapturePhase::Initializing.is_initialized());
        assert!(CapturePhase::Ready.is_initialized());
        assert!(CapturePhase::Capturing.is_initialized());
        assert!(!CapturePhase::Fatal.is_initialized());
    }

    #[test]
    fn test_history_is_capped() {
        let mut machine = PhaseMachine::new();
        machine.transition_to(CapturePhase::Initializing).unwrap();
        machine.transition_to(CapturePhase::Ready).unwrap();
        for _ in 0..60 {
            machine.transition_to(CapturePhase::Capturing).unwrap();
            machine.transition_to(CapturePhase::Ready).unwrap();
        }
        assert_eq!(machine.history().len(), MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_string(&CapturePhase::Capturing).unwrap();
        assert_eq!(json, "\"capturing\"");
        let back: CapturePhase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CapturePhase::Capturing);
    }
}
