use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Correlation id for one tap-initiated access flow.
///
/// A new id is minted when an NFC tap starts a capture flow and carried
/// through log records until the flow ends (dialog dismissed or reset), so
/// the records of a single visitor interaction can be grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowId(Uuid);

impl FlowId {
    /// Mint a fresh flow id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for FlowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One structured quality signal reported alongside a capture outcome.
///
/// The capture backend in this system only reports terminal success or
/// failure; intermediate quality grades are never populated, so each signal
/// is either known-good or unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualitySignal {
    /// The signal was confirmed good by a successful capture.
    Good,

    /// No information available for this signal.
    #[default]
    Unknown,
}

impl QualitySignal {
    /// Check if the signal is known-good.
    pub fn is_good(&self) -> bool {
        matches!(self, Self::Good)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_ids_are_unique() {
        assert_ne!(FlowId::new(), FlowId::new());
    }

    #[test]
    fn test_flow_id_display_matches_uuid() {
        let id = FlowId::new();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[test]
    fn test_quality_signal_default_is_unknown() {
        assert_eq!(QualitySignal::default(), QualitySignal::Unknown);
        assert!(!QualitySignal::default().is_good());
        assert!(QualitySignal::Good.is_good());
    }

    #[test]
    fn test_quality_signal_serialization() {
        let json = serde_json::to_string(&QualitySignal::Good).unwrap();
        assert_eq!(json, "\"good\"");
        let back: QualitySignal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QualitySignal::Good);
    }
}
