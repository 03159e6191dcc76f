//! NFC tap event source for the Facegate kiosk.
//!
//! Taps are the external trigger that starts an access flow. The tag itself
//! is never parsed beyond its UID: the kiosk reacts to "a tap occurred",
//! plays its tap tone, and navigates to the face capture screen. The UID is
//! carried only so log records can correlate a flow with a physical card.

#![allow(async_fn_in_trait)]

pub mod mock;

pub use mock::{MockNfcReader, MockNfcReaderHandle};

use thiserror::Error;

/// Minimum UID length in bytes (per ISO 14443).
pub const MIN_UID_LENGTH: usize = 4;

/// Maximum UID length in bytes (per ISO 14443).
pub const MAX_UID_LENGTH: usize = 10;

/// Errors that can occur while reading tap events.
#[derive(Debug, Error)]
pub enum NfcError {
    /// The reader is not connected or has been disconnected.
    #[error("Reader disconnected: {detail}")]
    Disconnected { detail: String },

    /// Invalid tag data received from the reader.
    #[error("Invalid tag data: {message}")]
    InvalidData { message: String },
}

impl NfcError {
    /// Create a new disconnected error.
    pub fn disconnected(detail: impl Into<String>) -> Self {
        Self::Disconnected {
            detail: detail.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }
}

/// Result type alias for NFC operations.
pub type Result<T> = std::result::Result<T, NfcError>;

/// One tag-discovery event delivered by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapEvent {
    /// Tag unique identifier (4-10 bytes), treated as opaque.
    pub uid: Vec<u8>,

    /// When the tap was observed.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl TapEvent {
    /// Create a tap event with the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the UID length is outside the 4-10 byte range.
    pub fn new(uid: Vec<u8>) -> Result<Self> {
        if !(MIN_UID_LENGTH..=MAX_UID_LENGTH).contains(&uid.len()) {
            return Err(NfcError::invalid_data(format!(
                "Tag UID length must be {}-{} bytes, got {}",
                MIN_UID_LENGTH,
                MAX_UID_LENGTH,
                uid.len()
            )));
        }

        Ok(Self {
            uid,
            timestamp: chrono::Utc::now(),
        })
    }

    /// Get the UID as a hexadecimal string for logging.
    pub fn uid_hex(&self) -> String {
        self.uid
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Source of tap events.
///
/// Implementations wrap whatever delivers tag-discovery events on the
/// platform. The kiosk awaits taps in its main select loop.
pub trait TapSource: Send + Sync {
    /// Wait for the next tap.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader disconnects.
    async fn next_tap(&mut self) -> Result<TapEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_event_uid_hex() {
        let tap = TapEvent::new(vec![0x04, 0xAB, 0xCD, 0xEF]).unwrap();
        assert_eq!(tap.uid_hex(), "04ABCDEF");
    }

    #[test]
    fn test_tap_event_uid_length_validation() {
        assert!(TapEvent::new(vec![0x01, 0x02]).is_err());
        assert!(TapEvent::new(vec![0x01; 11]).is_err());
        assert!(TapEvent::new(vec![0x01; 4]).is_ok());
        assert!(TapEvent::new(vec![0x01; 10]).is_ok());
    }
}
