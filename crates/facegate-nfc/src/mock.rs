//! Mock NFC reader for testing and development.

use crate::{NfcError, Result, TapEvent, TapSource};
use tokio::sync::mpsc;

/// Mock reader fed through a [`MockNfcReaderHandle`].
///
/// # Examples
///
/// ```
/// use facegate_nfc::{MockNfcReader, TapSource};
///
/// #[tokio::main]
/// async fn main() -> facegate_nfc::Result<()> {
///     let (mut reader, handle) = MockNfcReader::new();
///
///     handle.queue_tap(vec![0x04, 0xAB, 0xCD, 0xEF]).await?;
///
///     let tap = reader.next_tap().await?;
///     assert_eq!(tap.uid_hex(), "04ABCDEF");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockNfcReader {
    tap_rx: mpsc::Receiver<TapEvent>,
}

impl MockNfcReader {
    /// Create a mock reader and its controlling handle.
    pub fn new() -> (Self, MockNfcReaderHandle) {
        let (tap_tx, tap_rx) = mpsc::channel(32);
        (Self { tap_rx }, MockNfcReaderHandle { tap_tx })
    }
}

impl TapSource for MockNfcReader {
    async fn next_tap(&mut self) -> Result<TapEvent> {
        self.tap_rx
            .recv()
            .await
            .ok_or_else(|| NfcError::disconnected("Tap channel closed"))
    }
}

/// Handle for simulating taps on a [`MockNfcReader`].
#[derive(Debug, Clone)]
pub struct MockNfcReaderHandle {
    tap_tx: mpsc::Sender<TapEvent>,
}

impl MockNfcReaderHandle {
    /// Simulate a card tap with the given UID.
    ///
    /// # Errors
    ///
    /// Returns an error if the UID is invalid or the reader was dropped.
    pub async fn queue_tap(&self, uid: Vec<u8>) -> Result<()> {
        let tap = TapEvent::new(uid)?;
        self.tap_tx
            .send(tap)
            .await
            .map_err(|_| NfcError::disconnected("Tap channel closed"))
    }
}
