//! Facegate kiosk binary.
//!
//! Wires the capture coordinator, the license gate, and the NFC tap source
//! into a kiosk shell. No vendor binding is built into this tree: a mock
//! capture engine, a granting license gate, and a scripted card reader stand
//! in for the hardware, driven by a small demo task that simulates visits.

mod app;
mod config;
mod screen;

use std::path::Path;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use facegate_capture::{AnyCaptureBackend, CaptureStatus, MockCaptureBackend, MockCaptureHandle};
use facegate_coordinator::Coordinator;
use facegate_license::face::FACE_COMPONENTS;
use facegate_license::{AnyLicenseGate, LicenseStore, MockLicenseGate};
use facegate_nfc::{MockNfcReader, MockNfcReaderHandle};

use crate::app::Kiosk;
use crate::config::KioskConfig;

const CONFIG_PATH: &str = "facegate.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = KioskConfig::load(Path::new(CONFIG_PATH))?;
    let store = LicenseStore::load_dir(&config.license_dir)?;

    let (backend, script) = MockCaptureBackend::new();
    let gate = MockLicenseGate::granting(&FACE_COMPONENTS);
    let (reader, taps) = MockNfcReader::new();

    let coordinator = Coordinator::builder()
        .retry_policy(config.retry_policy())
        .dialog_duration(config.dialog_duration())
        .on_face_detected(|| info!("Face detected tone"))
        .spawn(
            AnyCaptureBackend::Mock(backend),
            AnyLicenseGate::Mock(gate),
            store,
        );

    tokio::spawn(demo_visits(script, taps));

    let mut kiosk = Kiosk::new(coordinator, reader);
    kiosk.boot().await?;
    info!("Kiosk ready; Ctrl-C to exit");
    kiosk.run().await
}

/// Simulate a visitor every few seconds: a card tap, two frames with no
/// usable face, then a clean capture.
async fn demo_visits(script: MockCaptureHandle, taps: MockNfcReaderHandle) {
    let mut visit = 0u32;
    loop {
        tokio::time::sleep(Duration::from_secs(2)).await;
        visit += 1;
        info!(visit, "Simulating card tap");

        if taps.queue_tap(vec![0x04, 0xA1, 0xB2, 0xC3]).await.is_err() {
            warn!("Card reader gone; demo stopping");
            return;
        }
        for status in [CaptureStatus::BadObject, CaptureStatus::BadObject] {
            if script.queue_status(status).await.is_err() {
                return;
            }
        }
        if script.queue_success(82).await.is_err() {
            return;
        }

        // Leave time for the retries and the success dialog to play out.
        tokio::time::sleep(Duration::from_secs(8)).await;
    }
}
