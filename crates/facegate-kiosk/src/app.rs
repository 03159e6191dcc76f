//! Kiosk shell event loop.
//!
//! Ties the tap source, the capture coordinator, and screen navigation
//! together. A card tap plays the tap tone and moves to the capture screen;
//! coordinator events drive the status log and the navigation back to the
//! main menu once the success dialog expires.

use tracing::{debug, info, warn};

use facegate_coordinator::{CoordinatorEvent, CoordinatorHandle};
use facegate_nfc::{TapEvent, TapSource};

use crate::screen::{Navigator, Screen};

pub struct Kiosk<S: TapSource> {
    navigator: Navigator,
    coordinator: CoordinatorHandle,
    taps: S,
}

impl<S: TapSource> Kiosk<S> {
    pub fn new(coordinator: CoordinatorHandle, taps: S) -> Self {
        Self {
            navigator: Navigator::new(),
            coordinator,
            taps,
        }
    }

    /// Initialize the coordinator and leave the splash screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinator task is gone or the navigation
    /// machine rejects the boot transition.
    pub async fn boot(&mut self) -> anyhow::Result<()> {
        self.coordinator.initialize().await?;
        self.navigator.navigate_to(Screen::MainMenu)?;
        Ok(())
    }

    /// Run the event loop until Ctrl-C or a peripheral disconnect.
    ///
    /// # Errors
    ///
    /// Returns an error if a coordinator command or a navigation fails.
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            tokio::select! {
                tap = self.taps.next_tap() => match tap {
                    Ok(tap) => self.handle_tap(tap).await?,
                    Err(e) => {
                        warn!(error = %e, "Tap source disconnected");
                        break;
                    }
                },
                event = self.coordinator.next_event() => match event {
                    Ok(event) => self.handle_event(event)?,
                    Err(_) => {
                        warn!("Coordinator stopped");
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        if let Err(e) = self.coordinator.shutdown().await {
            debug!(error = %e, "Coordinator already stopped");
        }
        Ok(())
    }

    async fn handle_tap(&mut self, tap: TapEvent) -> anyhow::Result<()> {
        info!(uid = %tap.uid_hex(), "Card tap");
        play_tap_tone();

        match self.navigator.current() {
            Screen::MainMenu => {
                self.navigator.navigate_to(Screen::FaceCapture)?;
                // The coordinator resets itself once the success dialog
                // expires, so every capture-screen entry re-initializes.
                // A no-op when it is already set up.
                self.coordinator.initialize().await?;
                self.coordinator.start_capture().await?;
            }
            Screen::FaceCapture => {
                // Re-arms a suspended run; dropped if one is in flight.
                self.coordinator.initialize().await?;
                self.coordinator.start_capture().await?;
            }
            Screen::Splash => debug!("Tap ignored during boot"),
        }
        Ok(())
    }

    fn handle_event(&mut self, event: CoordinatorEvent) -> anyhow::Result<()> {
        match event {
            CoordinatorEvent::Status(message) => {
                info!(screen = %self.navigator.current(), %message, "Status");
            }
            CoordinatorEvent::NavigateBack => {
                if self.navigator.current() == Screen::FaceCapture {
                    self.navigator.back()?;
                    info!("Returned to main menu");
                }
            }
        }
        Ok(())
    }
}

/// Tap tone slot. Audio hardware is platform glue this build does not carry;
/// the tone is logged instead.
fn play_tap_tone() {
    info!("Tap tone");
}
