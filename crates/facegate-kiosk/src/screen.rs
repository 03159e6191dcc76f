//! Kiosk screen navigation.
//!
//! The kiosk has three screens: a boot splash, the main menu, and the face
//! capture screen. Navigation is strictly linear:
//!
//! - Splash → MainMenu (boot completes)
//! - MainMenu → FaceCapture (card tap)
//! - FaceCapture → MainMenu (success dialog expired, or back)
//!
//! Anything else is rejected; a rejected navigation is a shell bug.

use std::fmt;

use serde::{Deserialize, Serialize};

use facegate_core::{Error, Result};

/// One kiosk screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Boot splash shown while the coordinator initializes.
    Splash,

    /// Idle screen waiting for a card tap.
    MainMenu,

    /// Live capture screen with the detection feedback overlay.
    FaceCapture,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let screen = match self {
            Screen::Splash => "Splash",
            Screen::MainMenu => "MainMenu",
            Screen::FaceCapture => "FaceCapture",
        };
        write!(f, "{}", screen)
    }
}

impl Screen {
    /// Check if navigation to `target` is valid from this screen.
    pub fn can_navigate_to(&self, target: &Screen) -> bool {
        matches!(
            (self, target),
            (Screen::Splash, Screen::MainMenu)
                | (Screen::MainMenu, Screen::FaceCapture)
                | (Screen::FaceCapture, Screen::MainMenu)
        )
    }
}

/// Current-screen holder enforcing valid navigation.
#[derive(Debug)]
pub struct Navigator {
    current: Screen,
}

impl Navigator {
    /// Start on the splash screen.
    pub fn new() -> Self {
        Self {
            current: Screen::Splash,
        }
    }

    /// Get the current screen.
    pub fn current(&self) -> Screen {
        self.current
    }

    /// Navigate to `target`, validating the move.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateTransition`] if the move is not allowed.
    pub fn navigate_to(&mut self, target: Screen) -> Result<()> {
        if !self.current.can_navigate_to(&target) {
            return Err(Error::InvalidStateTransition {
                from: self.current.to_string(),
                to: target.to_string(),
            });
        }
        self.current = target;
        Ok(())
    }

    /// Navigate back from the capture screen to the main menu.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateTransition`] when not on the capture
    /// screen.
    pub fn back(&mut self) -> Result<()> {
        self.navigate_to(Screen::MainMenu)
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_flow() {
        let mut nav = Navigator::new();
        assert_eq!(nav.current(), Screen::Splash);

        nav.navigate_to(Screen::MainMenu).unwrap();
        nav.navigate_to(Screen::FaceCapture).unwrap();
        nav.back().unwrap();
        assert_eq!(nav.current(), Screen::MainMenu);
    }

    #[test]
    fn test_splash_cannot_jump_to_capture() {
        let mut nav = Navigator::new();
        assert!(nav.navigate_to(Screen::FaceCapture).is_err());
        assert_eq!(nav.current(), Screen::Splash);
    }

    #[test]
    fn test_back_from_main_menu_is_rejected() {
        let mut nav = Navigator::new();
        nav.navigate_to(Screen::MainMenu).unwrap();
        assert!(nav.back().is_err());
    }

    #[test]
    fn test_screen_serialization() {
        let json = serde_json::to_string(&Screen::FaceCapture).unwrap();
        assert_eq!(json, "\"face_capture\"");
    }
}
