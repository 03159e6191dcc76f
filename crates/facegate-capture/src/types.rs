//! Common types shared across capture backend implementations.

use crate::error::{CaptureError, Result};
use crate::traits::MAX_SAMPLE_QUALITY;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Engine configuration applied at initialization.
///
/// Thresholds and property strings are passed through to the underlying
/// engine verbatim; the defaults match the kiosk's production tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Minimum acceptable sample quality (0-100).
    pub quality_threshold: u8,

    /// Minimum detection confidence.
    pub confidence_threshold: u8,

    /// Engine-specific property strings applied verbatim.
    pub properties: HashMap<String, String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        let mut properties = HashMap::new();
        // Feature points and expression models are not shipped with the kiosk.
        properties.insert("Faces.DetectAllFeaturePoints".to_string(), "false".to_string());
        properties.insert("Faces.RecognizeExpression".to_string(), "false".to_string());

        Self {
            quality_threshold: 50,
            confidence_threshold: 1,
            properties,
        }
    }
}

/// Descriptor for one capture device discovered at initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Human-readable name shown when switching devices.
    pub display_name: String,

    /// Device model identifier.
    pub model: String,

    /// Optional device serial number.
    pub serial_number: Option<String>,
}

impl DeviceDescriptor {
    /// Create a new descriptor with required fields.
    pub fn new(display_name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            model: model.into(),
            serial_number: None,
        }
    }

    /// Set the serial number.
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }
}

/// Ordered registry of the capture devices found at initialization.
///
/// Invariant: non-empty. Initialization fails fatally before a registry is
/// ever constructed from an empty enumeration, so holders of a registry can
/// index into it without re-checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRegistry {
    devices: Vec<DeviceDescriptor>,
}

impl DeviceRegistry {
    /// Build a registry from an enumeration result.
    ///
    /// # Errors
    ///
    /// Returns an error if the enumeration was empty.
    pub fn new(devices: Vec<DeviceDescriptor>) -> Result<Self> {
        if devices.is_empty() {
            return Err(CaptureError::invalid_data(
                "Device registry cannot be empty",
            ));
        }
        Ok(Self { devices })
    }

    /// Number of registered devices.
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Always false; the constructor rejects empty enumerations.
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Get the descriptor at `index`.
    pub fn get(&self, index: usize) -> Option<&DeviceDescriptor> {
        self.devices.get(index)
    }

    /// Next device index after `current`, wrapping around.
    pub fn next_index(&self, current: usize) -> usize {
        (current + 1) % self.devices.len()
    }

    /// Iterate over descriptors in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceDescriptor> {
        self.devices.iter()
    }
}

/// A captured face sample, ready for display.
///
/// The pixel buffer is opaque to this crate; the presentation layer decides
/// how to render it. Template bytes never leave the engine in this flow,
/// so the sample only carries the display image and its quality score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceSample {
    /// Display image pixels (engine-specific encoding).
    pub pixels: Vec<u8>,

    /// Image width in pixels.
    pub width: u32,

    /// Image height in pixels.
    pub height: u32,

    /// Quality score of the capture (0-100, higher is better).
    pub quality: u8,

    /// When the sample was captured.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl FaceSample {
    /// Create a new sample with the current timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the quality score exceeds 100 or the pixel buffer
    /// is empty.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, quality: u8) -> Result<Self> {
        if quality > MAX_SAMPLE_QUALITY {
            return Err(CaptureError::invalid_data(format!(
                "Sample quality must be 0-{}, got {}",
                MAX_SAMPLE_QUALITY, quality
            )));
        }
        if pixels.is_empty() {
            return Err(CaptureError::invalid_data("Sample pixel buffer is empty"));
        }

        Ok(Self {
            pixels,
            width,
            height,
            quality,
            timestamp: chrono::Utc::now(),
        })
    }

    /// Check if the capture quality meets or exceeds a threshold.
    pub fn meets_quality(&self, threshold: u8) -> bool {
        self.quality >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config_defaults() {
        let config = BackendConfig::default();
        assert_eq!(config.quality_threshold, 50);
        assert_eq!(config.confidence_threshold, 1);
        assert_eq!(
            config.properties.get("Faces.DetectAllFeaturePoints"),
            Some(&"false".to_string())
        );
        assert_eq!(
            config.properties.get("Faces.RecognizeExpression"),
            Some(&"false".to_string())
        );
    }

    #[test]
    fn test_device_descriptor_builder() {
        let descriptor =
            DeviceDescriptor::new("Front Camera", "UVC Camera").with_serial_number("CAM-001");

        assert_eq!(descriptor.display_name, "Front Camera");
        assert_eq!(descriptor.model, "UVC Camera");
        assert_eq!(descriptor.serial_number, Some("CAM-001".to_string()));
    }

    #[test]
    fn test_registry_rejects_empty_enumeration() {
        assert!(DeviceRegistry::new(vec![]).is_err());
    }

    #[test]
    fn test_registry_wrapping_index() {
        let registry = DeviceRegistry::new(vec![
            DeviceDescriptor::new("A", "Cam"),
            DeviceDescriptor::new("B", "Cam"),
        ])
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.next_index(0), 1);
        assert_eq!(registry.next_index(1), 0);
        assert_eq!(registry.get(1).unwrap().display_name, "B");
        assert!(registry.get(2).is_none());
    }

    #[test]
    fn test_single_device_registry_wraps_to_itself() {
        let registry = DeviceRegistry::new(vec![DeviceDescriptor::new("A", "Cam")]).unwrap();
        assert_eq!(registry.next_index(0), 0);
    }

    #[test]
    fn test_face_sample_quality_validation() {
        assert!(FaceSample::new(vec![0u8; 16], 4, 4, 0).is_ok());
        assert!(FaceSample::new(vec![0u8; 16], 4, 4, 100).is_ok());
        assert!(FaceSample::new(vec![0u8; 16], 4, 4, 101).is_err());
    }

    #[test]
    fn test_face_sample_rejects_empty_pixels() {
        assert!(FaceSample::new(vec![], 0, 0, 80).is_err());
    }

    #[test]
    fn test_face_sample_meets_quality() {
        let sample = FaceSample::new(vec![0u8; 16], 4, 4, 65).unwrap();
        assert!(sample.meets_quality(50));
        assert!(sample.meets_quality(65));
        assert!(!sample.meets_quality(66));
    }
}
