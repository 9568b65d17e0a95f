#![forbid(unsafe_code)]

//! Tunable canvas parameters.
//!
//! Loaded from TOML or JSON; every field has a default so a partial file
//! (or none) works.
//!
//! ```toml
//! # sprout.toml
//! zoom_step = 0.25
//! fine_snap_unit = 0.5
//!
//! [gesture]
//! long_press_ms = 650
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use sprout_core::gesture::GestureConfig;
use sprout_core::units::LengthUnit;
use thiserror::Error;
use web_time::Duration;

/// Canvas configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Zoom change per step button press.
    pub zoom_step: f64,
    /// Screen pixels a pointer must travel before a drag moves anything.
    pub drag_dead_zone_px: f64,
    /// Snap unit in fine mode, inches.
    pub fine_snap_unit: f64,
    /// Offset of the first object in an added batch from the plot corner.
    pub arrange_margin: f64,
    /// Gap between objects in an added batch.
    pub arrange_spacing: f64,
    /// Unit for bare numbers in typed sizes.
    pub default_unit: LengthUnit,
    pub gesture: GestureSettings,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            zoom_min: 0.3,
            zoom_max: 3.0,
            zoom_step: 0.1,
            drag_dead_zone_px: 3.0,
            fine_snap_unit: 1.0,
            arrange_margin: 12.0,
            arrange_spacing: 12.0,
            default_unit: LengthUnit::Feet,
            gesture: GestureSettings::default(),
        }
    }
}

/// Touch thresholds in config-file units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    pub long_press_ms: u64,
    pub touch_slop_px: f64,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            long_press_ms: 500,
            touch_slop_px: 10.0,
        }
    }
}

impl GestureSettings {
    #[must_use]
    pub fn to_gesture_config(&self) -> GestureConfig {
        GestureConfig {
            long_press_threshold: Duration::from_millis(self.long_press_ms),
            touch_slop: self.touch_slop_px,
        }
    }
}

impl CanvasConfig {
    /// Load and validate a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)
            .map_err(ConfigError::Toml)?
            .validated()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load and validate a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)
            .map_err(ConfigError::Json)?
            .validated()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check every parameter. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.zoom_min > 0.0) {
            errors.push(format!("zoom_min must be > 0, got {}", self.zoom_min));
        }
        if !(self.zoom_max >= self.zoom_min) {
            errors.push(format!(
                "zoom_max ({}) must be >= zoom_min ({})",
                self.zoom_max, self.zoom_min
            ));
        }
        if !(self.zoom_step > 0.0) {
            errors.push(format!("zoom_step must be > 0, got {}", self.zoom_step));
        }
        if !(self.drag_dead_zone_px >= 0.0) {
            errors.push(format!(
                "drag_dead_zone_px must be >= 0, got {}",
                self.drag_dead_zone_px
            ));
        }
        if !(self.fine_snap_unit > 0.0) {
            errors.push(format!(
                "fine_snap_unit must be > 0, got {}",
                self.fine_snap_unit
            ));
        }
        if !(self.arrange_margin >= 0.0) || !(self.arrange_spacing >= 0.0) {
            errors.push("arrange_margin and arrange_spacing must be >= 0".into());
        }
        if !(self.gesture.touch_slop_px >= 0.0) {
            errors.push(format!(
                "gesture.touch_slop_px must be >= 0, got {}",
                self.gesture.touch_slop_px
            ));
        }
        if self.gesture.long_press_ms == 0 {
            errors.push("gesture.long_press_ms must be > 0".into());
        }

        errors
    }

    /// Return the config if valid.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// The config itself if valid, otherwise the defaults.
    #[must_use]
    pub fn or_default(self) -> Self {
        let errors = self.validate();
        if errors.is_empty() {
            return self;
        }
        tracing::warn!(
            target: "sprout.canvas",
            errors = %errors.join("; "),
            "invalid canvas config, using defaults"
        );
        Self::default()
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
