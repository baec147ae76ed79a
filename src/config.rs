use std::fs;
use std::path::Path;

use egui::Modifiers;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Modifier key that switches hit testing from bounding boxes to exact geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecisionModifier {
    #[default]
    Alt,
    Shift,
    Ctrl,
}

impl PrecisionModifier {
    /// Returns true if this modifier is held in `modifiers`
    pub fn is_held(self, modifiers: Modifiers) -> bool {
        match self {
            Self::Alt => modifiers.alt,
            Self::Shift => modifiers.shift,
            Self::Ctrl => modifiers.ctrl || modifiers.command,
        }
    }
}

/// Tunables for the interaction core.
///
/// All `*_px` values are in screen pixels and are converted to document units
/// by dividing by the current zoom, so they feel the same at any zoom level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of commands kept on the undo stack
    pub history_depth: usize,
    /// Expansion applied to bounding boxes when hit testing
    pub hit_tolerance_px: f32,
    /// Stroke proximity tolerance used by precision hit testing
    pub precision_tolerance_px: f32,
    /// Grab radius of resize handles
    pub handle_radius_px: f32,
    /// Distance of the rotation handle above the top edge of the selection
    pub rotate_handle_offset_px: f32,
    /// Smallest width, height or length a committed shape may have
    pub min_shape_size: f32,
    /// Pointer travel below which a press-release is treated as a click
    pub drag_threshold_px: f32,
    pub precision_modifier: PrecisionModifier,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 100,
            hit_tolerance_px: 4.0,
            precision_tolerance_px: 1.0,
            handle_radius_px: 6.0,
            rotate_handle_offset_px: 24.0,
            min_shape_size: 2.0,
            drag_threshold_px: 3.0,
            precision_modifier: PrecisionModifier::Alt,
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Check that the values are usable together
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_depth == 0 {
            return Err(ConfigError::Invalid("history_depth must be at least 1".into()));
        }
        let non_negative = [
            ("hit_tolerance_px", self.hit_tolerance_px),
            ("precision_tolerance_px", self.precision_tolerance_px),
            ("handle_radius_px", self.handle_radius_px),
            ("rotate_handle_offset_px", self.rotate_handle_offset_px),
            ("drag_threshold_px", self.drag_threshold_px),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite, non-negative number (got {value})"
                )));
            }
        }
        if !self.min_shape_size.is_finite() || self.min_shape_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_shape_size must be positive (got {})",
                self.min_shape_size
            )));
        }
        // Bounding-box hits must stay a superset of precision hits
        if self.precision_tolerance_px > self.hit_tolerance_px {
            return Err(ConfigError::Invalid(format!(
                "precision_tolerance_px ({}) may not exceed hit_tolerance_px ({})",
                self.precision_tolerance_px, self.hit_tolerance_px
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = EditorConfig::from_json_str(r#"{ "history_depth": 5 }"#).unwrap();
        assert_eq!(config.history_depth, 5);
        assert_eq!(config.handle_radius_px, EditorConfig::default().handle_radius_px);
        assert_eq!(config.precision_modifier, PrecisionModifier::Alt);
    }

    #[test]
    fn parses_precision_modifier() {
        let config = EditorConfig::from_json_str(r#"{ "precision_modifier": "shift" }"#).unwrap();
        assert_eq!(config.precision_modifier, PrecisionModifier::Shift);
        assert!(config.precision_modifier.is_held(Modifiers::SHIFT));
        assert!(!config.precision_modifier.is_held(Modifiers::ALT));
    }

    #[test]
    fn rejects_zero_history_depth() {
        let result = EditorConfig::from_json_str(r#"{ "history_depth": 0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_precision_tolerance_above_hit_tolerance() {
        let result = EditorConfig::from_json_str(
            r#"{ "hit_tolerance_px": 2.0, "precision_tolerance_px": 3.0 }"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn reports_malformed_json() {
        let result = EditorConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
