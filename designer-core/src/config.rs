//! Editor configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};
use crate::scene::DEFAULT_DUPLICATE_OFFSET;
use crate::viewport::{MAX_ZOOM, MIN_ZOOM};

/// Tunables for an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Offset applied to both axes of a duplicated element, in scene units.
    pub duplicate_offset: f32,
    /// Multiplier on wheel deltas when panning.
    pub wheel_pan_speed: f32,
    /// Lowest zoom percentage the host may set.
    pub min_zoom: f32,
    /// Highest zoom percentage the host may set.
    pub max_zoom: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            duplicate_offset: DEFAULT_DUPLICATE_OFFSET,
            wheel_pan_speed: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from JSON. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are
    /// inconsistent.
    pub fn from_json_str(json: &str) -> EditorResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_file(path: impl AsRef<Path>) -> EditorResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::debug!("Loaded editor config from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Check that the values make sense together.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Config`] describing the first bad value.
    pub fn validate(&self) -> EditorResult<()> {
        if !self.duplicate_offset.is_finite() {
            return Err(EditorError::Config(
                "duplicateOffset must be finite".to_string(),
            ));
        }
        if !self.wheel_pan_speed.is_finite() || self.wheel_pan_speed <= 0.0 {
            return Err(EditorError::Config(format!(
                "wheelPanSpeed must be positive, got {}",
                self.wheel_pan_speed
            )));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom && self.max_zoom.is_finite()) {
            return Err(EditorError::Config(format!(
                "zoom range {}..{} is invalid",
                self.min_zoom, self.max_zoom
            )));
        }
        Ok(())
    }

    /// Clamp a zoom percentage into the configured range.
    ///
    /// An inverted range resolves to `max_zoom`.
    #[must_use]
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.max(self.min_zoom).min(self.max_zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert!((config.duplicate_offset - 20.0).abs() < f32::EPSILON);
        assert!((config.wheel_pan_speed - 1.0).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json_str(r#"{"duplicateOffset": 5}"#).unwrap();
        assert!((config.duplicate_offset - 5.0).abs() < f32::EPSILON);
        assert!((config.max_zoom - MAX_ZOOM).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = EditorConfig::from_json_str(r#"{"wheelPanSpeed": 0}"#).unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));

        let err = EditorConfig::from_json_str(r#"{"minZoom": 300, "maxZoom": 200}"#).unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));

        let err = EditorConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, EditorError::Serialization(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"wheelPanSpeed": 2.5}}"#).unwrap();
        let config = EditorConfig::from_file(file.path()).unwrap();
        assert!((config.wheel_pan_speed - 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EditorConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, EditorError::Io(_)));
    }

    #[test]
    fn test_clamp_zoom() {
        let config = EditorConfig {
            min_zoom: 50.0,
            max_zoom: 150.0,
            ..EditorConfig::default()
        };
        assert!((config.clamp_zoom(10.0) - 50.0).abs() < f32::EPSILON);
        assert!((config.clamp_zoom(400.0) - 150.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_clamp_zoom_with_inverted_range_does_not_panic() {
        let config = EditorConfig {
            min_zoom: 300.0,
            max_zoom: 200.0,
            ..EditorConfig::default()
        };
        assert!(config.validate().is_err());
        assert!((config.clamp_zoom(250.0) - 200.0).abs() < f32::EPSILON);
    }
}
