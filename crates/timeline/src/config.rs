//! Reconstruction and layout settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};

/// Maximum gap between a start and its matching end.
pub const DEFAULT_WINDOW_MS: u64 = 100;
/// Lower bound on the time domain so near-empty traces keep a usable scale.
pub const DEFAULT_TIME_FLOOR_MS: u64 = 1000;
pub const DEFAULT_WIDTH_PX: f32 = 1200.0;
pub const DEFAULT_ROW_HEIGHT_PX: f32 = 40.0;
pub const DEFAULT_GRID_STEP_MS: u64 = 1000;
/// Zero-length spans still get this many pixels.
pub const DEFAULT_MIN_SPAN_WIDTH_PX: f32 = 2.0;

/// Settings for one reconstruction pass.
///
/// Every field has a default, so a TOML file only needs the keys it
/// overrides:
///
/// ```toml
/// width_px = 1600
/// window_ms = 250
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimelineConfig {
    /// Tolerance window for start/end pairing
    pub window_ms: u64,
    /// Floor applied to the largest timestamp
    pub time_floor_ms: u64,
    /// Horizontal extent of the time axis
    pub width_px: f32,
    /// Height of one roster row
    pub row_height_px: f32,
    /// Spacing of vertical grid lines
    pub grid_step_ms: u64,
    /// Minimum on-screen width of an execution span
    pub min_span_width_px: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
            time_floor_ms: DEFAULT_TIME_FLOOR_MS,
            width_px: DEFAULT_WIDTH_PX,
            row_height_px: DEFAULT_ROW_HEIGHT_PX,
            grid_step_ms: DEFAULT_GRID_STEP_MS,
            min_span_width_px: DEFAULT_MIN_SPAN_WIDTH_PX,
        }
    }
}

impl TimelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(mut self, window_ms: u64) -> Self {
        self.window_ms = window_ms;
        self
    }

    pub fn with_width(mut self, width_px: f32) -> Self {
        self.width_px = width_px;
        self
    }

    pub fn with_row_height(mut self, row_height_px: f32) -> Self {
        self.row_height_px = row_height_px;
        self
    }

    pub fn with_grid_step(mut self, grid_step_ms: u64) -> Self {
        self.grid_step_ms = grid_step_ms;
        self
    }

    /// Parse a TOML document and validate it.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    /// Reject values the layout cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.width_px.is_finite() && self.width_px > 0.0) {
            return Err(TimelineError::InvalidConfig(format!(
                "width_px must be positive, got {}",
                self.width_px
            )));
        }
        if !(self.row_height_px.is_finite() && self.row_height_px > 0.0) {
            return Err(TimelineError::InvalidConfig(format!(
                "row_height_px must be positive, got {}",
                self.row_height_px
            )));
        }
        if !(self.min_span_width_px.is_finite() && self.min_span_width_px >= 0.0) {
            return Err(TimelineError::InvalidConfig(format!(
                "min_span_width_px must not be negative, got {}",
                self.min_span_width_px
            )));
        }
        if self.grid_step_ms == 0 {
            return Err(TimelineError::InvalidConfig(
                "grid_step_ms must be at least 1".to_string(),
            ));
        }
        if self.time_floor_ms == 0 {
            return Err(TimelineError::InvalidConfig(
                "time_floor_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = TimelineConfig::default();
        assert_eq!(config.window_ms, 100);
        assert_eq!(config.time_floor_ms, 1000);
        assert_eq!(config.grid_step_ms, 1000);
        assert_eq!(config.min_span_width_px, 2.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TimelineConfig::from_toml_str("width_px = 800.0\nwindow_ms = 250\n").unwrap();

        assert_eq!(
            config,
            TimelineConfig::default().with_width(800.0).with_window(250)
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = TimelineConfig::from_toml_str("widht_px = 10.0").unwrap_err();
        assert!(matches!(err, TimelineError::Config(_)));
    }

    #[test]
    fn test_zero_grid_step_rejected() {
        let err = TimelineConfig::from_toml_str("grid_step_ms = 0").unwrap_err();
        assert!(matches!(err, TimelineError::InvalidConfig(_)));
    }

    #[test]
    fn test_negative_width_rejected() {
        let err = TimelineConfig::default().with_width(-5.0).validate().unwrap_err();
        assert!(err.to_string().contains("width_px"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timeline.toml");
        std::fs::write(&path, "row_height_px = 24.0\n").unwrap();

        let config = TimelineConfig::load(&path).unwrap();
        assert_eq!(config.row_height_px, 24.0);
        assert_eq!(config.width_px, DEFAULT_WIDTH_PX);
    }
}
