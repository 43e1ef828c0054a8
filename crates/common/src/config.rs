//! Editor configuration: playback timing, zoom bounds, export defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::quality::ExportQuality;

/// Top-level editor configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub playback: PlaybackConfig,
    pub zoom: ZoomConfig,
    pub default_quality: ExportQuality,
    /// Name given to a freshly created project.
    pub project_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            zoom: ZoomConfig::default(),
            default_quality: ExportQuality::Hd1080,
            project_name: "New Video Project".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON document. Missing fields fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.display(), "Loaded editor config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| {
            Err(ConfigError::Invalid {
                reason: reason.to_string(),
            })
        };

        if self.playback.tick_interval_ms == 0 {
            return invalid("playback.tick_interval_ms must be > 0");
        }
        if !(self.playback.tick_step_secs.is_finite() && self.playback.tick_step_secs > 0.0) {
            return invalid("playback.tick_step_secs must be a positive number");
        }
        if !(self.playback.skip_secs.is_finite() && self.playback.skip_secs >= 0.0) {
            return invalid("playback.skip_secs must be a non-negative number");
        }
        if !(self.zoom.min > 0.0 && self.zoom.min <= self.zoom.max && self.zoom.max.is_finite()) {
            return invalid("zoom bounds must satisfy 0 < min <= max");
        }
        if !(self.zoom.step_factor.is_finite() && self.zoom.step_factor > 1.0) {
            return invalid("zoom.step_factor must be > 1");
        }
        if !(self.zoom.base_pixels_per_second.is_finite() && self.zoom.base_pixels_per_second > 0.0)
        {
            return invalid("zoom.base_pixels_per_second must be > 0");
        }
        Ok(())
    }
}

/// Playback clock timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Wall-clock period between ticks.
    pub tick_interval_ms: u64,
    /// Timeline seconds advanced per tick.
    pub tick_step_secs: f64,
    /// Distance covered by skip back / skip forward.
    pub skip_secs: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            tick_step_secs: 0.1,
            skip_secs: 10.0,
        }
    }
}

/// Timeline zoom bounds and pixel scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f64,
    pub max: f64,
    /// Multiplier applied by one zoom-in step (divisor for zoom-out).
    pub step_factor: f64,
    /// Pixels per timeline second at zoom 1.0.
    pub base_pixels_per_second: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 0.1,
            max: 5.0,
            step_factor: 1.5,
            base_pixels_per_second: 50.0,
        }
    }
}

impl ZoomConfig {
    /// Effective `(min, max)`. Unusable bounds fall back to the defaults.
    pub fn bounds(&self) -> (f64, f64) {
        if self.min > 0.0 && self.min <= self.max && self.max.is_finite() {
            (self.min, self.max)
        } else {
            let defaults = Self::default();
            (defaults.min, defaults.max)
        }
    }

    /// Clamp into [`bounds`](Self::bounds). Non-finite input becomes 1.0.
    pub fn clamp(&self, zoom: f64) -> f64 {
        let (min, max) = self.bounds();
        let zoom = if zoom.is_finite() { zoom } else { 1.0 };
        zoom.max(min).min(max)
    }
}
