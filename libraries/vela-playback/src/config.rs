//! Controller configuration

use crate::buffer::DEFAULT_ACCEPTABLE_BUFFER_PERCENTAGE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use vela_core::{PlaybackError, Result, SPECTRAL_PITCH_THRESHOLD};

/// Tunables for a `PlayerController`
///
/// Every field has a default, so a file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Coarse time-report cadence in milliseconds (default: 1000)
    pub coarse_tick_ms: u64,

    /// Fine time-report cadence in milliseconds (default: 10)
    pub fine_tick_ms: u64,

    /// Share of the duration that must be buffered ahead, in percent (default: 100)
    pub acceptable_buffer_percentage: f64,

    /// Initial playback rate (default: 1.0)
    pub default_rate: f32,

    /// Rates above this use spectral pitch correction (default: 2.0)
    pub spectral_pitch_threshold: f32,

    /// Mute output when the controller is created (default: false)
    pub start_muted: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            coarse_tick_ms: 1000,
            fine_tick_ms: 10,
            acceptable_buffer_percentage: DEFAULT_ACCEPTABLE_BUFFER_PERCENTAGE,
            default_rate: 1.0,
            spectral_pitch_threshold: SPECTRAL_PITCH_THRESHOLD,
            start_muted: false,
        }
    }
}

impl ControllerConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// The file format follows its extension (TOML, JSON, ...). Environment
    /// variables prefixed with `VELA_` override file values, e.g.
    /// `VELA_FINE_TICK_MS=20`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        }

        settings = settings.add_source(config::Environment::with_prefix("VELA").try_parsing(true));

        let config: Self = settings
            .build()
            .and_then(|built| built.try_deserialize())
            .map_err(|e| PlaybackError::config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.coarse_tick_ms == 0 || self.fine_tick_ms == 0 {
            return Err(PlaybackError::config("tick intervals must be non-zero"));
        }

        if !self.acceptable_buffer_percentage.is_finite() || self.acceptable_buffer_percentage < 0.0
        {
            return Err(PlaybackError::config(format!(
                "acceptable_buffer_percentage must be a non-negative number, got {}",
                self.acceptable_buffer_percentage
            )));
        }

        if !self.default_rate.is_finite() {
            return Err(PlaybackError::config("default_rate must be finite"));
        }

        if !self.spectral_pitch_threshold.is_finite() {
            return Err(PlaybackError::config("spectral_pitch_threshold must be finite"));
        }

        Ok(())
    }

    /// Coarse cadence as a `Duration`
    pub fn coarse_interval(&self) -> Duration {
        Duration::from_millis(self.coarse_tick_ms)
    }

    /// Fine cadence as a `Duration`
    pub fn fine_interval(&self) -> Duration {
        Duration::from_millis(self.fine_tick_ms)
    }
}
