//! Core types for playback control

use serde::{Deserialize, Serialize};

/// Loop window
///
/// When looping is enabled and elapsed time reaches `end_time`, playback is
/// forced to `Finished` and restarts from `start_time`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LoopConfig {
    should_loop: bool,
    start_time: f64,
    end_time: Option<f64>,
}

impl LoopConfig {
    /// Whether looping is enabled
    pub fn should_loop(&self) -> bool {
        self.should_loop
    }

    /// Loop start in seconds (always >= 0)
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Loop end in seconds, if set
    pub fn end_time(&self) -> Option<f64> {
        self.end_time
    }

    /// Enable or disable looping
    pub fn set_should_loop(&mut self, should_loop: bool) {
        self.should_loop = should_loop;
    }

    /// Set the loop start; negative (or NaN) values reset it to 0
    pub fn set_start_time(&mut self, seconds: f64) {
        self.start_time = if seconds >= 0.0 { seconds } else { 0.0 };
    }

    /// Set the loop end, clamped to `[0, duration]`
    ///
    /// Returns false, leaving the current end untouched, while the duration is
    /// unknown (zero) or the value is NaN.
    pub fn set_end_time(&mut self, seconds: f64, duration: f64) -> bool {
        if !(duration.is_finite() && duration > 0.0) || seconds.is_nan() {
            return false;
        }

        self.end_time = Some(seconds.clamp(0.0, duration));
        true
    }

    /// Pull a stored end back inside a (new) duration
    pub fn clamp_to_duration(&mut self, duration: f64) {
        if duration <= 0.0 {
            return;
        }
        if let Some(end) = self.end_time {
            if end > duration {
                self.end_time = Some(duration);
            }
        }
    }

    /// Check if `elapsed` has reached the end of an active loop window
    pub fn reached_end(&self, elapsed: f64) -> bool {
        self.should_loop && self.end_time.is_some_and(|end| elapsed >= end)
    }
}
