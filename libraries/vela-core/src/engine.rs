//! Platform engine primitive
//!
//! Abstracts the platform media player (AVPlayer, ExoPlayer, GStreamer, ...)
//! so the playback controller can drive it without knowing the backend.

use crate::asset::{Asset, CapabilityKey};
use crate::signal::SignalSender;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate above which the spectral pitch algorithm is selected
pub const SPECTRAL_PITCH_THRESHOLD: f32 = 2.0;

/// Handle for an observer registered with the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(pub u64);

/// Correlates an asynchronous capability load with its completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadTicket(pub u64);

/// Correlates a seek with its completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeekRequest(pub u64);

/// Audio pitch-correction algorithm applied while playing at a non-unit rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchAlgorithm {
    /// Time-domain stretching, suited to rates up to the threshold
    TimeDomain,

    /// Spectral (phase vocoder) stretching, required above the threshold
    Spectral,
}

impl PitchAlgorithm {
    /// Select the algorithm for a rate using the default threshold
    pub fn for_rate(rate: f32) -> Self {
        Self::for_rate_with_threshold(rate, SPECTRAL_PITCH_THRESHOLD)
    }

    /// Select the algorithm for a rate; the threshold itself is time-domain
    pub fn for_rate_with_threshold(rate: f32, threshold: f32) -> Self {
        if rate > threshold {
            PitchAlgorithm::Spectral
        } else {
            PitchAlgorithm::TimeDomain
        }
    }
}

/// Status of the playback item reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    /// Not yet known
    Unknown,

    /// Item can be played
    ReadyToPlay,

    /// Item failed with the engine's error description
    Failed(String),
}

/// Contiguous range of loaded media, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Range start
    pub start: f64,

    /// Range length
    pub duration: f64,
}

impl TimeRange {
    /// Create a new range
    pub fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }

    /// End offset of the range
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Platform media player driven by the playback controller
///
/// Commands are fire-and-forget. Everything the engine reports back
/// (completions, observed properties, periodic ticks) is posted as an
/// `EngineSignal` through the `SignalSender` handed over with the request or
/// registration; the engine may post from any thread.
pub trait PlaybackEngine: Send {
    /// Begin asynchronous resolution of `keys` on `asset`
    ///
    /// When resolution finishes (successfully or not) the engine posts
    /// `EngineSignal::CapabilitiesLoaded` carrying `ticket` and the asset with
    /// its key statuses, flags and duration filled in.
    fn load_capabilities(
        &mut self,
        asset: &Asset,
        keys: &[CapabilityKey],
        ticket: LoadTicket,
        reply: SignalSender,
    );

    /// Create a playback item for a validated asset and make it current
    fn bind_item(&mut self, asset: &Asset);

    /// Observe the current item's properties
    ///
    /// Duration, rate, status, buffer-empty, buffer-full, likely-to-keep-up,
    /// loaded time ranges and end-of-media are posted to `sink` until the
    /// observer is removed.
    fn observe_item(&mut self, sink: SignalSender) -> ObserverId;

    /// Register a recurring callback on the playback clock
    ///
    /// Each tick posts `EngineSignal::PeriodicTick` with the returned id.
    fn add_periodic_observer(&mut self, interval: Duration, sink: SignalSender) -> ObserverId;

    /// Remove an observer; unknown ids are ignored
    fn remove_observer(&mut self, id: ObserverId);

    /// Start playing immediately at `rate`, without waiting to buffer
    fn play(&mut self, rate: f32);

    /// Pause playback
    fn pause(&mut self);

    /// Seek to `seconds`; posts `EngineSignal::SeekCompleted` when done
    fn seek(&mut self, seconds: f64, request: SeekRequest, reply: SignalSender);

    /// Change the playback rate of the playing item
    fn set_rate(&mut self, rate: f32);

    /// Select the pitch-correction algorithm for the current item
    fn set_pitch_algorithm(&mut self, algorithm: PitchAlgorithm);

    /// Mute or unmute output
    fn set_muted(&mut self, muted: bool);
}
