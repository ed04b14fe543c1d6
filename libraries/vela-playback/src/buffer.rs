//! Buffering detection
//!
//! Folds the engine's three independent buffering signals (buffer empty,
//! likely to keep up, loaded time ranges) into one "buffered enough" decision.
//! The monitor only decides; the controller performs the transitions.
//!
//! Resuming is asymmetric: leaving `Buffering` for `Playing`
//! happens only when playback was `Playing` before buffering began, so
//! buffering never overrides an explicit pause.

use crate::state::PlaybackState;
use serde::{Deserialize, Serialize};
use vela_core::TimeRange;

/// Default share of the duration that must be buffered ahead (percent)
// TODO: tune once real streaming sessions are measured; 100% waits for a full buffer
pub const DEFAULT_ACCEPTABLE_BUFFER_PERCENTAGE: f64 = 100.0;

/// Snapshot of the buffering signals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BufferState {
    /// Seconds of contiguous media available from position 0
    pub buffered_time: f64,

    /// Engine reported an empty playback buffer
    pub is_playback_buffer_empty: bool,

    /// Engine reported a full playback buffer
    pub is_playback_buffer_full: bool,

    /// Engine predicts playback will keep up
    pub is_playback_likely_to_keep_up: bool,

    /// Enough media is loaded to resume without stalling
    pub is_buffered_enough: bool,
}

/// What a loaded-ranges change amounts to
#[derive(Debug, Clone, PartialEq)]
pub struct RangeUpdate {
    /// New buffered time
    pub buffered_time: f64,

    /// Whether enough is buffered
    pub is_buffered_enough: bool,

    /// Transition to request, if any
    pub transition: Option<PlaybackState>,
}

/// Derives buffering decisions from engine signals
#[derive(Debug, Clone)]
pub struct BufferMonitor {
    state: BufferState,
    is_local: bool,
    acceptable_percentage: f64,
}

impl Default for BufferMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_ACCEPTABLE_BUFFER_PERCENTAGE)
    }
}

impl BufferMonitor {
    /// Create a monitor requiring `acceptable_percentage` of the duration
    pub fn new(acceptable_percentage: f64) -> Self {
        Self {
            state: BufferState::default(),
            is_local: false,
            acceptable_percentage,
        }
    }

    /// Current snapshot
    pub fn state(&self) -> BufferState {
        self.state
    }

    /// Whether the asset is local (signals ignored)
    pub fn is_local(&self) -> bool {
        self.is_local
    }

    /// Mark the asset as local or remote
    pub fn set_local(&mut self, is_local: bool) {
        self.is_local = is_local;
    }

    /// Forget the previous asset's buffering; the local flag is kept
    pub fn reset(&mut self) {
        self.state = BufferState::default();
    }

    /// Record the buffer-empty flag
    ///
    /// Returns true when playback must switch to `Buffering`.
    pub fn buffer_empty_changed(&mut self, is_empty: bool) -> bool {
        if self.is_local {
            return false;
        }

        self.state.is_playback_buffer_empty = is_empty;
        is_empty && !self.state.is_playback_buffer_full
    }

    /// Record the buffer-full flag
    pub fn buffer_full_changed(&mut self, is_full: bool) {
        if self.is_local {
            return;
        }

        self.state.is_playback_buffer_full = is_full;
    }

    /// Record the likely-to-keep-up flag
    ///
    /// Returns true when listeners should be told playback will keep up.
    pub fn likely_to_keep_up_changed(&mut self, is_likely: bool) -> bool {
        if self.is_local {
            return false;
        }

        self.state.is_playback_likely_to_keep_up = is_likely;
        is_likely
    }

    /// Recompute buffered time from the loaded ranges
    ///
    /// Only the first contiguous range counts. Returns `None` for local assets
    /// and when no range is loaded.
    pub fn loaded_ranges_changed(
        &mut self,
        ranges: &[TimeRange],
        current_time: f64,
        duration: f64,
        current: &PlaybackState,
        previous: &PlaybackState,
    ) -> Option<RangeUpdate> {
        if self.is_local {
            return None;
        }
        let first = ranges.first()?;

        let buffered_time = first.end();
        let acceptable = duration * self.acceptable_percentage / 100.0;
        let is_buffered_enough =
            (buffered_time - current_time) > acceptable || buffered_time >= duration;

        self.state.buffered_time = buffered_time;
        self.state.is_buffered_enough = is_buffered_enough;

        let transition = if is_buffered_enough {
            (current.is_buffering() && previous.is_playing()).then_some(PlaybackState::Playing)
        } else {
            (!matches!(current, PlaybackState::Buffering | PlaybackState::Paused))
                .then_some(PlaybackState::Buffering)
        };

        Some(RangeUpdate {
            buffered_time,
            is_buffered_enough,
            transition,
        })
    }
}
