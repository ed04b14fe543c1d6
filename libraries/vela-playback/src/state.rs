//! Playback states and the transition bookkeeping

use serde::{Deserialize, Serialize};
use std::fmt;
use vela_core::{Asset, PlaybackError};

/// Playback state
///
/// Exactly one state is active at a time. Equality is looser than structural
/// equality: two `SettingUp` states are equal iff their asset URLs match, and
/// any two `Failed` states are equal regardless of the error they carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No asset ready; initial state and the idle state after validation
    Uninitialized,

    /// Asset accepted, capability keys being validated
    SettingUp(Asset),

    /// Playing
    Playing,

    /// Paused by the user
    Paused,

    /// Paused by an external interruption (audio session)
    Interrupted,

    /// Waiting for enough media to be loaded
    Buffering,

    /// Reached the end of the media or the loop end
    Finished,

    /// Unrecoverable until a fresh setup
    Failed(PlaybackError),
}

impl PlaybackState {
    /// Short state name for logs
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackState::Uninitialized => "uninitialized",
            PlaybackState::SettingUp(_) => "setting-up",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
            PlaybackState::Interrupted => "interrupted",
            PlaybackState::Buffering => "buffering",
            PlaybackState::Finished => "finished",
            PlaybackState::Failed(_) => "failed",
        }
    }

    /// Check if currently playing
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    /// Check if buffering
    pub fn is_buffering(&self) -> bool {
        matches!(self, PlaybackState::Buffering)
    }

    /// Check if finished
    pub fn is_finished(&self) -> bool {
        matches!(self, PlaybackState::Finished)
    }

    /// Check if failed
    pub fn is_failed(&self) -> bool {
        matches!(self, PlaybackState::Failed(_))
    }
}

impl PartialEq for PlaybackState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PlaybackState::SettingUp(a), PlaybackState::SettingUp(b)) => a.url() == b.url(),
            (PlaybackState::Failed(_), PlaybackState::Failed(_)) => true,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::SettingUp(asset) => write!(f, "setting-up({})", asset.url()),
            PlaybackState::Failed(err) => write!(f, "failed({})", err),
            other => f.write_str(other.name()),
        }
    }
}

/// Current/previous state pair
///
/// Only records transitions; the controller applies side effects.
#[derive(Debug, Clone)]
pub struct StateMachine {
    current: PlaybackState,
    previous: PlaybackState,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a machine in `Uninitialized`
    pub fn new() -> Self {
        Self {
            current: PlaybackState::Uninitialized,
            previous: PlaybackState::Uninitialized,
        }
    }

    /// Active state
    pub fn current(&self) -> &PlaybackState {
        &self.current
    }

    /// State held immediately before the last accepted transition
    pub fn previous(&self) -> &PlaybackState {
        &self.previous
    }

    /// Move to `next`
    ///
    /// Returns the replaced state, or `None` if `next` equals the current
    /// state and nothing changed.
    pub fn transition(&mut self, next: PlaybackState) -> Option<PlaybackState> {
        if next == self.current {
            return None;
        }

        let replaced = std::mem::replace(&mut self.current, next);
        self.previous = replaced.clone();
        Some(replaced)
    }
}
