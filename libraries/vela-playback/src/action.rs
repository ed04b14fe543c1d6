//! User intents
//!
//! The closed set of actions a UI can send. Each maps onto exactly one
//! controller command.

use crate::controller::PlayerController;
use serde::{Deserialize, Serialize};
use vela_core::Asset;

/// Action requested by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Accept a new asset
    Setup {
        /// Asset to validate and bind
        asset: Asset,
        /// Mute output before playback starts
        start_muted: bool,
    },

    /// Start or resume playback
    Play,

    /// Pause playback
    Pause,

    /// Seek to a position in seconds; ignored until an item is bound
    SeekTo(f64),

    /// Change the playback rate; ignored until an item is bound
    SetRate(f32),

    /// Mark the asset as local, disabling buffering detection
    SetIsLocalAsset(bool),

    /// Enable or disable looping
    SetShouldLoop(bool),

    /// Loop start in seconds
    SetLoopStart(f64),

    /// Loop end in seconds
    SetLoopEnd(f64),

    /// Mute or unmute output
    SetMuted(bool),
}

impl PlayerController {
    /// Apply a user action
    pub fn dispatch(&mut self, action: Action) {
        tracing::trace!(?action, "Dispatching action");

        match action {
            Action::Setup { asset, start_muted } => self.setup(asset, start_muted),
            Action::Play => self.play(),
            Action::Pause => self.pause(),
            Action::SeekTo(seconds) => self.seek_to(seconds),
            Action::SetRate(rate) => self.set_rate(rate),
            Action::SetIsLocalAsset(is_local) => self.set_is_local_asset(is_local),
            Action::SetShouldLoop(should_loop) => self.set_should_loop(should_loop),
            Action::SetLoopStart(seconds) => self.set_loop_start(seconds),
            Action::SetLoopEnd(seconds) => self.set_loop_end(seconds),
            Action::SetMuted(muted) => self.set_muted(muted),
        }
    }
}
