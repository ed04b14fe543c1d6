//! Player Events
//!
//! Push notifications for UI consumers. Events are emitted on the owning
//! context at key points:
//! - Asset validated and bound (asset changed, player ready)
//! - State changes
//! - Elapsed time updates (coarse and fine-grained)
//! - Buffering progress
//! - End of playback

use crate::state::PlaybackState;
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use vela_core::AssetUrl;

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// A validated asset was bound to the engine
    AssetChanged(AssetUrl),

    /// The bound asset is ready to play
    PlayerReady,

    /// Playback state changed
    StateChanged {
        /// State before the transition
        previous: PlaybackState,
        /// State after the transition
        current: PlaybackState,
    },

    /// Elapsed time update from the coarse (~1s) clock
    CurrentTimeChanged {
        /// Elapsed seconds
        seconds: f64,
        /// "mm:ss" display string
        text: String,
    },

    /// Elapsed time update from the fine (~10ms) clock
    CurrentTimeChangedFine {
        /// Elapsed seconds
        seconds: f64,
        /// "mm:ss" display string
        text: String,
    },

    /// Playback reached the end without looping
    PlaybackEnded,

    /// Engine predicts playback will keep up
    LikelyToKeepUp,

    /// Contiguous buffered time changed (seconds from 0)
    BufferedTimeChanged(f64),

    /// Item duration changed (seconds)
    DurationChanged(f64),

    /// Engine-reported playback rate changed
    RateChanged(f32),
}

/// Receives player events
///
/// Called on the controller's owning context; implementations should return
/// quickly.
pub trait PlayerListener: Send + Sync {
    /// Called for every event
    fn on_event(&self, event: &PlayerEvent);
}

/// Listener that forwards events into a channel
///
/// For UI threads that poll instead of being called back.
#[derive(Debug)]
pub struct ChannelListener {
    tx: Sender<PlayerEvent>,
}

impl ChannelListener {
    /// Create a listener and the receiver its events arrive on
    pub fn new() -> (Arc<Self>, Receiver<PlayerEvent>) {
        let (tx, rx) = unbounded();
        (Arc::new(Self { tx }), rx)
    }
}

impl PlayerListener for ChannelListener {
    fn on_event(&self, event: &PlayerEvent) {
        // Receiver gone: nobody is polling any more
        self.tx.send(event.clone()).ok();
    }
}

/// Non-owning listener slot
#[derive(Default)]
pub(crate) struct Notifier {
    listener: Option<Weak<dyn PlayerListener>>,
}

impl Notifier {
    pub(crate) fn set<L: PlayerListener + 'static>(&mut self, listener: &Arc<L>) {
        let weak: Weak<L> = Arc::downgrade(listener);
        self.listener = Some(weak);
    }

    pub(crate) fn clear(&mut self) {
        self.listener = None;
    }

    pub(crate) fn notify(&self, event: PlayerEvent) {
        match self.listener.as_ref().and_then(Weak::upgrade) {
            Some(listener) => listener.on_event(&event),
            None => tracing::trace!(?event, "No listener attached"),
        }
    }
}
