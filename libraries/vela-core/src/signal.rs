//! Engine signals and the channel that serializes them
//!
//! The engine reports from arbitrary background threads. Nothing it reports
//! touches controller state directly: every callback becomes an `EngineSignal`
//! queued on a channel, and the owning context drains the queue.

use crate::asset::Asset;
use crate::engine::{ItemStatus, LoadTicket, ObserverId, SeekRequest, TimeRange};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use serde::{Deserialize, Serialize};

/// Everything the engine can report back to the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EngineSignal {
    /// Item duration became known or changed (seconds)
    DurationChanged(f64),

    /// Engine playback rate changed
    RateChanged(f32),

    /// Item status changed
    StatusChanged(ItemStatus),

    /// Playback buffer ran empty (or refilled)
    BufferEmptyChanged(bool),

    /// Playback buffer is full
    BufferFullChanged(bool),

    /// Engine predicts playback will keep up
    LikelyToKeepUpChanged(bool),

    /// Loaded time ranges changed
    LoadedRangesChanged(Vec<TimeRange>),

    /// Item reached its end
    PlayedToEnd,

    /// Capability key resolution finished
    CapabilitiesLoaded {
        /// Ticket passed to `load_capabilities`
        ticket: LoadTicket,
        /// Asset with key statuses, flags and duration filled in
        asset: Asset,
    },

    /// Seek finished
    SeekCompleted {
        /// Request passed to `seek`
        request: SeekRequest,
        /// False if the seek was interrupted by another seek
        finished: bool,
    },

    /// Periodic time observer fired
    PeriodicTick {
        /// Observer that fired
        observer: ObserverId,
        /// Elapsed playback time in seconds
        elapsed: f64,
    },

    /// System interrupted playback (phone call, other audio session)
    InterruptionBegan,

    /// System interruption ended
    InterruptionEnded {
        /// Whether the system suggests resuming
        should_resume: bool,
    },
}

impl EngineSignal {
    /// Whether the signal comes from observing the bound item
    ///
    /// Completions, clock ticks and interruptions are session-scoped.
    pub fn is_item_scoped(&self) -> bool {
        !matches!(
            self,
            EngineSignal::CapabilitiesLoaded { .. }
                | EngineSignal::SeekCompleted { .. }
                | EngineSignal::PeriodicTick { .. }
                | EngineSignal::InterruptionBegan
                | EngineSignal::InterruptionEnded { .. }
        )
    }
}

/// Cloneable, thread-safe handle the engine uses to post signals
#[derive(Debug, Clone)]
pub struct SignalSender {
    tx: Sender<EngineSignal>,
}

impl SignalSender {
    /// Queue a signal for the owning context
    ///
    /// Signals posted after the controller is gone are dropped.
    pub fn send(&self, signal: EngineSignal) {
        if self.tx.send(signal).is_err() {
            tracing::trace!("Dropping engine signal: controller no longer listening");
        }
    }
}

/// Receiving end, drained by the owning context
#[derive(Debug)]
pub struct SignalInbox {
    rx: Receiver<EngineSignal>,
}

impl SignalInbox {
    /// Take the next queued signal without blocking
    pub fn try_next(&self) -> Option<EngineSignal> {
        match self.rx.try_recv() {
            Ok(signal) => Some(signal),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Number of queued signals
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Check if no signal is queued
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

/// Create a connected sender/inbox pair
pub fn signal_channel() -> (SignalSender, SignalInbox) {
    let (tx, rx) = unbounded();
    (SignalSender { tx }, SignalInbox { rx })
}
