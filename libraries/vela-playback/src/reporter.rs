//! Periodic time reporting
//!
//! Two recurring callbacks run against the engine's playback clock: a coarse
//! one (~1s) for time labels and a fine one (~10ms) for scrubbers and for
//! detecting the loop end. Both are registered with the engine together with
//! the item observer and released together.

use crate::state::PlaybackState;
use crate::types::LoopConfig;
use std::time::Duration;
use vela_core::{format_time, ObserverId, PlaybackEngine, SignalSender};

/// Which clock a tick came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// ~1s cadence
    Coarse,

    /// ~10ms cadence
    Fine,
}

/// Result of applying a tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickUpdate {
    /// Clock that fired
    pub kind: TickKind,

    /// Elapsed seconds
    pub elapsed: f64,

    /// "mm:ss" display string
    pub text: String,

    /// The loop end was reached; playback must finish
    pub loop_end_reached: bool,
}

/// Asset-scoped engine registrations
///
/// Item observation plus both periodic observers. Registered once an item is
/// bound; released on asset replacement, failure, shutdown and drop. Ticks
/// from observers not in the set are stale.
#[derive(Debug, Default)]
pub struct ObserverSet {
    item: Option<ObserverId>,
    coarse: Option<ObserverId>,
    fine: Option<ObserverId>,
}

impl ObserverSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Register item observation and both clocks, replacing any earlier set
    pub fn register(
        &mut self,
        engine: &mut dyn PlaybackEngine,
        sink: &SignalSender,
        coarse_interval: Duration,
        fine_interval: Duration,
    ) {
        self.release(engine);

        self.item = Some(engine.observe_item(sink.clone()));
        self.coarse = Some(engine.add_periodic_observer(coarse_interval, sink.clone()));
        self.fine = Some(engine.add_periodic_observer(fine_interval, sink.clone()));
    }

    /// Remove every registration from the engine
    pub fn release(&mut self, engine: &mut dyn PlaybackEngine) {
        let ids = [self.item.take(), self.coarse.take(), self.fine.take()];
        for id in ids.into_iter().flatten() {
            engine.remove_observer(id);
        }
    }

    /// Whether an item is currently observed
    pub fn is_observing_item(&self) -> bool {
        self.item.is_some()
    }

    /// Classify a tick by its observer
    pub fn tick_kind(&self, observer: ObserverId) -> Option<TickKind> {
        if self.coarse == Some(observer) {
            Some(TickKind::Coarse)
        } else if self.fine == Some(observer) {
            Some(TickKind::Fine)
        } else {
            None
        }
    }
}

/// Turns clock ticks into elapsed-time updates
#[derive(Debug, Clone)]
pub struct PeriodicTimeReporter {
    coarse_interval: Duration,
    fine_interval: Duration,
}

impl Default for PeriodicTimeReporter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_millis(10))
    }
}

impl PeriodicTimeReporter {
    /// Create a reporter with the given cadences
    pub fn new(coarse_interval: Duration, fine_interval: Duration) -> Self {
        Self {
            coarse_interval,
            fine_interval,
        }
    }

    /// Coarse cadence
    pub fn coarse_interval(&self) -> Duration {
        self.coarse_interval
    }

    /// Fine cadence
    pub fn fine_interval(&self) -> Duration {
        self.fine_interval
    }

    /// Apply a tick
    ///
    /// Ticks are skipped while `Finished`, so a late tick cannot overwrite the
    /// loop-restart position. Only fine ticks check the loop end.
    pub fn on_tick(
        &self,
        kind: TickKind,
        elapsed: f64,
        state: &PlaybackState,
        loop_config: &LoopConfig,
    ) -> Option<TickUpdate> {
        if state.is_finished() {
            return None;
        }

        Some(TickUpdate {
            kind,
            elapsed,
            text: format_time(elapsed),
            loop_end_reached: kind == TickKind::Fine && loop_config.reached_end(elapsed),
        })
    }
}
