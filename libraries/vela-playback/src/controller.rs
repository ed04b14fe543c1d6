//! Playback controller - core orchestration
//!
//! Owns the state machine, the engine, the asset loader, the buffer monitor
//! and the observer registrations. Every mutation runs on the context that
//! owns the controller: engine callbacks arrive as `EngineSignal`s queued on
//! the controller's inbox and are applied by `process_pending`.

use crate::{
    buffer::{BufferMonitor, BufferState},
    config::ControllerConfig,
    events::{Notifier, PlayerEvent, PlayerListener},
    loader::{AssetLoader, LoadOutcome},
    reporter::{ObserverSet, PeriodicTimeReporter, TickKind},
    state::{PlaybackState, StateMachine},
    types::LoopConfig,
};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use vela_core::{
    format_time, signal_channel, Asset, EngineSignal, ItemStatus, LoadTicket, ObserverId,
    PitchAlgorithm, PlaybackEngine, PlaybackError, SeekRequest, SignalInbox, SignalSender,
    TimeRange,
};

/// Why a seek was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeekPurpose {
    /// Explicit seek from the user
    User,

    /// Jump back to the loop start after finishing
    LoopRestart,
}

#[derive(Debug, Clone, Copy)]
struct PendingSeek {
    request: SeekRequest,
    target: f64,
    purpose: SeekPurpose,
}

/// Playback state controller
///
/// Translates asynchronous engine signals and user intents into a single
/// playback state and a stable event stream. Not `Sync`: all calls must come
/// from the owning context, which also drains the signal inbox.
pub struct PlayerController {
    engine: Box<dyn PlaybackEngine>,
    config: ControllerConfig,
    machine: StateMachine,
    notifier: Notifier,

    /// Asset of the current session (validated or not)
    asset: Option<Asset>,
    loader: AssetLoader,
    buffer: BufferMonitor,
    observers: ObserverSet,
    reporter: PeriodicTimeReporter,
    loop_config: LoopConfig,

    rate: f32,
    is_muted: bool,
    current_time: f64,
    current_time_text: String,
    duration: f64,

    last_seek: u64,
    pending_seek: Option<PendingSeek>,

    sender: SignalSender,
    inbox: SignalInbox,
    is_shut_down: bool,
}

impl PlayerController {
    /// Create a controller driving `engine`
    pub fn new(engine: Box<dyn PlaybackEngine>, config: ControllerConfig) -> Self {
        let (sender, inbox) = signal_channel();
        let reporter = PeriodicTimeReporter::new(config.coarse_interval(), config.fine_interval());

        let mut controller = Self {
            engine,
            machine: StateMachine::new(),
            notifier: Notifier::default(),
            asset: None,
            loader: AssetLoader::new(),
            buffer: BufferMonitor::new(config.acceptable_buffer_percentage),
            observers: ObserverSet::new(),
            reporter,
            loop_config: LoopConfig::default(),
            rate: config.default_rate,
            is_muted: false,
            current_time: 0.0,
            current_time_text: format_time(0.0),
            duration: 0.0,
            last_seek: 0,
            pending_seek: None,
            sender,
            inbox,
            is_shut_down: false,
            config,
        };

        if controller.config.start_muted {
            controller.set_muted(true);
        }

        controller
    }

    /// Create a controller with default configuration
    pub fn with_defaults(engine: Box<dyn PlaybackEngine>) -> Self {
        Self::new(engine, ControllerConfig::default())
    }

    // ===== Listener =====

    /// Attach the listener; only a weak reference is kept
    pub fn set_listener<L: PlayerListener + 'static>(&mut self, listener: &Arc<L>) {
        self.notifier.set(listener);
    }

    /// Detach the listener
    pub fn clear_listener(&mut self) {
        self.notifier.clear();
    }

    // ===== Accessors =====

    /// Current playback state
    pub fn state(&self) -> &PlaybackState {
        self.machine.current()
    }

    /// State before the last accepted transition
    pub fn previous_state(&self) -> &PlaybackState {
        self.machine.previous()
    }

    /// Asset of the current session
    pub fn asset(&self) -> Option<&Asset> {
        self.asset.as_ref()
    }

    /// Elapsed seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Elapsed time as "mm:ss"
    pub fn current_time_text(&self) -> &str {
        &self.current_time_text
    }

    /// Duration in seconds (0 while unknown)
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Requested playback rate
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Pitch algorithm for the requested rate
    pub fn pitch_algorithm(&self) -> PitchAlgorithm {
        PitchAlgorithm::for_rate_with_threshold(self.rate, self.config.spectral_pitch_threshold)
    }

    /// Whether output is muted
    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    /// Loop window
    pub fn loop_config(&self) -> &LoopConfig {
        &self.loop_config
    }

    /// Buffering snapshot
    pub fn buffer_state(&self) -> BufferState {
        self.buffer.state()
    }

    /// Whether the asset is treated as local
    pub fn is_local_asset(&self) -> bool {
        self.buffer.is_local()
    }

    /// Configuration in use
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Whether `shutdown` has run
    pub fn is_shut_down(&self) -> bool {
        self.is_shut_down
    }

    /// Handle for posting signals from engine threads
    pub fn signal_sender(&self) -> SignalSender {
        self.sender.clone()
    }

    // ===== State machine =====

    /// Move to `next`, applying its side effect and notifying the listener
    ///
    /// A transition to a state equal to the current one does nothing.
    pub fn set_state(&mut self, next: PlaybackState) {
        if self.is_shut_down {
            debug!(state = %next, "Ignoring transition after shutdown");
            return;
        }

        let Some(previous) = self.machine.transition(next) else {
            trace!(state = %self.machine.current(), "Already in requested state");
            return;
        };

        let current = self.machine.current().clone();
        debug!(from = %previous, to = %current, "Playback state changed");

        self.apply_side_effect(&current);
        self.notifier.notify(PlayerEvent::StateChanged { previous, current });
    }

    fn apply_side_effect(&mut self, state: &PlaybackState) {
        match state {
            PlaybackState::SettingUp(asset) => self.begin_setup(asset.clone()),
            PlaybackState::Playing => self.engine.play(self.rate),
            PlaybackState::Finished => {
                self.engine.pause();
                if self.loop_config.should_loop() {
                    let start = self.loop_config.start_time();
                    self.start_seek(start, SeekPurpose::LoopRestart);
                } else {
                    self.notifier.notify(PlayerEvent::PlaybackEnded);
                }
            }
            PlaybackState::Uninitialized
            | PlaybackState::Paused
            | PlaybackState::Interrupted
            | PlaybackState::Buffering
            | PlaybackState::Failed(_) => self.engine.pause(),
        }
    }

    /// Drop everything scoped to the previous asset and start validating
    fn begin_setup(&mut self, asset: Asset) {
        self.observers.release(self.engine.as_mut());
        self.pending_seek = None;
        self.buffer.reset();
        self.update_time(0.0);
        self.duration = asset.duration().unwrap_or(0.0);

        self.loader
            .begin(&asset, self.engine.as_mut(), self.sender.clone());
        self.asset = Some(asset);
    }

    // ===== Signal dispatch =====

    /// Apply every queued engine signal without blocking
    ///
    /// Signals posted while handling (a synchronous seek completion, say) are
    /// applied in the same call. Returns the number handled.
    pub fn process_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Some(signal) = self.inbox.try_next() {
            self.handle_signal(signal);
            handled += 1;
        }
        handled
    }

    /// Route one engine signal to its handler
    pub fn handle_signal(&mut self, signal: EngineSignal) {
        if self.is_shut_down {
            trace!(?signal, "Ignoring signal after shutdown");
            return;
        }
        if signal.is_item_scoped() && !self.observers.is_observing_item() {
            debug!(?signal, "Ignoring item signal: no item bound");
            return;
        }

        match signal {
            EngineSignal::DurationChanged(seconds) => self.on_duration_changed(seconds),
            EngineSignal::RateChanged(rate) => {
                self.notifier.notify(PlayerEvent::RateChanged(rate));
            }
            EngineSignal::StatusChanged(status) => self.on_status_changed(status),
            EngineSignal::BufferEmptyChanged(is_empty) => {
                if self.buffer.buffer_empty_changed(is_empty) {
                    self.set_state(PlaybackState::Buffering);
                }
            }
            EngineSignal::BufferFullChanged(is_full) => self.buffer.buffer_full_changed(is_full),
            EngineSignal::LikelyToKeepUpChanged(is_likely) => {
                if self.buffer.likely_to_keep_up_changed(is_likely) {
                    self.notifier.notify(PlayerEvent::LikelyToKeepUp);
                }
            }
            EngineSignal::LoadedRangesChanged(ranges) => self.on_loaded_ranges_changed(&ranges),
            EngineSignal::PlayedToEnd => self.set_state(PlaybackState::Finished),
            EngineSignal::CapabilitiesLoaded { ticket, asset } => {
                self.on_capabilities_loaded(ticket, asset);
            }
            EngineSignal::SeekCompleted { request, finished } => {
                self.on_seek_completed(request, finished);
            }
            EngineSignal::PeriodicTick { observer, elapsed } => {
                self.on_periodic_tick(observer, elapsed);
            }
            EngineSignal::InterruptionBegan => self.on_interruption_began(),
            EngineSignal::InterruptionEnded { should_resume } => {
                self.on_interruption_ended(should_resume);
            }
        }
    }

    fn on_capabilities_loaded(&mut self, ticket: LoadTicket, resolved: Asset) {
        let current = self.asset.as_ref().map(Asset::url);
        let outcome = self.loader.complete(ticket, resolved, current);

        match outcome {
            LoadOutcome::Stale => {
                debug!(ticket = ticket.0, "Discarding validation of superseded asset");
            }
            LoadOutcome::Failed(err) => {
                warn!(error = %err, "Asset validation failed");
                self.observers.release(self.engine.as_mut());
                self.set_state(PlaybackState::Failed(err));
            }
            LoadOutcome::Ready(asset) => self.bind_ready_asset(asset),
        }
    }

    fn bind_ready_asset(&mut self, asset: Asset) {
        if let Some(duration) = asset.duration() {
            self.duration = duration;
            self.loop_config.clamp_to_duration(duration);
        }

        self.engine.bind_item(&asset);
        self.engine.set_pitch_algorithm(self.pitch_algorithm());
        self.observers.register(
            self.engine.as_mut(),
            &self.sender,
            self.reporter.coarse_interval(),
            self.reporter.fine_interval(),
        );

        info!(url = %asset.url(), duration = self.duration, "Asset ready");
        let url = asset.url().clone();
        self.asset = Some(asset);

        self.notifier.notify(PlayerEvent::AssetChanged(url));
        self.notifier.notify(PlayerEvent::PlayerReady);

        let state = self.machine.current();
        if state.is_playing() {
            // Play was requested during setup; the new item needs the command
            self.engine.play(self.rate);
        } else if !matches!(state, PlaybackState::Paused | PlaybackState::Buffering) {
            self.set_state(PlaybackState::Uninitialized);
        }
    }

    fn on_seek_completed(&mut self, request: SeekRequest, finished: bool) {
        let Some(pending) = self.pending_seek.filter(|p| p.request == request) else {
            trace!(request = request.0, "Ignoring completion of superseded seek");
            return;
        };
        self.pending_seek = None;

        if !finished {
            debug!(request = request.0, "Seek interrupted");
            return;
        }

        self.update_time(pending.target);
        self.notify_time(TickKind::Coarse);

        if pending.purpose == SeekPurpose::LoopRestart
            && self.loop_config.should_loop()
            && self.machine.current().is_finished()
        {
            self.set_state(PlaybackState::Playing);
        }
    }

    fn on_periodic_tick(&mut self, observer: ObserverId, elapsed: f64) {
        let Some(kind) = self.observers.tick_kind(observer) else {
            trace!(observer = observer.0, "Ignoring tick from released observer");
            return;
        };

        let Some(update) =
            self.reporter
                .on_tick(kind, elapsed, self.machine.current(), &self.loop_config)
        else {
            return;
        };

        self.current_time = update.elapsed;
        self.current_time_text = update.text;
        self.notify_time(update.kind);

        if update.loop_end_reached {
            debug!(elapsed, "Loop end reached");
            self.set_state(PlaybackState::Finished);
        }
    }

    fn on_duration_changed(&mut self, seconds: f64) {
        if !seconds.is_finite() || seconds < 0.0 {
            debug!(seconds, "Ignoring invalid duration");
            return;
        }

        self.duration = seconds;
        self.loop_config.clamp_to_duration(seconds);
        self.notifier.notify(PlayerEvent::DurationChanged(seconds));
    }

    fn on_status_changed(&mut self, status: ItemStatus) {
        match status {
            ItemStatus::Failed(reason) => {
                warn!(%reason, "Playback item failed");
                self.observers.release(self.engine.as_mut());
                self.set_state(PlaybackState::Failed(PlaybackError::ItemFailed(reason)));
            }
            ItemStatus::ReadyToPlay => debug!("Playback item ready to play"),
            ItemStatus::Unknown => {}
        }
    }

    fn on_loaded_ranges_changed(&mut self, ranges: &[TimeRange]) {
        let Some(update) = self.buffer.loaded_ranges_changed(
            ranges,
            self.current_time,
            self.duration,
            self.machine.current(),
            self.machine.previous(),
        ) else {
            return;
        };

        self.notifier
            .notify(PlayerEvent::BufferedTimeChanged(update.buffered_time));

        if let Some(next) = update.transition {
            self.set_state(next);
        }
    }

    fn on_interruption_began(&mut self) {
        // Only an active session can be interrupted; `Failed` waits for a new setup
        let state = self.machine.current();
        if !matches!(
            state,
            PlaybackState::Playing
                | PlaybackState::Paused
                | PlaybackState::Buffering
                | PlaybackState::Finished
        ) {
            debug!(%state, "Ignoring interruption");
            return;
        }

        self.set_state(PlaybackState::Interrupted);
    }

    fn on_interruption_ended(&mut self, should_resume: bool) {
        if !matches!(self.machine.current(), PlaybackState::Interrupted) {
            return;
        }

        if should_resume && self.machine.previous().is_playing() {
            self.set_state(PlaybackState::Playing);
        } else {
            self.set_state(PlaybackState::Paused);
        }
    }

    // ===== Commands =====

    /// Accept a new asset and start validating it
    pub fn setup(&mut self, asset: Asset, start_muted: bool) {
        if self.is_shut_down {
            return;
        }

        self.set_muted(start_muted);
        self.set_state(PlaybackState::SettingUp(asset));
    }

    /// Start or resume playback
    pub fn play(&mut self) {
        self.set_state(PlaybackState::Playing);
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.set_state(PlaybackState::Paused);
    }

    /// Seek to `seconds`; ignored until an item is bound
    pub fn seek_to(&mut self, seconds: f64) {
        if self.is_shut_down || !self.observers.is_observing_item() {
            debug!(seconds, "Ignoring seek: no item bound");
            return;
        }

        self.start_seek(seconds, SeekPurpose::User);
    }

    /// Change the playback rate; ignored until an item is bound
    ///
    /// Also selects the pitch algorithm for the new rate.
    pub fn set_rate(&mut self, rate: f32) {
        if self.is_shut_down || !self.observers.is_observing_item() {
            debug!(rate, "Ignoring rate change: no item bound");
            return;
        }

        self.rate = rate;
        self.engine.set_pitch_algorithm(self.pitch_algorithm());
        if self.machine.current().is_playing() {
            self.engine.set_rate(rate);
        }
    }

    /// Mark the asset as local; local assets skip buffering detection
    pub fn set_is_local_asset(&mut self, is_local: bool) {
        self.buffer.set_local(is_local);
    }

    /// Enable or disable looping
    pub fn set_should_loop(&mut self, should_loop: bool) {
        self.loop_config.set_should_loop(should_loop);
    }

    /// Set the loop start (negative values reset to 0)
    pub fn set_loop_start(&mut self, seconds: f64) {
        self.loop_config.set_start_time(seconds);
    }

    /// Set the loop end, clamped to the duration; ignored while it is unknown
    pub fn set_loop_end(&mut self, seconds: f64) {
        if !self.loop_config.set_end_time(seconds, self.duration) {
            debug!(seconds, duration = self.duration, "Ignoring loop end");
        }
    }

    /// Mute or unmute output
    pub fn set_muted(&mut self, muted: bool) {
        if self.is_shut_down {
            return;
        }

        self.is_muted = muted;
        self.engine.set_muted(muted);
    }

    /// Release every engine registration and stop reacting
    ///
    /// Idempotent. Pauses the engine through a final `Uninitialized`
    /// transition; later signals and commands are ignored.
    pub fn shutdown(&mut self) {
        if self.is_shut_down {
            return;
        }

        self.observers.release(self.engine.as_mut());
        self.loader.cancel();
        self.pending_seek = None;
        self.set_state(PlaybackState::Uninitialized);

        self.is_shut_down = true;
        info!("Playback controller shut down");
    }

    // ===== Helpers =====

    fn start_seek(&mut self, seconds: f64, purpose: SeekPurpose) {
        self.last_seek += 1;
        let request = SeekRequest(self.last_seek);
        self.pending_seek = Some(PendingSeek {
            request,
            target: seconds,
            purpose,
        });

        debug!(seconds, ?purpose, "Seeking");
        self.engine.seek(seconds, request, self.sender.clone());
    }

    fn update_time(&mut self, seconds: f64) {
        self.current_time = seconds;
        self.current_time_text = format_time(seconds);
    }

    /// Coarse updates notify once; fine updates also notify the fine-grained event
    fn notify_time(&self, kind: TickKind) {
        let seconds = self.current_time;
        let text = self.current_time_text.clone();

        self.notifier.notify(PlayerEvent::CurrentTimeChanged {
            seconds,
            text: text.clone(),
        });
        if kind == TickKind::Fine {
            self.notifier
                .notify(PlayerEvent::CurrentTimeChangedFine { seconds, text });
        }
    }
}

impl Drop for PlayerController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
