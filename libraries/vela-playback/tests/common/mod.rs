//! Shared test helpers: a recording engine and a recording listener

#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use vela_core::{
    Asset, AssetUrl, CapabilityKey, EngineSignal, LoadTicket, ObserverId, PitchAlgorithm,
    PlaybackEngine, SeekRequest, SignalSender,
};
use vela_playback::{PlayerController, PlayerEvent, PlayerListener};

static INIT: Once = Once::new();

pub const COARSE: Duration = Duration::from_millis(1000);
pub const FINE: Duration = Duration::from_millis(10);

/// Every command the controller sent to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    LoadCapabilities { url: AssetUrl, ticket: LoadTicket },
    BindItem(AssetUrl),
    ObserveItem(ObserverId),
    AddPeriodicObserver { id: ObserverId, interval: Duration },
    RemoveObserver(ObserverId),
    Play(f32),
    Pause,
    Seek { seconds: f64, request: SeekRequest },
    SetRate(f32),
    SetPitchAlgorithm(PitchAlgorithm),
    SetMuted(bool),
}

/// Shared view of what the mock engine was asked to do
///
/// `clear` forgets the call history but not which observers are live.
#[derive(Clone, Default)]
pub struct EngineLog {
    calls: Arc<Mutex<Vec<EngineCall>>>,
    active: Arc<Mutex<Vec<(ObserverId, Option<Duration>)>>>,
}

impl EngineLog {
    fn push(&self, call: EngineCall) {
        {
            let mut active = self.active.lock().unwrap();
            match &call {
                EngineCall::ObserveItem(id) => active.push((*id, None)),
                EngineCall::AddPeriodicObserver { id, interval } => {
                    active.push((*id, Some(*interval)));
                }
                EngineCall::RemoveObserver(id) => active.retain(|(a, _)| a != id),
                _ => {}
            }
        }
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    pub fn last_ticket(&self) -> LoadTicket {
        self.calls()
            .iter()
            .rev()
            .find_map(|call| match call {
                EngineCall::LoadCapabilities { ticket, .. } => Some(*ticket),
                _ => None,
            })
            .expect("no capability load requested")
    }

    /// Live periodic observer registered with `interval`
    pub fn periodic_observer(&self, interval: Duration) -> ObserverId {
        self.active
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|(id, i)| (*i == Some(interval)).then_some(*id))
            .expect("no periodic observer registered")
    }

    /// Observers added and not yet removed
    pub fn active_observers(&self) -> Vec<ObserverId> {
        self.active.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }

    pub fn last_pitch_algorithm(&self) -> Option<PitchAlgorithm> {
        self.calls().iter().rev().find_map(|call| match call {
            EngineCall::SetPitchAlgorithm(algorithm) => Some(*algorithm),
            _ => None,
        })
    }
}

/// Engine that records commands and completes seeks immediately
pub struct MockEngine {
    log: EngineLog,
    next_observer: u64,
    complete_seeks: bool,
}

impl MockEngine {
    pub fn new(log: EngineLog) -> Self {
        Self {
            log,
            next_observer: 0,
            complete_seeks: true,
        }
    }

    /// Leave seek completion to the test
    pub fn manual_seeks(mut self) -> Self {
        self.complete_seeks = false;
        self
    }

    fn next_id(&mut self) -> ObserverId {
        self.next_observer += 1;
        ObserverId(self.next_observer)
    }
}

impl PlaybackEngine for MockEngine {
    fn load_capabilities(
        &mut self,
        asset: &Asset,
        _keys: &[CapabilityKey],
        ticket: LoadTicket,
        _reply: SignalSender,
    ) {
        self.log.push(EngineCall::LoadCapabilities {
            url: asset.url().clone(),
            ticket,
        });
    }

    fn bind_item(&mut self, asset: &Asset) {
        self.log.push(EngineCall::BindItem(asset.url().clone()));
    }

    fn observe_item(&mut self, _sink: SignalSender) -> ObserverId {
        let id = self.next_id();
        self.log.push(EngineCall::ObserveItem(id));
        id
    }

    fn add_periodic_observer(&mut self, interval: Duration, _sink: SignalSender) -> ObserverId {
        let id = self.next_id();
        self.log.push(EngineCall::AddPeriodicObserver { id, interval });
        id
    }

    fn remove_observer(&mut self, id: ObserverId) {
        self.log.push(EngineCall::RemoveObserver(id));
    }

    fn play(&mut self, rate: f32) {
        self.log.push(EngineCall::Play(rate));
    }

    fn pause(&mut self) {
        self.log.push(EngineCall::Pause);
    }

    fn seek(&mut self, seconds: f64, request: SeekRequest, reply: SignalSender) {
        self.log.push(EngineCall::Seek { seconds, request });
        if self.complete_seeks {
            reply.send(EngineSignal::SeekCompleted {
                request,
                finished: true,
            });
        }
    }

    fn set_rate(&mut self, rate: f32) {
        self.log.push(EngineCall::SetRate(rate));
    }

    fn set_pitch_algorithm(&mut self, algorithm: PitchAlgorithm) {
        self.log.push(EngineCall::SetPitchAlgorithm(algorithm));
    }

    fn set_muted(&mut self, muted: bool) {
        self.log.push(EngineCall::SetMuted(muted));
    }
}

/// Listener that keeps every event
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<PlayerEvent>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<PlayerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn count(&self, predicate: impl Fn(&PlayerEvent) -> bool) -> usize {
        self.events().iter().filter(|event| predicate(event)).count()
    }

    pub fn state_changes(&self) -> usize {
        self.count(|e| matches!(e, PlayerEvent::StateChanged { .. }))
    }
}

impl PlayerListener for RecordingListener {
    fn on_event(&self, event: &PlayerEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Controller wired to a mock engine and a recording listener
pub struct Harness {
    pub controller: PlayerController,
    pub engine: EngineLog,
    pub listener: Arc<RecordingListener>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_engine(MockEngine::new)
    }

    pub fn with_engine(build: impl FnOnce(EngineLog) -> MockEngine) -> Self {
        // Initialize logging once
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(tracing::Level::DEBUG)
                .try_init();
        });

        let engine = EngineLog::default();
        let mut controller = PlayerController::with_defaults(Box::new(build(engine.clone())));
        let listener = Arc::new(RecordingListener::default());
        controller.set_listener(&listener);

        Self {
            controller,
            engine,
            listener,
        }
    }

    /// Setup `url` and complete its validation with `resolved`
    pub fn load(&mut self, resolved: Asset) {
        self.controller.setup(Asset::new(resolved.url().clone()), false);
        let ticket = self.engine.last_ticket();
        self.resolve(ticket, resolved);
    }

    /// Deliver a capability completion through the signal queue
    pub fn resolve(&mut self, ticket: LoadTicket, asset: Asset) {
        self.send(EngineSignal::CapabilitiesLoaded { ticket, asset });
    }

    /// Post a signal as the engine would and drain the queue
    pub fn send(&mut self, signal: EngineSignal) {
        self.controller.signal_sender().send(signal);
        self.controller.process_pending();
    }

    pub fn tick(&mut self, interval: Duration, elapsed: f64) {
        let observer = self.engine.periodic_observer(interval);
        self.send(EngineSignal::PeriodicTick { observer, elapsed });
    }

    pub fn forget(&self) {
        self.engine.clear();
        self.listener.clear();
    }
}

/// Playable, unprotected asset with every key resolved
pub fn ready_asset(url: &str, duration: f64) -> Asset {
    Asset::new(url).resolved().with_duration(duration)
}

/// Harness with a validated 60s remote asset and clean logs
pub fn ready_harness() -> Harness {
    let mut harness = Harness::new();
    harness.load(ready_asset("https://cdn.example.com/track.mp3", 60.0));
    harness.forget();
    harness
}
