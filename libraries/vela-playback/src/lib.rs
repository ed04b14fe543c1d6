//! Vela - Playback State Controller
//!
//! Turns the asynchronous signals of a media engine into one coherent
//! playback state and a stable event stream for UI consumers.
//!
//! This crate provides:
//! - Playback state machine with per-state engine side effects
//! - Asynchronous asset validation with superseded-result suppression
//! - Buffering detection from three independent engine signals
//! - Coarse and fine elapsed-time reporting
//! - Loop windows that replay from the loop start
//! - A closed set of user actions
//!
//! # Architecture
//!
//! `vela-playback` never talks to a media framework directly. The engine is
//! provided through the [`PlaybackEngine`](vela_core::PlaybackEngine) trait
//! and reports back by posting [`EngineSignal`](vela_core::EngineSignal)s from
//! any thread. The owning context applies them with
//! [`PlayerController::process_pending`], so state is only ever mutated in
//! one place.
//!
//! # Example: Setup and Play
//!
//! ```rust
//! use vela_playback::{Action, ChannelListener, PlayerController, PlaybackState};
//! use vela_core::{
//!     Asset, CapabilityKey, EngineSignal, LoadTicket, ObserverId, PitchAlgorithm,
//!     PlaybackEngine, SeekRequest, SignalSender,
//! };
//! use std::time::Duration;
//!
//! // Engine that resolves every asset immediately
//! #[derive(Default)]
//! struct InstantEngine {
//!     next_observer: u64,
//! }
//!
//! impl PlaybackEngine for InstantEngine {
//!     fn load_capabilities(
//!         &mut self,
//!         asset: &Asset,
//!         _keys: &[CapabilityKey],
//!         ticket: LoadTicket,
//!         reply: SignalSender,
//!     ) {
//!         let asset = asset.clone().resolved().with_duration(180.0);
//!         reply.send(EngineSignal::CapabilitiesLoaded { ticket, asset });
//!     }
//!     fn bind_item(&mut self, _asset: &Asset) {}
//!     fn observe_item(&mut self, _sink: SignalSender) -> ObserverId {
//!         self.next_observer += 1;
//!         ObserverId(self.next_observer)
//!     }
//!     fn add_periodic_observer(&mut self, _interval: Duration, _sink: SignalSender) -> ObserverId {
//!         self.next_observer += 1;
//!         ObserverId(self.next_observer)
//!     }
//!     fn remove_observer(&mut self, _id: ObserverId) {}
//!     fn play(&mut self, _rate: f32) {}
//!     fn pause(&mut self) {}
//!     fn seek(&mut self, _seconds: f64, request: SeekRequest, reply: SignalSender) {
//!         reply.send(EngineSignal::SeekCompleted { request, finished: true });
//!     }
//!     fn set_rate(&mut self, _rate: f32) {}
//!     fn set_pitch_algorithm(&mut self, _algorithm: PitchAlgorithm) {}
//!     fn set_muted(&mut self, _muted: bool) {}
//! }
//!
//! let mut controller = PlayerController::with_defaults(Box::new(InstantEngine::default()));
//! let (listener, events) = ChannelListener::new();
//! controller.set_listener(&listener);
//!
//! controller.dispatch(Action::Setup {
//!     asset: Asset::new("https://example.com/episode.mp3"),
//!     start_muted: false,
//! });
//! controller.process_pending();
//! assert_eq!(controller.state(), &PlaybackState::Uninitialized);
//! assert_eq!(controller.duration(), 180.0);
//!
//! controller.dispatch(Action::Play);
//! assert!(controller.state().is_playing());
//! assert!(events.try_iter().count() > 0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod action;
mod buffer;
mod config;
mod controller;
mod events;
mod loader;
mod reporter;
mod state;
pub mod types;

// Public exports
pub use action::Action;
pub use buffer::{BufferMonitor, BufferState, RangeUpdate, DEFAULT_ACCEPTABLE_BUFFER_PERCENTAGE};
pub use config::ControllerConfig;
pub use controller::PlayerController;
pub use events::{ChannelListener, PlayerEvent, PlayerListener};
pub use loader::{validate, AssetLoader, LoadOutcome};
pub use reporter::{ObserverSet, PeriodicTimeReporter, TickKind, TickUpdate};
pub use state::{PlaybackState, StateMachine};
pub use types::LoopConfig;

pub use vela_core;
