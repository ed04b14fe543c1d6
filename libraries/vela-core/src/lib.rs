//! Vela Core
//!
//! Platform-agnostic building blocks shared by every Vela playback crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Assets**: `Asset` handles identified by URL, with the capability keys
//!   that must resolve before playback is attempted
//! - **Engine primitive**: the `PlaybackEngine` trait implemented by the
//!   platform media player (play/pause/seek/rate/mute, observers)
//! - **Signals**: `EngineSignal` values posted by the engine from any thread
//!   and drained by the owning context through a `SignalInbox`
//! - **Time formatting**: `format_time` for "mm:ss" display strings
//! - **Error Handling**: unified `PlaybackError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use vela_core::{format_time, Asset, CapabilityKey, KeyStatus};
//!
//! let asset = Asset::new("https://example.com/episode.mp3")
//!     .with_key_status(CapabilityKey::Playable, KeyStatus::Loaded)
//!     .with_key_status(CapabilityKey::HasProtectedContent, KeyStatus::Loaded)
//!     .with_playable(true)
//!     .with_duration(95.0);
//!
//! assert_eq!(asset.url().as_str(), "https://example.com/episode.mp3");
//! assert_eq!(format_time(asset.duration().unwrap_or_default()), "01:35");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod asset;
pub mod engine;
pub mod error;
pub mod signal;
pub mod time;

pub use asset::{Asset, AssetUrl, CapabilityKey, KeyStatus};
pub use engine::{
    ItemStatus, LoadTicket, ObserverId, PitchAlgorithm, PlaybackEngine, SeekRequest, TimeRange,
    SPECTRAL_PITCH_THRESHOLD,
};
pub use error::{PlaybackError, Result};
pub use signal::{signal_channel, EngineSignal, SignalInbox, SignalSender};
pub use time::format_time;
