//! Core error types for Vela

use crate::asset::CapabilityKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using `PlaybackError`
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Core error type for Vela
///
/// Playback failures are carried as values inside the `Failed` playback state
/// rather than returned from state transitions, so the type is cheap to clone
/// and serializable alongside events.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackError {
    /// A required capability key failed to resolve
    #[error("Failed to load asset key '{key}': {reason}")]
    AssetKeyLoadFailure {
        /// The key that failed
        key: CapabilityKey,
        /// Underlying engine error
        reason: String,
    },

    /// Asset resolved but cannot be used (not playable, protected content)
    #[error("Asset not playable: {0}")]
    AssetNotPlayable(String),

    /// The engine reported the bound playback item as failed
    #[error("Playback item failed: {0}")]
    ItemFailed(String),

    /// Configuration loading or validation errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PlaybackError {
    /// Create a key load failure
    pub fn key_load_failure(key: CapabilityKey, reason: impl Into<String>) -> Self {
        Self::AssetKeyLoadFailure {
            key,
            reason: reason.into(),
        }
    }

    /// Create a not playable error
    pub fn not_playable(reason: impl Into<String>) -> Self {
        Self::AssetNotPlayable(reason.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
