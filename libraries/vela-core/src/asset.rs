//! Asset handles and capability keys

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// URL identity of an asset
///
/// Two assets are the same asset iff their URLs are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetUrl(String);

impl AssetUrl {
    /// Create a new URL identity
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Borrow the URL as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetUrl {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AssetUrl {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Named asset property that must resolve before playback is attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CapabilityKey {
    /// Whether the asset can be played at all
    Playable,

    /// Whether the asset carries protected (DRM) content
    HasProtectedContent,
}

impl CapabilityKey {
    /// Keys validated for every asset before it reaches the engine
    pub const REQUIRED: [CapabilityKey; 2] =
        [CapabilityKey::Playable, CapabilityKey::HasProtectedContent];

    /// Key name as reported by the engine
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKey::Playable => "playable",
            CapabilityKey::HasProtectedContent => "hasProtectedContent",
        }
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution status of a capability key
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyStatus {
    /// Not requested yet
    #[default]
    Unknown,

    /// Resolution in progress
    Loading,

    /// Resolved successfully
    Loaded,

    /// Resolution failed with the engine's error description
    Failed(String),

    /// Resolution was cancelled by the engine
    Cancelled,
}

impl KeyStatus {
    /// Check if the key resolved successfully
    pub fn is_loaded(&self) -> bool {
        matches!(self, KeyStatus::Loaded)
    }
}

/// Opaque handle for an audio/video asset
///
/// The handle is created and owned by the caller; the controller only keeps a
/// copy for the duration of one playback session. Equality is URL identity:
/// capability flags and duration are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    url: AssetUrl,
    key_status: BTreeMap<CapabilityKey, KeyStatus>,
    is_playable: bool,
    has_protected_content: bool,
    duration: Option<f64>,
}

impl Asset {
    /// Create an unresolved asset for the given URL
    pub fn new(url: impl Into<AssetUrl>) -> Self {
        Self {
            url: url.into(),
            key_status: BTreeMap::new(),
            is_playable: false,
            has_protected_content: false,
            duration: None,
        }
    }

    /// Set the resolution status of a capability key
    pub fn with_key_status(mut self, key: CapabilityKey, status: KeyStatus) -> Self {
        self.key_status.insert(key, status);
        self
    }

    /// Set the playable flag
    pub fn with_playable(mut self, playable: bool) -> Self {
        self.is_playable = playable;
        self
    }

    /// Set the protected-content flag
    pub fn with_protected_content(mut self, protected: bool) -> Self {
        self.has_protected_content = protected;
        self
    }

    /// Set the duration in seconds
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Mark every required key as resolved, playable and unprotected
    ///
    /// Convenience for engines whose assets need no asynchronous inspection
    /// (local files).
    pub fn resolved(self) -> Self {
        CapabilityKey::REQUIRED
            .iter()
            .fold(self, |asset, key| asset.with_key_status(*key, KeyStatus::Loaded))
            .with_playable(true)
            .with_protected_content(false)
    }

    /// URL identity
    pub fn url(&self) -> &AssetUrl {
        &self.url
    }

    /// Resolution status of a capability key
    pub fn key_status(&self, key: CapabilityKey) -> KeyStatus {
        self.key_status.get(&key).cloned().unwrap_or_default()
    }

    /// Whether the asset can be played
    pub fn is_playable(&self) -> bool {
        self.is_playable
    }

    /// Whether the asset carries protected content
    pub fn has_protected_content(&self) -> bool {
        self.has_protected_content
    }

    /// Duration in seconds, once known
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for Asset {}
