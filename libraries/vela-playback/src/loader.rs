//! Asynchronous asset validation
//!
//! Before an asset reaches the engine its required capability keys are
//! resolved asynchronously. Each request carries a `LoadTicket`; only the
//! completion for the newest ticket of the current asset is honoured, so a
//! superseded validation finishes but its result is thrown away.

use vela_core::{
    Asset, AssetUrl, CapabilityKey, KeyStatus, LoadTicket, PlaybackEngine, PlaybackError,
    SignalSender,
};

/// Result of a finished validation
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Result belongs to a superseded request; discard silently
    Stale,

    /// Asset validated; bind it
    Ready(Asset),

    /// Asset cannot be played
    Failed(PlaybackError),
}

/// Tracks the in-flight capability validation
#[derive(Debug, Default)]
pub struct AssetLoader {
    last_ticket: u64,
    pending: Option<(LoadTicket, AssetUrl)>,
}

impl AssetLoader {
    /// Create an idle loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Start validating `asset`, superseding any validation in flight
    pub fn begin(
        &mut self,
        asset: &Asset,
        engine: &mut dyn PlaybackEngine,
        reply: SignalSender,
    ) -> LoadTicket {
        self.last_ticket += 1;
        let ticket = LoadTicket(self.last_ticket);
        self.pending = Some((ticket, asset.url().clone()));

        tracing::debug!(url = %asset.url(), ticket = ticket.0, "Validating asset keys");
        engine.load_capabilities(asset, &CapabilityKey::REQUIRED, ticket, reply);
        ticket
    }

    /// Forget the validation in flight; its completion will be stale
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Check if a validation is in flight
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Evaluate a completion against the controller's current asset
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        asset: Asset,
        current: Option<&AssetUrl>,
    ) -> LoadOutcome {
        let is_current = matches!(
            &self.pending,
            Some((pending_ticket, url))
                if *pending_ticket == ticket && Some(url) == current && url == asset.url()
        );
        if !is_current {
            return LoadOutcome::Stale;
        }

        self.pending = None;
        match validate(&asset) {
            Ok(()) => LoadOutcome::Ready(asset),
            Err(err) => LoadOutcome::Failed(err),
        }
    }
}

/// Check the resolved capability keys and flags of an asset
pub fn validate(asset: &Asset) -> Result<(), PlaybackError> {
    for key in CapabilityKey::REQUIRED {
        match asset.key_status(key) {
            KeyStatus::Loaded => {}
            KeyStatus::Failed(reason) => {
                return Err(PlaybackError::key_load_failure(key, reason));
            }
            KeyStatus::Cancelled => {
                return Err(PlaybackError::key_load_failure(key, "loading was cancelled"));
            }
            KeyStatus::Unknown | KeyStatus::Loading => {
                return Err(PlaybackError::key_load_failure(key, "key did not resolve"));
            }
        }
    }

    if !asset.is_playable() {
        return Err(PlaybackError::not_playable(format!(
            "{} is not playable",
            asset.url()
        )));
    }
    if asset.has_protected_content() {
        return Err(PlaybackError::not_playable(format!(
            "{} has protected content",
            asset.url()
        )));
    }

    Ok(())
}
