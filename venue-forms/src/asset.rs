//! Asset lifecycle coordination.
//!
//! One external asset per draft, tracked through
//! `Empty → Uploading → Stored` transitions. Replacement and removal park the
//! prior key in a pending-delete slot; the cleanup request is issued exactly
//! once and the slot is cleared whether or not it succeeds. Cleanup failures
//! are logged, never retried, never surfaced.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};
use venue_store::{AssetKey, AssetStore};

use crate::types::{FormError, Result};

/// State of the asset reference attached to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetState {
    /// No asset attached
    Empty,
    /// An upload request is outstanding; the draft is not submittable
    Uploading,
    /// Exactly one stored asset
    Stored(AssetKey),
}

impl AssetState {
    /// Whether the asset field is submittable.
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored(_))
    }
}

/// The pure transition machine for one asset slot.
///
/// Owned exclusively by the draft's coordinator; at most one `Stored` key
/// exists at any instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSlot {
    state: AssetState,
    /// Stable state to revert to if the outstanding upload fails
    prior: AssetState,
    /// Key awaiting a best-effort deletion request
    pending_delete: Option<AssetKey>,
}

impl AssetSlot {
    /// An empty slot.
    pub fn empty() -> Self {
        Self {
            state: AssetState::Empty,
            prior: AssetState::Empty,
            pending_delete: None,
        }
    }

    /// A slot holding an already-stored asset (update branch).
    pub fn stored(key: AssetKey) -> Self {
        Self {
            state: AssetState::Stored(key.clone()),
            prior: AssetState::Stored(key),
            pending_delete: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> &AssetState {
        &self.state
    }

    /// The key parked for deletion, if any.
    pub fn pending_delete(&self) -> Option<&AssetKey> {
        self.pending_delete.as_ref()
    }

    /// Start an upload. Allowed from `Empty` or `Stored`; a replacement
    /// parks the prior key for deletion once the new upload lands.
    pub fn begin_upload(&mut self) -> Result<()> {
        match &self.state {
            AssetState::Uploading => Err(FormError::AssetState("upload already in progress")),
            AssetState::Empty | AssetState::Stored(_) => {
                self.prior = self.state.clone();
                if let AssetState::Stored(key) = &self.state {
                    self.pending_delete = Some(key.clone());
                }
                self.state = AssetState::Uploading;
                Ok(())
            }
        }
    }

    /// Finish an upload, returning the parked key (the replaced asset) that
    /// now needs a cleanup request.
    pub fn complete_upload(&mut self, key: AssetKey) -> Result<Option<AssetKey>> {
        if self.state != AssetState::Uploading {
            return Err(FormError::AssetState("no upload in progress"));
        }
        self.state = AssetState::Stored(key.clone());
        self.prior = AssetState::Stored(key);
        Ok(self.pending_delete.take())
    }

    /// Abort an upload, reverting to the prior stable state. The parked key
    /// (if any) still refers to the live stored asset, so no deletion is
    /// issued.
    pub fn fail_upload(&mut self) -> Result<()> {
        if self.state != AssetState::Uploading {
            return Err(FormError::AssetState("no upload in progress"));
        }
        self.pending_delete = None;
        self.state = self.prior.clone();
        Ok(())
    }

    /// Remove the stored asset, returning the key that needs a cleanup
    /// request. The slot reads `Empty` immediately, regardless of whether
    /// remote cleanup later succeeds.
    pub fn begin_removal(&mut self) -> Result<AssetKey> {
        match self.state.clone() {
            AssetState::Stored(key) => {
                self.pending_delete = Some(key.clone());
                self.state = AssetState::Empty;
                self.prior = AssetState::Empty;
                Ok(key)
            }
            _ => Err(FormError::AssetState("no stored asset to remove")),
        }
    }

    /// Clear the pending-delete slot once its request has resolved.
    pub fn clear_pending(&mut self) {
        self.pending_delete = None;
    }
}

impl Default for AssetSlot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Single owner of one draft's asset state.
///
/// Drives the slot transitions around the store calls so that UI re-renders
/// and late network completions cannot race on the asset reference.
pub struct AssetCoordinator {
    store: Arc<dyn AssetStore>,
    slot: Arc<RwLock<AssetSlot>>,
}

impl AssetCoordinator {
    /// Coordinator for a fresh draft.
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            slot: Arc::new(RwLock::new(AssetSlot::empty())),
        }
    }

    /// Coordinator for a draft opened from an existing record.
    pub fn with_stored(store: Arc<dyn AssetStore>, key: AssetKey) -> Self {
        Self {
            store,
            slot: Arc::new(RwLock::new(AssetSlot::stored(key))),
        }
    }

    /// Current asset state.
    pub async fn state(&self) -> AssetState {
        self.slot.read().await.state().clone()
    }

    /// The stored key, if the slot holds one.
    pub async fn stored_key(&self) -> Option<AssetKey> {
        match self.slot.read().await.state() {
            AssetState::Stored(key) => Some(key.clone()),
            _ => None,
        }
    }

    /// Transition the slot to `Uploading`, parking a stored key for later
    /// cleanup.
    ///
    /// Callers that surface validity republish it after this returns, before
    /// awaiting [`finish_upload`](Self::finish_upload); the slot reads
    /// `Uploading` for the whole store call.
    pub async fn begin_upload(&self) -> Result<()> {
        self.slot.write().await.begin_upload()
    }

    /// Drive the store call for an upload started with
    /// [`begin_upload`](Self::begin_upload).
    ///
    /// The replaced key (if any) gets exactly one best-effort deletion
    /// request after the new upload lands. On failure the slot reverts to
    /// its prior stable state and the error is returned for user-visible
    /// feedback (no automatic retry).
    pub async fn finish_upload(&self, bytes: Vec<u8>) -> Result<AssetKey> {
        match self.store.upload(bytes).await {
            Ok(key) => {
                let parked = self.slot.write().await.complete_upload(key.clone())?;
                if let Some(replaced) = parked {
                    self.best_effort_delete(replaced).await;
                }
                debug!(key = %key, "Asset upload stored");
                Ok(key)
            }
            Err(err) => {
                self.slot.write().await.fail_upload()?;
                Err(FormError::Upload(err))
            }
        }
    }

    /// Upload new bytes as the draft's asset, replacing any stored one.
    pub async fn upload(&self, bytes: Vec<u8>) -> Result<AssetKey> {
        self.begin_upload().await?;
        self.finish_upload(bytes).await
    }

    /// Remove the stored asset.
    ///
    /// The slot reads `Empty` immediately; remote cleanup failure is logged
    /// and non-blocking.
    pub async fn remove(&self) -> Result<()> {
        let key = self.slot.write().await.begin_removal()?;
        self.best_effort_delete(key).await;
        Ok(())
    }

    /// Release whatever the slot holds, for record deletion. A no-op when
    /// the slot is already empty.
    pub async fn release(&self) -> Result<()> {
        let is_stored = self.slot.read().await.state().is_stored();
        if is_stored {
            self.remove().await?;
        }
        Ok(())
    }

    async fn best_effort_delete(&self, key: AssetKey) {
        if let Err(err) = self.store.delete(&key).await {
            warn!(key = %key, error = %err, "Asset cleanup failed; not retrying");
        }
        self.slot.write().await.clear_pending();
    }
}
