//! Form session controllers.
//!
//! One session per draft. All field writes and validity recomputation are
//! synchronous with respect to each other; the only suspend points are the
//! collaborator calls (asset upload/delete, record create/update/delete).
//! The `Submitting`/`Deleting` phase guard serializes mutating network calls
//! per session, and a session closed mid-flight drops the late result
//! instead of applying it.

use std::sync::Arc;

use gazetteer::{options_for, ClassificationEntry, Directory, GeoLevel};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use venue_store::{AssetKey, AssetStore, Persistence, UnitRecord, VenueRecord};

use crate::advisory::needs_units;
use crate::asset::{AssetCoordinator, AssetState};
use crate::config::{UnitRules, VenueRules};
use crate::draft::{UnitDraft, VenueDraft};
use crate::types::{
    DeleteOutcome, FormError, Result, SessionPhase, SubmitOutcome, Validity,
};

struct VenueState {
    draft: VenueDraft,
    existing: Option<VenueRecord>,
    phase: SessionPhase,
    validity: Validity,
    /// Last fetched unit list, for the completeness advisory
    units: Vec<UnitRecord>,
}

/// Controller for authoring one venue.
pub struct VenueSession {
    rules: VenueRules,
    directory: Arc<Directory>,
    persistence: Arc<dyn Persistence>,
    assets: AssetCoordinator,
    owner_id: String,
    state: Arc<RwLock<VenueState>>,
}

impl VenueSession {
    /// Start a create session for the given operator.
    pub fn new_venue(
        owner_id: impl Into<String>,
        directory: Arc<Directory>,
        persistence: Arc<dyn Persistence>,
        asset_store: Arc<dyn AssetStore>,
        rules: VenueRules,
    ) -> Self {
        let assets = AssetCoordinator::new(asset_store);
        let draft = VenueDraft::default();
        let validity = draft.validate(&rules, &AssetState::Empty);
        Self {
            rules,
            directory,
            persistence,
            assets,
            owner_id: owner_id.into(),
            state: Arc::new(RwLock::new(VenueState {
                draft,
                existing: None,
                phase: SessionPhase::Editing,
                validity,
                units: Vec::new(),
            })),
        }
    }

    /// Start an update session over an existing record.
    pub fn edit_venue(
        record: VenueRecord,
        directory: Arc<Directory>,
        persistence: Arc<dyn Persistence>,
        asset_store: Arc<dyn AssetStore>,
        rules: VenueRules,
    ) -> Self {
        let assets = AssetCoordinator::with_stored(asset_store, record.image.clone());
        let draft = VenueDraft::from_record(&record);
        let validity = draft.validate(
            &rules,
            &AssetState::Stored(record.image.clone()),
        );
        let owner_id = record.owner_id.clone();
        Self {
            rules,
            directory,
            persistence,
            assets,
            owner_id,
            state: Arc::new(RwLock::new(VenueState {
                draft,
                existing: Some(record),
                phase: SessionPhase::Editing,
                validity,
                units: Vec::new(),
            })),
        }
    }

    /// Snapshot of the current draft.
    pub async fn draft(&self) -> VenueDraft {
        self.state.read().await.draft.clone()
    }

    /// The persisted record this session edits, if any.
    pub async fn record(&self) -> Option<VenueRecord> {
        self.state.read().await.existing.clone()
    }

    /// Current field validity.
    pub async fn validity(&self) -> Validity {
        self.state.read().await.validity.clone()
    }

    /// Whether a create-or-update call is outstanding.
    pub async fn is_submitting(&self) -> bool {
        self.state.read().await.phase == SessionPhase::Submitting
    }

    /// Whether a delete call is outstanding.
    pub async fn is_deleting(&self) -> bool {
        self.state.read().await.phase == SessionPhase::Deleting
    }

    /// Valid region options for the currently selected country.
    pub async fn region_options(&self) -> Vec<ClassificationEntry> {
        let selection = self.state.read().await.draft.geo.clone();
        options_for(&self.directory, GeoLevel::Region, &selection)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Valid locality options for the currently selected region.
    pub async fn locality_options(&self) -> Vec<ClassificationEntry> {
        let selection = self.state.read().await.draft.geo.clone();
        options_for(&self.directory, GeoLevel::Locality, &selection)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Set the title.
    pub async fn set_title(&self, value: impl Into<String>) -> Validity {
        self.state.write().await.draft.title = value.into();
        self.revalidate().await
    }

    /// Set the description.
    pub async fn set_description(&self, value: impl Into<String>) -> Validity {
        self.state.write().await.draft.description = value.into();
        self.revalidate().await
    }

    /// Set the location description.
    pub async fn set_location_description(&self, value: impl Into<String>) -> Validity {
        self.state.write().await.draft.location_description = value.into();
        self.revalidate().await
    }

    /// Set the amenity flags.
    pub async fn set_amenities(&self, amenities: venue_store::VenueAmenities) -> Validity {
        self.state.write().await.draft.amenities = amenities;
        self.revalidate().await
    }

    /// Select a country, invalidating dependents that no longer apply.
    pub async fn set_country(&self, code: impl Into<String>) -> Validity {
        {
            let mut state = self.state.write().await;
            state.draft.geo.country_code = code.into();
            state.draft.geo.reconcile(&self.directory);
        }
        self.revalidate().await
    }

    /// Select or clear a region, invalidating the locality if needed.
    pub async fn set_region(&self, code: Option<String>) -> Validity {
        {
            let mut state = self.state.write().await;
            state.draft.geo.region_code = code;
            state.draft.geo.reconcile(&self.directory);
        }
        self.revalidate().await
    }

    /// Select or clear a locality.
    pub async fn set_locality(&self, name: Option<String>) -> Validity {
        {
            let mut state = self.state.write().await;
            state.draft.geo.locality_name = name;
            state.draft.geo.reconcile(&self.directory);
        }
        self.revalidate().await
    }

    /// Upload the venue image, replacing any stored one.
    pub async fn upload_image(&self, bytes: Vec<u8>) -> Result<AssetKey> {
        if self.state.read().await.phase == SessionPhase::Closed {
            return Err(FormError::Closed);
        }
        self.assets.begin_upload().await?;
        // Validity reads the image as pending for the whole upload window
        self.revalidate().await;

        let key = match self.assets.finish_upload(bytes).await {
            Ok(key) => key,
            Err(err) => {
                self.revalidate().await;
                return Err(err);
            }
        };
        if self.state.read().await.phase == SessionPhase::Closed {
            // Session went away while the upload was outstanding
            debug!(key = %key, "Dropping upload completion for closed session");
            return Err(FormError::Closed);
        }
        self.revalidate().await;
        Ok(key)
    }

    /// Remove the stored venue image.
    pub async fn remove_image(&self) -> Result<()> {
        if self.state.read().await.phase == SessionPhase::Closed {
            return Err(FormError::Closed);
        }
        self.assets.remove().await?;
        self.revalidate().await;
        Ok(())
    }

    /// Commit the draft: exactly one create-or-update call, chosen by
    /// whether the session edits an existing record.
    ///
    /// A second call while one is outstanding is a no-op
    /// ([`SubmitOutcome::InFlight`]). On failure the draft is left intact
    /// for retry.
    pub async fn submit(&self) -> Result<SubmitOutcome<VenueRecord>> {
        let (data, target) = {
            let mut state = self.state.write().await;
            match state.phase {
                SessionPhase::Closed => return Err(FormError::Closed),
                SessionPhase::Submitting | SessionPhase::Deleting => {
                    return Ok(SubmitOutcome::InFlight)
                }
                SessionPhase::Editing => {}
            }

            // Snapshot the asset under the same guard acquisition as the
            // phase change so a concurrent removal cannot reach the payload
            let asset = self.assets.state().await;
            state.validity = state.draft.validate(&self.rules, &asset);
            if !state.validity.is_valid() {
                return Err(FormError::Validation(state.validity.clone()));
            }
            let image = match &asset {
                AssetState::Stored(key) => key.clone(),
                _ => return Err(FormError::Validation(state.validity.clone())),
            };

            state.phase = SessionPhase::Submitting;
            (state.draft.data(image), state.existing.clone())
        };

        let result = match &target {
            Some(record) => self.persistence.update_venue(&record.id, data).await,
            None => self.persistence.create_venue(&self.owner_id, data).await,
        };

        let mut state = self.state.write().await;
        if state.phase == SessionPhase::Closed {
            debug!("Dropping submit completion for closed session");
            return Ok(SubmitOutcome::Discarded);
        }
        state.phase = SessionPhase::Editing;
        match result {
            Ok(record) => {
                info!(venue_id = %record.id, update = target.is_some(), "Venue saved");
                state.existing = Some(record.clone());
                Ok(SubmitOutcome::Saved(record))
            }
            Err(err) => {
                warn!(error = %err, "Venue submit failed; draft kept for retry");
                Err(err.into())
            }
        }
    }

    /// Delete the persisted record, releasing its stored asset first.
    ///
    /// On failure the record is presumed to still exist and the session
    /// returns to editing; on success the session is closed.
    pub async fn delete_record(&self) -> Result<DeleteOutcome> {
        let record = {
            let mut state = self.state.write().await;
            match state.phase {
                SessionPhase::Closed => return Err(FormError::Closed),
                SessionPhase::Submitting | SessionPhase::Deleting => {
                    return Ok(DeleteOutcome::InFlight)
                }
                SessionPhase::Editing => {}
            }
            let record = state.existing.clone().ok_or(FormError::NotPersisted)?;
            state.phase = SessionPhase::Deleting;
            record
        };

        self.assets.release().await?;
        let result = self.persistence.delete_venue(&record.id).await;

        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                info!(venue_id = %record.id, "Venue deleted");
                state.phase = SessionPhase::Closed;
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                warn!(venue_id = %record.id, error = %err, "Venue delete failed");
                if state.phase != SessionPhase::Closed {
                    state.phase = SessionPhase::Editing;
                }
                Err(err.into())
            }
        }
    }

    /// Re-fetch the unit list, e.g. after a nested unit session saved.
    ///
    /// Never mutates the draft; only the cached list behind the advisory.
    pub async fn refresh_units(&self) -> Result<Vec<UnitRecord>> {
        let record = self
            .state
            .read()
            .await
            .existing
            .clone()
            .ok_or(FormError::NotPersisted)?;
        let units = self.persistence.units_of(&record.id).await?;
        self.state.write().await.units = units.clone();
        Ok(units)
    }

    /// Whether the operator should be prompted to add a unit.
    ///
    /// False until the venue exists; derived from the last fetched unit list.
    pub async fn advisory(&self) -> bool {
        let state = self.state.read().await;
        match &state.existing {
            Some(record) => needs_units(record, &state.units),
            None => false,
        }
    }

    /// Close the session; any in-flight completion is dropped.
    pub async fn dispose(&self) {
        self.state.write().await.phase = SessionPhase::Closed;
    }

    async fn revalidate(&self) -> Validity {
        let asset = self.assets.state().await;
        let mut state = self.state.write().await;
        state.validity = state.draft.validate(&self.rules, &asset);
        state.validity.clone()
    }
}

struct UnitState {
    draft: UnitDraft,
    existing: Option<UnitRecord>,
    phase: SessionPhase,
    validity: Validity,
}

/// Controller for authoring one unit under a venue.
///
/// Shares nothing with the parent session beyond the venue ID; both may have
/// in-flight operations concurrently.
pub struct UnitSession {
    rules: UnitRules,
    persistence: Arc<dyn Persistence>,
    assets: AssetCoordinator,
    venue_id: String,
    state: Arc<RwLock<UnitState>>,
}

impl UnitSession {
    /// Start a create session under the given venue.
    pub fn new_unit(
        venue_id: impl Into<String>,
        persistence: Arc<dyn Persistence>,
        asset_store: Arc<dyn AssetStore>,
        rules: UnitRules,
    ) -> Self {
        let assets = AssetCoordinator::new(asset_store);
        let draft = UnitDraft::default();
        let validity = draft.validate(&rules, &AssetState::Empty);
        Self {
            rules,
            persistence,
            assets,
            venue_id: venue_id.into(),
            state: Arc::new(RwLock::new(UnitState {
                draft,
                existing: None,
                phase: SessionPhase::Editing,
                validity,
            })),
        }
    }

    /// Start an update session over an existing record.
    pub fn edit_unit(
        record: UnitRecord,
        persistence: Arc<dyn Persistence>,
        asset_store: Arc<dyn AssetStore>,
        rules: UnitRules,
    ) -> Self {
        let assets = AssetCoordinator::with_stored(asset_store, record.image.clone());
        let draft = UnitDraft::from_record(&record);
        let validity = draft.validate(
            &rules,
            &AssetState::Stored(record.image.clone()),
        );
        let venue_id = record.venue_id.clone();
        Self {
            rules,
            persistence,
            assets,
            venue_id,
            state: Arc::new(RwLock::new(UnitState {
                draft,
                existing: Some(record),
                phase: SessionPhase::Editing,
                validity,
            })),
        }
    }

    /// Snapshot of the current draft.
    pub async fn draft(&self) -> UnitDraft {
        self.state.read().await.draft.clone()
    }

    /// Current field validity.
    pub async fn validity(&self) -> Validity {
        self.state.read().await.validity.clone()
    }

    /// Whether a create-or-update call is outstanding.
    pub async fn is_submitting(&self) -> bool {
        self.state.read().await.phase == SessionPhase::Submitting
    }

    /// Whether a delete call is outstanding.
    pub async fn is_deleting(&self) -> bool {
        self.state.read().await.phase == SessionPhase::Deleting
    }

    /// Apply edits to the draft and recompute validity.
    pub async fn edit(&self, apply: impl FnOnce(&mut UnitDraft)) -> Validity {
        {
            let mut state = self.state.write().await;
            apply(&mut state.draft);
        }
        self.revalidate().await
    }

    /// Upload the unit image, replacing any stored one.
    pub async fn upload_image(&self, bytes: Vec<u8>) -> Result<AssetKey> {
        if self.state.read().await.phase == SessionPhase::Closed {
            return Err(FormError::Closed);
        }
        self.assets.begin_upload().await?;
        // Validity reads the image as pending for the whole upload window
        self.revalidate().await;

        let key = match self.assets.finish_upload(bytes).await {
            Ok(key) => key,
            Err(err) => {
                self.revalidate().await;
                return Err(err);
            }
        };
        if self.state.read().await.phase == SessionPhase::Closed {
            debug!(key = %key, "Dropping upload completion for closed session");
            return Err(FormError::Closed);
        }
        self.revalidate().await;
        Ok(key)
    }

    /// Remove the stored unit image.
    pub async fn remove_image(&self) -> Result<()> {
        if self.state.read().await.phase == SessionPhase::Closed {
            return Err(FormError::Closed);
        }
        self.assets.remove().await?;
        self.revalidate().await;
        Ok(())
    }

    /// Commit the draft under the parent venue.
    pub async fn submit(&self) -> Result<SubmitOutcome<UnitRecord>> {
        let (data, target) = {
            let mut state = self.state.write().await;
            match state.phase {
                SessionPhase::Closed => return Err(FormError::Closed),
                SessionPhase::Submitting | SessionPhase::Deleting => {
                    return Ok(SubmitOutcome::InFlight)
                }
                SessionPhase::Editing => {}
            }

            // Snapshot the asset under the same guard acquisition as the
            // phase change so a concurrent removal cannot reach the payload
            let asset = self.assets.state().await;
            state.validity = state.draft.validate(&self.rules, &asset);
            if !state.validity.is_valid() {
                return Err(FormError::Validation(state.validity.clone()));
            }
            let image = match &asset {
                AssetState::Stored(key) => key.clone(),
                _ => return Err(FormError::Validation(state.validity.clone())),
            };

            state.phase = SessionPhase::Submitting;
            (state.draft.data(image), state.existing.clone())
        };

        let result = match &target {
            Some(record) => self.persistence.update_unit(&record.id, data).await,
            None => self.persistence.create_unit(&self.venue_id, data).await,
        };

        let mut state = self.state.write().await;
        if state.phase == SessionPhase::Closed {
            debug!("Dropping submit completion for closed session");
            return Ok(SubmitOutcome::Discarded);
        }
        state.phase = SessionPhase::Editing;
        match result {
            Ok(record) => {
                info!(unit_id = %record.id, venue_id = %self.venue_id, "Unit saved");
                state.existing = Some(record.clone());
                Ok(SubmitOutcome::Saved(record))
            }
            Err(err) => {
                warn!(error = %err, "Unit submit failed; draft kept for retry");
                Err(err.into())
            }
        }
    }

    /// Delete the persisted record, releasing its stored asset first.
    pub async fn delete_record(&self) -> Result<DeleteOutcome> {
        let record = {
            let mut state = self.state.write().await;
            match state.phase {
                SessionPhase::Closed => return Err(FormError::Closed),
                SessionPhase::Submitting | SessionPhase::Deleting => {
                    return Ok(DeleteOutcome::InFlight)
                }
                SessionPhase::Editing => {}
            }
            let record = state.existing.clone().ok_or(FormError::NotPersisted)?;
            state.phase = SessionPhase::Deleting;
            record
        };

        self.assets.release().await?;
        let result = self.persistence.delete_unit(&record.id).await;

        let mut state = self.state.write().await;
        match result {
            Ok(()) => {
                info!(unit_id = %record.id, "Unit deleted");
                state.phase = SessionPhase::Closed;
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                warn!(unit_id = %record.id, error = %err, "Unit delete failed");
                if state.phase != SessionPhase::Closed {
                    state.phase = SessionPhase::Editing;
                }
                Err(err.into())
            }
        }
    }

    /// Close the session; any in-flight completion is dropped.
    pub async fn dispose(&self) {
        self.state.write().await.phase = SessionPhase::Closed;
    }

    async fn revalidate(&self) -> Validity {
        let asset = self.assets.state().await;
        let mut state = self.state.write().await;
        state.validity = state.draft.validate(&self.rules, &asset);
        state.validity.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use crate::types::FieldStatus;
    use venue_store::{MockAssetStore, MockPersistence};

    struct Harness {
        directory: Arc<Directory>,
        persistence: Arc<MockPersistence>,
        assets: Arc<MockAssetStore>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                directory: Arc::new(Directory::builtin()),
                persistence: Arc::new(MockPersistence::new()),
                assets: Arc::new(MockAssetStore::new()),
            }
        }

        fn with_latency(latency: Duration) -> Self {
            Self {
                directory: Arc::new(Directory::builtin()),
                persistence: Arc::new(MockPersistence::new().with_latency(latency)),
                assets: Arc::new(MockAssetStore::new()),
            }
        }

        fn venue_session(&self) -> VenueSession {
            VenueSession::new_venue(
                "operator-1",
                self.directory.clone(),
                self.persistence.clone(),
                self.assets.clone(),
                VenueRules::default(),
            )
        }

        fn unit_session(&self, venue_id: &str) -> UnitSession {
            UnitSession::new_unit(
                venue_id,
                self.persistence.clone(),
                self.assets.clone(),
                UnitRules::default(),
            )
        }
    }

    async fn fill_valid_venue(session: &VenueSession) {
        session.set_title("Beach Hotel").await;
        session.set_description("Packed with awesome amenities").await;
        session
            .set_location_description("At the very end of the beach road")
            .await;
        session.set_country("US").await;
        session.upload_image(vec![0xFF]).await.unwrap();
    }

    async fn fill_valid_unit(session: &UnitSession) {
        session
            .edit(|draft| {
                draft.title = "Double Room".to_string();
                draft.description = "A beautiful view of the ocean".to_string();
                draft.bed_count = 2;
                draft.guest_count = 4;
                draft.bathroom_count = 1;
                draft.unit_price = 120;
            })
            .await;
        session.upload_image(vec![0xAA]).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_venue_submit() {
        let harness = Harness::new();
        let session = harness.venue_session();
        fill_valid_venue(&session).await;
        assert!(session.validity().await.is_valid());

        let outcome = session.submit().await.unwrap();
        let record = match outcome {
            SubmitOutcome::Saved(record) => record,
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert!(harness.persistence.has_venue(&record.id));
        assert!(!session.is_submitting().await);
        assert_eq!(session.record().await.unwrap().id, record.id);
    }

    #[tokio::test]
    async fn test_invalid_draft_blocks_submit() {
        let harness = Harness::new();
        let session = harness.venue_session();
        session.set_title("Beach Hotel").await;

        let result = session.submit().await;
        assert!(matches!(result, Err(FormError::Validation(_))));
        assert_eq!(harness.persistence.write_calls(), 0);
    }

    #[tokio::test]
    async fn test_double_submit_issues_one_call() {
        let harness = Harness::with_latency(Duration::from_millis(50));
        let session = Arc::new(harness.venue_session());
        fill_valid_venue(&session).await;

        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.submit().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(session.is_submitting().await);

        let second = session.submit().await.unwrap();
        assert_eq!(second, SubmitOutcome::InFlight);

        let first = first.await.unwrap().unwrap();
        assert!(matches!(first, SubmitOutcome::Saved(_)));
        assert_eq!(harness.persistence.write_calls(), 1);
    }

    #[tokio::test]
    async fn test_update_branch_keeps_record_id() {
        let harness = Harness::new();
        let session = harness.venue_session();
        fill_valid_venue(&session).await;
        let created = match session.submit().await.unwrap() {
            SubmitOutcome::Saved(record) => record,
            other => panic!("unexpected outcome: {other:?}"),
        };

        let edit = VenueSession::edit_venue(
            created.clone(),
            harness.directory.clone(),
            harness.persistence.clone(),
            harness.assets.clone(),
            VenueRules::default(),
        );
        edit.set_title("Cliff Hotel").await;
        let updated = match edit.submit().await.unwrap() {
            SubmitOutcome::Saved(record) => record,
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Cliff Hotel");
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_draft() {
        let harness = Harness::new();
        let session = harness.venue_session();
        fill_valid_venue(&session).await;

        harness.persistence.fail_next();
        let result = session.submit().await;
        assert!(matches!(result, Err(FormError::Persistence(_))));
        assert!(!session.is_submitting().await);

        // Draft intact, retry succeeds
        assert_eq!(session.draft().await.title, "Beach Hotel");
        assert!(matches!(
            session.submit().await.unwrap(),
            SubmitOutcome::Saved(_)
        ));
    }

    #[tokio::test]
    async fn test_country_change_cascades_before_next_read() {
        let harness = Harness::new();
        let session = harness.venue_session();
        session.set_country("US").await;
        session.set_region(Some("US-CA".to_string())).await;
        session.set_locality(Some("Los Angeles".to_string())).await;

        session.set_country("FR").await;

        let draft = session.draft().await;
        assert_eq!(draft.geo.region_code, None);
        assert_eq!(draft.geo.locality_name, None);

        let regions = session.region_options().await;
        assert!(regions.iter().all(|r| r.parent_code.as_deref() == Some("FR")));
        assert!(session.locality_options().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_requires_persisted_record() {
        let harness = Harness::new();
        let session = harness.venue_session();
        assert!(matches!(
            session.delete_record().await,
            Err(FormError::NotPersisted)
        ));
    }

    #[tokio::test]
    async fn test_delete_releases_asset_and_closes() {
        let harness = Harness::new();
        let session = harness.venue_session();
        fill_valid_venue(&session).await;
        let record = match session.submit().await.unwrap() {
            SubmitOutcome::Saved(record) => record,
            other => panic!("unexpected outcome: {other:?}"),
        };

        let outcome = session.delete_record().await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(!harness.persistence.has_venue(&record.id));
        assert_eq!(harness.assets.delete_calls(), vec![record.image]);
        assert!(matches!(session.submit().await, Err(FormError::Closed)));
    }

    #[tokio::test]
    async fn test_delete_failure_returns_to_editing() {
        let harness = Harness::new();
        let session = harness.venue_session();
        fill_valid_venue(&session).await;
        let record = match session.submit().await.unwrap() {
            SubmitOutcome::Saved(record) => record,
            other => panic!("unexpected outcome: {other:?}"),
        };

        harness.persistence.fail_next();
        assert!(matches!(
            session.delete_record().await,
            Err(FormError::Persistence(_))
        ));
        // Record presumed to still exist; session stays usable
        assert!(harness.persistence.has_venue(&record.id));
        assert!(!session.is_deleting().await);
    }

    #[tokio::test]
    async fn test_disposed_session_discards_late_submit() {
        let harness = Harness::with_latency(Duration::from_millis(50));
        let session = Arc::new(harness.venue_session());
        fill_valid_venue(&session).await;

        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.submit().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        session.dispose().await;

        let outcome = pending.await.unwrap().unwrap();
        assert_eq!(outcome, SubmitOutcome::Discarded);
        assert!(session.record().await.is_none());
    }

    #[tokio::test]
    async fn test_advisory_scenario() {
        let harness = Harness::new();
        let session = harness.venue_session();
        fill_valid_venue(&session).await;
        let venue = match session.submit().await.unwrap() {
            SubmitOutcome::Saved(record) => record,
            other => panic!("unexpected outcome: {other:?}"),
        };
        assert_eq!(venue.country_code, "US");
        assert_eq!(venue.region_code, None);

        session.refresh_units().await.unwrap();
        assert!(session.advisory().await);

        let unit_session = harness.unit_session(&venue.id);
        fill_valid_unit(&unit_session).await;
        let saved = unit_session.submit().await.unwrap();
        assert!(matches!(saved, SubmitOutcome::Saved(_)));

        let units = session.refresh_units().await.unwrap();
        assert_eq!(units.len(), 1);
        assert!(!session.advisory().await);
    }

    #[tokio::test]
    async fn test_unit_validation_gates_submit() {
        let harness = Harness::new();
        let session = harness.venue_session();
        fill_valid_venue(&session).await;
        let venue = match session.submit().await.unwrap() {
            SubmitOutcome::Saved(record) => record,
            other => panic!("unexpected outcome: {other:?}"),
        };

        let unit_session = harness.unit_session(&venue.id);
        unit_session
            .edit(|draft| {
                draft.title = "Double Room".to_string();
            })
            .await;
        assert!(matches!(
            unit_session.submit().await,
            Err(FormError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_image_replacement_through_session() {
        let harness = Harness::new();
        let session = harness.venue_session();
        fill_valid_venue(&session).await;

        let replaced = session.upload_image(vec![0x01]).await.unwrap();
        // The first upload's key got exactly one cleanup request
        assert_eq!(harness.assets.delete_calls().len(), 1);
        assert_ne!(harness.assets.delete_calls()[0], replaced);
        assert!(session.validity().await.is_valid());
    }

    #[tokio::test]
    async fn test_validity_pending_during_replacement_upload() {
        let harness = Harness::new();
        let assets = Arc::new(MockAssetStore::new().with_latency(Duration::from_millis(50)));
        let session = Arc::new(VenueSession::new_venue(
            "operator-1",
            harness.directory.clone(),
            harness.persistence.clone(),
            assets.clone(),
            VenueRules::default(),
        ));
        fill_valid_venue(&session).await;
        assert!(session.validity().await.is_valid());

        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.upload_image(vec![0x02]).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        // The replacement is still in flight; the cached validity must
        // already read the image as pending
        let validity = session.validity().await;
        assert!(!validity.is_valid());
        assert_eq!(
            validity.field("image"),
            Some(&FieldStatus::Invalid("Upload in progress".to_string()))
        );

        pending.await.unwrap().unwrap();
        assert!(session.validity().await.is_valid());
    }

    #[tokio::test]
    async fn test_failed_upload_restores_validity() {
        let harness = Harness::new();
        let session = harness.venue_session();
        fill_valid_venue(&session).await;

        harness.assets.set_fail_uploads(true);
        assert!(matches!(
            session.upload_image(vec![0x02]).await,
            Err(FormError::Upload(_))
        ));
        // Slot reverted to the stored key; the published validity follows
        assert!(session.validity().await.is_valid());
    }

    #[tokio::test]
    async fn test_submit_payload_pins_asset_at_dispatch() {
        let harness = Harness::with_latency(Duration::from_millis(50));
        let session = Arc::new(harness.venue_session());
        fill_valid_venue(&session).await;

        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.submit().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(session.is_submitting().await);
        session.remove_image().await.unwrap();

        let record = match pending.await.unwrap().unwrap() {
            SubmitOutcome::Saved(record) => record,
            other => panic!("unexpected outcome: {other:?}"),
        };
        // The payload carries the key that was stored when the call was
        // dispatched, even though the slot emptied mid-flight
        assert_eq!(record.image, AssetKey::new("asset-0"));
        assert_eq!(harness.assets.delete_calls(), vec![AssetKey::new("asset-0")]);
    }

    #[tokio::test]
    async fn test_remove_image_invalidates_draft() {
        let harness = Harness::new();
        let session = harness.venue_session();
        fill_valid_venue(&session).await;

        session.remove_image().await.unwrap();
        let validity = session.validity().await;
        assert!(!validity.field("image").unwrap().is_valid());
        assert!(matches!(session.submit().await, Err(FormError::Validation(_))));
    }
}
