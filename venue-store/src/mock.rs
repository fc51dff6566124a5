//! In-memory mock collaborators for testing.
//!
//! Configurable failure injection, call counters, and injectable latency so
//! tests can observe a call while it is still outstanding.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::assets::{AssetError, AssetKey, AssetStore};
use crate::persistence::{Persistence, PersistenceError};
use crate::records::{UnitData, UnitRecord, VenueData, VenueRecord};

/// Mock record store backed by in-memory maps.
#[derive(Default)]
pub struct MockPersistence {
    venues: DashMap<String, VenueRecord>,
    units: DashMap<String, UnitRecord>,
    write_calls: AtomicU32,
    fail_next: AtomicBool,
    latency_ms: AtomicU64,
}

impl MockPersistence {
    /// Create an empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every operation, so tests can overlap calls.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
        self
    }

    /// Fail the next operation with a backend error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of mutating calls issued so far.
    pub fn write_calls(&self) -> u32 {
        self.write_calls.load(Ordering::SeqCst)
    }

    /// Seed a venue record directly.
    pub fn insert_venue(&self, record: VenueRecord) {
        self.venues.insert(record.id.clone(), record);
    }

    /// Seed a unit record directly.
    pub fn insert_unit(&self, record: UnitRecord) {
        self.units.insert(record.id.clone(), record);
    }

    /// Whether a venue with this ID is present.
    pub fn has_venue(&self, id: &str) -> bool {
        self.venues.contains_key(id)
    }

    async fn enter_write(&self) -> Result<(), PersistenceError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(PersistenceError::Backend("injected failure".to_string()));
        }
        Ok(())
    }

    async fn simulate_latency(&self) {
        let ms = self.latency_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

#[async_trait]
impl Persistence for MockPersistence {
    async fn create_venue(
        &self,
        owner_id: &str,
        data: VenueData,
    ) -> Result<VenueRecord, PersistenceError> {
        self.enter_write().await?;
        let record = VenueRecord::from_data(owner_id, data);
        self.venues.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update_venue(
        &self,
        id: &str,
        data: VenueData,
    ) -> Result<VenueRecord, PersistenceError> {
        self.enter_write().await?;
        let mut entry = self
            .venues
            .get_mut(id)
            .ok_or_else(|| PersistenceError::venue_not_found(id))?;
        entry.apply(data);
        Ok(entry.value().clone())
    }

    async fn delete_venue(&self, id: &str) -> Result<(), PersistenceError> {
        self.enter_write().await?;
        self.venues
            .remove(id)
            .ok_or_else(|| PersistenceError::venue_not_found(id))?;
        self.units.retain(|_, unit| unit.venue_id != id);
        Ok(())
    }

    async fn venue(&self, id: &str) -> Result<Option<VenueRecord>, PersistenceError> {
        self.simulate_latency().await;
        Ok(self.venues.get(id).map(|v| v.value().clone()))
    }

    async fn create_unit(
        &self,
        venue_id: &str,
        data: UnitData,
    ) -> Result<UnitRecord, PersistenceError> {
        self.enter_write().await?;
        if !self.venues.contains_key(venue_id) {
            return Err(PersistenceError::venue_not_found(venue_id));
        }
        let record = UnitRecord::from_data(venue_id, data);
        self.units.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn update_unit(&self, id: &str, data: UnitData) -> Result<UnitRecord, PersistenceError> {
        self.enter_write().await?;
        let mut entry = self
            .units
            .get_mut(id)
            .ok_or_else(|| PersistenceError::unit_not_found(id))?;
        entry.apply(data);
        Ok(entry.value().clone())
    }

    async fn delete_unit(&self, id: &str) -> Result<(), PersistenceError> {
        self.enter_write().await?;
        self.units
            .remove(id)
            .ok_or_else(|| PersistenceError::unit_not_found(id))?;
        Ok(())
    }

    async fn units_of(&self, venue_id: &str) -> Result<Vec<UnitRecord>, PersistenceError> {
        self.simulate_latency().await;
        let mut units: Vec<UnitRecord> = self
            .units
            .iter()
            .filter(|entry| entry.venue_id == venue_id)
            .map(|entry| entry.value().clone())
            .collect();
        units.sort_by(|a, b| a.added_at.cmp(&b.added_at));
        Ok(units)
    }
}

/// Mock asset store issuing sequential keys.
#[derive(Default)]
pub struct MockAssetStore {
    next_key: AtomicU32,
    deleted: Mutex<Vec<AssetKey>>,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
    latency_ms: AtomicU64,
}

impl MockAssetStore {
    /// Create a new mock asset store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every operation.
    pub fn with_latency(self, latency: Duration) -> Self {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
        self
    }

    /// Make uploads fail until switched back.
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Make deletions fail until switched back.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Keys that delete was called with, in order, including failed attempts.
    pub fn delete_calls(&self) -> Vec<AssetKey> {
        self.deleted.lock().expect("mock lock poisoned").clone()
    }
}

#[async_trait]
impl AssetStore for MockAssetStore {
    async fn upload(&self, _bytes: Vec<u8>) -> Result<AssetKey, AssetError> {
        let ms = self.latency_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AssetError::Upload("injected upload failure".to_string()));
        }
        let n = self.next_key.fetch_add(1, Ordering::SeqCst);
        Ok(AssetKey::new(format!("asset-{n}")))
    }

    async fn delete(&self, key: &AssetKey) -> Result<(), AssetError> {
        self.deleted
            .lock()
            .expect("mock lock poisoned")
            .push(key.clone());
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AssetError::Delete {
                key: key.clone(),
                reason: "injected delete failure".to_string(),
            });
        }
        Ok(())
    }
}
