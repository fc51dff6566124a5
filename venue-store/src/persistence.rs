//! The record persistence seam.
//!
//! One mutating call per committed draft: the form session controller
//! validates, then dispatches exactly one of these operations.

use async_trait::async_trait;

use crate::records::{UnitData, UnitRecord, VenueData, VenueRecord};

/// Error types for persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Record does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Backing store failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl PersistenceError {
    /// Convenience constructor for missing venues.
    pub fn venue_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "venue",
            id: id.into(),
        }
    }

    /// Convenience constructor for missing units.
    pub fn unit_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "unit",
            id: id.into(),
        }
    }
}

/// Trait seam for the record store.
///
/// Implementations own durability and transport; callers only see records
/// going in and coming back.
#[async_trait]
pub trait Persistence: Send + Sync {
    /// Create a venue for the given operator.
    async fn create_venue(
        &self,
        owner_id: &str,
        data: VenueData,
    ) -> Result<VenueRecord, PersistenceError>;

    /// Update an existing venue.
    async fn update_venue(&self, id: &str, data: VenueData)
        -> Result<VenueRecord, PersistenceError>;

    /// Delete a venue.
    async fn delete_venue(&self, id: &str) -> Result<(), PersistenceError>;

    /// Fetch a venue by ID.
    async fn venue(&self, id: &str) -> Result<Option<VenueRecord>, PersistenceError>;

    /// Create a unit under a venue.
    async fn create_unit(
        &self,
        venue_id: &str,
        data: UnitData,
    ) -> Result<UnitRecord, PersistenceError>;

    /// Update an existing unit.
    async fn update_unit(&self, id: &str, data: UnitData) -> Result<UnitRecord, PersistenceError>;

    /// Delete a unit.
    async fn delete_unit(&self, id: &str) -> Result<(), PersistenceError>;

    /// List the units belonging to a venue.
    async fn units_of(&self, venue_id: &str) -> Result<Vec<UnitRecord>, PersistenceError>;
}
