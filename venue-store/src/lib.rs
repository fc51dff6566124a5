//! Venue Store - records and storage collaborators
//!
//! The persisted side of the authoring core:
//!
//! - [`VenueRecord`] / [`UnitRecord`]: committed forms of a draft; every unit
//!   references exactly one venue
//! - [`Persistence`]: trait seam for the record store (create/update/delete
//!   and child listing)
//! - [`AssetStore`]: trait seam for the external binary asset store, keyed by
//!   opaque store-defined [`AssetKey`]s
//! - [`mock`]: in-memory implementations for tests, with call counters and
//!   failure injection
//!
//! Nothing here executes queries or speaks a wire protocol; durable storage
//! and transport live behind the traits.

pub mod assets;
pub mod mock;
pub mod persistence;
pub mod records;

// Re-export main types
pub use assets::{AssetError, AssetKey, AssetStore};
pub use mock::{MockAssetStore, MockPersistence};
pub use persistence::{Persistence, PersistenceError};
pub use records::{
    UnitData, UnitFeatures, UnitRecord, VenueAmenities, VenueData, VenueRecord,
};
