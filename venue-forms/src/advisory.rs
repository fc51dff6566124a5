//! Completeness advisory.
//!
//! A venue with zero units is live but not bookable; the advisory prompts
//! the operator to add at least one unit. Purely derived, recomputed on each
//! view, never persisted, never blocking.

use venue_store::{UnitRecord, VenueRecord};

/// True iff the venue exists but has no units yet.
pub fn needs_units(_venue: &VenueRecord, units: &[UnitRecord]) -> bool {
    units.is_empty()
}
