//! Crate-wide types for the form session core.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use venue_store::{AssetError, PersistenceError};

/// Validity of one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldStatus {
    /// Field satisfies its rule set
    Valid,
    /// Field fails its rule set, with a user-facing reason
    Invalid(String),
}

impl FieldStatus {
    /// Whether the field is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Field name → validity, recomputed on every field write.
///
/// Ordered so issue lists render deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validity(BTreeMap<&'static str, FieldStatus>);

impl Validity {
    /// Record a field's status.
    pub fn set(&mut self, field: &'static str, status: FieldStatus) {
        self.0.insert(field, status);
    }

    /// Status of a single field, if it was evaluated.
    pub fn field(&self, field: &str) -> Option<&FieldStatus> {
        self.0.get(field)
    }

    /// Whether every evaluated field is valid.
    pub fn is_valid(&self) -> bool {
        self.0.values().all(FieldStatus::is_valid)
    }

    /// The invalid fields and their reasons.
    pub fn issues(&self) -> Vec<(&'static str, &str)> {
        self.0
            .iter()
            .filter_map(|(field, status)| match status {
                FieldStatus::Invalid(reason) => Some((*field, reason.as_str())),
                FieldStatus::Valid => None,
            })
            .collect()
    }
}

/// Phase of a form session.
///
/// `Submitting` and `Deleting` are mutually exclusive; `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Accepting field writes
    Editing,
    /// A create-or-update call is outstanding
    Submitting,
    /// A delete call is outstanding
    Deleting,
    /// Session disposed or record deleted; late completions are dropped
    Closed,
}

/// Result of a venue submit.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<R> {
    /// The record was created or updated; caller navigates to it
    Saved(R),
    /// Another mutation was already outstanding; nothing was dispatched
    InFlight,
    /// The session was closed while the call was outstanding; result dropped
    Discarded,
}

/// Result of a record delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record is gone; caller navigates away
    Deleted,
    /// Another mutation was already outstanding; nothing was dispatched
    InFlight,
}

/// Error types for form sessions.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// One or more fields fail validation; never sent over the boundary
    #[error("Draft is invalid: {0:?}")]
    Validation(Validity),

    /// Asset store upload failure; asset state was reverted, retry by
    /// re-initiating the upload
    #[error("Upload error: {0}")]
    Upload(#[from] AssetError),

    /// Create/update/delete failure; draft left intact for retry
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Operation requires an existing record (e.g. delete on a new draft)
    #[error("Draft is not backed by a persisted record")]
    NotPersisted,

    /// Operation arrived after the session was closed
    #[error("Session is closed")]
    Closed,

    /// Operation is not allowed in the current asset state
    #[error("Asset operation not allowed: {0}")]
    AssetState(&'static str),
}

pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_aggregation() {
        let mut validity = Validity::default();
        validity.set("title", FieldStatus::Valid);
        assert!(validity.is_valid());

        validity.set(
            "description",
            FieldStatus::Invalid("Description must be at least 10 characters long".to_string()),
        );
        assert!(!validity.is_valid());
        assert_eq!(validity.issues().len(), 1);
        assert_eq!(validity.issues()[0].0, "description");
    }

    #[test]
    fn test_field_lookup() {
        let mut validity = Validity::default();
        validity.set("image", FieldStatus::Invalid("Image is required".to_string()));
        assert!(!validity.field("image").unwrap().is_valid());
        assert!(validity.field("missing").is_none());
    }
}
