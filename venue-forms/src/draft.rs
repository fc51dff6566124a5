//! In-memory drafts and their field rule sets.
//!
//! A draft holds the scalar attributes of the entity being authored; the
//! asset reference lives with the session's [`AssetCoordinator`] and is fed
//! into validation as the current [`AssetState`].
//!
//! [`AssetCoordinator`]: crate::asset::AssetCoordinator

use gazetteer::GeoSelection;
use serde::{Deserialize, Serialize};
use venue_store::{UnitData, UnitFeatures, UnitRecord, VenueAmenities, VenueData, VenueRecord};

use crate::asset::AssetState;
use crate::config::{UnitRules, VenueRules};
use crate::types::{FieldStatus, Validity};

/// Draft of a venue being authored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueDraft {
    pub title: String,
    pub description: String,
    pub location_description: String,
    pub geo: GeoSelection,
    pub amenities: VenueAmenities,
}

impl VenueDraft {
    /// Prefill a draft from the record it updates.
    pub fn from_record(record: &VenueRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            location_description: record.location_description.clone(),
            geo: GeoSelection {
                country_code: record.country_code.clone(),
                region_code: record.region_code.clone(),
                locality_name: record.locality_name.clone(),
            },
            amenities: record.amenities,
        }
    }

    /// Evaluate every field rule against the current values.
    pub fn validate(&self, rules: &VenueRules, asset: &AssetState) -> Validity {
        let mut validity = Validity::default();
        validity.set(
            "title",
            min_len(&self.title, rules.title_min_len, "Title"),
        );
        validity.set(
            "description",
            min_len(&self.description, rules.description_min_len, "Description"),
        );
        validity.set(
            "location_description",
            min_len(
                &self.location_description,
                rules.location_description_min_len,
                "Location description",
            ),
        );
        validity.set(
            "country",
            if self.geo.has_country() {
                FieldStatus::Valid
            } else {
                FieldStatus::Invalid("Country is required".to_string())
            },
        );
        validity.set("image", asset_status(asset));
        validity
    }

    /// The persistence payload for this draft.
    pub fn data(&self, image: venue_store::AssetKey) -> VenueData {
        VenueData {
            title: self.title.clone(),
            description: self.description.clone(),
            location_description: self.location_description.clone(),
            image,
            country_code: self.geo.country_code.clone(),
            region_code: self.geo.region_code.clone(),
            locality_name: self.geo.locality_name.clone(),
            amenities: self.amenities,
        }
    }
}

/// Draft of a unit being authored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitDraft {
    pub title: String,
    pub description: String,
    pub bed_count: u32,
    pub guest_count: u32,
    pub bathroom_count: u32,
    pub king_beds: u32,
    pub queen_beds: u32,
    pub unit_price: u32,
    pub breakfast_price: Option<u32>,
    pub features: UnitFeatures,
}

impl UnitDraft {
    /// Prefill a draft from the record it updates.
    pub fn from_record(record: &UnitRecord) -> Self {
        Self {
            title: record.title.clone(),
            description: record.description.clone(),
            bed_count: record.bed_count,
            guest_count: record.guest_count,
            bathroom_count: record.bathroom_count,
            king_beds: record.king_beds,
            queen_beds: record.queen_beds,
            unit_price: record.unit_price,
            breakfast_price: record.breakfast_price,
            features: record.features,
        }
    }

    /// Evaluate every field rule against the current values.
    pub fn validate(&self, rules: &UnitRules, asset: &AssetState) -> Validity {
        let mut validity = Validity::default();
        validity.set(
            "title",
            min_len(&self.title, rules.title_min_len, "Title"),
        );
        validity.set(
            "description",
            min_len(&self.description, rules.description_min_len, "Description"),
        );
        validity.set(
            "bed_count",
            min_count(self.bed_count, rules.min_beds, "Bed count"),
        );
        validity.set(
            "guest_count",
            min_count(self.guest_count, rules.min_guests, "Guest count"),
        );
        validity.set(
            "bathroom_count",
            min_count(self.bathroom_count, rules.min_bathrooms, "Bathroom count"),
        );
        validity.set(
            "unit_price",
            min_count(self.unit_price, rules.min_price, "Unit price"),
        );
        validity.set("image", asset_status(asset));
        validity
    }

    /// The persistence payload for this draft.
    pub fn data(&self, image: venue_store::AssetKey) -> UnitData {
        UnitData {
            title: self.title.clone(),
            description: self.description.clone(),
            image,
            bed_count: self.bed_count,
            guest_count: self.guest_count,
            bathroom_count: self.bathroom_count,
            king_beds: self.king_beds,
            queen_beds: self.queen_beds,
            unit_price: self.unit_price,
            breakfast_price: self.breakfast_price,
            features: self.features,
        }
    }
}

fn min_len(value: &str, min: usize, label: &str) -> FieldStatus {
    if value.chars().count() >= min {
        FieldStatus::Valid
    } else {
        FieldStatus::Invalid(format!("{label} must be at least {min} characters long"))
    }
}

fn min_count(value: u32, min: u32, label: &str) -> FieldStatus {
    if value >= min {
        FieldStatus::Valid
    } else {
        FieldStatus::Invalid(format!("{label} must be at least {min}"))
    }
}

fn asset_status(asset: &AssetState) -> FieldStatus {
    match asset {
        AssetState::Stored(_) => FieldStatus::Valid,
        AssetState::Uploading => FieldStatus::Invalid("Upload in progress".to_string()),
        AssetState::Empty => FieldStatus::Invalid("Image is required".to_string()),
    }
}
