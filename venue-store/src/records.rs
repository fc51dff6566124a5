//! Persisted record types and their create/update payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assets::AssetKey;

/// A committed venue (the parent record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueRecord {
    /// Unique record ID
    pub id: String,
    /// Identifier of the operator who owns the venue
    pub owner_id: String,
    /// Venue title
    pub title: String,
    /// Venue description
    pub description: String,
    /// Free-text description of the location
    pub location_description: String,
    /// Stored cover image
    pub image: AssetKey,
    /// Selected country code
    pub country_code: String,
    /// Selected region code, if any
    pub region_code: Option<String>,
    /// Selected locality name, if any
    pub locality_name: Option<String>,
    /// Amenity flags
    pub amenities: VenueAmenities,
    /// When the record was created
    pub added_at: DateTime<Utc>,
    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// A committed unit (the child record). References exactly one venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Unique record ID
    pub id: String,
    /// Owning venue
    pub venue_id: String,
    /// Unit title
    pub title: String,
    /// Unit description
    pub description: String,
    /// Stored cover image
    pub image: AssetKey,
    /// Number of beds
    pub bed_count: u32,
    /// Number of guests allowed
    pub guest_count: u32,
    /// Number of bathrooms
    pub bathroom_count: u32,
    /// Number of king beds
    pub king_beds: u32,
    /// Number of queen beds
    pub queen_beds: u32,
    /// Nightly price
    pub unit_price: u32,
    /// Breakfast price, if offered
    pub breakfast_price: Option<u32>,
    /// Feature flags
    pub features: UnitFeatures,
    /// When the record was created
    pub added_at: DateTime<Utc>,
    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Amenity flags for a venue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueAmenities {
    pub gym: bool,
    pub spa: bool,
    pub bar: bool,
    pub laundry: bool,
    pub restaurant: bool,
    pub shopping: bool,
    pub free_parking: bool,
    pub bike_rental: bool,
    pub free_wifi: bool,
    pub movie_nights: bool,
    pub swimming_pool: bool,
    pub coffee_shop: bool,
}

/// Feature flags for a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFeatures {
    pub room_service: bool,
    pub tv: bool,
    pub balcony: bool,
    pub free_wifi: bool,
    pub city_view: bool,
    pub ocean_view: bool,
    pub forest_view: bool,
    pub mountain_view: bool,
    pub air_condition: bool,
    pub sound_proofed: bool,
}

/// Validated payload for creating or updating a venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueData {
    pub title: String,
    pub description: String,
    pub location_description: String,
    pub image: AssetKey,
    pub country_code: String,
    pub region_code: Option<String>,
    pub locality_name: Option<String>,
    pub amenities: VenueAmenities,
}

/// Validated payload for creating or updating a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitData {
    pub title: String,
    pub description: String,
    pub image: AssetKey,
    pub bed_count: u32,
    pub guest_count: u32,
    pub bathroom_count: u32,
    pub king_beds: u32,
    pub queen_beds: u32,
    pub unit_price: u32,
    pub breakfast_price: Option<u32>,
    pub features: UnitFeatures,
}

impl VenueRecord {
    /// Materialize a new record from a create payload.
    pub fn from_data(owner_id: impl Into<String>, data: VenueData) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            title: data.title,
            description: data.description,
            location_description: data.location_description,
            image: data.image,
            country_code: data.country_code,
            region_code: data.region_code,
            locality_name: data.locality_name,
            amenities: data.amenities,
            added_at: now,
            updated_at: now,
        }
    }

    /// Apply an update payload, refreshing the updated timestamp.
    pub fn apply(&mut self, data: VenueData) {
        self.title = data.title;
        self.description = data.description;
        self.location_description = data.location_description;
        self.image = data.image;
        self.country_code = data.country_code;
        self.region_code = data.region_code;
        self.locality_name = data.locality_name;
        self.amenities = data.amenities;
        self.updated_at = Utc::now();
    }
}

impl UnitRecord {
    /// Materialize a new record from a create payload.
    pub fn from_data(venue_id: impl Into<String>, data: UnitData) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            venue_id: venue_id.into(),
            title: data.title,
            description: data.description,
            image: data.image,
            bed_count: data.bed_count,
            guest_count: data.guest_count,
            bathroom_count: data.bathroom_count,
            king_beds: data.king_beds,
            queen_beds: data.queen_beds,
            unit_price: data.unit_price,
            breakfast_price: data.breakfast_price,
            features: data.features,
            added_at: now,
            updated_at: now,
        }
    }

    /// Apply an update payload, refreshing the updated timestamp.
    pub fn apply(&mut self, data: UnitData) {
        self.title = data.title;
        self.description = data.description;
        self.image = data.image;
        self.bed_count = data.bed_count;
        self.guest_count = data.guest_count;
        self.bathroom_count = data.bathroom_count;
        self.king_beds = data.king_beds;
        self.queen_beds = data.queen_beds;
        self.unit_price = data.unit_price;
        self.breakfast_price = data.breakfast_price;
        self.features = data.features;
        self.updated_at = Utc::now();
    }
}
