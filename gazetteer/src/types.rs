//! Core types for the classification directory.

use serde::{Deserialize, Serialize};

/// The three levels of the geographic hierarchy.
///
/// Each level's valid choices depend on the selection at the previous level,
/// forming a strict three-level chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum GeoLevel {
    /// Top of the chain, no ancestor
    Country,
    /// Depends on the selected country
    Region,
    /// Depends on the selected region
    Locality,
}

impl GeoLevel {
    /// The level this one depends on, if any.
    pub fn ancestor(&self) -> Option<Self> {
        match self {
            Self::Country => None,
            Self::Region => Some(Self::Country),
            Self::Locality => Some(Self::Region),
        }
    }

    /// Get string representation for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Region => "region",
            Self::Locality => "locality",
        }
    }
}

/// One entry in the static geographic hierarchy.
///
/// Immutable once loaded; looked up by parent code, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    /// Stable code identifying the entry (ISO-style for countries/regions,
    /// the display name for localities, which carry no stable code upstream)
    pub code: String,
    /// Human-readable name
    pub name: String,
    /// Code of the owning entry at the previous level; `None` for countries
    pub parent_code: Option<String>,
}

impl ClassificationEntry {
    /// Create a country entry.
    pub fn country(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            parent_code: None,
        }
    }

    /// Create a region entry under a country.
    pub fn region(
        code: impl Into<String>,
        name: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            parent_code: Some(country_code.into()),
        }
    }

    /// Create a locality entry under a region. Localities are keyed by name.
    pub fn locality(name: impl Into<String>, region_code: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: name.clone(),
            name,
            parent_code: Some(region_code.into()),
        }
    }
}

/// The three geographic selection slots of a venue draft.
///
/// An empty `country_code` means no country has been chosen yet. Region and
/// locality are only meaningful while consistent with their ancestor; the
/// [`reconcile`](GeoSelection::reconcile) pass clears them otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoSelection {
    /// Selected country code, empty when unset
    pub country_code: String,
    /// Selected region code, if any
    pub region_code: Option<String>,
    /// Selected locality name, if any
    pub locality_name: Option<String>,
}

impl GeoSelection {
    /// Create a selection with only the country chosen.
    pub fn new(country_code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            region_code: None,
            locality_name: None,
        }
    }

    /// Whether any country has been chosen.
    pub fn has_country(&self) -> bool {
        !self.country_code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_chain() {
        assert_eq!(GeoLevel::Country.ancestor(), None);
        assert_eq!(GeoLevel::Region.ancestor(), Some(GeoLevel::Country));
        assert_eq!(GeoLevel::Locality.ancestor(), Some(GeoLevel::Region));
    }

    #[test]
    fn test_locality_keyed_by_name() {
        let entry = ClassificationEntry::locality("Los Angeles", "US-CA");
        assert_eq!(entry.code, "Los Angeles");
        assert_eq!(entry.parent_code.as_deref(), Some("US-CA"));
    }

    #[test]
    fn test_empty_selection_has_no_country() {
        let selection = GeoSelection::default();
        assert!(!selection.has_country());
        assert!(GeoSelection::new("US").has_country());
    }
}
