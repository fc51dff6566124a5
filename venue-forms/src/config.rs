//! Configuration for the authoring forms.

use serde::{Deserialize, Serialize};

/// Validation rule configuration for both form kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormsConfig {
    /// Venue form rules
    pub venue: VenueRules,
    /// Unit form rules
    pub unit: UnitRules,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            venue: VenueRules::default(),
            unit: UnitRules::default(),
        }
    }
}

impl FormsConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Rules for the venue form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueRules {
    /// Minimum title length
    pub title_min_len: usize,
    /// Minimum description length
    pub description_min_len: usize,
    /// Minimum location description length
    pub location_description_min_len: usize,
}

impl Default for VenueRules {
    fn default() -> Self {
        Self {
            title_min_len: 3,
            description_min_len: 10,
            location_description_min_len: 10,
        }
    }
}

/// Rules for the unit form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRules {
    /// Minimum title length
    pub title_min_len: usize,
    /// Minimum description length
    pub description_min_len: usize,
    /// Minimum bed count
    pub min_beds: u32,
    /// Minimum guest count
    pub min_guests: u32,
    /// Minimum bathroom count
    pub min_bathrooms: u32,
    /// Minimum nightly price
    pub min_price: u32,
}

impl Default for UnitRules {
    fn default() -> Self {
        Self {
            title_min_len: 3,
            description_min_len: 10,
            min_beds: 1,
            min_guests: 1,
            min_bathrooms: 1,
            min_price: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FormsConfig::default();
        assert_eq!(config.venue.title_min_len, 3);
        assert_eq!(config.venue.description_min_len, 10);
        assert_eq!(config.unit.min_beds, 1);
        assert_eq!(config.unit.min_price, 1);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = FormsConfig::default();
        config.venue.title_min_len = 5;
        let yaml = config.to_yaml().unwrap();
        let parsed = FormsConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.venue.title_min_len, 5);
    }
}
