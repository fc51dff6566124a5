//! The static, read-only classification directory.
//!
//! Entries are loaded once per process and indexed by parent code at
//! construction time. Lookups always return entries in declared directory
//! order, never re-sorted, so option lists stay deterministic.

use std::collections::HashMap;

use crate::types::ClassificationEntry;

/// Read-only source of geographic entries, queried by parent scope.
#[derive(Debug, Clone)]
pub struct Directory {
    countries: Vec<ClassificationEntry>,
    regions: Vec<ClassificationEntry>,
    localities: Vec<ClassificationEntry>,
    /// country code -> indexes into `regions`, in directory order
    regions_by_country: HashMap<String, Vec<usize>>,
    /// region code -> indexes into `localities`, in directory order
    localities_by_region: HashMap<String, Vec<usize>>,
}

impl Directory {
    /// Assemble a directory from per-level entry lists.
    ///
    /// The declared order of each list is preserved by every lookup.
    pub fn new(
        countries: Vec<ClassificationEntry>,
        regions: Vec<ClassificationEntry>,
        localities: Vec<ClassificationEntry>,
    ) -> Self {
        let mut regions_by_country: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, region) in regions.iter().enumerate() {
            if let Some(parent) = &region.parent_code {
                regions_by_country.entry(parent.clone()).or_default().push(idx);
            }
        }

        let mut localities_by_region: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, locality) in localities.iter().enumerate() {
            if let Some(parent) = &locality.parent_code {
                localities_by_region.entry(parent.clone()).or_default().push(idx);
            }
        }

        Self {
            countries,
            regions,
            localities,
            regions_by_country,
            localities_by_region,
        }
    }

    /// The built-in dataset.
    ///
    /// A compiled-in excerpt of the usual country/region/locality tables,
    /// enough for authoring flows and tests. Deployments with wider coverage
    /// construct a [`Directory`] from their own entry lists.
    pub fn builtin() -> Self {
        Self::new(builtin_countries(), builtin_regions(), builtin_localities())
    }

    /// All countries, in directory order.
    pub fn countries(&self) -> &[ClassificationEntry] {
        &self.countries
    }

    /// Regions belonging to a country, in directory order.
    pub fn regions_of(&self, country_code: &str) -> Vec<&ClassificationEntry> {
        self.regions_by_country
            .get(country_code)
            .map(|indexes| indexes.iter().map(|&i| &self.regions[i]).collect())
            .unwrap_or_default()
    }

    /// Localities belonging to a region, in directory order.
    pub fn localities_of(&self, region_code: &str) -> Vec<&ClassificationEntry> {
        self.localities_by_region
            .get(region_code)
            .map(|indexes| indexes.iter().map(|&i| &self.localities[i]).collect())
            .unwrap_or_default()
    }

    /// Look up a country by code.
    pub fn country(&self, code: &str) -> Option<&ClassificationEntry> {
        self.countries.iter().find(|c| c.code == code)
    }

    /// Look up a region by code.
    pub fn region(&self, code: &str) -> Option<&ClassificationEntry> {
        self.regions.iter().find(|r| r.code == code)
    }

    /// Whether a region with this code exists under the given country.
    pub fn region_in_country(&self, region_code: &str, country_code: &str) -> bool {
        self.regions_of(country_code)
            .iter()
            .any(|r| r.code == region_code)
    }

    /// Whether a locality with this name exists under the given region.
    pub fn locality_in_region(&self, locality_name: &str, region_code: &str) -> bool {
        self.localities_of(region_code)
            .iter()
            .any(|l| l.name == locality_name)
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_countries() -> Vec<ClassificationEntry> {
    [
        ("US", "United States"),
        ("CA", "Canada"),
        ("GB", "United Kingdom"),
        ("FR", "France"),
        ("DE", "Germany"),
        ("ES", "Spain"),
        ("IT", "Italy"),
        ("JP", "Japan"),
        ("AU", "Australia"),
        ("MC", "Monaco"),
    ]
    .into_iter()
    .map(|(code, name)| ClassificationEntry::country(code, name))
    .collect()
}

fn builtin_regions() -> Vec<ClassificationEntry> {
    [
        ("US-CA", "California", "US"),
        ("US-FL", "Florida", "US"),
        ("US-NY", "New York", "US"),
        ("US-TX", "Texas", "US"),
        ("US-WA", "Washington", "US"),
        ("CA-BC", "British Columbia", "CA"),
        ("CA-ON", "Ontario", "CA"),
        ("CA-QC", "Quebec", "CA"),
        ("GB-ENG", "England", "GB"),
        ("GB-SCT", "Scotland", "GB"),
        ("FR-IDF", "Ile-de-France", "FR"),
        ("FR-PAC", "Provence-Alpes-Cote d'Azur", "FR"),
        ("DE-BY", "Bavaria", "DE"),
        ("DE-BE", "Berlin", "DE"),
        ("ES-CT", "Catalonia", "ES"),
        ("ES-AN", "Andalusia", "ES"),
        ("IT-62", "Lazio", "IT"),
        ("IT-25", "Lombardy", "IT"),
        ("JP-13", "Tokyo", "JP"),
        ("JP-27", "Osaka", "JP"),
        ("AU-NSW", "New South Wales", "AU"),
        ("AU-QLD", "Queensland", "AU"),
    ]
    .into_iter()
    .map(|(code, name, country)| ClassificationEntry::region(code, name, country))
    .collect()
}

fn builtin_localities() -> Vec<ClassificationEntry> {
    [
        ("Los Angeles", "US-CA"),
        ("San Francisco", "US-CA"),
        ("San Diego", "US-CA"),
        ("Miami", "US-FL"),
        ("Orlando", "US-FL"),
        ("New York City", "US-NY"),
        ("Buffalo", "US-NY"),
        ("Austin", "US-TX"),
        ("Houston", "US-TX"),
        ("Seattle", "US-WA"),
        ("Vancouver", "CA-BC"),
        ("Victoria", "CA-BC"),
        ("Toronto", "CA-ON"),
        ("Ottawa", "CA-ON"),
        ("Montreal", "CA-QC"),
        ("London", "GB-ENG"),
        ("Manchester", "GB-ENG"),
        ("Edinburgh", "GB-SCT"),
        ("Paris", "FR-IDF"),
        ("Versailles", "FR-IDF"),
        ("Nice", "FR-PAC"),
        ("Marseille", "FR-PAC"),
        ("Munich", "DE-BY"),
        ("Berlin", "DE-BE"),
        ("Barcelona", "ES-CT"),
        ("Seville", "ES-AN"),
        ("Rome", "IT-62"),
        ("Milan", "IT-25"),
        ("Shinjuku", "JP-13"),
        ("Shibuya", "JP-13"),
        ("Osaka", "JP-27"),
        ("Sydney", "AU-NSW"),
        ("Brisbane", "AU-QLD"),
    ]
    .into_iter()
    .map(|(name, region)| ClassificationEntry::locality(name, region))
    .collect()
}
