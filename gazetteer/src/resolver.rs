//! Dependent-option resolution over the three-level chain.
//!
//! [`options_for`] derives the valid option set for a level from the ancestor
//! selections; [`GeoSelection::reconcile`] is the invalidation pass a form
//! controller runs after any ancestor field write. Both are pure and safe to
//! call on every keystroke.

use crate::directory::Directory;
use crate::types::{ClassificationEntry, GeoLevel, GeoSelection};

/// The ordered option set for a level given the current ancestor selections.
///
/// - `Country`: every country in the directory
/// - `Region`: regions of the selected country; empty if the country is
///   unset or unknown
/// - `Locality`: localities of the selected region; empty until a region is
///   chosen
///
/// Options come back in directory order.
pub fn options_for<'a>(
    directory: &'a Directory,
    level: GeoLevel,
    selection: &GeoSelection,
) -> Vec<&'a ClassificationEntry> {
    match level {
        GeoLevel::Country => directory.countries().iter().collect(),
        GeoLevel::Region => {
            if !selection.has_country() {
                return Vec::new();
            }
            directory.regions_of(&selection.country_code)
        }
        GeoLevel::Locality => match &selection.region_code {
            Some(region_code) => directory.localities_of(region_code),
            None => Vec::new(),
        },
    }
}

impl GeoSelection {
    /// Clear descendant selections that are no longer consistent.
    ///
    /// Single ancestor-to-descendant pass: the region is checked against the
    /// (possibly new) country first, then the locality against whatever
    /// region survived. A country change can therefore clear the locality
    /// transitively in the same pass; the chain is strictly three levels so
    /// no further iteration is needed.
    pub fn reconcile(&mut self, directory: &Directory) {
        if let Some(region_code) = &self.region_code {
            if !self.has_country() || !directory.region_in_country(region_code, &self.country_code)
            {
                self.region_code = None;
            }
        }

        if let Some(locality_name) = &self.locality_name {
            match &self.region_code {
                Some(region_code) if directory.locality_in_region(locality_name, region_code) => {}
                _ => self.locality_name = None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_options_filtered_and_ordered() {
        let directory = Directory::builtin();
        let selection = GeoSelection::new("US");

        let options = options_for(&directory, GeoLevel::Region, &selection);
        assert!(!options.is_empty());
        assert!(options.iter().all(|r| r.parent_code.as_deref() == Some("US")));

        let expected: Vec<&str> = directory.regions_of("US").iter().map(|r| r.code.as_str()).collect();
        let actual: Vec<&str> = options.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_unknown_country_yields_empty_levels() {
        let directory = Directory::builtin();
        let selection = GeoSelection::new("ZZ");

        assert!(options_for(&directory, GeoLevel::Region, &selection).is_empty());
        assert!(options_for(&directory, GeoLevel::Locality, &selection).is_empty());

        let unset = GeoSelection::default();
        assert!(options_for(&directory, GeoLevel::Region, &unset).is_empty());
    }

    #[test]
    fn test_locality_options_require_region() {
        let directory = Directory::builtin();
        let mut selection = GeoSelection::new("US");

        assert!(options_for(&directory, GeoLevel::Locality, &selection).is_empty());

        selection.region_code = Some("US-CA".to_string());
        let localities = options_for(&directory, GeoLevel::Locality, &selection);
        assert!(localities.iter().any(|l| l.name == "Los Angeles"));
        assert!(localities
            .iter()
            .all(|l| l.parent_code.as_deref() == Some("US-CA")));
    }

    #[test]
    fn test_country_change_clears_region_and_locality() {
        let directory = Directory::builtin();
        let mut selection = GeoSelection::new("US");
        selection.region_code = Some("US-CA".to_string());
        selection.locality_name = Some("Los Angeles".to_string());

        selection.country_code = "FR".to_string();
        selection.reconcile(&directory);

        assert_eq!(selection.region_code, None);
        assert_eq!(selection.locality_name, None);
        assert_eq!(selection.country_code, "FR");
    }

    #[test]
    fn test_region_change_clears_locality_only() {
        let directory = Directory::builtin();
        let mut selection = GeoSelection::new("US");
        selection.region_code = Some("US-FL".to_string());
        selection.locality_name = Some("Miami".to_string());

        selection.region_code = Some("US-CA".to_string());
        selection.reconcile(&directory);

        assert_eq!(selection.country_code, "US");
        assert_eq!(selection.region_code.as_deref(), Some("US-CA"));
        assert_eq!(selection.locality_name, None);
    }

    #[test]
    fn test_consistent_selection_survives_reconcile() {
        let directory = Directory::builtin();
        let mut selection = GeoSelection::new("FR");
        selection.region_code = Some("FR-IDF".to_string());
        selection.locality_name = Some("Paris".to_string());

        selection.reconcile(&directory);

        assert_eq!(selection.region_code.as_deref(), Some("FR-IDF"));
        assert_eq!(selection.locality_name.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_clearing_country_clears_descendants() {
        let directory = Directory::builtin();
        let mut selection = GeoSelection::new("US");
        selection.region_code = Some("US-CA".to_string());
        selection.locality_name = Some("San Diego".to_string());

        selection.country_code.clear();
        selection.reconcile(&directory);

        assert_eq!(selection.region_code, None);
        assert_eq!(selection.locality_name, None);
    }
}
