//! Geographic Classification Directory for Venue Studio
//!
//! This crate holds the static country → region → locality hierarchy a venue
//! draft selects from, and the dependent-option resolution on top of it:
//!
//! - [`Directory`]: read-only classification entries, loaded once, indexed by
//!   parent code
//! - [`options_for`]: the valid option set for a dependent level given the
//!   ancestor selections
//! - [`GeoSelection::reconcile`]: the ancestor-to-descendant invalidation pass
//!   run whenever an ancestor field changes
//!
//! # Example
//!
//! ```
//! use gazetteer::{Directory, GeoLevel, GeoSelection, options_for};
//!
//! let directory = Directory::builtin();
//! let mut selection = GeoSelection::new("US");
//! let regions = options_for(&directory, GeoLevel::Region, &selection);
//! assert!(regions.iter().all(|r| r.parent_code.as_deref() == Some("US")));
//!
//! selection.region_code = Some("US-CA".to_string());
//! selection.country_code = "FR".to_string();
//! selection.reconcile(&directory);
//! assert_eq!(selection.region_code, None);
//! ```

pub mod directory;
pub mod resolver;
pub mod types;

// Re-export main types
pub use directory::Directory;
pub use resolver::options_for;
pub use types::{ClassificationEntry, GeoLevel, GeoSelection};
