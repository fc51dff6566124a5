//! Venue Forms - the authoring session core
//!
//! Keeps cascading geographic selections, asset state, and submission state
//! mutually consistent while a venue or unit draft is being edited:
//!
//! - **Drafts and validation**: per-field rule sets, validity recomputed on
//!   every write
//! - **Asset lifecycle**: at most one stored asset per draft; replacement and
//!   removal park the prior key for best-effort cleanup
//! - **Sessions**: create/update branching, one in-flight mutation at a time,
//!   late completions dropped after disposal
//! - **Advisory**: the zero-units prompt on a freshly created venue
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  VenueSession / UnitSession          │
//! │                                                      │
//! │  ┌────────┐   ┌──────────┐   ┌──────────────────┐   │
//! │  │ Draft  │──▶│ Validity │   │ AssetCoordinator │   │
//! │  └────────┘   └──────────┘   └────────┬─────────┘   │
//! │      │                                │             │
//! │      ▼                                ▼             │
//! │  gazetteer::reconcile          dyn AssetStore       │
//! │                                                      │
//! │            dyn Persistence (create/update/delete)    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Durable storage, transport, rendering, and identity stay behind the
//! collaborator traits in `venue-store`.

pub mod advisory;
pub mod asset;
pub mod config;
pub mod draft;
pub mod session;
pub mod types;

// Re-export main types
pub use advisory::needs_units;
pub use asset::{AssetCoordinator, AssetSlot, AssetState};
pub use config::{FormsConfig, UnitRules, VenueRules};
pub use draft::{UnitDraft, VenueDraft};
pub use session::{UnitSession, VenueSession};
pub use types::{
    DeleteOutcome, FieldStatus, FormError, Result, SessionPhase, SubmitOutcome, Validity,
};
