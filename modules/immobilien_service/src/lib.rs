//! Immobilien Service Module
//!
//! Manages properties (Immobilien), contacts (Kontakte) and the dated
//! relationships (Beziehungen) between them. Relationship sets are
//! validated for consistency before they are written and replaced as a
//! whole when an entity is saved.

// Public exports
pub mod contract;
pub use contract::{
    client::ImmobilienApi, error::ImmobilienError, Art, Beziehung, BeziehungDraft, EditSide,
    Immobilie, Kontakt, UpdateOutcome, ValidationResult,
};

pub mod module;
pub use module::ImmobilienServiceModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
