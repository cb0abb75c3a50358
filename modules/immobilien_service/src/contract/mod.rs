//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::ImmobilienApi;
pub use error::{ImmobilienError, StoreOperation};
pub use model::{
    Art, Beziehung, BeziehungDraft, BeziehungView, EditSide, Entity, ErrorField, FieldError,
    Immobilie, ImmobilieDetails, ImmobiliePatch, Kontakt, KontaktDetails, KontaktPatch,
    NewBeziehung, NewImmobilie, NewKontakt, RelationshipFailure, Table, UpdateOutcome,
    ValidationResult,
};
