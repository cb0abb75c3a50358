//! Native client trait for inter-module communication
//!
//! This trait defines the API that other modules use to interact with the immobilien service.
//! NO HTTP - direct function calls for performance.

use super::{
    error::ImmobilienError,
    model::{
        Beziehung, BeziehungDraft, BeziehungView, EditSide, Entity, Immobilie, ImmobilieDetails,
        ImmobiliePatch, Kontakt, KontaktDetails, KontaktPatch, NewImmobilie, NewKontakt,
        UpdateOutcome, ValidationResult,
    },
};
use async_trait::async_trait;
use uuid::Uuid;

/// Immobilien service API for inter-module communication
#[async_trait]
pub trait ImmobilienApi: Send + Sync {
    // ===== Relationship consistency =====

    /// Validate a candidate against relationships already held by the caller
    fn validate_relationship(
        &self,
        candidate: &BeziehungDraft,
        existing: &[BeziehungDraft],
        side: EditSide,
    ) -> ValidationResult;

    /// Validate candidates against the persisted relationships of an entity
    async fn validate_against_store(
        &self,
        entity_id: Uuid,
        side: EditSide,
        candidates: &[BeziehungDraft],
    ) -> Result<ValidationResult, ImmobilienError>;

    /// Replace the relationship set of an entity with `targets`
    async fn reconcile_relationships(
        &self,
        entity_id: Uuid,
        side: EditSide,
        targets: Vec<BeziehungDraft>,
    ) -> Result<UpdateOutcome<Entity>, ImmobilienError>;

    // ===== Immobilien =====

    async fn list_immobilien(&self) -> Result<Vec<Immobilie>, ImmobilienError>;

    async fn get_immobilie(&self, id: Uuid) -> Result<ImmobilieDetails, ImmobilienError>;

    /// Create a property, optionally with its initial relationships
    async fn create_immobilie(
        &self,
        data: NewImmobilie,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Immobilie>, ImmobilienError>;

    /// Patch a property; `Some(beziehungen)` replaces its relationship set
    async fn update_immobilie(
        &self,
        id: Uuid,
        patch: ImmobiliePatch,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Immobilie>, ImmobilienError>;

    async fn delete_immobilie(&self, id: Uuid) -> Result<(), ImmobilienError>;

    // ===== Kontakte =====

    async fn list_kontakte(&self) -> Result<Vec<Kontakt>, ImmobilienError>;

    async fn get_kontakt(&self, id: Uuid) -> Result<KontaktDetails, ImmobilienError>;

    /// Create a contact, optionally with its initial relationships
    async fn create_kontakt(
        &self,
        data: NewKontakt,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Kontakt>, ImmobilienError>;

    /// Patch a contact; `Some(beziehungen)` replaces its relationship set
    async fn update_kontakt(
        &self,
        id: Uuid,
        patch: KontaktPatch,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Kontakt>, ImmobilienError>;

    async fn delete_kontakt(&self, id: Uuid) -> Result<(), ImmobilienError>;

    // ===== Beziehungen =====

    async fn list_beziehungen(&self) -> Result<Vec<BeziehungView>, ImmobilienError>;

    async fn get_beziehung(&self, id: Uuid) -> Result<BeziehungView, ImmobilienError>;

    /// Create a single relationship, checked against the store
    async fn create_beziehung(&self, draft: BeziehungDraft)
        -> Result<Beziehung, ImmobilienError>;

    /// Overwrite a single relationship, checked against the store
    async fn update_beziehung(
        &self,
        id: Uuid,
        draft: BeziehungDraft,
    ) -> Result<Beziehung, ImmobilienError>;

    async fn delete_beziehung(&self, id: Uuid) -> Result<(), ImmobilienError>;
}
