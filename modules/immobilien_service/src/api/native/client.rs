//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    Beziehung, BeziehungDraft, BeziehungView, EditSide, Entity, Immobilie, ImmobilieDetails,
    ImmobiliePatch, ImmobilienApi, ImmobilienError, Kontakt, KontaktDetails, KontaktPatch,
    NewImmobilie, NewKontakt, UpdateOutcome, ValidationResult,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Native client implementation that directly calls the domain service
///
/// This client is used for in-process communication without HTTP overhead.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ImmobilienApi for NativeClient {
    fn validate_relationship(
        &self,
        candidate: &BeziehungDraft,
        existing: &[BeziehungDraft],
        side: EditSide,
    ) -> ValidationResult {
        self.service.validate_relationship(candidate, existing, side)
    }

    async fn validate_against_store(
        &self,
        entity_id: Uuid,
        side: EditSide,
        candidates: &[BeziehungDraft],
    ) -> Result<ValidationResult, ImmobilienError> {
        self.service
            .validate_against_store(entity_id, side, candidates)
            .await
    }

    async fn reconcile_relationships(
        &self,
        entity_id: Uuid,
        side: EditSide,
        targets: Vec<BeziehungDraft>,
    ) -> Result<UpdateOutcome<Entity>, ImmobilienError> {
        self.service
            .reconcile_relationships(entity_id, side, targets)
            .await
    }

    async fn list_immobilien(&self) -> Result<Vec<Immobilie>, ImmobilienError> {
        self.service.list_immobilien().await
    }

    async fn get_immobilie(&self, id: Uuid) -> Result<ImmobilieDetails, ImmobilienError> {
        self.service.get_immobilie(id).await
    }

    async fn create_immobilie(
        &self,
        data: NewImmobilie,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Immobilie>, ImmobilienError> {
        self.service.create_immobilie(data, beziehungen).await
    }

    async fn update_immobilie(
        &self,
        id: Uuid,
        patch: ImmobiliePatch,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Immobilie>, ImmobilienError> {
        self.service.update_immobilie(id, patch, beziehungen).await
    }

    async fn delete_immobilie(&self, id: Uuid) -> Result<(), ImmobilienError> {
        self.service.delete_immobilie(id).await
    }

    async fn list_kontakte(&self) -> Result<Vec<Kontakt>, ImmobilienError> {
        self.service.list_kontakte().await
    }

    async fn get_kontakt(&self, id: Uuid) -> Result<KontaktDetails, ImmobilienError> {
        self.service.get_kontakt(id).await
    }

    async fn create_kontakt(
        &self,
        data: NewKontakt,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Kontakt>, ImmobilienError> {
        self.service.create_kontakt(data, beziehungen).await
    }

    async fn update_kontakt(
        &self,
        id: Uuid,
        patch: KontaktPatch,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Kontakt>, ImmobilienError> {
        self.service.update_kontakt(id, patch, beziehungen).await
    }

    async fn delete_kontakt(&self, id: Uuid) -> Result<(), ImmobilienError> {
        self.service.delete_kontakt(id).await
    }

    async fn list_beziehungen(&self) -> Result<Vec<BeziehungView>, ImmobilienError> {
        self.service.list_beziehungen().await
    }

    async fn get_beziehung(&self, id: Uuid) -> Result<BeziehungView, ImmobilienError> {
        self.service.get_beziehung(id).await
    }

    async fn create_beziehung(
        &self,
        draft: BeziehungDraft,
    ) -> Result<Beziehung, ImmobilienError> {
        self.service.create_beziehung(draft).await
    }

    async fn update_beziehung(
        &self,
        id: Uuid,
        draft: BeziehungDraft,
    ) -> Result<Beziehung, ImmobilienError> {
        self.service.update_beziehung(id, draft).await
    }

    async fn delete_beziehung(&self, id: Uuid) -> Result<(), ImmobilienError> {
        self.service.delete_beziehung(id).await
    }
}
