//! Domain service - business logic orchestration

use crate::config::{Config, ReconcileStrategy};
use crate::contract::{
    Art, Beziehung, BeziehungDraft, BeziehungView, EditSide, Entity, ErrorField, FieldError,
    Immobilie, ImmobilieDetails, ImmobiliePatch, ImmobilienError, Kontakt, KontaktDetails,
    KontaktPatch, NewBeziehung, NewImmobilie, NewKontakt, RelationshipFailure, StoreOperation, Table,
    UpdateOutcome, ValidationResult,
};
use super::conflict::ConflictDetector;
use super::events::{Notification, Notifier};
use super::reconcile::{prepare, Prepared, ReconcileError, Reconciler};
use super::repository::{
    BeziehungFilter, BeziehungenRepository, ImmobilienRepository, KontakteRepository,
};
use super::validation::{
    validate_immobilie, validate_kontakt, validate_required_patch, RelationshipValidator,
    MSG_ENTITY_REQUIRED,
};
use std::sync::Arc;
use uuid::Uuid;

pub const MSG_CREATED: &str = "Eintrag erfolgreich erstellt!";
pub const MSG_UPDATED: &str = "Eintrag erfolgreich bearbeitet!";
pub const MSG_DELETED: &str = "Eintrag erfolgreich gelöscht!";

/// Domain service for properties, contacts and their relationships
pub struct Service {
    immobilien_repo: Arc<dyn ImmobilienRepository>,
    kontakte_repo: Arc<dyn KontakteRepository>,
    beziehungen_repo: Arc<dyn BeziehungenRepository>,
    notifier: Arc<dyn Notifier>,
    validator: RelationshipValidator,
    reconciler: Reconciler,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        immobilien_repo: Arc<dyn ImmobilienRepository>,
        kontakte_repo: Arc<dyn KontakteRepository>,
        beziehungen_repo: Arc<dyn BeziehungenRepository>,
        notifier: Arc<dyn Notifier>,
        config: &Config,
    ) -> Self {
        let validator =
            RelationshipValidator::new(ConflictDetector::new(config.open_ended_conflicts));
        let reconciler = Reconciler::new(beziehungen_repo.clone(), config.reconcile_strategy);
        Self {
            immobilien_repo,
            kontakte_repo,
            beziehungen_repo,
            notifier,
            validator,
            reconciler,
        }
    }

    // ===== Relationship consistency =====

    /// Form-local check of a candidate against relationships held by the caller
    pub fn validate_relationship(
        &self,
        candidate: &BeziehungDraft,
        existing: &[BeziehungDraft],
        side: EditSide,
    ) -> ValidationResult {
        self.validator.validate(candidate, existing, side)
    }

    /// Check candidates against the tenancies persisted for `entity_id`
    pub async fn validate_against_store(
        &self,
        entity_id: Uuid,
        side: EditSide,
        candidates: &[BeziehungDraft],
    ) -> Result<ValidationResult, ImmobilienError> {
        let existing = self.persisted_tenancies(side, entity_id).await?;

        let mut result = ValidationResult::valid();
        for candidate in candidates {
            let candidate = candidate.with_implied_id(side, entity_id);
            result.merge(self.validator.validate(&candidate, &existing, side));
        }
        Ok(result)
    }

    /// Replace the relationship set of an existing entity.
    ///
    /// Invalid targets are rejected before any write. A store failure during
    /// the replacement is returned as a partial outcome, not as an error.
    pub async fn reconcile_relationships(
        &self,
        entity_id: Uuid,
        side: EditSide,
        targets: Vec<BeziehungDraft>,
    ) -> Result<UpdateOutcome<Entity>, ImmobilienError> {
        self.check_targets(side, entity_id, &targets)?;
        let entity = self.load_entity(side, entity_id).await?;

        let failure = self.apply_relationships(entity_id, side, &targets).await;
        let outcome = with_failure(entity, failure);
        self.notify_outcome(side.table(), entity_id, &outcome, MSG_UPDATED)
            .await;
        Ok(outcome)
    }

    // ===== Immobilien =====

    /// List all properties
    pub async fn list_immobilien(&self) -> Result<Vec<Immobilie>, ImmobilienError> {
        self.immobilien_repo
            .list_all()
            .await
            .map_err(store_error(Table::Immobilien, StoreOperation::Fetch))
    }

    /// Get a property with its relationships
    pub async fn get_immobilie(&self, id: Uuid) -> Result<ImmobilieDetails, ImmobilienError> {
        let immobilie = self
            .immobilien_repo
            .find_by_id(id)
            .await
            .map_err(store_error(Table::Immobilien, StoreOperation::Fetch))?
            .ok_or_else(|| ImmobilienError::not_found(Table::Immobilien, id))?;
        let beziehungen = self.relationship_views(EditSide::Immobilien, id).await?;

        Ok(ImmobilieDetails {
            immobilie,
            beziehungen,
        })
    }

    /// Create a property with an optional initial relationship set
    pub async fn create_immobilie(
        &self,
        data: NewImmobilie,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Immobilie>, ImmobilienError> {
        let result = self.try_create_immobilie(data, beziehungen).await;
        self.report(Table::Immobilien, None, result, |i| i.id, MSG_CREATED)
            .await
    }

    async fn try_create_immobilie(
        &self,
        data: NewImmobilie,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Immobilie>, ImmobilienError> {
        ensure_valid(validate_immobilie(&data))?;
        let targets = beziehungen.unwrap_or_default();
        self.check_targets(EditSide::Immobilien, Uuid::nil(), &targets)?;

        if self.saves_atomically() && !targets.is_empty() {
            // The repository stamps the new id onto every row
            let Prepared { rows, dropped } = prepare(Uuid::nil(), EditSide::Immobilien, &targets);
            let (immobilie, inserted) = self
                .immobilien_repo
                .create_with_beziehungen(&data, &rows)
                .await
                .map_err(store_error(Table::Immobilien, StoreOperation::Create))?;
            log_atomic_save(EditSide::Immobilien, immobilie.id, inserted.len(), dropped);
            return Ok(UpdateOutcome::complete(immobilie));
        }

        let immobilie = self
            .immobilien_repo
            .create(&data)
            .await
            .map_err(store_error(Table::Immobilien, StoreOperation::Create))?;

        let failure = if targets.is_empty() {
            None
        } else {
            self.apply_relationships(immobilie.id, EditSide::Immobilien, &targets)
                .await
        };
        Ok(with_failure(immobilie, failure))
    }

    /// Patch a property; `Some(beziehungen)` also replaces its relationship set
    pub async fn update_immobilie(
        &self,
        id: Uuid,
        patch: ImmobiliePatch,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Immobilie>, ImmobilienError> {
        let result = self.try_update_immobilie(id, patch, beziehungen).await;
        self.report(Table::Immobilien, Some(id), result, |i| i.id, MSG_UPDATED)
            .await
    }

    async fn try_update_immobilie(
        &self,
        id: Uuid,
        patch: ImmobiliePatch,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Immobilie>, ImmobilienError> {
        ensure_valid(validate_required_patch(
            ErrorField::Titel,
            patch.titel.as_deref(),
        ))?;
        if let Some(targets) = &beziehungen {
            self.check_targets(EditSide::Immobilien, id, targets)?;
        }

        let current = self
            .immobilien_repo
            .find_by_id(id)
            .await
            .map_err(store_error(Table::Immobilien, StoreOperation::FetchCurrent))?
            .ok_or_else(|| ImmobilienError::not_found(Table::Immobilien, id))?;

        let changed = patch.changed_against(&current);
        if changed.is_empty() {
            tracing::debug!(id = %id, "No property fields changed");
        }

        if let Some(targets) = beziehungen.as_deref().filter(|_| self.saves_atomically()) {
            let Prepared { rows, dropped } = prepare(id, EditSide::Immobilien, targets);
            let (immobilie, inserted) = self
                .immobilien_repo
                .update_with_beziehungen(id, &changed, &rows)
                .await
                .map_err(store_error(Table::Immobilien, StoreOperation::Update))?
                .ok_or_else(|| ImmobilienError::not_found(Table::Immobilien, id))?;
            log_atomic_save(EditSide::Immobilien, id, inserted.len(), dropped);
            return Ok(UpdateOutcome::complete(immobilie));
        }

        let immobilie = if changed.is_empty() {
            current
        } else {
            self.immobilien_repo
                .update(id, &changed)
                .await
                .map_err(store_error(Table::Immobilien, StoreOperation::Update))?
                .ok_or_else(|| ImmobilienError::not_found(Table::Immobilien, id))?
        };

        let failure = match &beziehungen {
            Some(targets) => {
                self.apply_relationships(id, EditSide::Immobilien, targets)
                    .await
            }
            None => None,
        };
        Ok(with_failure(immobilie, failure))
    }

    /// Delete a property; its relationships go with it
    pub async fn delete_immobilie(&self, id: Uuid) -> Result<(), ImmobilienError> {
        let result = self
            .immobilien_repo
            .delete(id)
            .await
            .map_err(store_error(Table::Immobilien, StoreOperation::Delete))
            .and_then(|rows| match rows {
                0 => Err(ImmobilienError::not_found(Table::Immobilien, id)),
                _ => Ok(()),
            });
        self.report_delete(Table::Immobilien, id, result).await
    }

    // ===== Kontakte =====

    /// List all contacts
    pub async fn list_kontakte(&self) -> Result<Vec<Kontakt>, ImmobilienError> {
        self.kontakte_repo
            .list_all()
            .await
            .map_err(store_error(Table::Kontakte, StoreOperation::Fetch))
    }

    /// Get a contact with its relationships
    pub async fn get_kontakt(&self, id: Uuid) -> Result<KontaktDetails, ImmobilienError> {
        let kontakt = self
            .kontakte_repo
            .find_by_id(id)
            .await
            .map_err(store_error(Table::Kontakte, StoreOperation::Fetch))?
            .ok_or_else(|| ImmobilienError::not_found(Table::Kontakte, id))?;
        let beziehungen = self.relationship_views(EditSide::Kontakte, id).await?;

        Ok(KontaktDetails {
            kontakt,
            beziehungen,
        })
    }

    /// Create a contact with an optional initial relationship set
    pub async fn create_kontakt(
        &self,
        data: NewKontakt,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Kontakt>, ImmobilienError> {
        let result = self.try_create_kontakt(data, beziehungen).await;
        self.report(Table::Kontakte, None, result, |k| k.id, MSG_CREATED)
            .await
    }

    async fn try_create_kontakt(
        &self,
        data: NewKontakt,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Kontakt>, ImmobilienError> {
        ensure_valid(validate_kontakt(&data))?;
        let targets = beziehungen.unwrap_or_default();
        self.check_targets(EditSide::Kontakte, Uuid::nil(), &targets)?;

        if self.saves_atomically() && !targets.is_empty() {
            // The repository stamps the new id onto every row
            let Prepared { rows, dropped } = prepare(Uuid::nil(), EditSide::Kontakte, &targets);
            let (kontakt, inserted) = self
                .kontakte_repo
                .create_with_beziehungen(&data, &rows)
                .await
                .map_err(store_error(Table::Kontakte, StoreOperation::Create))?;
            log_atomic_save(EditSide::Kontakte, kontakt.id, inserted.len(), dropped);
            return Ok(UpdateOutcome::complete(kontakt));
        }

        let kontakt = self
            .kontakte_repo
            .create(&data)
            .await
            .map_err(store_error(Table::Kontakte, StoreOperation::Create))?;

        let failure = if targets.is_empty() {
            None
        } else {
            self.apply_relationships(kontakt.id, EditSide::Kontakte, &targets)
                .await
        };
        Ok(with_failure(kontakt, failure))
    }

    /// Patch a contact; `Some(beziehungen)` also replaces its relationship set
    pub async fn update_kontakt(
        &self,
        id: Uuid,
        patch: KontaktPatch,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Kontakt>, ImmobilienError> {
        let result = self.try_update_kontakt(id, patch, beziehungen).await;
        self.report(Table::Kontakte, Some(id), result, |k| k.id, MSG_UPDATED)
            .await
    }

    async fn try_update_kontakt(
        &self,
        id: Uuid,
        patch: KontaktPatch,
        beziehungen: Option<Vec<BeziehungDraft>>,
    ) -> Result<UpdateOutcome<Kontakt>, ImmobilienError> {
        ensure_valid(validate_required_patch(ErrorField::Name, patch.name.as_deref()))?;
        if let Some(targets) = &beziehungen {
            self.check_targets(EditSide::Kontakte, id, targets)?;
        }

        let current = self
            .kontakte_repo
            .find_by_id(id)
            .await
            .map_err(store_error(Table::Kontakte, StoreOperation::FetchCurrent))?
            .ok_or_else(|| ImmobilienError::not_found(Table::Kontakte, id))?;

        let changed = patch.changed_against(&current);
        if changed.is_empty() {
            tracing::debug!(id = %id, "No contact fields changed");
        }

        if let Some(targets) = beziehungen.as_deref().filter(|_| self.saves_atomically()) {
            let Prepared { rows, dropped } = prepare(id, EditSide::Kontakte, targets);
            let (kontakt, inserted) = self
                .kontakte_repo
                .update_with_beziehungen(id, &changed, &rows)
                .await
                .map_err(store_error(Table::Kontakte, StoreOperation::Update))?
                .ok_or_else(|| ImmobilienError::not_found(Table::Kontakte, id))?;
            log_atomic_save(EditSide::Kontakte, id, inserted.len(), dropped);
            return Ok(UpdateOutcome::complete(kontakt));
        }

        let kontakt = if changed.is_empty() {
            current
        } else {
            self.kontakte_repo
                .update(id, &changed)
                .await
                .map_err(store_error(Table::Kontakte, StoreOperation::Update))?
                .ok_or_else(|| ImmobilienError::not_found(Table::Kontakte, id))?
        };

        let failure = match &beziehungen {
            Some(targets) => self.apply_relationships(id, EditSide::Kontakte, targets).await,
            None => None,
        };
        Ok(with_failure(kontakt, failure))
    }

    /// Delete a contact; its relationships go with it
    pub async fn delete_kontakt(&self, id: Uuid) -> Result<(), ImmobilienError> {
        let result = self
            .kontakte_repo
            .delete(id)
            .await
            .map_err(store_error(Table::Kontakte, StoreOperation::Delete))
            .and_then(|rows| match rows {
                0 => Err(ImmobilienError::not_found(Table::Kontakte, id)),
                _ => Ok(()),
            });
        self.report_delete(Table::Kontakte, id, result).await
    }

    // ===== Beziehungen =====

    /// List all relationships with display labels
    pub async fn list_beziehungen(&self) -> Result<Vec<BeziehungView>, ImmobilienError> {
        self.beziehungen_repo
            .find_views(&BeziehungFilter::default())
            .await
            .map_err(store_error(Table::Beziehungen, StoreOperation::Fetch))
    }

    /// Get one relationship with display labels
    pub async fn get_beziehung(&self, id: Uuid) -> Result<BeziehungView, ImmobilienError> {
        let beziehung = self
            .beziehungen_repo
            .find_by_id(id)
            .await
            .map_err(store_error(Table::Beziehungen, StoreOperation::Fetch))?
            .ok_or_else(|| ImmobilienError::not_found(Table::Beziehungen, id))?;

        let immobilien_titel = match self.immobilien_repo.find_by_id(beziehung.immobilien_id).await
        {
            Ok(found) => found.map(|i| i.titel),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Failed to load property label");
                None
            }
        };
        let kontakt_name = match self.kontakte_repo.find_by_id(beziehung.kontakt_id).await {
            Ok(found) => found.map(|k| k.name),
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Failed to load contact label");
                None
            }
        };

        Ok(BeziehungView {
            beziehung,
            immobilien_titel,
            kontakt_name,
        })
    }

    /// Create a single relationship after checking it against the store
    pub async fn create_beziehung(
        &self,
        draft: BeziehungDraft,
    ) -> Result<Beziehung, ImmobilienError> {
        let result = self.try_create_beziehung(draft).await;
        self.report_single(None, result, MSG_CREATED).await
    }

    async fn try_create_beziehung(
        &self,
        draft: BeziehungDraft,
    ) -> Result<Beziehung, ImmobilienError> {
        let draft = BeziehungDraft { id: None, ..draft };
        let (immobilien_id, row) = self.check_standalone(&draft).await?;
        tracing::debug!(immobilien_id = %immobilien_id, "Creating relationship");

        self.beziehungen_repo
            .create(&row)
            .await
            .map_err(store_error(Table::Beziehungen, StoreOperation::Create))
    }

    /// Overwrite a single relationship after checking it against the store
    pub async fn update_beziehung(
        &self,
        id: Uuid,
        draft: BeziehungDraft,
    ) -> Result<Beziehung, ImmobilienError> {
        let result = self.try_update_beziehung(id, draft).await;
        self.report_single(Some(id), result, MSG_UPDATED).await
    }

    async fn try_update_beziehung(
        &self,
        id: Uuid,
        draft: BeziehungDraft,
    ) -> Result<Beziehung, ImmobilienError> {
        self.beziehungen_repo
            .find_by_id(id)
            .await
            .map_err(store_error(Table::Beziehungen, StoreOperation::FetchCurrent))?
            .ok_or_else(|| ImmobilienError::not_found(Table::Beziehungen, id))?;

        let draft = BeziehungDraft {
            id: Some(id.to_string()),
            ..draft
        };
        let (_, row) = self.check_standalone(&draft).await?;

        self.beziehungen_repo
            .update(id, &row)
            .await
            .map_err(store_error(Table::Beziehungen, StoreOperation::Update))?
            .ok_or_else(|| ImmobilienError::not_found(Table::Beziehungen, id))
    }

    /// Delete a single relationship
    pub async fn delete_beziehung(&self, id: Uuid) -> Result<(), ImmobilienError> {
        let result = self
            .beziehungen_repo
            .delete(id)
            .await
            .map_err(store_error(Table::Beziehungen, StoreOperation::Delete))
            .and_then(|rows| match rows {
                0 => Err(ImmobilienError::not_found(Table::Beziehungen, id)),
                _ => Ok(()),
            });
        self.report_delete(Table::Beziehungen, id, result).await
    }

    // ===== Helpers =====

    /// Pairwise check of a target set, scoped to the edited entity
    fn check_targets(
        &self,
        side: EditSide,
        entity_id: Uuid,
        targets: &[BeziehungDraft],
    ) -> Result<(), ImmobilienError> {
        let stamped: Vec<BeziehungDraft> = targets
            .iter()
            .map(|t| t.with_implied_id(side, entity_id))
            .collect();
        ensure_valid(self.validator.validate_set(&stamped, side))
    }

    /// Validate a standalone relationship and turn it into a write row.
    ///
    /// The tenancy check runs against the property's persisted relationships
    /// and both referenced entities must exist.
    async fn check_standalone(
        &self,
        draft: &BeziehungDraft,
    ) -> Result<(Uuid, NewBeziehung), ImmobilienError> {
        let existing = match draft.immobilien_id {
            Some(immobilien_id) if draft.parsed_art() == Some(Art::Mieter) => {
                self.persisted_tenancies(EditSide::Immobilien, immobilien_id)
                    .await?
            }
            _ => Vec::new(),
        };

        let mut result = self
            .validator
            .validate(draft, &existing, EditSide::Immobilien);
        if draft.immobilien_id.is_none() && !result.has_error(ErrorField::Entity) {
            result.merge(ValidationResult::from_errors(vec![FieldError::new(
                ErrorField::Entity,
                MSG_ENTITY_REQUIRED,
            )]));
        }
        ensure_valid(result)?;

        let (Some(immobilien_id), Some(kontakt_id)) = (draft.immobilien_id, draft.kontakt_id)
        else {
            return Err(ImmobilienError::Internal);
        };

        self.immobilien_repo
            .find_by_id(immobilien_id)
            .await
            .map_err(store_error(Table::Immobilien, StoreOperation::Fetch))?
            .ok_or_else(|| ImmobilienError::not_found(Table::Immobilien, immobilien_id))?;
        self.kontakte_repo
            .find_by_id(kontakt_id)
            .await
            .map_err(store_error(Table::Kontakte, StoreOperation::Fetch))?
            .ok_or_else(|| ImmobilienError::not_found(Table::Kontakte, kontakt_id))?;

        let row = prepare(immobilien_id, EditSide::Immobilien, std::slice::from_ref(draft))
            .rows
            .into_iter()
            .next()
            .ok_or(ImmobilienError::Internal)?;
        Ok((immobilien_id, row))
    }

    /// Persisted tenancies of an entity, as drafts
    async fn persisted_tenancies(
        &self,
        side: EditSide,
        entity_id: Uuid,
    ) -> Result<Vec<BeziehungDraft>, ImmobilienError> {
        let filter = BeziehungFilter::for_entity(side, entity_id).with_art(Art::Mieter);
        let rows = self
            .beziehungen_repo
            .find(&filter)
            .await
            .map_err(store_error(Table::Beziehungen, StoreOperation::Fetch))?;
        Ok(rows.iter().map(BeziehungDraft::from).collect())
    }

    async fn relationship_views(
        &self,
        side: EditSide,
        entity_id: Uuid,
    ) -> Result<Vec<BeziehungView>, ImmobilienError> {
        self.beziehungen_repo
            .find_views(&BeziehungFilter::for_entity(side, entity_id))
            .await
            .map_err(store_error(Table::Beziehungen, StoreOperation::Fetch))
    }

    async fn load_entity(&self, side: EditSide, id: Uuid) -> Result<Entity, ImmobilienError> {
        let table = side.table();
        let entity = match side {
            EditSide::Immobilien => self
                .immobilien_repo
                .find_by_id(id)
                .await
                .map_err(store_error(table, StoreOperation::FetchCurrent))?
                .map(Entity::Immobilie),
            EditSide::Kontakte => self
                .kontakte_repo
                .find_by_id(id)
                .await
                .map_err(store_error(table, StoreOperation::FetchCurrent))?
                .map(Entity::Kontakt),
        };
        entity.ok_or_else(|| ImmobilienError::not_found(table, id))
    }

    /// Whether entity writes and their relationship set share one transaction
    fn saves_atomically(&self) -> bool {
        matches!(self.reconciler.strategy(), ReconcileStrategy::Transactional)
    }

    /// Reconcile and turn a failure into a partial-outcome record
    async fn apply_relationships(
        &self,
        entity_id: Uuid,
        side: EditSide,
        targets: &[BeziehungDraft],
    ) -> Option<RelationshipFailure> {
        match self.reconciler.reconcile(entity_id, side, targets).await {
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(
                    entity_id = %entity_id,
                    side = side.as_str(),
                    relationships_cleared = err.relationships_cleared(),
                    error = %err,
                    "Entity saved but relationships were not reconciled"
                );
                Some(relationship_failure(&err))
            }
        }
    }

    async fn notify(&self, notification: Notification) {
        if let Err(e) = self.notifier.notify(notification).await {
            tracing::warn!(error = %e, "Failed to deliver notification");
        }
    }

    async fn notify_outcome<T>(
        &self,
        table: Table,
        entity_id: Uuid,
        outcome: &UpdateOutcome<T>,
        success: &str,
    ) {
        let notification = match &outcome.relationship_error {
            None => Notification::success(table, entity_id, success),
            Some(failure) => Notification::warning(table, entity_id, failure.message.clone()),
        };
        self.notify(notification).await;
    }

    async fn report<T>(
        &self,
        table: Table,
        entity_id: Option<Uuid>,
        result: Result<UpdateOutcome<T>, ImmobilienError>,
        id_of: impl Fn(&T) -> Uuid,
        success: &str,
    ) -> Result<UpdateOutcome<T>, ImmobilienError> {
        match &result {
            Ok(outcome) => {
                self.notify_outcome(table, id_of(&outcome.entity), outcome, success)
                    .await
            }
            Err(err) => {
                self.notify(Notification::error(table, entity_id, err.to_string()))
                    .await
            }
        }
        result
    }

    async fn report_single(
        &self,
        entity_id: Option<Uuid>,
        result: Result<Beziehung, ImmobilienError>,
        success: &str,
    ) -> Result<Beziehung, ImmobilienError> {
        let notification = match &result {
            Ok(beziehung) => Notification::success(Table::Beziehungen, beziehung.id, success),
            Err(err) => Notification::error(Table::Beziehungen, entity_id, err.to_string()),
        };
        self.notify(notification).await;
        result
    }

    async fn report_delete(
        &self,
        table: Table,
        id: Uuid,
        result: Result<(), ImmobilienError>,
    ) -> Result<(), ImmobilienError> {
        let notification = match &result {
            Ok(()) => Notification::success(table, id, MSG_DELETED),
            Err(err) => Notification::error(table, Some(id), err.to_string()),
        };
        self.notify(notification).await;
        result
    }
}

fn with_failure<T>(entity: T, failure: Option<RelationshipFailure>) -> UpdateOutcome<T> {
    match failure {
        Some(failure) => UpdateOutcome::partial(entity, failure),
        None => UpdateOutcome::complete(entity),
    }
}

fn log_atomic_save(side: EditSide, entity_id: Uuid, inserted: usize, dropped: usize) {
    tracing::info!(
        entity_id = %entity_id,
        side = side.as_str(),
        inserted,
        dropped,
        "Entity and relationships saved in one transaction"
    );
}

fn ensure_valid(result: ValidationResult) -> Result<(), ImmobilienError> {
    if result.is_valid {
        Ok(())
    } else {
        Err(ImmobilienError::validation(result.errors))
    }
}

/// Log a store failure and map it to the table/operation error
fn store_error(
    table: Table,
    operation: StoreOperation,
) -> impl FnOnce(anyhow::Error) -> ImmobilienError {
    move |e| {
        let detail = format!("{e:#}");
        tracing::error!(
            table = %table,
            operation = operation.as_str(),
            error = %detail,
            "Store call failed"
        );
        ImmobilienError::store(table, operation, detail)
    }
}

fn relationship_failure(err: &ReconcileError) -> RelationshipFailure {
    let message = match err {
        ReconcileError::Delete { .. } => {
            "Eintrag gespeichert, aber die bestehenden Beziehungen konnten nicht entfernt werden."
        }
        ReconcileError::Insert { .. } => {
            "Eintrag gespeichert, aber die Beziehungen konnten nicht gespeichert werden. Es sind keine Beziehungen mehr vorhanden."
        }
        ReconcileError::Replace { .. } => {
            "Eintrag gespeichert, aber die Beziehungen konnten nicht aktualisiert werden. Die bisherigen Beziehungen bleiben erhalten."
        }
    };
    RelationshipFailure {
        message: message.to_string(),
        detail: err.detail().to_string(),
        relationships_cleared: err.relationships_cleared(),
    }
}
