//! Full replacement of an entity's relationship set

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::config::ReconcileStrategy;
use crate::contract::{Beziehung, BeziehungDraft, EditSide, NewBeziehung};

use super::repository::{BeziehungFilter, BeziehungenRepository};

/// Reconciliation failure, by the step that failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// Removing the persisted set failed; nothing changed
    #[error("failed to delete relationships: {detail}")]
    Delete { detail: String },
    /// Inserting the target set failed after the persisted set was removed
    #[error("failed to insert relationships: {detail}")]
    Insert { detail: String },
    /// The transactional replacement failed and was rolled back
    #[error("failed to replace relationships: {detail}")]
    Replace { detail: String },
}

impl ReconcileError {
    /// Whether the entity was left without persisted relationships
    pub fn relationships_cleared(&self) -> bool {
        matches!(self, Self::Insert { .. })
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::Delete { detail } | Self::Insert { detail } | Self::Replace { detail } => detail,
        }
    }
}

/// Rows ready for insertion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prepared {
    pub rows: Vec<NewBeziehung>,
    /// Drafts skipped for lacking a counterpart or a valid `art`
    pub dropped: usize,
}

/// What a successful reconciliation persisted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub inserted: Vec<Beziehung>,
    pub dropped: usize,
}

/// Turn target drafts into write rows for the edited entity.
///
/// The entity id fills the implied side. Ids and display labels are not
/// carried over, and blank service descriptions become absent.
pub fn prepare(entity_id: Uuid, side: EditSide, targets: &[BeziehungDraft]) -> Prepared {
    let mut prepared = Prepared::default();

    for draft in targets {
        let (Some(counterpart), Some(art)) = (draft.counterpart_id(side), draft.parsed_art())
        else {
            tracing::warn!(
                entity_id = %entity_id,
                side = side.as_str(),
                art = ?draft.art,
                "Dropping incomplete relationship"
            );
            prepared.dropped += 1;
            continue;
        };

        let (immobilien_id, kontakt_id) = match side {
            EditSide::Immobilien => (entity_id, counterpart),
            EditSide::Kontakte => (counterpart, entity_id),
        };

        prepared.rows.push(NewBeziehung {
            immobilien_id,
            kontakt_id,
            art,
            startdatum: draft.startdatum,
            enddatum: draft.enddatum,
            dienstleistungen: draft
                .dienstleistungen
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        });
    }

    prepared
}

/// Applies target relationship sets against the store
#[derive(Clone)]
pub struct Reconciler {
    repo: Arc<dyn BeziehungenRepository>,
    strategy: ReconcileStrategy,
}

impl Reconciler {
    pub fn new(repo: Arc<dyn BeziehungenRepository>, strategy: ReconcileStrategy) -> Self {
        Self { repo, strategy }
    }

    pub fn strategy(&self) -> ReconcileStrategy {
        self.strategy
    }

    /// Make the persisted set of `entity_id` equal to `targets`
    pub async fn reconcile(
        &self,
        entity_id: Uuid,
        side: EditSide,
        targets: &[BeziehungDraft],
    ) -> Result<ReconcileReport, ReconcileError> {
        let Prepared { rows, dropped } = prepare(entity_id, side, targets);

        let inserted = match self.strategy {
            ReconcileStrategy::Transactional => self
                .repo
                .replace_for_entity(side, entity_id, &rows)
                .await
                .map_err(|e| ReconcileError::Replace {
                    detail: e.to_string(),
                })?,
            ReconcileStrategy::DeleteThenInsert => {
                self.repo
                    .delete_where(&BeziehungFilter::for_entity(side, entity_id))
                    .await
                    .map_err(|e| ReconcileError::Delete {
                        detail: e.to_string(),
                    })?;

                if rows.is_empty() {
                    Vec::new()
                } else {
                    self.repo
                        .insert_many(&rows)
                        .await
                        .map_err(|e| ReconcileError::Insert {
                            detail: e.to_string(),
                        })?
                }
            }
        };

        tracing::info!(
            entity_id = %entity_id,
            side = side.as_str(),
            strategy = ?self.strategy,
            inserted = inserted.len(),
            dropped,
            "Relationships reconciled"
        );

        Ok(ReconcileReport { inserted, dropped })
    }
}
