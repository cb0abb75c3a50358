//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{
    Art, Beziehung, BeziehungView, EditSide, Immobilie, ImmobiliePatch, Kontakt, KontaktPatch,
    NewBeziehung, NewImmobilie, NewKontakt,
};
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for properties
#[async_trait]
pub trait ImmobilienRepository: Send + Sync {
    /// Create a new property
    async fn create(&self, data: &NewImmobilie) -> Result<Immobilie>;

    /// Find a property by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Immobilie>>;

    /// List all properties, newest first
    async fn list_all(&self) -> Result<Vec<Immobilie>>;

    /// Write the fields set in `patch`; `None` when the row is gone
    async fn update(&self, id: Uuid, patch: &ImmobiliePatch) -> Result<Option<Immobilie>>;

    /// Create a property and insert `rows` in one transaction.
    ///
    /// The `immobilien_id` of every row is replaced by the new property's id.
    async fn create_with_beziehungen(
        &self,
        data: &NewImmobilie,
        rows: &[NewBeziehung],
    ) -> Result<(Immobilie, Vec<Beziehung>)>;

    /// Write `patch` and replace the property's relationships with `rows` in
    /// one transaction; `None` when the row is gone
    async fn update_with_beziehungen(
        &self,
        id: Uuid,
        patch: &ImmobiliePatch,
        rows: &[NewBeziehung],
    ) -> Result<Option<(Immobilie, Vec<Beziehung>)>>;

    /// Delete a property, returning the number of removed rows
    async fn delete(&self, id: Uuid) -> Result<u64>;
}

/// Repository for contacts
#[async_trait]
pub trait KontakteRepository: Send + Sync {
    /// Create a new contact
    async fn create(&self, data: &NewKontakt) -> Result<Kontakt>;

    /// Find a contact by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Kontakt>>;

    /// List all contacts, newest first
    async fn list_all(&self) -> Result<Vec<Kontakt>>;

    /// Write the fields set in `patch`; `None` when the row is gone
    async fn update(&self, id: Uuid, patch: &KontaktPatch) -> Result<Option<Kontakt>>;

    /// Create a contact and insert `rows` in one transaction.
    ///
    /// The `kontakt_id` of every row is replaced by the new contact's id.
    async fn create_with_beziehungen(
        &self,
        data: &NewKontakt,
        rows: &[NewBeziehung],
    ) -> Result<(Kontakt, Vec<Beziehung>)>;

    /// Write `patch` and replace the contact's relationships with `rows` in
    /// one transaction; `None` when the row is gone
    async fn update_with_beziehungen(
        &self,
        id: Uuid,
        patch: &KontaktPatch,
        rows: &[NewBeziehung],
    ) -> Result<Option<(Kontakt, Vec<Beziehung>)>>;

    /// Delete a contact, returning the number of removed rows
    async fn delete(&self, id: Uuid) -> Result<u64>;
}

/// Equality filter over relationship columns; unset fields match everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeziehungFilter {
    pub immobilien_id: Option<Uuid>,
    pub kontakt_id: Option<Uuid>,
    pub art: Option<Art>,
}

impl BeziehungFilter {
    /// Every relationship of an entity on the given side
    pub fn for_entity(side: EditSide, entity_id: Uuid) -> Self {
        match side {
            EditSide::Immobilien => Self {
                immobilien_id: Some(entity_id),
                ..Default::default()
            },
            EditSide::Kontakte => Self {
                kontakt_id: Some(entity_id),
                ..Default::default()
            },
        }
    }

    pub fn with_art(mut self, art: Art) -> Self {
        self.art = Some(art);
        self
    }

    /// Whether `beziehung` passes the filter
    pub fn matches(&self, beziehung: &Beziehung) -> bool {
        self.immobilien_id.map_or(true, |id| beziehung.immobilien_id == id)
            && self.kontakt_id.map_or(true, |id| beziehung.kontakt_id == id)
            && self.art.map_or(true, |art| beziehung.art == art)
    }
}

/// Repository for relationships
#[async_trait]
pub trait BeziehungenRepository: Send + Sync {
    /// Create a single relationship
    async fn create(&self, data: &NewBeziehung) -> Result<Beziehung>;

    /// Find a relationship by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Beziehung>>;

    /// Relationships matching `filter`, newest first
    async fn find(&self, filter: &BeziehungFilter) -> Result<Vec<Beziehung>>;

    /// Relationships matching `filter` joined with display labels.
    ///
    /// Label lookups that fail leave the labels empty.
    async fn find_views(&self, filter: &BeziehungFilter) -> Result<Vec<BeziehungView>>;

    /// Insert rows as one batch
    async fn insert_many(&self, rows: &[NewBeziehung]) -> Result<Vec<Beziehung>>;

    /// Overwrite a relationship; `None` when the row is gone
    async fn update(&self, id: Uuid, data: &NewBeziehung) -> Result<Option<Beziehung>>;

    /// Delete a relationship, returning the number of removed rows
    async fn delete(&self, id: Uuid) -> Result<u64>;

    /// Delete every relationship matching `filter`
    async fn delete_where(&self, filter: &BeziehungFilter) -> Result<u64>;

    /// Atomically replace all relationships of an entity with `rows`
    async fn replace_for_entity(
        &self,
        side: EditSide,
        entity_id: Uuid,
        rows: &[NewBeziehung],
    ) -> Result<Vec<Beziehung>>;
}
