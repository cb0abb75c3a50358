//! Contract models for the immobilien service
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

// ===== Relationship kind =====

/// Kind of a relationship between a property and a contact (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Art {
    /// Owner
    Eigentuemer,
    /// Tenant
    Mieter,
    /// Service provider
    Dienstleister,
}

impl Art {
    /// Every valid relationship kind
    pub const ALL: [Art; 3] = [Art::Eigentuemer, Art::Mieter, Art::Dienstleister];

    /// Stored and displayed label
    pub fn as_str(&self) -> &'static str {
        match self {
            Art::Eigentuemer => "Eigentümer",
            Art::Mieter => "Mieter",
            Art::Dienstleister => "Dienstleister",
        }
    }

    /// Parse a submitted label; only the exact labels are accepted
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|art| art.as_str() == value)
    }

    /// Whether date ranges of this kind must not overlap per counterpart entity
    pub fn is_exclusive_interval(&self) -> bool {
        matches!(self, Art::Mieter)
    }
}

impl fmt::Display for Art {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Edit side and tables =====

/// Which entity owns the relationship set being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditSide {
    /// A property is edited; the contact is user-selected
    Immobilien,
    /// A contact is edited; the property is user-selected
    Kontakte,
}

impl EditSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditSide::Immobilien => "immobilien",
            EditSide::Kontakte => "kontakte",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "immobilien" => Some(EditSide::Immobilien),
            "kontakte" => Some(EditSide::Kontakte),
            _ => None,
        }
    }

    /// Table holding the edited entity
    pub fn table(&self) -> Table {
        match self {
            EditSide::Immobilien => Table::Immobilien,
            EditSide::Kontakte => Table::Kontakte,
        }
    }
}

/// Tables exposed by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Kontakte,
    Immobilien,
    Beziehungen,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Kontakte => "kontakte",
            Table::Immobilien => "immobilien",
            Table::Beziehungen => "beziehungen",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Entities =====

/// Property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Immobilie {
    pub id: Uuid,
    pub titel: String,
    pub beschreibung: Option<String>,
    pub adresse: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for a new property
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewImmobilie {
    pub titel: String,
    pub beschreibung: Option<String>,
    pub adresse: Option<String>,
}

/// Partial property update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImmobiliePatch {
    pub titel: Option<String>,
    pub beschreibung: Option<String>,
    pub adresse: Option<String>,
}

impl ImmobiliePatch {
    /// Drop every field that already holds the submitted value
    pub fn changed_against(&self, current: &Immobilie) -> Self {
        Self {
            titel: self.titel.clone().filter(|t| *t != current.titel),
            beschreibung: self
                .beschreibung
                .clone()
                .filter(|b| Some(b) != current.beschreibung.as_ref()),
            adresse: self
                .adresse
                .clone()
                .filter(|a| Some(a) != current.adresse.as_ref()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.titel.is_none() && self.beschreibung.is_none() && self.adresse.is_none()
    }
}

/// Contact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kontakt {
    pub id: Uuid,
    pub name: String,
    pub adresse: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for a new contact
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewKontakt {
    pub name: String,
    pub adresse: Option<String>,
}

/// Partial contact update; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KontaktPatch {
    pub name: Option<String>,
    pub adresse: Option<String>,
}

impl KontaktPatch {
    /// Drop every field that already holds the submitted value
    pub fn changed_against(&self, current: &Kontakt) -> Self {
        Self {
            name: self.name.clone().filter(|n| *n != current.name),
            adresse: self
                .adresse
                .clone()
                .filter(|a| Some(a) != current.adresse.as_ref()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.adresse.is_none()
    }
}

/// Either kind of entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Immobilie(Immobilie),
    Kontakt(Kontakt),
}

impl Entity {
    pub fn id(&self) -> Uuid {
        match self {
            Entity::Immobilie(immobilie) => immobilie.id,
            Entity::Kontakt(kontakt) => kontakt.id,
        }
    }
}

// ===== Relationships =====

/// Persisted relationship between one property and one contact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beziehung {
    pub id: Uuid,
    pub immobilien_id: Uuid,
    pub kontakt_id: Uuid,
    pub art: Art,
    pub startdatum: Option<NaiveDate>,
    pub enddatum: Option<NaiveDate>,
    pub dienstleistungen: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Write model for a relationship. Carries no id and no display labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBeziehung {
    pub immobilien_id: Uuid,
    pub kontakt_id: Uuid,
    pub art: Art,
    pub startdatum: Option<NaiveDate>,
    pub enddatum: Option<NaiveDate>,
    pub dienstleistungen: Option<String>,
}

/// Candidate or pending relationship as submitted by a form.
///
/// `art` stays raw so unknown kinds can be reported. `id` is either a
/// persisted id or a client placeholder. The labels are display-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeziehungDraft {
    pub id: Option<String>,
    pub immobilien_id: Option<Uuid>,
    pub kontakt_id: Option<Uuid>,
    pub art: Option<String>,
    pub startdatum: Option<NaiveDate>,
    pub enddatum: Option<NaiveDate>,
    pub dienstleistungen: Option<String>,
    pub immobilien_titel: Option<String>,
    pub kontakt_name: Option<String>,
}

impl BeziehungDraft {
    /// Parsed kind, if present and valid
    pub fn parsed_art(&self) -> Option<Art> {
        self.art.as_deref().and_then(Art::parse)
    }

    /// Id of the user-selected side
    pub fn counterpart_id(&self, side: EditSide) -> Option<Uuid> {
        match side {
            EditSide::Immobilien => self.kontakt_id,
            EditSide::Kontakte => self.immobilien_id,
        }
    }

    /// Id of the side implied by the edited entity
    pub fn implied_id(&self, side: EditSide) -> Option<Uuid> {
        match side {
            EditSide::Immobilien => self.immobilien_id,
            EditSide::Kontakte => self.kontakt_id,
        }
    }

    /// Copy with the edited entity's id set on the implied side
    pub fn with_implied_id(&self, side: EditSide, entity_id: Uuid) -> Self {
        let mut draft = self.clone();
        match side {
            EditSide::Immobilien => draft.immobilien_id = Some(entity_id),
            EditSide::Kontakte => draft.kontakt_id = Some(entity_id),
        }
        draft
    }
}

impl From<&Beziehung> for BeziehungDraft {
    fn from(beziehung: &Beziehung) -> Self {
        Self {
            id: Some(beziehung.id.to_string()),
            immobilien_id: Some(beziehung.immobilien_id),
            kontakt_id: Some(beziehung.kontakt_id),
            art: Some(beziehung.art.as_str().to_string()),
            startdatum: beziehung.startdatum,
            enddatum: beziehung.enddatum,
            dienstleistungen: beziehung.dienstleistungen.clone(),
            immobilien_titel: None,
            kontakt_name: None,
        }
    }
}

/// Persisted relationship joined with the display labels of both sides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeziehungView {
    pub beziehung: Beziehung,
    pub immobilien_titel: Option<String>,
    pub kontakt_name: Option<String>,
}

impl From<&BeziehungView> for BeziehungDraft {
    fn from(view: &BeziehungView) -> Self {
        Self {
            immobilien_titel: view.immobilien_titel.clone(),
            kontakt_name: view.kontakt_name.clone(),
            ..BeziehungDraft::from(&view.beziehung)
        }
    }
}

/// Property together with its relationships
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImmobilieDetails {
    pub immobilie: Immobilie,
    pub beziehungen: Vec<BeziehungView>,
}

/// Contact together with its relationships
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KontaktDetails {
    pub kontakt: Kontakt,
    pub beziehungen: Vec<BeziehungView>,
}

// ===== Validation =====

/// Input field a validation error is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorField {
    Art,
    Entity,
    Dienstleistungen,
    Enddatum,
    Titel,
    Name,
    General,
}

impl ErrorField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorField::Art => "art",
            ErrorField::Entity => "entity",
            ErrorField::Dienstleistungen => "dienstleistungen",
            ErrorField::Enddatum => "enddatum",
            ErrorField::Titel => "titel",
            ErrorField::Name => "name",
            ErrorField::General => "general",
        }
    }
}

/// Field-scoped validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: ErrorField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: ErrorField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Verdict of a validation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Fold another verdict into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
        self.is_valid = self.errors.is_empty();
    }

    /// Whether some error is attached to `field`
    pub fn has_error(&self, field: ErrorField) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// One message per field; later errors replace earlier ones
    pub fn errors_by_field(&self) -> BTreeMap<ErrorField, String> {
        self.errors
            .iter()
            .map(|e| (e.field, e.message.clone()))
            .collect()
    }
}

// ===== Update outcome =====

/// Why the relationship part of a save failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipFailure {
    /// Short user-facing message
    pub message: String,
    /// Underlying store error detail
    pub detail: String,
    /// Whether the entity was left with no persisted relationships
    pub relationships_cleared: bool,
}

/// Result of an entity save that may carry a relationship failure.
///
/// `relationship_error` set means "saved with warnings": the entity write
/// succeeded but the relationship set was not reconciled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome<T> {
    pub entity: T,
    pub relationship_error: Option<RelationshipFailure>,
}

impl<T> UpdateOutcome<T> {
    pub fn complete(entity: T) -> Self {
        Self {
            entity,
            relationship_error: None,
        }
    }

    pub fn partial(entity: T, failure: RelationshipFailure) -> Self {
        Self {
            entity,
            relationship_error: Some(failure),
        }
    }

    pub fn is_partial(&self) -> bool {
        self.relationship_error.is_some()
    }
}
