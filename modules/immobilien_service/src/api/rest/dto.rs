//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Immobilie DTOs =====

/// Property response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImmobilieDto {
    pub id: Uuid,

    #[schema(example = "Altbauwohnung Lindenstraße")]
    pub titel: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub beschreibung: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Property with its relationships
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImmobilieDetailsDto {
    #[serde(flatten)]
    pub immobilie: ImmobilieDto,

    pub beziehungen: Vec<BeziehungDto>,
}

/// Create property request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateImmobilieRequest {
    pub titel: String,

    #[serde(default)]
    pub beschreibung: Option<String>,

    #[serde(default)]
    pub adresse: Option<String>,

    /// Initial relationship set
    #[serde(default)]
    pub beziehungen: Option<Vec<BeziehungDraftDto>>,
}

/// Partial property update; present `beziehungen` replace the whole set
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateImmobilieRequest {
    #[serde(default)]
    pub titel: Option<String>,

    #[serde(default)]
    pub beschreibung: Option<String>,

    #[serde(default)]
    pub adresse: Option<String>,

    #[serde(default)]
    pub beziehungen: Option<Vec<BeziehungDraftDto>>,
}

// ===== Kontakt DTOs =====

/// Contact response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KontaktDto {
    pub id: Uuid,

    #[schema(example = "Erika Mustermann")]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub adresse: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Contact with its relationships
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct KontaktDetailsDto {
    #[serde(flatten)]
    pub kontakt: KontaktDto,

    pub beziehungen: Vec<BeziehungDto>,
}

/// Create contact request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateKontaktRequest {
    pub name: String,

    #[serde(default)]
    pub adresse: Option<String>,

    /// Initial relationship set
    #[serde(default)]
    pub beziehungen: Option<Vec<BeziehungDraftDto>>,
}

/// Partial contact update; present `beziehungen` replace the whole set
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateKontaktRequest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub adresse: Option<String>,

    #[serde(default)]
    pub beziehungen: Option<Vec<BeziehungDraftDto>>,
}

// ===== Beziehung DTOs =====

/// Relationship response DTO with display labels
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BeziehungDto {
    pub id: Uuid,
    pub immobilien_id: Uuid,
    pub kontakt_id: Uuid,

    #[schema(example = "Mieter")]
    pub art: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub startdatum: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enddatum: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dienstleistungen: Option<String>,

    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub immobilien_titel: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kontakt_name: Option<String>,
}

/// Relationship as submitted by a form.
///
/// Everything is optional and kept as text so that missing or malformed
/// values can be reported field by field. Empty strings count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BeziehungDraftDto {
    /// Persisted id or client placeholder
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub immobilien_id: Option<String>,

    #[serde(default)]
    pub kontakt_id: Option<String>,

    #[serde(default)]
    #[schema(example = "Mieter")]
    pub art: Option<String>,

    /// ISO date (YYYY-MM-DD)
    #[serde(default)]
    #[schema(example = "2024-01-01")]
    pub startdatum: Option<String>,

    /// ISO date (YYYY-MM-DD)
    #[serde(default)]
    #[schema(example = "2024-12-31")]
    pub enddatum: Option<String>,

    #[serde(default)]
    pub dienstleistungen: Option<String>,

    /// Display only, never written
    #[serde(default)]
    pub immobilien_titel: Option<String>,

    /// Display only, never written
    #[serde(default)]
    pub kontakt_name: Option<String>,
}

// ===== Validation DTOs =====

/// Form-local validation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ValidateRelationshipRequest {
    pub candidate: BeziehungDraftDto,

    /// Relationships already accepted in the form
    #[serde(default)]
    pub existing: Vec<BeziehungDraftDto>,

    /// Edited side: `immobilien` or `kontakte`
    #[serde(default = "default_side")]
    #[schema(example = "immobilien")]
    pub side: String,
}

fn default_side() -> String {
    "immobilien".to_string()
}

/// Store-backed validation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateRelationshipsRequest {
    pub relationships: Vec<BeziehungDraftDto>,

    /// Edited side: `immobilien` or `kontakte`
    #[schema(example = "immobilien")]
    pub entity_type: String,

    pub entity_id: String,
}

/// Field-scoped validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorDto {
    #[schema(example = "general")]
    pub field: String,

    #[schema(example = "Mieter ist in diesem Zeitraum schon zur Miete")]
    pub message: String,
}

/// Validation verdict
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResultDto {
    pub is_valid: bool,
    pub errors: Vec<FieldErrorDto>,
}

// ===== Multi-status =====

/// Body of a `207 Multi-Status` save: entity stored, relationships not
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialSaveResponse<T> {
    pub entity: T,

    /// User-facing message
    pub relationship_error: String,

    /// Underlying store error
    pub detail: String,

    /// Whether the entity now has no relationships
    pub relationships_cleared: bool,
}
