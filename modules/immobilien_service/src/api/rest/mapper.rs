//! Mapper implementations for converting between DTOs and contract models
//!
//! This module contains all From/Into implementations for bidirectional
//! conversion between REST DTOs and transport-agnostic contract models.

use super::dto::*;
use crate::contract::{self, ImmobilienError, Table};
use crate::domain::validation::parse_uuid;
use chrono::NaiveDate;
use uuid::Uuid;

// ===== Entity conversions =====

impl From<contract::Immobilie> for ImmobilieDto {
    fn from(immobilie: contract::Immobilie) -> Self {
        Self {
            id: immobilie.id,
            titel: immobilie.titel,
            beschreibung: immobilie.beschreibung,
            adresse: immobilie.adresse,
            created_at: immobilie.created_at,
        }
    }
}

impl From<contract::ImmobilieDetails> for ImmobilieDetailsDto {
    fn from(details: contract::ImmobilieDetails) -> Self {
        Self {
            immobilie: details.immobilie.into(),
            beziehungen: details.beziehungen.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<contract::Kontakt> for KontaktDto {
    fn from(kontakt: contract::Kontakt) -> Self {
        Self {
            id: kontakt.id,
            name: kontakt.name,
            adresse: kontakt.adresse,
            created_at: kontakt.created_at,
        }
    }
}

impl From<contract::KontaktDetails> for KontaktDetailsDto {
    fn from(details: contract::KontaktDetails) -> Self {
        Self {
            kontakt: details.kontakt.into(),
            beziehungen: details.beziehungen.into_iter().map(Into::into).collect(),
        }
    }
}

// ===== Beziehung conversions =====

impl From<contract::Beziehung> for BeziehungDto {
    fn from(beziehung: contract::Beziehung) -> Self {
        Self {
            id: beziehung.id,
            immobilien_id: beziehung.immobilien_id,
            kontakt_id: beziehung.kontakt_id,
            art: beziehung.art.as_str().to_string(),
            startdatum: beziehung.startdatum,
            enddatum: beziehung.enddatum,
            dienstleistungen: beziehung.dienstleistungen,
            created_at: beziehung.created_at,
            immobilien_titel: None,
            kontakt_name: None,
        }
    }
}

impl From<contract::BeziehungView> for BeziehungDto {
    fn from(view: contract::BeziehungView) -> Self {
        Self {
            immobilien_titel: view.immobilien_titel,
            kontakt_name: view.kontakt_name,
            ..BeziehungDto::from(view.beziehung)
        }
    }
}

impl TryFrom<BeziehungDraftDto> for contract::BeziehungDraft {
    type Error = ImmobilienError;

    fn try_from(dto: BeziehungDraftDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: non_empty(dto.id),
            immobilien_id: optional_uuid(dto.immobilien_id)?,
            kontakt_id: optional_uuid(dto.kontakt_id)?,
            art: non_empty(dto.art),
            startdatum: optional_date("startdatum", dto.startdatum)?,
            enddatum: optional_date("enddatum", dto.enddatum)?,
            dienstleistungen: dto.dienstleistungen,
            immobilien_titel: dto.immobilien_titel,
            kontakt_name: dto.kontakt_name,
        })
    }
}

/// Convert a list of submitted drafts, failing on the first malformed one
pub fn drafts_from_dtos(
    dtos: Vec<BeziehungDraftDto>,
) -> Result<Vec<contract::BeziehungDraft>, ImmobilienError> {
    dtos.into_iter().map(TryInto::try_into).collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn optional_uuid(value: Option<String>) -> Result<Option<Uuid>, ImmobilienError> {
    non_empty(value).map(|v| parse_uuid(v.trim())).transpose()
}

fn optional_date(field: &str, value: Option<String>) -> Result<Option<NaiveDate>, ImmobilienError> {
    non_empty(value)
        .map(|v| {
            NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").map_err(|_| {
                ImmobilienError::InvalidData {
                    table: Table::Beziehungen,
                    details: format!("{field}: '{v}' is not an ISO date (YYYY-MM-DD)"),
                }
            })
        })
        .transpose()
}

/// Parse the edited side of a request
pub fn parse_side(value: &str) -> Result<contract::EditSide, ImmobilienError> {
    contract::EditSide::parse(value).ok_or_else(|| ImmobilienError::InvalidData {
        table: Table::Beziehungen,
        details: format!("unknown entity type '{value}', expected 'immobilien' or 'kontakte'"),
    })
}

// ===== Validation conversions =====

impl From<contract::FieldError> for FieldErrorDto {
    fn from(error: contract::FieldError) -> Self {
        Self {
            field: error.field.as_str().to_string(),
            message: error.message,
        }
    }
}

impl From<contract::ValidationResult> for ValidationResultDto {
    fn from(result: contract::ValidationResult) -> Self {
        Self {
            is_valid: result.is_valid,
            errors: result.errors.into_iter().map(Into::into).collect(),
        }
    }
}

// ===== Request conversions =====

impl From<&CreateImmobilieRequest> for contract::NewImmobilie {
    fn from(req: &CreateImmobilieRequest) -> Self {
        Self {
            titel: req.titel.clone(),
            beschreibung: req.beschreibung.clone(),
            adresse: req.adresse.clone(),
        }
    }
}

impl From<&UpdateImmobilieRequest> for contract::ImmobiliePatch {
    fn from(req: &UpdateImmobilieRequest) -> Self {
        Self {
            titel: req.titel.clone(),
            beschreibung: req.beschreibung.clone(),
            adresse: req.adresse.clone(),
        }
    }
}

impl From<&CreateKontaktRequest> for contract::NewKontakt {
    fn from(req: &CreateKontaktRequest) -> Self {
        Self {
            name: req.name.clone(),
            adresse: req.adresse.clone(),
        }
    }
}

impl From<&UpdateKontaktRequest> for contract::KontaktPatch {
    fn from(req: &UpdateKontaktRequest) -> Self {
        Self {
            name: req.name.clone(),
            adresse: req.adresse.clone(),
        }
    }
}
