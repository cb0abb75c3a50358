//! HTTP request handlers - thin layer that delegates to domain service

use crate::contract::{BeziehungDraft, UpdateOutcome};
use crate::domain::validation::parse_uuid;
use crate::domain::Service;
use super::{
    dto::*,
    error::{map_domain_error, Problem},
    mapper::{drafts_from_dtos, parse_side},
};
use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

/// Answer a save: `status` when complete, `207 Multi-Status` when the
/// relationships could not be reconciled
fn save_response<T, D>(outcome: UpdateOutcome<T>, status: StatusCode) -> Response
where
    D: From<T> + Serialize,
{
    match outcome.relationship_error {
        None => (status, Json(D::from(outcome.entity))).into_response(),
        Some(failure) => (
            StatusCode::MULTI_STATUS,
            Json(PartialSaveResponse {
                entity: D::from(outcome.entity),
                relationship_error: failure.message,
                detail: failure.detail,
                relationships_cleared: failure.relationships_cleared,
            }),
        )
            .into_response(),
    }
}

fn optional_drafts(
    dtos: Option<Vec<BeziehungDraftDto>>,
) -> Result<Option<Vec<BeziehungDraft>>, Problem> {
    dtos.map(drafts_from_dtos)
        .transpose()
        .map_err(map_domain_error)
}

// ===== Immobilien Handlers =====

/// List all properties
pub async fn list_immobilien(service: Arc<Service>) -> Result<Json<Vec<ImmobilieDto>>, Problem> {
    let immobilien = service.list_immobilien().await.map_err(map_domain_error)?;
    Ok(Json(immobilien.into_iter().map(Into::into).collect()))
}

/// Get a property with its relationships
pub async fn get_immobilie(
    service: Arc<Service>,
    Path(id): Path<String>,
) -> Result<Json<ImmobilieDetailsDto>, Problem> {
    let id = parse_uuid(&id).map_err(map_domain_error)?;
    let details = service.get_immobilie(id).await.map_err(map_domain_error)?;
    Ok(Json(details.into()))
}

/// Create a property
pub async fn create_immobilie(
    service: Arc<Service>,
    Json(req): Json<CreateImmobilieRequest>,
) -> Result<Response, Problem> {
    let data = (&req).into();
    let beziehungen = optional_drafts(req.beziehungen)?;

    let outcome = service
        .create_immobilie(data, beziehungen)
        .await
        .map_err(map_domain_error)?;
    Ok(save_response::<_, ImmobilieDto>(outcome, StatusCode::CREATED))
}

/// Patch a property and optionally replace its relationships
pub async fn update_immobilie(
    service: Arc<Service>,
    Path(id): Path<String>,
    Json(req): Json<UpdateImmobilieRequest>,
) -> Result<Response, Problem> {
    let id = parse_uuid(&id).map_err(map_domain_error)?;
    let patch = (&req).into();
    let beziehungen = optional_drafts(req.beziehungen)?;

    let outcome = service
        .update_immobilie(id, patch, beziehungen)
        .await
        .map_err(map_domain_error)?;
    Ok(save_response::<_, ImmobilieDto>(outcome, StatusCode::OK))
}

/// Delete a property
pub async fn delete_immobilie(
    service: Arc<Service>,
    Path(id): Path<String>,
) -> Result<StatusCode, Problem> {
    let id = parse_uuid(&id).map_err(map_domain_error)?;
    service.delete_immobilie(id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Kontakte Handlers =====

/// List all contacts
pub async fn list_kontakte(service: Arc<Service>) -> Result<Json<Vec<KontaktDto>>, Problem> {
    let kontakte = service.list_kontakte().await.map_err(map_domain_error)?;
    Ok(Json(kontakte.into_iter().map(Into::into).collect()))
}

/// Get a contact with its relationships
pub async fn get_kontakt(
    service: Arc<Service>,
    Path(id): Path<String>,
) -> Result<Json<KontaktDetailsDto>, Problem> {
    let id = parse_uuid(&id).map_err(map_domain_error)?;
    let details = service.get_kontakt(id).await.map_err(map_domain_error)?;
    Ok(Json(details.into()))
}

/// Create a contact
pub async fn create_kontakt(
    service: Arc<Service>,
    Json(req): Json<CreateKontaktRequest>,
) -> Result<Response, Problem> {
    let data = (&req).into();
    let beziehungen = optional_drafts(req.beziehungen)?;

    let outcome = service
        .create_kontakt(data, beziehungen)
        .await
        .map_err(map_domain_error)?;
    Ok(save_response::<_, KontaktDto>(outcome, StatusCode::CREATED))
}

/// Patch a contact and optionally replace its relationships
pub async fn update_kontakt(
    service: Arc<Service>,
    Path(id): Path<String>,
    Json(req): Json<UpdateKontaktRequest>,
) -> Result<Response, Problem> {
    let id = parse_uuid(&id).map_err(map_domain_error)?;
    let patch = (&req).into();
    let beziehungen = optional_drafts(req.beziehungen)?;

    let outcome = service
        .update_kontakt(id, patch, beziehungen)
        .await
        .map_err(map_domain_error)?;
    Ok(save_response::<_, KontaktDto>(outcome, StatusCode::OK))
}

/// Delete a contact
pub async fn delete_kontakt(
    service: Arc<Service>,
    Path(id): Path<String>,
) -> Result<StatusCode, Problem> {
    let id = parse_uuid(&id).map_err(map_domain_error)?;
    service.delete_kontakt(id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Beziehungen Handlers =====

/// List all relationships
pub async fn list_beziehungen(
    service: Arc<Service>,
) -> Result<Json<Vec<BeziehungDto>>, Problem> {
    let beziehungen = service.list_beziehungen().await.map_err(map_domain_error)?;
    Ok(Json(beziehungen.into_iter().map(Into::into).collect()))
}

/// Get a relationship
pub async fn get_beziehung(
    service: Arc<Service>,
    Path(id): Path<String>,
) -> Result<Json<BeziehungDto>, Problem> {
    let id = parse_uuid(&id).map_err(map_domain_error)?;
    let view = service.get_beziehung(id).await.map_err(map_domain_error)?;
    Ok(Json(view.into()))
}

/// Create a single relationship
pub async fn create_beziehung(
    service: Arc<Service>,
    Json(req): Json<BeziehungDraftDto>,
) -> Result<(StatusCode, Json<BeziehungDto>), Problem> {
    let draft: BeziehungDraft = req.try_into().map_err(map_domain_error)?;
    let beziehung = service
        .create_beziehung(draft)
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::CREATED, Json(beziehung.into())))
}

/// Overwrite a single relationship
pub async fn update_beziehung(
    service: Arc<Service>,
    Path(id): Path<String>,
    Json(req): Json<BeziehungDraftDto>,
) -> Result<Json<BeziehungDto>, Problem> {
    let id = parse_uuid(&id).map_err(map_domain_error)?;
    let draft: BeziehungDraft = req.try_into().map_err(map_domain_error)?;
    let beziehung = service
        .update_beziehung(id, draft)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(beziehung.into()))
}

/// Delete a relationship
pub async fn delete_beziehung(
    service: Arc<Service>,
    Path(id): Path<String>,
) -> Result<StatusCode, Problem> {
    let id = parse_uuid(&id).map_err(map_domain_error)?;
    service.delete_beziehung(id).await.map_err(map_domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Validation Handlers =====

/// Validate a candidate against relationships held by the form
pub async fn validate_relationship(
    service: Arc<Service>,
    Json(req): Json<ValidateRelationshipRequest>,
) -> Result<Json<ValidationResultDto>, Problem> {
    let side = parse_side(&req.side).map_err(map_domain_error)?;
    let candidate: BeziehungDraft = req.candidate.try_into().map_err(map_domain_error)?;
    let existing = drafts_from_dtos(req.existing).map_err(map_domain_error)?;

    let result = service.validate_relationship(&candidate, &existing, side);
    Ok(Json(result.into()))
}

/// Validate relationships against the persisted state of an entity
pub async fn validate_relationships(
    service: Arc<Service>,
    Json(req): Json<ValidateRelationshipsRequest>,
) -> Result<(StatusCode, Json<ValidationResultDto>), Problem> {
    let side = parse_side(&req.entity_type).map_err(map_domain_error)?;
    let entity_id = parse_uuid(&req.entity_id).map_err(map_domain_error)?;
    let candidates = drafts_from_dtos(req.relationships).map_err(map_domain_error)?;

    let result = service
        .validate_against_store(entity_id, side, &candidates)
        .await
        .map_err(map_domain_error)?;
    let status = if result.is_valid {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(result.into())))
}
