//! Route registration

use crate::domain::Service;
use super::{dto::*, error::Problem, handlers};
use axum::{
    extract::Path,
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use utoipa::OpenApi;

/// OpenAPI document of the REST schemas
#[derive(OpenApi)]
#[openapi(
    components(schemas(
        ImmobilieDto,
        ImmobilieDetailsDto,
        CreateImmobilieRequest,
        UpdateImmobilieRequest,
        KontaktDto,
        KontaktDetailsDto,
        CreateKontaktRequest,
        UpdateKontaktRequest,
        BeziehungDto,
        BeziehungDraftDto,
        ValidateRelationshipRequest,
        ValidateRelationshipsRequest,
        FieldErrorDto,
        ValidationResultDto,
    )),
    tags(
        (name = "immobilien", description = "Properties, contacts and their relationships")
    )
)]
pub struct ApiDoc;

/// Register all REST routes on `router`
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        // Immobilien endpoints
        .route(
            "/immobilien",
            get(list_immobilien_handler).post(create_immobilie_handler),
        )
        .route(
            "/immobilien/{id}",
            get(get_immobilie_handler)
                .patch(update_immobilie_handler)
                .delete(delete_immobilie_handler),
        )
        // Kontakte endpoints
        .route(
            "/kontakte",
            get(list_kontakte_handler).post(create_kontakt_handler),
        )
        .route(
            "/kontakte/{id}",
            get(get_kontakt_handler)
                .patch(update_kontakt_handler)
                .delete(delete_kontakt_handler),
        )
        // Beziehungen endpoints
        .route(
            "/beziehungen",
            get(list_beziehungen_handler).post(create_beziehung_handler),
        )
        .route(
            "/beziehungen/{id}",
            get(get_beziehung_handler)
                .patch(update_beziehung_handler)
                .delete(delete_beziehung_handler),
        )
        // Validation endpoints
        .route("/validate-relationship", post(validate_relationship_handler))
        .route("/validate-relationships", post(validate_relationships_handler))
        .route("/openapi.json", get(openapi_handler))
        // Add service as extension for handlers
        .layer(Extension(service))
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

// ===== Handler wrappers that extract service from Extension =====

async fn list_immobilien_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<Vec<ImmobilieDto>>, Problem> {
    handlers::list_immobilien(service).await
}

async fn get_immobilie_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<Json<ImmobilieDetailsDto>, Problem> {
    handlers::get_immobilie(service, path).await
}

async fn create_immobilie_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<CreateImmobilieRequest>,
) -> Result<Response, Problem> {
    handlers::create_immobilie(service, json).await
}

async fn update_immobilie_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
    json: Json<UpdateImmobilieRequest>,
) -> Result<Response, Problem> {
    handlers::update_immobilie(service, path, json).await
}

async fn delete_immobilie_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<StatusCode, Problem> {
    handlers::delete_immobilie(service, path).await
}

async fn list_kontakte_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<Vec<KontaktDto>>, Problem> {
    handlers::list_kontakte(service).await
}

async fn get_kontakt_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<Json<KontaktDetailsDto>, Problem> {
    handlers::get_kontakt(service, path).await
}

async fn create_kontakt_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<CreateKontaktRequest>,
) -> Result<Response, Problem> {
    handlers::create_kontakt(service, json).await
}

async fn update_kontakt_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
    json: Json<UpdateKontaktRequest>,
) -> Result<Response, Problem> {
    handlers::update_kontakt(service, path, json).await
}

async fn delete_kontakt_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<StatusCode, Problem> {
    handlers::delete_kontakt(service, path).await
}

async fn list_beziehungen_handler(
    Extension(service): Extension<Arc<Service>>,
) -> Result<Json<Vec<BeziehungDto>>, Problem> {
    handlers::list_beziehungen(service).await
}

async fn get_beziehung_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<Json<BeziehungDto>, Problem> {
    handlers::get_beziehung(service, path).await
}

async fn create_beziehung_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<BeziehungDraftDto>,
) -> Result<(StatusCode, Json<BeziehungDto>), Problem> {
    handlers::create_beziehung(service, json).await
}

async fn update_beziehung_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
    json: Json<BeziehungDraftDto>,
) -> Result<Json<BeziehungDto>, Problem> {
    handlers::update_beziehung(service, path, json).await
}

async fn delete_beziehung_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<String>,
) -> Result<StatusCode, Problem> {
    handlers::delete_beziehung(service, path).await
}

async fn validate_relationship_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<ValidateRelationshipRequest>,
) -> Result<Json<ValidationResultDto>, Problem> {
    handlers::validate_relationship(service, json).await
}

async fn validate_relationships_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Json<ValidateRelationshipsRequest>,
) -> Result<(StatusCode, Json<ValidationResultDto>), Problem> {
    handlers::validate_relationships(service, json).await
}
