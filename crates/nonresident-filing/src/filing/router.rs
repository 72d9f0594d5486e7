use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{OwnerId, OwnerSubmission, PropertyId, PropertySubmission};
use super::repository::{FilingRepository, RepositoryError};
use super::service::{FilingService, FilingServiceError};
use crate::validators::{
    normalize_cadastral_reference, normalize_nie_nif, ownership_summary, validate_iban,
    validate_ownership_percentages, CadastralReference, OwnershipEntry, OwnershipErrorCode,
    OwnershipSummary, TaxId, TaxIdKind,
};

/// Router for the stateless field checks used by the forms.
pub fn validation_router() -> Router {
    Router::new()
        .route("/api/v1/validate/tax-id", post(tax_id_handler))
        .route(
            "/api/v1/validate/cadastral-reference",
            post(cadastral_reference_handler),
        )
        .route("/api/v1/validate/iban", post(iban_handler))
        .route("/api/v1/validate/ownership", post(ownership_handler))
}

/// Router builder exposing owner, property, and declaration endpoints.
pub fn filing_router<R>(service: Arc<FilingService<R>>) -> Router
where
    R: FilingRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/owners",
            post(create_owner_handler::<R>).get(list_owners_handler::<R>),
        )
        .route(
            "/api/v1/owners/:owner_id",
            get(get_owner_handler::<R>)
                .put(update_owner_handler::<R>)
                .delete(delete_owner_handler::<R>),
        )
        .route(
            "/api/v1/properties",
            post(create_property_handler::<R>).get(list_properties_handler::<R>),
        )
        .route(
            "/api/v1/properties/:property_id",
            get(get_property_handler::<R>)
                .put(update_property_handler::<R>)
                .delete(delete_property_handler::<R>),
        )
        .route(
            "/api/v1/properties/:property_id/declarations",
            get(declarations_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValueRequest {
    value: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwnershipRequest {
    entries: Vec<OwnershipEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TaxIdVerdict {
    valid: bool,
    normalized: String,
    #[serde(rename = "type")]
    kind: Option<TaxIdKind>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CadastralVerdict {
    valid: bool,
    normalized: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parcel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sheet: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OwnershipVerdict {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<OwnershipErrorCode>,
    summary: OwnershipSummary,
}

pub(crate) async fn tax_id_handler(axum::Json(request): axum::Json<ValueRequest>) -> Response {
    let parsed = TaxId::parse(&request.value);
    let verdict = TaxIdVerdict {
        valid: parsed.is_some(),
        normalized: normalize_nie_nif(&request.value),
        kind: parsed.map(|tax_id| tax_id.kind()),
    };
    (StatusCode::OK, axum::Json(verdict)).into_response()
}

pub(crate) async fn cadastral_reference_handler(
    axum::Json(request): axum::Json<ValueRequest>,
) -> Response {
    let parsed = CadastralReference::parse(&request.value);
    let verdict = CadastralVerdict {
        valid: parsed.is_some(),
        normalized: normalize_cadastral_reference(&request.value),
        parcel: parsed.as_ref().map(|reference| reference.parcel().to_string()),
        sheet: parsed.as_ref().map(|reference| reference.sheet().to_string()),
    };
    (StatusCode::OK, axum::Json(verdict)).into_response()
}

pub(crate) async fn iban_handler(axum::Json(request): axum::Json<ValueRequest>) -> Response {
    (StatusCode::OK, axum::Json(validate_iban(&request.value))).into_response()
}

pub(crate) async fn ownership_handler(
    axum::Json(request): axum::Json<OwnershipRequest>,
) -> Response {
    let validation = validate_ownership_percentages(&request.entries);
    let verdict = OwnershipVerdict {
        valid: validation.valid,
        error_code: validation.error_code,
        summary: ownership_summary(&request.entries),
    };
    (StatusCode::OK, axum::Json(verdict)).into_response()
}

pub(crate) async fn create_owner_handler<R>(
    State(service): State<Arc<FilingService<R>>>,
    axum::Json(submission): axum::Json<OwnerSubmission>,
) -> Response
where
    R: FilingRepository + 'static,
{
    match service.create_owner(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn list_owners_handler<R>(
    State(service): State<Arc<FilingService<R>>>,
) -> Response
where
    R: FilingRepository + 'static,
{
    match service.list_owners() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn get_owner_handler<R>(
    State(service): State<Arc<FilingService<R>>>,
    Path(owner_id): Path<String>,
) -> Response
where
    R: FilingRepository + 'static,
{
    let Some(id) = OwnerId::parse(&owner_id) else {
        return not_found("owner", &owner_id);
    };
    match service.get_owner(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn update_owner_handler<R>(
    State(service): State<Arc<FilingService<R>>>,
    Path(owner_id): Path<String>,
    axum::Json(submission): axum::Json<OwnerSubmission>,
) -> Response
where
    R: FilingRepository + 'static,
{
    let Some(id) = OwnerId::parse(&owner_id) else {
        return not_found("owner", &owner_id);
    };
    match service.update_owner(&id, submission) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn delete_owner_handler<R>(
    State(service): State<Arc<FilingService<R>>>,
    Path(owner_id): Path<String>,
) -> Response
where
    R: FilingRepository + 'static,
{
    let Some(id) = OwnerId::parse(&owner_id) else {
        return not_found("owner", &owner_id);
    };
    match service.delete_owner(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn create_property_handler<R>(
    State(service): State<Arc<FilingService<R>>>,
    axum::Json(submission): axum::Json<PropertySubmission>,
) -> Response
where
    R: FilingRepository + 'static,
{
    match service.create_property(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn list_properties_handler<R>(
    State(service): State<Arc<FilingService<R>>>,
) -> Response
where
    R: FilingRepository + 'static,
{
    match service.list_properties() {
        Ok(records) => (StatusCode::OK, axum::Json(records)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn get_property_handler<R>(
    State(service): State<Arc<FilingService<R>>>,
    Path(property_id): Path<String>,
) -> Response
where
    R: FilingRepository + 'static,
{
    let Some(id) = PropertyId::parse(&property_id) else {
        return not_found("property", &property_id);
    };
    match service.get_property(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn update_property_handler<R>(
    State(service): State<Arc<FilingService<R>>>,
    Path(property_id): Path<String>,
    axum::Json(submission): axum::Json<PropertySubmission>,
) -> Response
where
    R: FilingRepository + 'static,
{
    let Some(id) = PropertyId::parse(&property_id) else {
        return not_found("property", &property_id);
    };
    match service.update_property(&id, submission) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn delete_property_handler<R>(
    State(service): State<Arc<FilingService<R>>>,
    Path(property_id): Path<String>,
) -> Response
where
    R: FilingRepository + 'static,
{
    let Some(id) = PropertyId::parse(&property_id) else {
        return not_found("property", &property_id);
    };
    match service.delete_property(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn declarations_handler<R>(
    State(service): State<Arc<FilingService<R>>>,
    Path(property_id): Path<String>,
) -> Response
where
    R: FilingRepository + 'static,
{
    let Some(id) = PropertyId::parse(&property_id) else {
        return not_found("property", &property_id);
    };
    match service.declarations(&id) {
        Ok(declaration) => {
            let total = declaration.total_tax_due_cents();
            let payload = json!({
                "declaration": declaration,
                "totalTaxDueCents": total,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

fn not_found(kind: &str, id: &str) -> Response {
    let payload = json!({
        "error": "notFound",
        "message": format!("{kind} '{id}' not found"),
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

impl IntoResponse for FilingServiceError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            FilingServiceError::Violation(violation) => {
                (StatusCode::UNPROCESSABLE_ENTITY, violation.code())
            }
            FilingServiceError::UnknownOwner(_)
            | FilingServiceError::Repository(RepositoryError::MissingOwner(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unknownOwner")
            }
            FilingServiceError::OwnerInUse { .. }
            | FilingServiceError::Repository(RepositoryError::OwnerInUse { .. }) => {
                (StatusCode::CONFLICT, "ownerInUse")
            }
            FilingServiceError::Repository(RepositoryError::NotFound) => {
                (StatusCode::NOT_FOUND, "notFound")
            }
            FilingServiceError::Repository(RepositoryError::Conflict) => {
                (StatusCode::CONFLICT, "conflict")
            }
            FilingServiceError::Repository(RepositoryError::Unavailable(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "repositoryUnavailable")
            }
        };

        let payload = json!({
            "error": code,
            "message": self.to_string(),
        });
        (status, axum::Json(payload)).into_response()
    }
}
