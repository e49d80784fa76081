//! HTTP handlers for the `/flags` resource.
//!
//! Each handler performs exactly one store operation. Request bodies are
//! decoded into typed structs first; any decode failure becomes the
//! endpoint's 400 response.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{debug, info};
use thiserror::Error;

use crate::flag::{CreateFlagRequest, ErrorResponse, FlagMap, MessageResponse, UpdateFlagRequest};
use crate::store::FlagStore;
use crate::StoreError;

/// Errors surfaced to HTTP callers as `{ "error": ... }`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid isEnabled value")]
    InvalidUpdate,

    #[error("Invalid flag name or isEnabled value")]
    InvalidCreate,

    #[error("Feature flag not found")]
    NotFound,

    #[error("Feature flag already exists")]
    Conflict,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidUpdate | ApiError::InvalidCreate => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict => StatusCode::CONFLICT,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::NotFound,
            StoreError::Conflict(_) => ApiError::Conflict,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Get all feature flags
#[utoipa::path(
    get,
    path = "/flags",
    responses(
        (status = 200, description = "Successful response with feature flags", body = FlagMap)
    ),
    tag = "flags"
)]
pub async fn list_flags(State(store): State<Arc<dyn FlagStore>>) -> Json<FlagMap> {
    Json(store.get_all().await.into())
}

/// Get a specific feature flag
#[utoipa::path(
    get,
    path = "/flags/{name}",
    params(
        ("name" = String, Path, description = "The name of the feature flag to retrieve")
    ),
    responses(
        (status = 200, description = "Successful response with the feature flag value", body = FlagMap),
        (status = 404, description = "Feature flag not found", body = ErrorResponse)
    ),
    tag = "flags"
)]
pub async fn get_flag(
    State(store): State<Arc<dyn FlagStore>>,
    Path(name): Path<String>,
) -> Result<Json<FlagMap>, ApiError> {
    let enabled = store.get(&name).await?;
    Ok(Json(FlagMap::single(name, enabled)))
}

/// Update a feature flag
///
/// Only existing flags can be updated; an unknown name is a 404.
#[utoipa::path(
    put,
    path = "/flags/{name}",
    params(
        ("name" = String, Path, description = "The name of the feature flag to update")
    ),
    request_body = UpdateFlagRequest,
    responses(
        (status = 200, description = "Feature flag updated successfully", body = MessageResponse),
        (status = 400, description = "Invalid isEnabled value (not a boolean)", body = ErrorResponse),
        (status = 404, description = "Feature flag not found", body = ErrorResponse)
    ),
    tag = "flags"
)]
pub async fn update_flag(
    State(store): State<Arc<dyn FlagStore>>,
    Path(name): Path<String>,
    payload: Result<Json<UpdateFlagRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected update body for {}: {}", name, rejection.body_text());
        ApiError::InvalidUpdate
    })?;

    store.set(&name, request.is_enabled).await?;
    info!("Feature flag '{}' set to {}", name, request.is_enabled);

    Ok(Json(MessageResponse {
        message: format!("Feature flag '{}' updated successfully", name),
    }))
}

/// Create a new feature flag
///
/// Existing flags are never overwritten; a duplicate name is a 409.
#[utoipa::path(
    post,
    path = "/flags",
    request_body = CreateFlagRequest,
    responses(
        (status = 201, description = "Feature flag created successfully", body = MessageResponse),
        (status = 400, description = "Invalid input (missing or incorrect parameters)", body = ErrorResponse),
        (status = 409, description = "Feature flag with the same name already exists", body = ErrorResponse)
    ),
    tag = "flags"
)]
pub async fn create_flag(
    State(store): State<Arc<dyn FlagStore>>,
    payload: Result<Json<CreateFlagRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected create body: {}", rejection.body_text());
        ApiError::InvalidCreate
    })?;

    if request.name.is_empty() {
        return Err(ApiError::InvalidCreate);
    }

    store.create(&request.name, request.is_enabled).await?;
    info!(
        "Feature flag '{}' created with value {}",
        request.name, request.is_enabled
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("Feature flag '{}' created successfully", request.name),
        }),
    ))
}

/// Delete a feature flag
#[utoipa::path(
    delete,
    path = "/flags/{name}",
    params(
        ("name" = String, Path, description = "The name of the feature flag to delete")
    ),
    responses(
        (status = 200, description = "Feature flag deleted successfully", body = MessageResponse),
        (status = 404, description = "Feature flag not found", body = ErrorResponse)
    ),
    tag = "flags"
)]
pub async fn delete_flag(
    State(store): State<Arc<dyn FlagStore>>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    store.delete(&name).await?;
    info!("Feature flag '{}' deleted", name);

    Ok(Json(MessageResponse {
        message: format!("Feature flag '{}' deleted successfully", name),
    }))
}
