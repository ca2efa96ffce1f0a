use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{auth::AuthenticatedUser, errors::ApiError, handlers::AppState};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1))]
    pub name: String,
}

/// Create a stock location
#[utoipa::path(
    post,
    path = "/api/v1/locations",
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Location created", body = serde_json::Value),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn create_location(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<CreateLocationRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let location = state
        .services
        .locations
        .create_location(&actor, payload.name)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(location))
}

/// List stock locations
#[utoipa::path(
    get,
    path = "/api/v1/locations",
    responses((status = 200, description = "Locations", body = serde_json::Value)),
    tag = "locations"
)]
pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let locations = state
        .services
        .locations
        .list_locations()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(locations))
}

/// Delete a location
#[utoipa::path(
    delete,
    path = "/api/v1/locations/{id}",
    params(("id" = Uuid, Path, description = "Location id")),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse),
        (status = 409, description = "Location still referenced", body = crate::errors::ErrorResponse)
    ),
    tag = "locations"
)]
pub async fn delete_location(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .locations
        .delete_location(&actor, id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_locations).post(create_location))
        .route("/locations/:id", axum::routing::delete(delete_location))
}
