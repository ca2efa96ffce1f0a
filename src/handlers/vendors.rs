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
use crate::{
    auth::AuthenticatedUser, errors::ApiError, handlers::AppState,
    services::vendors::CreateVendorInput,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateVendorRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub contact_name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Create a vendor
#[utoipa::path(
    post,
    path = "/api/v1/vendors",
    request_body = CreateVendorRequest,
    responses(
        (status = 201, description = "Vendor created", body = serde_json::Value),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn create_vendor(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<CreateVendorRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let vendor = state
        .services
        .vendors
        .create_vendor(
            &actor,
            CreateVendorInput {
                name: payload.name,
                contact_name: payload.contact_name,
                contact_email: payload.contact_email,
                contact_phone: payload.contact_phone,
            },
        )
        .await
        .map_err(map_service_error)?;
    Ok(created_response(vendor))
}

/// List vendors
#[utoipa::path(
    get,
    path = "/api/v1/vendors",
    responses((status = 200, description = "Vendors", body = serde_json::Value)),
    tag = "vendors"
)]
pub async fn list_vendors(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let vendors = state
        .services
        .vendors
        .list_vendors()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(vendors))
}

/// Delete a vendor
#[utoipa::path(
    delete,
    path = "/api/v1/vendors/{id}",
    params(("id" = Uuid, Path, description = "Vendor id")),
    responses(
        (status = 204, description = "Vendor deleted"),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse),
        (status = 409, description = "Vendor still referenced", body = crate::errors::ErrorResponse)
    ),
    tag = "vendors"
)]
pub async fn delete_vendor(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .vendors
        .delete_vendor(&actor, id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/vendors", get(list_vendors).post(create_vendor))
        .route("/vendors/:id", axum::routing::delete(delete_vendor))
}
