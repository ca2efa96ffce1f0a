use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    Paginated, PaginationParams,
};
use crate::{
    auth::AuthenticatedUser,
    errors::ApiError,
    handlers::AppState,
    services::catalog::{CreateItemInput, UpdateItemInput},
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(min = 1))]
    pub sku: String,
    pub barcode: Option<String>,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub min_stock: i64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub max_stock: i64,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateItemRequest {
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub min_stock: Option<i64>,
    #[validate(range(min = 0))]
    pub max_stock: Option<i64>,
    pub unit_price: Option<Decimal>,
}

/// Create a catalog item
#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = serde_json::Value),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate SKU", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<CreateItemRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let item = state
        .services
        .catalog
        .create_item(
            &actor,
            CreateItemInput {
                sku: payload.sku,
                barcode: payload.barcode,
                name: payload.name,
                min_stock: payload.min_stock,
                max_stock: payload.max_stock,
                unit_price: payload.unit_price,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(created_response(item))
}

/// List catalog items
#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(PaginationParams),
    responses((status = 200, description = "Items page", body = serde_json::Value)),
    tag = "items"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (items, total) = state
        .services
        .catalog
        .list_items(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(Paginated {
        items,
        total,
        page: pagination.page,
        per_page: pagination.per_page,
    }))
}

/// Fetch one item
#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item", body = serde_json::Value),
        (status = 404, description = "Unknown item", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let item = state
        .services
        .catalog
        .get_item(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(item))
}

/// Update an item
#[utoipa::path(
    put,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = serde_json::Value),
        (status = 404, description = "Unknown item", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let item = state
        .services
        .catalog
        .update_item(
            &actor,
            id,
            UpdateItemInput {
                sku: payload.sku,
                barcode: payload.barcode.map(Some),
                name: payload.name,
                min_stock: payload.min_stock,
                max_stock: payload.max_stock,
                unit_price: payload.unit_price.map(Some),
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(item))
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = Uuid, Path, description = "Item id")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse),
        (status = 409, description = "Item still referenced", body = crate::errors::ErrorResponse)
    ),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .catalog
        .delete_item(&actor, id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", get(get_item).put(update_item).delete(delete_item))
}
