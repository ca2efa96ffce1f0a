use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{created_response, map_service_error, success_response, validate_input, Paginated};
use crate::{
    auth::AuthenticatedUser,
    entities::PurchaseOrderStatus,
    errors::ApiError,
    handlers::AppState,
    services::{
        purchase_orders::{CreatePurchaseOrderInput, CreatePurchaseOrderLineInput},
        receiving::ReceiveLineInput,
    },
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePurchaseOrderRequest {
    pub vendor_id: Uuid,
    #[validate(length(min = 1))]
    pub lines: Vec<CreatePurchaseOrderLineRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePurchaseOrderLineRequest {
    pub item_id: Uuid,
    pub qty_ordered: i64,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReceiveRequest {
    #[validate(length(min = 1))]
    pub lines: Vec<ReceiveLineRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReceiveLineRequest {
    pub po_line_id: Uuid,
    pub quantity: i64,
    pub location_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PurchaseOrderListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub status: Option<PurchaseOrderStatus>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

/// Create a purchase order in draft
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders",
    request_body = CreatePurchaseOrderRequest,
    responses(
        (status = 201, description = "Purchase order created", body = serde_json::Value),
        (status = 400, description = "Invalid lines", body = crate::errors::ErrorResponse),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn create_purchase_order(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let view = state
        .services
        .purchase_orders
        .create_purchase_order(
            &actor,
            CreatePurchaseOrderInput {
                vendor_id: payload.vendor_id,
                lines: payload
                    .lines
                    .into_iter()
                    .map(|l| CreatePurchaseOrderLineInput {
                        item_id: l.item_id,
                        qty_ordered: l.qty_ordered,
                        unit_price: l.unit_price,
                    })
                    .collect(),
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(created_response(view))
}

/// List purchase orders, newest first
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders",
    params(PurchaseOrderListParams),
    responses((status = 200, description = "Purchase orders page", body = serde_json::Value)),
    tag = "purchase-orders"
)]
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(params): Query<PurchaseOrderListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (orders, total) = state
        .services
        .purchase_orders
        .list_purchase_orders(params.page, params.per_page, params.status)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(Paginated {
        items: orders,
        total,
        page: params.page,
        per_page: params.per_page,
    }))
}

/// Fetch one purchase order with lines and fulfillment state
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{id}",
    params(("id" = Uuid, Path, description = "Purchase order id")),
    responses(
        (status = 200, description = "Purchase order", body = serde_json::Value),
        (status = 404, description = "Unknown purchase order", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn get_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let view = state
        .services
        .purchase_orders
        .get_purchase_order(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// Approve a draft purchase order (draft -> open)
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/approve",
    params(("id" = Uuid, Path, description = "Purchase order id")),
    responses(
        (status = 200, description = "Purchase order approved", body = serde_json::Value),
        (status = 400, description = "Not in draft", body = crate::errors::ErrorResponse),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn approve_purchase_order(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let view = state
        .services
        .purchase_orders
        .approve(&actor, id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// Close an open purchase order (open -> closed)
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/close",
    params(("id" = Uuid, Path, description = "Purchase order id")),
    responses(
        (status = 200, description = "Purchase order closed", body = serde_json::Value),
        (status = 400, description = "Not open", body = crate::errors::ErrorResponse),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn close_purchase_order(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let view = state
        .services
        .purchase_orders
        .close(&actor, id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// The receiving working set: lines with pending quantities
#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/{id}/receiving-plan",
    params(("id" = Uuid, Path, description = "Purchase order id")),
    responses(
        (status = 200, description = "Receiving plan", body = serde_json::Value),
        (status = 404, description = "Unknown purchase order", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn receiving_plan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let view = state
        .services
        .receiving
        .receiving_plan(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(view))
}

/// Receive quantities against an open purchase order as one atomic batch
#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/{id}/receive",
    params(("id" = Uuid, Path, description = "Purchase order id")),
    request_body = ReceiveRequest,
    responses(
        (status = 200, description = "Batch committed", body = serde_json::Value),
        (status = 400, description = "Order not open or foreign line", body = crate::errors::ErrorResponse),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown order or line", body = crate::errors::ErrorResponse)
    ),
    tag = "purchase-orders"
)]
pub async fn receive(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReceiveRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let result = state
        .services
        .receiving
        .receive(
            &actor,
            id,
            payload
                .lines
                .into_iter()
                .map(|l| ReceiveLineInput {
                    po_line_id: l.po_line_id,
                    quantity: l.quantity,
                    location_id: l.location_id,
                })
                .collect(),
        )
        .await
        .map_err(map_service_error)?;

    Ok(success_response(result))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/purchase-orders",
            get(list_purchase_orders).post(create_purchase_order),
        )
        .route("/purchase-orders/:id", get(get_purchase_order))
        .route("/purchase-orders/:id/approve", post(approve_purchase_order))
        .route("/purchase-orders/:id/close", post(close_purchase_order))
        .route("/purchase-orders/:id/receiving-plan", get(receiving_plan))
        .route("/purchase-orders/:id/receive", post(receive))
}
