use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::common::{map_service_error, success_response};
use crate::{auth::AuthenticatedUser, errors::ApiError, handlers::AppState};

/// Current on-hand quantities per (item, location) pair
#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    responses((status = 200, description = "Inventory levels", body = serde_json::Value)),
    tag = "inventory"
)]
pub async fn list_levels(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let levels = state
        .services
        .inventory
        .list_levels()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(levels))
}

/// Pairs whose projection drifted from the ledger fold
#[utoipa::path(
    get,
    path = "/api/v1/inventory/verify",
    responses((status = 200, description = "Projection drift report", body = serde_json::Value)),
    tag = "inventory"
)]
pub async fn verify_projection(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let drift = state
        .services
        .inventory
        .verify_projection()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(drift))
}

/// Recompute the projection from the adjustment log
#[utoipa::path(
    post,
    path = "/api/v1/inventory/rebuild",
    responses(
        (status = 200, description = "Projection rebuilt", body = serde_json::Value),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn rebuild_projection(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let pairs = state
        .services
        .inventory
        .rebuild_projection(&actor)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(json!({ "pairs": pairs })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inventory", get(list_levels))
        .route("/inventory/verify", get(verify_projection))
        .route("/inventory/rebuild", post(rebuild_projection))
}
