use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{created_response, map_service_error, success_response, validate_input, Paginated};
use crate::{
    auth::AuthenticatedUser,
    entities::AdjustmentReason,
    errors::ApiError,
    handlers::AppState,
    services::adjustments::RecordAdjustmentInput,
};

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RecordAdjustmentRequest {
    pub item_id: Uuid,
    pub location_id: Uuid,
    /// Signed quantity as entered; the stored sign follows the reason's
    /// normalization policy.
    pub quantity: i64,
    pub reason: AdjustmentReason,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AdjustmentListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub since: Option<DateTime<Utc>>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

/// Record a manual stock adjustment
#[utoipa::path(
    post,
    path = "/api/v1/adjustments",
    request_body = RecordAdjustmentRequest,
    responses(
        (status = 201, description = "Adjustment recorded", body = serde_json::Value),
        (status = 400, description = "Invalid input", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown item or location", body = crate::errors::ErrorResponse)
    ),
    tag = "adjustments"
)]
pub async fn record_adjustment(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<RecordAdjustmentRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;

    let adjustment = state
        .services
        .adjustments
        .record_adjustment(
            &actor,
            RecordAdjustmentInput {
                item_id: payload.item_id,
                location_id: payload.location_id,
                quantity: payload.quantity,
                reason: payload.reason,
            },
        )
        .await
        .map_err(map_service_error)?;

    Ok(created_response(adjustment))
}

/// Recent adjustments, newest first
#[utoipa::path(
    get,
    path = "/api/v1/adjustments",
    params(AdjustmentListParams),
    responses((status = 200, description = "Adjustments page", body = serde_json::Value)),
    tag = "adjustments"
)]
pub async fn list_adjustments(
    State(state): State<AppState>,
    Query(params): Query<AdjustmentListParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (records, total) = state
        .services
        .adjustments
        .list_adjustments(params.page, params.per_page, params.since)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(Paginated {
        items: records,
        total,
        page: params.page,
        per_page: params.per_page,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/adjustments",
        get(list_adjustments).post(record_adjustment),
    )
}
