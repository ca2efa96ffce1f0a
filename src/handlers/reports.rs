use axum::{
    extract::{Query, State},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::common::{map_service_error, success_response};
use crate::{
    auth::AuthenticatedUser, errors::ApiError, handlers::AppState, services::reports::UsageFilter,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct UsageReportParams {
    pub location_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Items below their minimum stock threshold
#[utoipa::path(
    get,
    path = "/api/v1/reports/low-stock",
    responses(
        (status = 200, description = "Low stock rows", body = serde_json::Value),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn low_stock(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let rows = state
        .services
        .reports
        .low_stock(&actor)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

/// Consumption per (item, location), optionally filtered
#[utoipa::path(
    get,
    path = "/api/v1/reports/item-usage",
    params(UsageReportParams),
    responses(
        (status = 200, description = "Usage rows", body = serde_json::Value),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn item_usage(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Query(params): Query<UsageReportParams>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let rows = state
        .services
        .reports
        .item_usage(
            &actor,
            UsageFilter {
                location_id: params.location_id,
                from: params.from,
                to: params.to,
            },
        )
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

/// On-hand quantities priced at unit price
#[utoipa::path(
    get,
    path = "/api/v1/reports/stock-valuation",
    responses(
        (status = 200, description = "Valuation rows", body = serde_json::Value),
        (status = 403, description = "Missing capability", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn stock_valuation(
    State(state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let rows = state
        .services
        .reports
        .stock_valuation(&actor)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reports/low-stock", get(low_stock))
        .route("/reports/item-usage", get(item_usage))
        .route("/reports/stock-valuation", get(stock_valuation))
}
