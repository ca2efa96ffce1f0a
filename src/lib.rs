//! SimLab Inventory API Library
//!
//! Catalog, stock ledger, purchase-order receiving, and reporting for
//! simulation-lab consumables. Every stock movement is an append-only
//! adjustment row; on-hand quantities are a projection of that log.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod ledger;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: events::EventSender,
    pub services: handlers::AppServices,
}

/// All versioned API routes, to be nested under `/api/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(handlers::items::router())
        .merge(handlers::locations::router())
        .merge(handlers::vendors::router())
        .merge(handlers::inventory::router())
        .merge(handlers::adjustments::router())
        .merge(handlers::purchase_orders::router())
        .merge(handlers::reports::router())
}

/// The full application router: health, versioned API, and Swagger UI.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(handlers::health::router())
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
