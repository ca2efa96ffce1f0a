#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use uuid::Uuid;

use simlab_inventory_api::{
    auth::{AuthContext, Claims, Role},
    config::AppConfig,
    db,
    entities::{item, location, vendor},
    events,
    handlers::AppServices,
    services::{catalog::CreateItemInput, vendors::CreateVendorInput},
    AppState,
};

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_purposes_only_32chars";

/// Test harness backed by a private in-memory SQLite database. Each harness
/// gets its own named shared-cache database so concurrently running tests
/// never observe each other's rows; the single pooled connection keeps the
/// database alive for the harness lifetime.
pub struct TestApp {
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_name = Uuid::new_v4().simple().to_string();
        let mut cfg = AppConfig::new(
            format!("sqlite:file:{db_name}?mode=memory&cache=shared"),
            TEST_JWT_SECRET.to_string(),
            "127.0.0.1".to_string(),
            18_080,
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to open test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");
        let db = Arc::new(pool);

        let (event_sender, event_rx) = events::channel();
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db.clone(), Some(event_sender.clone()));

        let state = AppState {
            db,
            config: cfg,
            event_sender,
            services,
        };

        Self {
            state,
            _event_task: event_task,
        }
    }

    pub fn services(&self) -> &AppServices {
        &self.state.services
    }
}

pub fn admin() -> AuthContext {
    AuthContext {
        user_id: Uuid::new_v4(),
        role: Role::Admin,
    }
}

pub fn staff() -> AuthContext {
    AuthContext {
        user_id: Uuid::new_v4(),
        role: Role::Staff,
    }
}

/// Mint a bearer token the way the identity provider would.
pub fn token_for(role: Role) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: Uuid::new_v4(),
        role,
        iat: now,
        exp: now + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode test token")
}

pub async fn seed_item(app: &TestApp, sku: &str, min_stock: i64) -> item::Model {
    seed_priced_item(app, sku, min_stock, None).await
}

pub async fn seed_priced_item(
    app: &TestApp,
    sku: &str,
    min_stock: i64,
    unit_price: Option<Decimal>,
) -> item::Model {
    app.services()
        .catalog
        .create_item(
            &admin(),
            CreateItemInput {
                sku: sku.to_string(),
                barcode: None,
                name: format!("Item {sku}"),
                min_stock,
                max_stock: 0,
                unit_price,
            },
        )
        .await
        .expect("failed to seed item")
}

pub async fn seed_location(app: &TestApp, name: &str) -> location::Model {
    app.services()
        .locations
        .create_location(&admin(), name.to_string())
        .await
        .expect("failed to seed location")
}

pub async fn seed_vendor(app: &TestApp, name: &str) -> vendor::Model {
    app.services()
        .vendors
        .create_vendor(
            &admin(),
            CreateVendorInput {
                name: name.to_string(),
                contact_name: None,
                contact_email: None,
                contact_phone: None,
            },
        )
        .await
        .expect("failed to seed vendor")
}
