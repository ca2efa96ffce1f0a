pub mod adjustments;
pub mod common;
pub mod health;
pub mod inventory;
pub mod items;
pub mod locations;
pub mod purchase_orders;
pub mod reports;
pub mod vendors;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<crate::services::catalog::CatalogService>,
    pub locations: Arc<crate::services::locations::LocationService>,
    pub vendors: Arc<crate::services::vendors::VendorService>,
    pub inventory: Arc<crate::services::inventory::InventoryService>,
    pub adjustments: Arc<crate::services::adjustments::AdjustmentService>,
    pub purchase_orders: Arc<crate::services::purchase_orders::PurchaseOrderService>,
    pub receiving: Arc<crate::services::receiving::ReceivingService>,
    pub reports: Arc<crate::services::reports::ReportService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        let catalog = Arc::new(crate::services::catalog::CatalogService::new(
            db.clone(),
            event_sender.clone(),
        ));
        let locations = Arc::new(crate::services::locations::LocationService::new(
            db.clone(),
            event_sender.clone(),
        ));
        let vendors = Arc::new(crate::services::vendors::VendorService::new(
            db.clone(),
            event_sender.clone(),
        ));
        let inventory = Arc::new(crate::services::inventory::InventoryService::new(
            db.clone(),
            event_sender.clone(),
        ));
        let adjustments = Arc::new(crate::services::adjustments::AdjustmentService::new(
            db.clone(),
            event_sender.clone(),
        ));
        let purchase_orders = Arc::new(crate::services::purchase_orders::PurchaseOrderService::new(
            db.clone(),
            event_sender.clone(),
        ));
        let receiving = Arc::new(crate::services::receiving::ReceivingService::new(
            db.clone(),
            purchase_orders.clone(),
            event_sender,
        ));
        let reports = Arc::new(crate::services::reports::ReportService::new(db));

        Self {
            catalog,
            locations,
            vendors,
            inventory,
            adjustments,
            purchase_orders,
            receiving,
            reports,
        }
    }
}
