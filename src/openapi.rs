use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SimLab Inventory API",
        version = "0.1.0",
        description = r#"
Inventory management for simulation-lab consumables: item catalog,
multi-location stock ledger, purchase-order receiving, and reports.

All stock movements are rows in an append-only adjustment log; on-hand
quantities are a projection maintained transactionally alongside it.

Mutating endpoints require a bearer token:

```
Authorization: Bearer <jwt>
```
"#
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "items", description = "Catalog item endpoints"),
        (name = "locations", description = "Stock location endpoints"),
        (name = "vendors", description = "Vendor endpoints"),
        (name = "inventory", description = "On-hand levels and projection maintenance"),
        (name = "adjustments", description = "Stock adjustment log"),
        (name = "purchase-orders", description = "Purchase order lifecycle and receiving"),
        (name = "reports", description = "Aggregated reports over the adjustment log"),
        (name = "health", description = "Health check")
    ),
    paths(
        crate::handlers::items::create_item,
        crate::handlers::items::list_items,
        crate::handlers::items::get_item,
        crate::handlers::items::update_item,
        crate::handlers::items::delete_item,

        crate::handlers::locations::create_location,
        crate::handlers::locations::list_locations,
        crate::handlers::locations::delete_location,

        crate::handlers::vendors::create_vendor,
        crate::handlers::vendors::list_vendors,
        crate::handlers::vendors::delete_vendor,

        crate::handlers::inventory::list_levels,
        crate::handlers::inventory::verify_projection,
        crate::handlers::inventory::rebuild_projection,

        crate::handlers::adjustments::record_adjustment,
        crate::handlers::adjustments::list_adjustments,

        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::approve_purchase_order,
        crate::handlers::purchase_orders::close_purchase_order,
        crate::handlers::purchase_orders::receiving_plan,
        crate::handlers::purchase_orders::receive,

        crate::handlers::reports::low_stock,
        crate::handlers::reports::item_usage,
        crate::handlers::reports::stock_valuation,

        crate::handlers::health::health,
    ),
    components(
        schemas(
            crate::handlers::items::CreateItemRequest,
            crate::handlers::items::UpdateItemRequest,
            crate::handlers::locations::CreateLocationRequest,
            crate::handlers::vendors::CreateVendorRequest,
            crate::handlers::adjustments::RecordAdjustmentRequest,
            crate::handlers::purchase_orders::CreatePurchaseOrderRequest,
            crate::handlers::purchase_orders::CreatePurchaseOrderLineRequest,
            crate::handlers::purchase_orders::ReceiveRequest,
            crate::handlers::purchase_orders::ReceiveLineRequest,
            crate::entities::AdjustmentReason,
            crate::entities::PurchaseOrderStatus,
            crate::services::reports::LowStockRow,
            crate::services::reports::ItemUsageRow,
            crate::services::reports::StockValuationRow,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
