mod common;

use assert_matches::assert_matches;

use common::{admin, seed_item, seed_location, seed_vendor, staff, TestApp};
use simlab_inventory_api::{
    entities::AdjustmentReason,
    errors::ServiceError,
    services::{
        adjustments::RecordAdjustmentInput,
        catalog::CreateItemInput,
        purchase_orders::{CreatePurchaseOrderInput, CreatePurchaseOrderLineInput},
        vendors::CreateVendorInput,
    },
};

#[tokio::test]
async fn staff_cannot_manage_the_catalog() {
    let app = TestApp::new().await;
    let actor = staff();

    let err = app
        .services()
        .catalog
        .create_item(
            &actor,
            CreateItemInput {
                sku: "SKU-DENY".to_string(),
                barcode: None,
                name: "Denied".to_string(),
                min_stock: 0,
                max_stock: 0,
                unit_price: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Forbidden(_));

    let err = app
        .services()
        .locations
        .create_location(&actor, "Denied".to_string())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Forbidden(_));

    let err = app
        .services()
        .vendors
        .create_vendor(
            &actor,
            CreateVendorInput {
                name: "Denied".to_string(),
                contact_name: None,
                contact_email: None,
                contact_phone: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Forbidden(_));

    // Denial leaves no trace behind.
    let (items, total) = app.services().catalog.list_items(1, 20).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(total, 0);
}

#[tokio::test]
async fn staff_cannot_manage_purchase_orders() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-PO", 0).await;
    let vendor = seed_vendor(&app, "Acme Medical").await;

    let err = app
        .services()
        .purchase_orders
        .create_purchase_order(
            &staff(),
            CreatePurchaseOrderInput {
                vendor_id: vendor.id,
                lines: vec![CreatePurchaseOrderLineInput {
                    item_id: item.id,
                    qty_ordered: 1,
                    unit_price: None,
                }],
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Forbidden(_));

    let po = app
        .services()
        .purchase_orders
        .create_purchase_order(
            &admin(),
            CreatePurchaseOrderInput {
                vendor_id: vendor.id,
                lines: vec![CreatePurchaseOrderLineInput {
                    item_id: item.id,
                    qty_ordered: 1,
                    unit_price: None,
                }],
            },
        )
        .await
        .unwrap();

    let err = app
        .services()
        .purchase_orders
        .approve(&staff(), po.purchase_order.id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Forbidden(_));
}

#[tokio::test]
async fn staff_can_adjust_receive_and_report() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-OK", 0).await;
    let location = seed_location(&app, "Main Store").await;
    let actor = staff();

    app.services()
        .adjustments
        .record_adjustment(
            &actor,
            RecordAdjustmentInput {
                item_id: item.id,
                location_id: location.id,
                quantity: 5,
                reason: AdjustmentReason::Correction,
            },
        )
        .await
        .unwrap();

    assert!(app.services().reports.low_stock(&actor).await.is_ok());
    assert!(app
        .services()
        .reports
        .stock_valuation(&actor)
        .await
        .is_ok());
}
