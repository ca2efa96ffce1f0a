mod common;

use assert_matches::assert_matches;

use common::{admin, seed_item, seed_vendor, TestApp};
use simlab_inventory_api::{
    entities::PurchaseOrderStatus,
    errors::ServiceError,
    ledger::FulfillmentState,
    services::purchase_orders::{CreatePurchaseOrderInput, CreatePurchaseOrderLineInput},
};

#[tokio::test]
async fn orders_are_numbered_sequentially() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-NUM", 0).await;
    let vendor = seed_vendor(&app, "Acme Medical").await;
    let actor = admin();

    let input = |qty| CreatePurchaseOrderInput {
        vendor_id: vendor.id,
        lines: vec![CreatePurchaseOrderLineInput {
            item_id: item.id,
            qty_ordered: qty,
            unit_price: None,
        }],
    };

    let first = app
        .services()
        .purchase_orders
        .create_purchase_order(&actor, input(5))
        .await
        .unwrap();
    let second = app
        .services()
        .purchase_orders
        .create_purchase_order(&actor, input(7))
        .await
        .unwrap();

    assert_eq!(first.purchase_order.po_number, 1);
    assert_eq!(second.purchase_order.po_number, 2);
    assert_eq!(first.purchase_order.status, PurchaseOrderStatus::Draft);
    assert_eq!(first.ordered_total, 5);
    assert_eq!(first.received_total, 0);
    assert_eq!(first.fulfillment, FulfillmentState::Unfulfilled);
}

#[tokio::test]
async fn lifecycle_is_monotonic() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-LIFE", 0).await;
    let vendor = seed_vendor(&app, "Acme Medical").await;
    let actor = admin();

    let po = app
        .services()
        .purchase_orders
        .create_purchase_order(
            &actor,
            CreatePurchaseOrderInput {
                vendor_id: vendor.id,
                lines: vec![CreatePurchaseOrderLineInput {
                    item_id: item.id,
                    qty_ordered: 5,
                    unit_price: None,
                }],
            },
        )
        .await
        .unwrap();
    let po_id = po.purchase_order.id;

    // Closing a draft has no shortcut path.
    let err = app
        .services()
        .purchase_orders
        .close(&actor, po_id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));

    let opened = app
        .services()
        .purchase_orders
        .approve(&actor, po_id)
        .await
        .unwrap();
    assert_eq!(opened.purchase_order.status, PurchaseOrderStatus::Open);

    // Approving twice fails; the order is no longer a draft.
    let err = app
        .services()
        .purchase_orders
        .approve(&actor, po_id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));

    let closed = app
        .services()
        .purchase_orders
        .close(&actor, po_id)
        .await
        .unwrap();
    assert_eq!(closed.purchase_order.status, PurchaseOrderStatus::Closed);

    // No reopen path.
    let err = app
        .services()
        .purchase_orders
        .approve(&actor, po_id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));
}

#[tokio::test]
async fn empty_or_nonpositive_lines_are_rejected() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-VALID", 0).await;
    let vendor = seed_vendor(&app, "Acme Medical").await;
    let actor = admin();

    let err = app
        .services()
        .purchase_orders
        .create_purchase_order(
            &actor,
            CreatePurchaseOrderInput {
                vendor_id: vendor.id,
                lines: vec![],
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));

    let err = app
        .services()
        .purchase_orders
        .create_purchase_order(
            &actor,
            CreatePurchaseOrderInput {
                vendor_id: vendor.id,
                lines: vec![CreatePurchaseOrderLineInput {
                    item_id: item.id,
                    qty_ordered: 0,
                    unit_price: None,
                }],
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn unknown_vendor_or_item_is_not_found() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-REFS", 0).await;
    let vendor = seed_vendor(&app, "Acme Medical").await;
    let actor = admin();

    let err = app
        .services()
        .purchase_orders
        .create_purchase_order(
            &actor,
            CreatePurchaseOrderInput {
                vendor_id: uuid::Uuid::new_v4(),
                lines: vec![CreatePurchaseOrderLineInput {
                    item_id: item.id,
                    qty_ordered: 1,
                    unit_price: None,
                }],
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    let err = app
        .services()
        .purchase_orders
        .create_purchase_order(
            &actor,
            CreatePurchaseOrderInput {
                vendor_id: vendor.id,
                lines: vec![CreatePurchaseOrderLineInput {
                    item_id: uuid::Uuid::new_v4(),
                    qty_ordered: 1,
                    unit_price: None,
                }],
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn list_filters_by_status() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-LIST", 0).await;
    let vendor = seed_vendor(&app, "Acme Medical").await;
    let actor = admin();

    let input = || CreatePurchaseOrderInput {
        vendor_id: vendor.id,
        lines: vec![CreatePurchaseOrderLineInput {
            item_id: item.id,
            qty_ordered: 3,
            unit_price: None,
        }],
    };

    let first = app
        .services()
        .purchase_orders
        .create_purchase_order(&actor, input())
        .await
        .unwrap();
    app.services()
        .purchase_orders
        .create_purchase_order(&actor, input())
        .await
        .unwrap();
    app.services()
        .purchase_orders
        .approve(&actor, first.purchase_order.id)
        .await
        .unwrap();

    let (open, total_open) = app
        .services()
        .purchase_orders
        .list_purchase_orders(1, 20, Some(PurchaseOrderStatus::Open))
        .await
        .unwrap();
    assert_eq!(total_open, 1);
    assert_eq!(open[0].id, first.purchase_order.id);

    let (all, total) = app
        .services()
        .purchase_orders
        .list_purchase_orders(1, 20, None)
        .await
        .unwrap();
    assert_eq!(total, 2);
    // Newest first by number.
    assert_eq!(all[0].po_number, 2);
}
