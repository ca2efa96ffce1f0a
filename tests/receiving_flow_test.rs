mod common;

use assert_matches::assert_matches;
use uuid::Uuid;

use common::{admin, seed_item, seed_location, seed_vendor, staff, TestApp};
use simlab_inventory_api::{
    entities::{AdjustmentReason, PurchaseOrderStatus},
    errors::ServiceError,
    services::{
        purchase_orders::{CreatePurchaseOrderInput, CreatePurchaseOrderLineInput},
        receiving::ReceiveLineInput,
    },
};

async fn open_po(
    app: &TestApp,
    vendor_id: Uuid,
    lines: Vec<(Uuid, i64)>,
) -> simlab_inventory_api::services::purchase_orders::PurchaseOrderView {
    let actor = admin();
    let po = app
        .services()
        .purchase_orders
        .create_purchase_order(
            &actor,
            CreatePurchaseOrderInput {
                vendor_id,
                lines: lines
                    .into_iter()
                    .map(|(item_id, qty_ordered)| CreatePurchaseOrderLineInput {
                        item_id,
                        qty_ordered,
                        unit_price: None,
                    })
                    .collect(),
            },
        )
        .await
        .unwrap();
    app.services()
        .purchase_orders
        .approve(&actor, po.purchase_order.id)
        .await
        .unwrap()
}

#[tokio::test]
async fn partial_receive_writes_one_adjustment_per_nonzero_line() {
    let app = TestApp::new().await;
    let item_a = seed_item(&app, "SKU-A", 0).await;
    let item_b = seed_item(&app, "SKU-B", 0).await;
    let location = seed_location(&app, "Main Store").await;
    let vendor = seed_vendor(&app, "Acme Medical").await;

    let po = open_po(&app, vendor.id, vec![(item_a.id, 10), (item_b.id, 5)]).await;
    let line_a = po.lines[0].line.clone();
    let line_b = po.lines[1].line.clone();

    let result = app
        .services()
        .receiving
        .receive(
            &staff(),
            po.purchase_order.id,
            vec![
                ReceiveLineInput {
                    po_line_id: line_a.id,
                    quantity: 3,
                    location_id: Some(location.id),
                },
                ReceiveLineInput {
                    po_line_id: line_b.id,
                    quantity: 0,
                    location_id: Some(location.id),
                },
            ],
        )
        .await
        .unwrap();

    // Only the non-zero line produced a ledger entry.
    assert_eq!(result.adjustments.len(), 1);
    let entry = &result.adjustments[0];
    assert_eq!(entry.change, 3);
    assert_eq!(entry.reason, AdjustmentReason::Receive);
    assert_eq!(entry.po_id, Some(po.purchase_order.id));
    assert_eq!(entry.po_line_id, Some(line_a.id));

    let view = &result.purchase_order;
    assert_eq!(view.received_total, 3);
    assert_eq!(view.lines[0].line.qty_received, 3);
    assert_eq!(view.lines[0].pending, 7);
    assert_eq!(view.lines[1].line.qty_received, 0);

    let on_hand = app
        .services()
        .inventory
        .level_for(item_a.id, location.id)
        .await
        .unwrap();
    assert_eq!(on_hand, 3);
}

#[tokio::test]
async fn receive_clamps_to_pending() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-CLAMP", 0).await;
    let location = seed_location(&app, "Main Store").await;
    let vendor = seed_vendor(&app, "Acme Medical").await;

    let po = open_po(&app, vendor.id, vec![(item.id, 4)]).await;
    let line = po.lines[0].line.clone();

    let result = app
        .services()
        .receiving
        .receive(
            &staff(),
            po.purchase_order.id,
            vec![ReceiveLineInput {
                po_line_id: line.id,
                quantity: 99,
                location_id: Some(location.id),
            }],
        )
        .await
        .unwrap();

    assert_eq!(result.adjustments[0].change, 4);
    assert_eq!(result.purchase_order.lines[0].line.qty_received, 4);
    assert_eq!(result.purchase_order.lines[0].pending, 0);

    // A second over-receive finds nothing pending and records nothing.
    let again = app
        .services()
        .receiving
        .receive(
            &staff(),
            po.purchase_order.id,
            vec![ReceiveLineInput {
                po_line_id: line.id,
                quantity: 1,
                location_id: Some(location.id),
            }],
        )
        .await
        .unwrap();
    assert!(again.adjustments.is_empty());
    assert_eq!(again.purchase_order.received_total, 4);
}

#[tokio::test]
async fn missing_location_falls_back_to_first_by_name() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-DEFAULT", 0).await;
    // "Annex" sorts before "Main Store" and becomes the fallback.
    let annex = seed_location(&app, "Annex").await;
    seed_location(&app, "Main Store").await;
    let vendor = seed_vendor(&app, "Acme Medical").await;

    let po = open_po(&app, vendor.id, vec![(item.id, 5)]).await;
    let line = po.lines[0].line.clone();

    let result = app
        .services()
        .receiving
        .receive(
            &staff(),
            po.purchase_order.id,
            vec![ReceiveLineInput {
                po_line_id: line.id,
                quantity: 2,
                location_id: None,
            }],
        )
        .await
        .unwrap();

    assert_eq!(result.adjustments.len(), 1);
    assert_eq!(result.adjustments[0].location_id, annex.id);
}

#[tokio::test]
async fn foreign_line_rolls_back_the_whole_batch() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-ATOMIC", 0).await;
    let location = seed_location(&app, "Main Store").await;
    let vendor = seed_vendor(&app, "Acme Medical").await;

    let po_a = open_po(&app, vendor.id, vec![(item.id, 10)]).await;
    let po_b = open_po(&app, vendor.id, vec![(item.id, 10)]).await;
    let line_a = po_a.lines[0].line.clone();
    let line_b = po_b.lines[0].line.clone();

    // First line is valid, second belongs to a different order. Nothing may
    // commit.
    let err = app
        .services()
        .receiving
        .receive(
            &staff(),
            po_a.purchase_order.id,
            vec![
                ReceiveLineInput {
                    po_line_id: line_a.id,
                    quantity: 5,
                    location_id: Some(location.id),
                },
                ReceiveLineInput {
                    po_line_id: line_b.id,
                    quantity: 5,
                    location_id: Some(location.id),
                },
            ],
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));

    let on_hand = app
        .services()
        .inventory
        .level_for(item.id, location.id)
        .await
        .unwrap();
    assert_eq!(on_hand, 0);

    let view = app
        .services()
        .purchase_orders
        .get_purchase_order(po_a.purchase_order.id)
        .await
        .unwrap();
    assert_eq!(view.received_total, 0);

    let drift = app.services().inventory.verify_projection().await.unwrap();
    assert!(drift.is_empty());
}

#[tokio::test]
async fn receiving_requires_an_open_order() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-DRAFT", 0).await;
    let location = seed_location(&app, "Main Store").await;
    let vendor = seed_vendor(&app, "Acme Medical").await;
    let actor = admin();

    let draft = app
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
    assert_eq!(draft.purchase_order.status, PurchaseOrderStatus::Draft);

    let err = app
        .services()
        .receiving
        .receive(
            &staff(),
            draft.purchase_order.id,
            vec![ReceiveLineInput {
                po_line_id: draft.lines[0].line.id,
                quantity: 1,
                location_id: Some(location.id),
            }],
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidOperation(_));
}

#[tokio::test]
async fn receiving_plan_matches_stored_order() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-PLAN", 0).await;
    let location = seed_location(&app, "Main Store").await;
    let vendor = seed_vendor(&app, "Acme Medical").await;

    let po = open_po(&app, vendor.id, vec![(item.id, 8)]).await;
    app.services()
        .receiving
        .receive(
            &staff(),
            po.purchase_order.id,
            vec![ReceiveLineInput {
                po_line_id: po.lines[0].line.id,
                quantity: 3,
                location_id: Some(location.id),
            }],
        )
        .await
        .unwrap();

    let plan = app
        .services()
        .receiving
        .receiving_plan(po.purchase_order.id)
        .await
        .unwrap();
    assert_eq!(plan.lines[0].pending, 5);
    assert_eq!(plan.lines[0].line.qty_received, 3);
    assert_eq!(plan.received_total, 3);
}
