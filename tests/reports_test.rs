mod common;

use rust_decimal_macros::dec;

use common::{seed_item, seed_location, seed_priced_item, staff, TestApp};
use simlab_inventory_api::{
    entities::AdjustmentReason,
    services::{adjustments::RecordAdjustmentInput, reports::UsageFilter},
};

async fn adjust(
    app: &TestApp,
    item_id: uuid::Uuid,
    location_id: uuid::Uuid,
    quantity: i64,
    reason: AdjustmentReason,
) {
    app.services()
        .adjustments
        .record_adjustment(
            &staff(),
            RecordAdjustmentInput {
                item_id,
                location_id,
                quantity,
                reason,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn low_stock_flags_items_below_their_threshold() {
    let app = TestApp::new().await;
    let gloves = seed_item(&app, "GLOVES", 10).await;
    let gauze = seed_item(&app, "GAUZE", 10).await;
    let never_stocked = seed_item(&app, "SYRINGE", 3).await;
    let location = seed_location(&app, "Main Store").await;
    let actor = staff();

    // Gloves: +20 received, -15 used -> 5 on hand, below threshold 10.
    adjust(&app, gloves.id, location.id, 20, AdjustmentReason::Correction).await;
    adjust(&app, gloves.id, location.id, 15, AdjustmentReason::Usage).await;
    // Gauze: comfortably stocked.
    adjust(&app, gauze.id, location.id, 50, AdjustmentReason::Correction).await;

    let rows = app.services().reports.low_stock(&actor).await.unwrap();

    let flagged: Vec<&str> = rows.iter().map(|r| r.sku.as_str()).collect();
    assert!(flagged.contains(&"GLOVES"));
    // Items with no adjustments at all count as zero on hand.
    assert!(flagged.contains(&"SYRINGE"));
    assert!(!flagged.contains(&"GAUZE"));

    let gloves_row = rows.iter().find(|r| r.sku == "GLOVES").unwrap();
    assert_eq!(gloves_row.total_qty, 5);
    assert_eq!(gloves_row.min_stock, 10);
    let _ = never_stocked;
}

#[tokio::test]
async fn usage_report_sums_consumption_per_pair() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-USAGE", 0).await;
    let annex = seed_location(&app, "Annex").await;
    let main = seed_location(&app, "Main Store").await;
    let actor = staff();

    adjust(&app, item.id, annex.id, 4, AdjustmentReason::Usage).await;
    adjust(&app, item.id, annex.id, 2, AdjustmentReason::Wastage).await;
    adjust(&app, item.id, main.id, 3, AdjustmentReason::Usage).await;
    // Corrections never count as consumption.
    adjust(&app, item.id, main.id, 100, AdjustmentReason::Correction).await;

    let rows = app
        .services()
        .reports
        .item_usage(&actor, UsageFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let annex_row = rows.iter().find(|r| r.location_id == annex.id).unwrap();
    assert_eq!(annex_row.total_used, 6);
    let main_row = rows.iter().find(|r| r.location_id == main.id).unwrap();
    assert_eq!(main_row.total_used, 3);

    // Location filter narrows the result.
    let filtered = app
        .services()
        .reports
        .item_usage(
            &actor,
            UsageFilter {
                location_id: Some(annex.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].total_used, 6);
}

#[tokio::test]
async fn valuation_prices_the_fold_and_defaults_to_zero() {
    let app = TestApp::new().await;
    let priced = seed_priced_item(&app, "SKU-PRICED", 0, Some(dec!(2.50))).await;
    let unpriced = seed_item(&app, "SKU-FREE", 0).await;
    let location = seed_location(&app, "Main Store").await;
    let actor = staff();

    adjust(&app, priced.id, location.id, 10, AdjustmentReason::Correction).await;
    adjust(&app, priced.id, location.id, 2, AdjustmentReason::Usage).await;
    adjust(&app, unpriced.id, location.id, 5, AdjustmentReason::Correction).await;

    let rows = app.services().reports.stock_valuation(&actor).await.unwrap();

    let priced_row = rows.iter().find(|r| r.sku == "SKU-PRICED").unwrap();
    assert_eq!(priced_row.total_qty, 8);
    assert_eq!(priced_row.total_value, dec!(20.00));

    let unpriced_row = rows.iter().find(|r| r.sku == "SKU-FREE").unwrap();
    assert_eq!(unpriced_row.total_qty, 5);
    assert_eq!(unpriced_row.unit_price, None);
    assert_eq!(unpriced_row.total_value, dec!(0));
}
