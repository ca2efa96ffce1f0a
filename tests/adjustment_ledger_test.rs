mod common;

use assert_matches::assert_matches;

use common::{seed_item, seed_location, staff, TestApp};
use simlab_inventory_api::{
    entities::AdjustmentReason,
    errors::ServiceError,
    services::adjustments::RecordAdjustmentInput,
};

#[tokio::test]
async fn usage_is_stored_negative_regardless_of_entered_sign() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-USE", 0).await;
    let location = seed_location(&app, "Main Store").await;
    let actor = staff();

    // Operator enters a positive count; usage still decrements.
    let entry = app
        .services()
        .adjustments
        .record_adjustment(
            &actor,
            RecordAdjustmentInput {
                item_id: item.id,
                location_id: location.id,
                quantity: 7,
                reason: AdjustmentReason::Usage,
            },
        )
        .await
        .unwrap();
    assert_eq!(entry.change, -7);
    assert_eq!(entry.actor_id, Some(actor.user_id));

    let wastage = app
        .services()
        .adjustments
        .record_adjustment(
            &actor,
            RecordAdjustmentInput {
                item_id: item.id,
                location_id: location.id,
                quantity: -2,
                reason: AdjustmentReason::Wastage,
            },
        )
        .await
        .unwrap();
    assert_eq!(wastage.change, -2);

    // Corrections keep the entered sign.
    let correction = app
        .services()
        .adjustments
        .record_adjustment(
            &actor,
            RecordAdjustmentInput {
                item_id: item.id,
                location_id: location.id,
                quantity: 20,
                reason: AdjustmentReason::Correction,
            },
        )
        .await
        .unwrap();
    assert_eq!(correction.change, 20);

    let on_hand = app
        .services()
        .inventory
        .level_for(item.id, location.id)
        .await
        .unwrap();
    assert_eq!(on_hand, 11);
}

#[tokio::test]
async fn zero_quantity_is_rejected() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-ZERO", 0).await;
    let location = seed_location(&app, "Main Store").await;

    let err = app
        .services()
        .adjustments
        .record_adjustment(
            &staff(),
            RecordAdjustmentInput {
                item_id: item.id,
                location_id: location.id,
                quantity: 0,
                reason: AdjustmentReason::Correction,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ValidationError(_));
}

#[tokio::test]
async fn unknown_references_are_not_found() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-REF", 0).await;
    let location = seed_location(&app, "Main Store").await;

    let err = app
        .services()
        .adjustments
        .record_adjustment(
            &staff(),
            RecordAdjustmentInput {
                item_id: uuid::Uuid::new_v4(),
                location_id: location.id,
                quantity: 1,
                reason: AdjustmentReason::Correction,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));

    let err = app
        .services()
        .adjustments
        .record_adjustment(
            &staff(),
            RecordAdjustmentInput {
                item_id: item.id,
                location_id: uuid::Uuid::new_v4(),
                quantity: 1,
                reason: AdjustmentReason::Correction,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn negative_on_hand_is_allowed() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-NEG", 0).await;
    let location = seed_location(&app, "Main Store").await;

    app.services()
        .adjustments
        .record_adjustment(
            &staff(),
            RecordAdjustmentInput {
                item_id: item.id,
                location_id: location.id,
                quantity: 5,
                reason: AdjustmentReason::Usage,
            },
        )
        .await
        .unwrap();

    let on_hand = app
        .services()
        .inventory
        .level_for(item.id, location.id)
        .await
        .unwrap();
    assert_eq!(on_hand, -5);
}

#[tokio::test]
async fn list_returns_newest_first_with_expansion() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-LIST", 0).await;
    let location = seed_location(&app, "Main Store").await;
    let actor = staff();

    for qty in [5, 3] {
        app.services()
            .adjustments
            .record_adjustment(
                &actor,
                RecordAdjustmentInput {
                    item_id: item.id,
                    location_id: location.id,
                    quantity: qty,
                    reason: AdjustmentReason::Correction,
                },
            )
            .await
            .unwrap();
    }

    let (records, total) = app
        .services()
        .adjustments
        .list_adjustments(1, 20, None)
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].adjustment.change, 3);
    assert_eq!(records[0].item.as_ref().unwrap().sku, "SKU-LIST");
    assert_eq!(records[0].location.as_ref().unwrap().name, "Main Store");
}

#[tokio::test]
async fn projection_rebuild_reproduces_the_fold() {
    let app = TestApp::new().await;
    let item = seed_item(&app, "SKU-FOLD", 0).await;
    let location_a = seed_location(&app, "Annex").await;
    let location_b = seed_location(&app, "Main Store").await;
    let actor = staff();

    for (loc, qty, reason) in [
        (location_a.id, 10, AdjustmentReason::Correction),
        (location_a.id, 4, AdjustmentReason::Usage),
        (location_b.id, 6, AdjustmentReason::Correction),
    ] {
        app.services()
            .adjustments
            .record_adjustment(
                &actor,
                RecordAdjustmentInput {
                    item_id: item.id,
                    location_id: loc,
                    quantity: qty,
                    reason,
                },
            )
            .await
            .unwrap();
    }

    assert!(app
        .services()
        .inventory
        .verify_projection()
        .await
        .unwrap()
        .is_empty());

    let pairs = app
        .services()
        .inventory
        .rebuild_projection(&actor)
        .await
        .unwrap();
    assert_eq!(pairs, 2);

    assert_eq!(
        app.services()
            .inventory
            .level_for(item.id, location_a.id)
            .await
            .unwrap(),
        6
    );
    assert_eq!(
        app.services()
            .inventory
            .level_for(item.id, location_b.id)
            .await
            .unwrap(),
        6
    );
    assert!(app
        .services()
        .inventory
        .verify_projection()
        .await
        .unwrap()
        .is_empty());
}
