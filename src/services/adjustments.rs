use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{AuthContext, Capability},
    db::DbPool,
    entities::{
        adjustment::{self, Entity as Adjustment},
        inventory_level::{self, Entity as InventoryLevel},
        item::{self, Entity as Item},
        location::{self, Entity as Location},
        AdjustmentReason,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    ledger,
};

#[derive(Debug, Clone)]
pub struct RecordAdjustmentInput {
    pub item_id: Uuid,
    pub location_id: Uuid,
    /// Operator-entered signed quantity; normalized by reason before storage.
    pub quantity: i64,
    pub reason: AdjustmentReason,
}

/// An adjustment with its related records expanded for display.
#[derive(Debug, Clone, Serialize)]
pub struct AdjustmentRecord {
    pub adjustment: adjustment::Model,
    pub item: Option<item::Model>,
    pub location: Option<location::Model>,
}

/// Insert one ledger entry and fold it into the inventory projection, inside
/// the caller's transaction. The projection row is the cache of the fold;
/// both writes must commit together.
pub(crate) async fn apply_adjustment<C: ConnectionTrait>(
    txn: &C,
    item_id: Uuid,
    location_id: Uuid,
    change: i64,
    reason: AdjustmentReason,
    actor_id: Option<Uuid>,
    po_id: Option<Uuid>,
    po_line_id: Option<Uuid>,
) -> Result<adjustment::Model, ServiceError> {
    let now = Utc::now();

    let entry = adjustment::ActiveModel {
        id: Set(Uuid::new_v4()),
        item_id: Set(item_id),
        location_id: Set(location_id),
        change: Set(change),
        reason: Set(reason),
        actor_id: Set(actor_id),
        po_id: Set(po_id),
        po_line_id: Set(po_line_id),
        created_at: Set(now),
    };
    let inserted = entry.insert(txn).await.map_err(ServiceError::db_error)?;

    let level = InventoryLevel::find()
        .filter(inventory_level::Column::ItemId.eq(item_id))
        .filter(inventory_level::Column::LocationId.eq(location_id))
        .one(txn)
        .await
        .map_err(ServiceError::db_error)?;

    match level {
        Some(existing) => {
            let new_qty = existing.qty + change;
            let mut active: inventory_level::ActiveModel = existing.into();
            active.qty = Set(new_qty);
            active.updated_at = Set(now);
            active.update(txn).await.map_err(ServiceError::db_error)?;
        }
        None => {
            let fresh = inventory_level::ActiveModel {
                id: Set(Uuid::new_v4()),
                item_id: Set(item_id),
                location_id: Set(location_id),
                qty: Set(change),
                updated_at: Set(now),
            };
            fresh.insert(txn).await.map_err(ServiceError::db_error)?;
        }
    }

    Ok(inserted)
}

/// Generic (non-PO) stock adjustment entry.
#[derive(Clone)]
pub struct AdjustmentService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
}

impl AdjustmentService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(item_id = %input.item_id, reason = input.reason.as_str()))]
    pub async fn record_adjustment(
        &self,
        actor: &AuthContext,
        input: RecordAdjustmentInput,
    ) -> Result<adjustment::Model, ServiceError> {
        actor.require(Capability::RecordAdjustments)?;

        if input.quantity == 0 {
            return Err(ServiceError::ValidationError(
                "quantity must not be zero".into(),
            ));
        }

        let db = self.db.as_ref();

        Item::find_by_id(input.item_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("item {} not found", input.item_id)))?;
        Location::find_by_id(input.location_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("location {} not found", input.location_id))
            })?;

        let change = ledger::normalized_change(input.reason, input.quantity);

        let txn = db.begin().await.map_err(ServiceError::db_error)?;
        let inserted = apply_adjustment(
            &txn,
            input.item_id,
            input.location_id,
            change,
            input.reason,
            Some(actor.user_id),
            None,
            None,
        )
        .await?;
        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(
            adjustment_id = %inserted.id,
            change,
            "adjustment recorded"
        );
        self.emit(Event::AdjustmentRecorded {
            adjustment_id: inserted.id,
            item_id: inserted.item_id,
            location_id: inserted.location_id,
            change: inserted.change,
            reason: inserted.reason,
        })
        .await;

        Ok(inserted)
    }

    /// Recent adjustments, newest first, with item/location expansion.
    pub async fn list_adjustments(
        &self,
        page: u64,
        per_page: u64,
        since: Option<DateTime<Utc>>,
    ) -> Result<(Vec<AdjustmentRecord>, u64), ServiceError> {
        let db = self.db.as_ref();

        let mut query = Adjustment::find().order_by_desc(adjustment::Column::CreatedAt);
        if let Some(since) = since {
            query = query.filter(adjustment::Column::CreatedAt.gte(since));
        }

        let paginator = query.paginate(db, per_page.max(1));
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;

        let item_ids: Vec<Uuid> = rows.iter().map(|a| a.item_id).collect();
        let location_ids: Vec<Uuid> = rows.iter().map(|a| a.location_id).collect();

        let items: HashMap<Uuid, item::Model> = Item::find()
            .filter(item::Column::Id.is_in(item_ids))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
        let locations: HashMap<Uuid, location::Model> = Location::find()
            .filter(location::Column::Id.is_in(location_ids))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let records = rows
            .into_iter()
            .map(|adjustment| {
                let item = items.get(&adjustment.item_id).cloned();
                let location = locations.get(&adjustment.location_id).cloned();
                AdjustmentRecord {
                    adjustment,
                    item,
                    location,
                }
            })
            .collect();

        Ok((records, total))
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!("failed to publish event: {}", e);
            }
        }
    }
}
