use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
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
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// An inventory level with its related records expanded for display.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryLevelRecord {
    pub level: inventory_level::Model,
    pub item: Option<item::Model>,
    pub location: Option<location::Model>,
}

/// A pair whose projection no longer matches the ledger fold.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionDrift {
    pub item_id: Uuid,
    pub location_id: Uuid,
    pub projected_qty: i64,
    pub ledger_qty: i64,
}

/// Read access to the on-hand projection plus maintenance operations that
/// re-derive it from the adjustment log.
#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
}

impl InventoryService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    pub async fn list_levels(&self) -> Result<Vec<InventoryLevelRecord>, ServiceError> {
        let db = self.db.as_ref();

        let levels = InventoryLevel::find()
            .order_by_asc(inventory_level::Column::ItemId)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let items: HashMap<Uuid, item::Model> = Item::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
        let locations: HashMap<Uuid, location::Model> = Location::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        Ok(levels
            .into_iter()
            .map(|level| {
                let item = items.get(&level.item_id).cloned();
                let location = locations.get(&level.location_id).cloned();
                InventoryLevelRecord {
                    level,
                    item,
                    location,
                }
            })
            .collect())
    }

    pub async fn level_for(
        &self,
        item_id: Uuid,
        location_id: Uuid,
    ) -> Result<i64, ServiceError> {
        let level = InventoryLevel::find()
            .filter(inventory_level::Column::ItemId.eq(item_id))
            .filter(inventory_level::Column::LocationId.eq(location_id))
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)?;
        Ok(level.map(|l| l.qty).unwrap_or(0))
    }

    /// Fold the full adjustment log into per-pair quantities.
    async fn fold_ledger(&self) -> Result<HashMap<(Uuid, Uuid), i64>, ServiceError> {
        let entries = Adjustment::find()
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        let mut folds: HashMap<(Uuid, Uuid), i64> = HashMap::new();
        for entry in entries {
            *folds.entry((entry.item_id, entry.location_id)).or_insert(0) += entry.change;
        }
        Ok(folds)
    }

    /// Report pairs whose projected quantity has drifted from the ledger
    /// fold. An empty result means the invariant holds.
    pub async fn verify_projection(&self) -> Result<Vec<ProjectionDrift>, ServiceError> {
        let folds = self.fold_ledger().await?;
        let levels = InventoryLevel::find()
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)?;

        let mut drift = Vec::new();
        let mut seen: HashMap<(Uuid, Uuid), i64> = HashMap::new();
        for level in levels {
            let key = (level.item_id, level.location_id);
            seen.insert(key, level.qty);
            let ledger_qty = folds.get(&key).copied().unwrap_or(0);
            if level.qty != ledger_qty {
                drift.push(ProjectionDrift {
                    item_id: level.item_id,
                    location_id: level.location_id,
                    projected_qty: level.qty,
                    ledger_qty,
                });
            }
        }
        for (key, ledger_qty) in folds {
            if !seen.contains_key(&key) && ledger_qty != 0 {
                drift.push(ProjectionDrift {
                    item_id: key.0,
                    location_id: key.1,
                    projected_qty: 0,
                    ledger_qty,
                });
            }
        }
        Ok(drift)
    }

    /// Recompute every projection row from the adjustment log alone. The
    /// projection is a cache of the fold, so this is always safe to run.
    #[instrument(skip(self))]
    pub async fn rebuild_projection(&self, actor: &AuthContext) -> Result<usize, ServiceError> {
        actor.require(Capability::RecordAdjustments)?;

        let folds = self.fold_ledger().await?;
        let now = Utc::now();

        let txn = self.db.as_ref().begin().await.map_err(ServiceError::db_error)?;
        InventoryLevel::delete_many()
            .exec(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        for ((item_id, location_id), qty) in &folds {
            let row = inventory_level::ActiveModel {
                id: Set(Uuid::new_v4()),
                item_id: Set(*item_id),
                location_id: Set(*location_id),
                qty: Set(*qty),
                updated_at: Set(now),
            };
            row.insert(&txn).await.map_err(ServiceError::db_error)?;
        }
        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(pairs = folds.len(), "inventory projection rebuilt");
        self.emit(Event::InventoryProjectionRebuilt { pairs: folds.len() })
            .await;
        Ok(folds.len())
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!("failed to publish event: {}", e);
            }
        }
    }
}
