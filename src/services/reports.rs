//! Report aggregation expressed as pure, re-runnable folds over the
//! adjustment log. The original system kept these in external SQL views;
//! computing them here keeps the ledger fold the single source of truth.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::{AuthContext, Capability},
    db::DbPool,
    entities::{
        adjustment::{self, Entity as Adjustment},
        item::{self, Entity as Item},
        location::{self, Entity as Location},
        AdjustmentReason,
    },
    errors::ServiceError,
};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LowStockRow {
    pub item_id: Uuid,
    pub name: String,
    pub sku: String,
    pub total_qty: i64,
    pub min_stock: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemUsageRow {
    pub item_id: Uuid,
    pub item_name: String,
    pub sku: String,
    pub location_id: Uuid,
    pub location_name: String,
    /// Units consumed: the positive sum of usage/wastage deltas.
    pub total_used: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockValuationRow {
    pub item_id: Uuid,
    pub item_name: String,
    pub sku: String,
    pub total_qty: i64,
    pub unit_price: Option<Decimal>,
    pub total_value: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct UsageFilter {
    pub location_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct ReportService {
    db: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Items whose total on-hand across all locations has fallen below
    /// their minimum threshold.
    #[instrument(skip(self))]
    pub async fn low_stock(&self, actor: &AuthContext) -> Result<Vec<LowStockRow>, ServiceError> {
        actor.require(Capability::ViewReports)?;
        let db = self.db.as_ref();

        let entries = Adjustment::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let mut totals: HashMap<Uuid, i64> = HashMap::new();
        for entry in entries {
            *totals.entry(entry.item_id).or_insert(0) += entry.change;
        }

        let items = Item::find().all(db).await.map_err(ServiceError::db_error)?;

        let mut rows: Vec<LowStockRow> = items
            .into_iter()
            .filter_map(|item| {
                let total_qty = totals.get(&item.id).copied().unwrap_or(0);
                (total_qty < item.min_stock).then(|| LowStockRow {
                    item_id: item.id,
                    name: item.name,
                    sku: item.sku,
                    total_qty,
                    min_stock: item.min_stock,
                })
            })
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    /// Consumption grouped by (item, location): the sum of negated
    /// usage/wastage deltas, optionally bounded by date range and location.
    #[instrument(skip(self))]
    pub async fn item_usage(
        &self,
        actor: &AuthContext,
        filter: UsageFilter,
    ) -> Result<Vec<ItemUsageRow>, ServiceError> {
        actor.require(Capability::ViewReports)?;
        let db = self.db.as_ref();

        let mut query = Adjustment::find().filter(
            adjustment::Column::Reason
                .is_in([AdjustmentReason::Usage, AdjustmentReason::Wastage]),
        );
        if let Some(location_id) = filter.location_id {
            query = query.filter(adjustment::Column::LocationId.eq(location_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(adjustment::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(adjustment::Column::CreatedAt.lte(to));
        }

        let entries = query.all(db).await.map_err(ServiceError::db_error)?;

        let mut used: HashMap<(Uuid, Uuid), i64> = HashMap::new();
        for entry in entries {
            // usage/wastage deltas are stored negative; report them positive
            *used.entry((entry.item_id, entry.location_id)).or_insert(0) -= entry.change;
        }

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

        let mut rows: Vec<ItemUsageRow> = used
            .into_iter()
            .filter(|(_, total)| *total != 0)
            .filter_map(|((item_id, location_id), total_used)| {
                let item = items.get(&item_id)?;
                let location = locations.get(&location_id)?;
                Some(ItemUsageRow {
                    item_id,
                    item_name: item.name.clone(),
                    sku: item.sku.clone(),
                    location_id,
                    location_name: location.name.clone(),
                    total_used,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            a.item_name
                .cmp(&b.item_name)
                .then_with(|| a.location_name.cmp(&b.location_name))
        });
        Ok(rows)
    }

    /// Current holdings priced at each item's unit price. Items without a
    /// price are valued at zero.
    #[instrument(skip(self))]
    pub async fn stock_valuation(
        &self,
        actor: &AuthContext,
    ) -> Result<Vec<StockValuationRow>, ServiceError> {
        actor.require(Capability::ViewReports)?;
        let db = self.db.as_ref();

        let entries = Adjustment::find()
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let mut totals: HashMap<Uuid, i64> = HashMap::new();
        for entry in entries {
            *totals.entry(entry.item_id).or_insert(0) += entry.change;
        }

        let items = Item::find().all(db).await.map_err(ServiceError::db_error)?;

        let mut rows: Vec<StockValuationRow> = items
            .into_iter()
            .map(|item| {
                let total_qty = totals.get(&item.id).copied().unwrap_or(0);
                let total_value = item
                    .unit_price
                    .map(|price| price * Decimal::from(total_qty))
                    .unwrap_or(Decimal::ZERO);
                StockValuationRow {
                    item_id: item.id,
                    item_name: item.name,
                    sku: item.sku,
                    total_qty,
                    unit_price: item.unit_price,
                    total_value,
                }
            })
            .collect();
        rows.sort_by(|a, b| a.item_name.cmp(&b.item_name));
        Ok(rows)
    }
}
