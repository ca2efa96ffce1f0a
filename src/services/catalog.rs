use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
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
        purchase_order_line::{self, Entity as PurchaseOrderLine},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Clone)]
pub struct CreateItemInput {
    pub sku: String,
    pub barcode: Option<String>,
    pub name: String,
    pub min_stock: i64,
    pub max_stock: i64,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateItemInput {
    pub sku: Option<String>,
    pub barcode: Option<Option<String>>,
    pub name: Option<String>,
    pub min_stock: Option<i64>,
    pub max_stock: Option<i64>,
    pub unit_price: Option<Option<Decimal>>,
}

/// Item catalog management.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
}

impl CatalogService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    fn validate(sku: &str, name: &str, min_stock: i64, max_stock: i64) -> Result<(), ServiceError> {
        if sku.trim().is_empty() {
            return Err(ServiceError::ValidationError("sku must not be empty".into()));
        }
        if name.trim().is_empty() {
            return Err(ServiceError::ValidationError("name must not be empty".into()));
        }
        if min_stock < 0 || max_stock < 0 {
            return Err(ServiceError::ValidationError(
                "stock thresholds must be non-negative".into(),
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, input), fields(sku = %input.sku))]
    pub async fn create_item(
        &self,
        actor: &AuthContext,
        input: CreateItemInput,
    ) -> Result<item::Model, ServiceError> {
        actor.require(Capability::ManageCatalog)?;
        Self::validate(&input.sku, &input.name, input.min_stock, input.max_stock)?;

        let db = self.db.as_ref();

        let existing = Item::find()
            .filter(item::Column::Sku.eq(input.sku.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "item with sku {} already exists",
                input.sku
            )));
        }

        let now = Utc::now();
        let model = item::ActiveModel {
            id: Set(Uuid::new_v4()),
            sku: Set(input.sku),
            barcode: Set(input.barcode),
            name: Set(input.name),
            min_stock: Set(input.min_stock),
            max_stock: Set(input.max_stock),
            unit_price: Set(input.unit_price),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(db).await.map_err(ServiceError::db_error)?;
        info!(item_id = %created.id, "item created");
        self.emit(Event::ItemCreated(created.id)).await;
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update_item(
        &self,
        actor: &AuthContext,
        item_id: Uuid,
        input: UpdateItemInput,
    ) -> Result<item::Model, ServiceError> {
        actor.require(Capability::ManageCatalog)?;

        let db = self.db.as_ref();
        let existing = Item::find_by_id(item_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("item {} not found", item_id)))?;

        let sku = input.sku.clone().unwrap_or_else(|| existing.sku.clone());
        let name = input.name.clone().unwrap_or_else(|| existing.name.clone());
        let min_stock = input.min_stock.unwrap_or(existing.min_stock);
        let max_stock = input.max_stock.unwrap_or(existing.max_stock);
        Self::validate(&sku, &name, min_stock, max_stock)?;

        if sku != existing.sku {
            let clash = Item::find()
                .filter(item::Column::Sku.eq(sku.clone()))
                .filter(item::Column::Id.ne(item_id))
                .one(db)
                .await
                .map_err(ServiceError::db_error)?;
            if clash.is_some() {
                return Err(ServiceError::Conflict(format!(
                    "item with sku {} already exists",
                    sku
                )));
            }
        }

        let mut active: item::ActiveModel = existing.into();
        active.sku = Set(sku);
        active.name = Set(name);
        active.min_stock = Set(min_stock);
        active.max_stock = Set(max_stock);
        if let Some(barcode) = input.barcode {
            active.barcode = Set(barcode);
        }
        if let Some(unit_price) = input.unit_price {
            active.unit_price = Set(unit_price);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(db).await.map_err(ServiceError::db_error)?;
        self.emit(Event::ItemUpdated(updated.id)).await;
        Ok(updated)
    }

    pub async fn get_item(&self, item_id: Uuid) -> Result<item::Model, ServiceError> {
        Item::find_by_id(item_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("item {} not found", item_id)))
    }

    pub async fn list_items(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<item::Model>, u64), ServiceError> {
        let paginator = Item::find()
            .order_by_asc(item::Column::Name)
            .paginate(self.db.as_ref(), per_page.max(1));
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let items = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((items, total))
    }

    /// Delete an item. Denied synchronously without the `ManageCatalog`
    /// capability; rejected with `Conflict` while ledger history or PO lines
    /// still reference the item, since adjustments are never deleted.
    #[instrument(skip(self))]
    pub async fn delete_item(&self, actor: &AuthContext, item_id: Uuid) -> Result<(), ServiceError> {
        actor.require(Capability::ManageCatalog)?;

        let db = self.db.as_ref();
        let existing = Item::find_by_id(item_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("item {} not found", item_id)))?;

        let adjustment_count = Adjustment::find()
            .filter(adjustment::Column::ItemId.eq(item_id))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;
        if adjustment_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "item {} has {} ledger entries and cannot be deleted",
                item_id, adjustment_count
            )));
        }

        let line_count = PurchaseOrderLine::find()
            .filter(purchase_order_line::Column::ItemId.eq(item_id))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;
        if line_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "item {} is referenced by {} purchase order lines",
                item_id, line_count
            )));
        }

        // Projection rows for an item with no adjustments are vestigial.
        InventoryLevel::delete_many()
            .filter(inventory_level::Column::ItemId.eq(item_id))
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;

        Item::delete_by_id(existing.id)
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;
        info!(item_id = %item_id, "item deleted");
        self.emit(Event::ItemDeleted(item_id)).await;
        Ok(())
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!("failed to publish event: {}", e);
            }
        }
    }
}
