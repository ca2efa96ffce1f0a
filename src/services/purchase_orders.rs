use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
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
        item::{self, Entity as Item},
        purchase_order::{self, Entity as PurchaseOrder},
        purchase_order_line::{self, Entity as PurchaseOrderLine},
        vendor::{self, Entity as Vendor},
        PurchaseOrderStatus,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    ledger::{self, FulfillmentState},
};

#[derive(Debug, Clone)]
pub struct CreatePurchaseOrderInput {
    pub vendor_id: Uuid,
    pub lines: Vec<CreatePurchaseOrderLineInput>,
}

#[derive(Debug, Clone)]
pub struct CreatePurchaseOrderLineInput {
    pub item_id: Uuid,
    pub qty_ordered: i64,
    pub unit_price: Option<Decimal>,
}

/// A line with its derived pending quantity and expanded item.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrderLineView {
    pub line: purchase_order_line::Model,
    pub pending: i64,
    pub item: Option<item::Model>,
}

/// A purchase order with vendor, lines, and derived fulfillment state.
/// Totals are computed from lines on every read, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrderView {
    pub purchase_order: purchase_order::Model,
    pub vendor: Option<vendor::Model>,
    pub lines: Vec<PurchaseOrderLineView>,
    pub ordered_total: i64,
    pub received_total: i64,
    pub fulfillment: FulfillmentState,
}

/// Purchase-order lifecycle: creation with fixed lines, and the monotonic
/// draft -> open -> closed transitions.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
}

impl PurchaseOrderService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(vendor_id = %input.vendor_id))]
    pub async fn create_purchase_order(
        &self,
        actor: &AuthContext,
        input: CreatePurchaseOrderInput,
    ) -> Result<PurchaseOrderView, ServiceError> {
        actor.require(Capability::ManagePurchaseOrders)?;

        if input.lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "a purchase order needs at least one line".into(),
            ));
        }
        for line in &input.lines {
            if line.qty_ordered <= 0 {
                return Err(ServiceError::ValidationError(
                    "ordered quantity must be positive".into(),
                ));
            }
        }

        let db = self.db.as_ref();

        Vendor::find_by_id(input.vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("vendor {} not found", input.vendor_id))
            })?;
        for line in &input.lines {
            Item::find_by_id(line.item_id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("item {} not found", line.item_id))
                })?;
        }

        let now = Utc::now();
        let po_id = Uuid::new_v4();

        let txn = db.begin().await.map_err(ServiceError::db_error)?;

        // Sequential human-readable number: highest existing + 1.
        let last = PurchaseOrder::find()
            .order_by_desc(purchase_order::Column::PoNumber)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        let po_number = last.map(|po| po.po_number + 1).unwrap_or(1);

        let po = purchase_order::ActiveModel {
            id: Set(po_id),
            po_number: Set(po_number),
            vendor_id: Set(input.vendor_id),
            status: Set(PurchaseOrderStatus::Draft),
            created_at: Set(now),
            updated_at: Set(now),
        };
        po.insert(&txn).await.map_err(ServiceError::db_error)?;

        for line in &input.lines {
            let row = purchase_order_line::ActiveModel {
                id: Set(Uuid::new_v4()),
                po_id: Set(po_id),
                item_id: Set(line.item_id),
                qty_ordered: Set(line.qty_ordered),
                qty_received: Set(0),
                unit_price: Set(line.unit_price),
                created_at: Set(now),
            };
            row.insert(&txn).await.map_err(ServiceError::db_error)?;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(po_id = %po_id, po_number, "purchase order created");
        self.emit(Event::PurchaseOrderCreated { po_id, po_number }).await;

        self.get_purchase_order(po_id).await
    }

    /// `draft -> open`. Any other current status is rejected.
    #[instrument(skip(self))]
    pub async fn approve(&self, actor: &AuthContext, po_id: Uuid) -> Result<PurchaseOrderView, ServiceError> {
        actor.require(Capability::ManagePurchaseOrders)?;
        self.transition(po_id, PurchaseOrderStatus::Draft, PurchaseOrderStatus::Open)
            .await?;
        self.emit(Event::PurchaseOrderApproved(po_id)).await;
        self.get_purchase_order(po_id).await
    }

    /// `open -> closed`. Closing a draft directly is rejected; the state
    /// machine has no shortcut and no reopen path.
    #[instrument(skip(self))]
    pub async fn close(&self, actor: &AuthContext, po_id: Uuid) -> Result<PurchaseOrderView, ServiceError> {
        actor.require(Capability::ManagePurchaseOrders)?;
        self.transition(po_id, PurchaseOrderStatus::Open, PurchaseOrderStatus::Closed)
            .await?;
        self.emit(Event::PurchaseOrderClosed(po_id)).await;
        self.get_purchase_order(po_id).await
    }

    async fn transition(
        &self,
        po_id: Uuid,
        expected: PurchaseOrderStatus,
        next: PurchaseOrderStatus,
    ) -> Result<(), ServiceError> {
        let db = self.db.as_ref();
        let po = PurchaseOrder::find_by_id(po_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("purchase order {} not found", po_id)))?;

        if po.status != expected {
            return Err(ServiceError::InvalidOperation(format!(
                "purchase order {} is {}, expected {}",
                po_id,
                po.status.as_str(),
                expected.as_str()
            )));
        }

        let mut active: purchase_order::ActiveModel = po.into();
        active.status = Set(next);
        active.updated_at = Set(Utc::now());
        active.update(db).await.map_err(ServiceError::db_error)?;

        info!(po_id = %po_id, status = next.as_str(), "purchase order transitioned");
        Ok(())
    }

    pub async fn get_purchase_order(&self, po_id: Uuid) -> Result<PurchaseOrderView, ServiceError> {
        let db = self.db.as_ref();

        let po = PurchaseOrder::find_by_id(po_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("purchase order {} not found", po_id)))?;

        let vendor = Vendor::find_by_id(po.vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        let lines = PurchaseOrderLine::find()
            .filter(purchase_order_line::Column::PoId.eq(po_id))
            .order_by_asc(purchase_order_line::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let item_ids: Vec<Uuid> = lines.iter().map(|l| l.item_id).collect();
        let items: HashMap<Uuid, item::Model> = Item::find()
            .filter(item::Column::Id.is_in(item_ids))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let ordered_total: i64 = lines.iter().map(|l| l.qty_ordered).sum();
        let received_total: i64 = lines.iter().map(|l| l.qty_received).sum();
        let fulfillment =
            ledger::fulfillment_state(lines.iter().map(|l| (l.qty_ordered, l.qty_received)));

        let line_views = lines
            .into_iter()
            .map(|line| {
                let pending = line.pending();
                let item = items.get(&line.item_id).cloned();
                PurchaseOrderLineView {
                    line,
                    pending,
                    item,
                }
            })
            .collect();

        Ok(PurchaseOrderView {
            purchase_order: po,
            vendor,
            lines: line_views,
            ordered_total,
            received_total,
            fulfillment,
        })
    }

    pub async fn list_purchase_orders(
        &self,
        page: u64,
        per_page: u64,
        status: Option<PurchaseOrderStatus>,
    ) -> Result<(Vec<purchase_order::Model>, u64), ServiceError> {
        let mut query = PurchaseOrder::find().order_by_desc(purchase_order::Column::PoNumber);
        if let Some(status) = status {
            query = query.filter(purchase_order::Column::Status.eq(status));
        }

        let paginator = query.paginate(self.db.as_ref(), per_page.max(1));
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let orders = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((orders, total))
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!("failed to publish event: {}", e);
            }
        }
    }
}
