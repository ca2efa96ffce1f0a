use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{AuthContext, Capability},
    db::DbPool,
    entities::{
        adjustment,
        location::{self, Entity as Location},
        purchase_order::Entity as PurchaseOrder,
        purchase_order_line::{self, Entity as PurchaseOrderLine},
        AdjustmentReason, PurchaseOrderStatus,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    ledger,
    services::{
        adjustments::apply_adjustment,
        purchase_orders::{PurchaseOrderService, PurchaseOrderView},
    },
};

/// One operator-entered line of a receiving batch. A missing location falls
/// back to the first available location.
#[derive(Debug, Clone)]
pub struct ReceiveLineInput {
    pub po_line_id: Uuid,
    pub quantity: i64,
    pub location_id: Option<Uuid>,
}

/// Outcome of a committed receiving batch. `purchase_order` is re-read from
/// the store after commit; received quantities are never taken from local
/// optimistic totals.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiveResult {
    pub purchase_order: PurchaseOrderView,
    pub adjustments: Vec<adjustment::Model>,
}

/// Converts a subset of a purchase order's pending quantity into ledger
/// entries, one batch at a time. The whole batch is a single transaction:
/// either every line's adjustment, projection update, and received-quantity
/// bump commits, or none do.
#[derive(Clone)]
pub struct ReceivingService {
    db: Arc<DbPool>,
    purchase_orders: Arc<PurchaseOrderService>,
    event_sender: Option<EventSender>,
}

impl ReceivingService {
    pub fn new(
        db: Arc<DbPool>,
        purchase_orders: Arc<PurchaseOrderService>,
        event_sender: Option<EventSender>,
    ) -> Self {
        Self {
            db,
            purchase_orders,
            event_sender,
        }
    }

    /// The operator's working set: the PO with per-line pending quantities.
    pub async fn receiving_plan(&self, po_id: Uuid) -> Result<PurchaseOrderView, ServiceError> {
        self.purchase_orders.get_purchase_order(po_id).await
    }

    #[instrument(skip(self, lines), fields(po_id = %po_id, line_count = lines.len()))]
    pub async fn receive(
        &self,
        actor: &AuthContext,
        po_id: Uuid,
        lines: Vec<ReceiveLineInput>,
    ) -> Result<ReceiveResult, ServiceError> {
        actor.require(Capability::ReceiveInventory)?;

        let db = self.db.as_ref();

        let po = PurchaseOrder::find_by_id(po_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("purchase order {} not found", po_id)))?;
        if po.status != PurchaseOrderStatus::Open {
            return Err(ServiceError::InvalidOperation(format!(
                "purchase order {} is {}, receiving requires an open order",
                po_id,
                po.status.as_str()
            )));
        }

        let default_location = Location::find()
            .order_by_asc(location::Column::Name)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;

        let txn = db.begin().await.map_err(ServiceError::db_error)?;
        let mut recorded = Vec::new();

        for input in &lines {
            // Zero and negative entries are skipped, not rejected.
            if input.quantity <= 0 {
                continue;
            }

            let line = PurchaseOrderLine::find_by_id(input.po_line_id)
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("PO line {} not found", input.po_line_id))
                })?;
            if line.po_id != po_id {
                return Err(ServiceError::InvalidOperation(format!(
                    "PO line {} does not belong to purchase order {}",
                    line.id, po_id
                )));
            }

            let location_id = match input.location_id.or(default_location.as_ref().map(|l| l.id)) {
                Some(id) => id,
                // No location configured at all: nothing to receive into.
                None => continue,
            };
            Location::find_by_id(location_id)
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("location {} not found", location_id))
                })?;

            // Authoritative clamp, independent of any client-side guard.
            let qty = ledger::clamp_receive_qty(line.pending(), input.quantity);
            if qty == 0 {
                continue;
            }

            let entry = apply_adjustment(
                &txn,
                line.item_id,
                location_id,
                ledger::normalized_change(AdjustmentReason::Receive, qty),
                AdjustmentReason::Receive,
                Some(actor.user_id),
                Some(po_id),
                Some(line.id),
            )
            .await?;

            let new_received = line.qty_received + qty;
            let mut active: purchase_order_line::ActiveModel = line.into();
            active.qty_received = Set(new_received);
            active.update(&txn).await.map_err(ServiceError::db_error)?;

            recorded.push(entry);
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        info!(lines_received = recorded.len(), "receiving batch committed");
        self.emit(Event::PurchaseOrderReceived {
            po_id,
            lines_received: recorded.len(),
        })
        .await;

        // Derived line state is re-fetched rather than trusted from the
        // batch we just wrote.
        let purchase_order = self.purchase_orders.get_purchase_order(po_id).await?;

        Ok(ReceiveResult {
            purchase_order,
            adjustments: recorded,
        })
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!("failed to publish event: {}", e);
            }
        }
    }
}
