use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::entities::AdjustmentReason;

/// Domain events emitted after successful mutations. Consumed in-process;
/// the delivery channel is advisory and carries no replay guarantee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ItemCreated(Uuid),
    ItemUpdated(Uuid),
    ItemDeleted(Uuid),
    LocationCreated(Uuid),
    LocationDeleted(Uuid),
    VendorCreated(Uuid),
    VendorDeleted(Uuid),
    AdjustmentRecorded {
        adjustment_id: Uuid,
        item_id: Uuid,
        location_id: Uuid,
        change: i64,
        reason: AdjustmentReason,
    },
    InventoryProjectionRebuilt {
        pairs: usize,
    },
    PurchaseOrderCreated {
        po_id: Uuid,
        po_number: i64,
    },
    PurchaseOrderApproved(Uuid),
    PurchaseOrderClosed(Uuid),
    PurchaseOrderReceived {
        po_id: Uuid,
        lines_received: usize,
    },
}

/// Cloneable handle for publishing events onto the in-process bus.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Create a connected sender/receiver pair with the default buffer.
pub fn channel() -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(1024);
    (EventSender::new(tx), rx)
}

/// Drain the event channel, logging each event. Runs until every sender is
/// dropped.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        info!(?event, "event processed");
    }
    info!("event channel closed, processor exiting");
}
