use chrono::Utc;
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
        purchase_order::{self, Entity as PurchaseOrder},
        vendor::{self, Entity as Vendor},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

#[derive(Debug, Clone)]
pub struct CreateVendorInput {
    pub name: String,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}

/// Vendor directory used by purchase orders.
#[derive(Clone)]
pub struct VendorService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
}

impl VendorService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_vendor(
        &self,
        actor: &AuthContext,
        input: CreateVendorInput,
    ) -> Result<vendor::Model, ServiceError> {
        actor.require(Capability::ManageCatalog)?;
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError("name must not be empty".into()));
        }

        let now = Utc::now();
        let model = vendor::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            contact_name: Set(input.contact_name),
            contact_email: Set(input.contact_email),
            contact_phone: Set(input.contact_phone),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = model
            .insert(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)?;
        info!(vendor_id = %created.id, "vendor created");
        self.emit(Event::VendorCreated(created.id)).await;
        Ok(created)
    }

    pub async fn get_vendor(&self, vendor_id: Uuid) -> Result<vendor::Model, ServiceError> {
        Vendor::find_by_id(vendor_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("vendor {} not found", vendor_id)))
    }

    pub async fn list_vendors(&self) -> Result<Vec<vendor::Model>, ServiceError> {
        Vendor::find()
            .order_by_asc(vendor::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Vendors referenced by purchase orders are never cascading-deleted.
    #[instrument(skip(self))]
    pub async fn delete_vendor(
        &self,
        actor: &AuthContext,
        vendor_id: Uuid,
    ) -> Result<(), ServiceError> {
        actor.require(Capability::ManageCatalog)?;

        let db = self.db.as_ref();
        Vendor::find_by_id(vendor_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("vendor {} not found", vendor_id)))?;

        let po_count = PurchaseOrder::find()
            .filter(purchase_order::Column::VendorId.eq(vendor_id))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;
        if po_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "vendor {} is referenced by {} purchase orders",
                vendor_id, po_count
            )));
        }

        Vendor::delete_by_id(vendor_id)
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;
        info!(vendor_id = %vendor_id, "vendor deleted");
        self.emit(Event::VendorDeleted(vendor_id)).await;
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
