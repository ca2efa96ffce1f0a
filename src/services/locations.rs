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
        adjustment::{self, Entity as Adjustment},
        inventory_level::{self, Entity as InventoryLevel},
        location::{self, Entity as Location},
    },
    errors::ServiceError,
    events::{Event, EventSender},
};

/// Stock-point management.
#[derive(Clone)]
pub struct LocationService {
    db: Arc<DbPool>,
    event_sender: Option<EventSender>,
}

impl LocationService {
    pub fn new(db: Arc<DbPool>, event_sender: Option<EventSender>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn create_location(
        &self,
        actor: &AuthContext,
        name: String,
    ) -> Result<location::Model, ServiceError> {
        actor.require(Capability::ManageCatalog)?;
        if name.trim().is_empty() {
            return Err(ServiceError::ValidationError("name must not be empty".into()));
        }

        let now = Utc::now();
        let model = location::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = model
            .insert(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)?;
        info!(location_id = %created.id, "location created");
        self.emit(Event::LocationCreated(created.id)).await;
        Ok(created)
    }

    pub async fn get_location(&self, location_id: Uuid) -> Result<location::Model, ServiceError> {
        Location::find_by_id(location_id)
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("location {} not found", location_id)))
    }

    pub async fn list_locations(&self) -> Result<Vec<location::Model>, ServiceError> {
        Location::find()
            .order_by_asc(location::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::db_error)
    }

    /// Delete a location. Rejected with `Conflict` while ledger history
    /// references it.
    #[instrument(skip(self))]
    pub async fn delete_location(
        &self,
        actor: &AuthContext,
        location_id: Uuid,
    ) -> Result<(), ServiceError> {
        actor.require(Capability::ManageCatalog)?;

        let db = self.db.as_ref();
        Location::find_by_id(location_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("location {} not found", location_id)))?;

        let adjustment_count = Adjustment::find()
            .filter(adjustment::Column::LocationId.eq(location_id))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;
        if adjustment_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "location {} has {} ledger entries and cannot be deleted",
                location_id, adjustment_count
            )));
        }

        InventoryLevel::delete_many()
            .filter(inventory_level::Column::LocationId.eq(location_id))
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;

        Location::delete_by_id(location_id)
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;
        info!(location_id = %location_id, "location deleted");
        self.emit(Event::LocationDeleted(location_id)).await;
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
