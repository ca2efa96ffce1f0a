use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Categorical tag on an adjustment that determines sign-normalization
/// policy at write time.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentReason {
    #[sea_orm(string_value = "usage")]
    Usage,
    #[sea_orm(string_value = "wastage")]
    Wastage,
    #[sea_orm(string_value = "correction")]
    Correction,
    #[sea_orm(string_value = "receive")]
    Receive,
}

impl AdjustmentReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentReason::Usage => "usage",
            AdjustmentReason::Wastage => "wastage",
            AdjustmentReason::Correction => "correction",
            AdjustmentReason::Receive => "receive",
        }
    }
}

/// Append-only ledger entry. The signed sum of all entries for an
/// (item, location) pair is the on-hand quantity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "adjustments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_id: Uuid,
    pub location_id: Uuid,
    pub change: i64,
    pub reason: AdjustmentReason,
    pub actor_id: Option<Uuid>,
    pub po_id: Option<Uuid>,
    pub po_line_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::entities::item::Entity",
        from = "Column::ItemId",
        to = "crate::entities::item::Column::Id"
    )]
    Item,
    #[sea_orm(
        belongs_to = "crate::entities::location::Entity",
        from = "Column::LocationId",
        to = "crate::entities::location::Column::Id"
    )]
    Location,
    #[sea_orm(
        belongs_to = "crate::entities::purchase_order::Entity",
        from = "Column::PoId",
        to = "crate::entities::purchase_order::Column::Id"
    )]
    PurchaseOrder,
    #[sea_orm(
        belongs_to = "crate::entities::purchase_order_line::Entity",
        from = "Column::PoLineId",
        to = "crate::entities::purchase_order_line::Column::Id"
    )]
    PurchaseOrderLine,
}

impl Related<crate::entities::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl Related<crate::entities::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<crate::entities::purchase_order_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrderLine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
