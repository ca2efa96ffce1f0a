use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A line is fixed at PO creation. `qty_received` is maintained in the same
/// transaction as each linked receive adjustment, so it always equals the sum
/// of those adjustments' `change` values.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_order_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub po_id: Uuid,
    pub item_id: Uuid,
    pub qty_ordered: i64,
    pub qty_received: i64,
    pub unit_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

impl Model {
    /// Quantity still outstanding for operator input, clamped to
    /// `[0, qty_ordered]`.
    pub fn pending(&self) -> i64 {
        crate::ledger::pending_qty(self.qty_ordered, self.qty_received)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::entities::purchase_order::Entity",
        from = "Column::PoId",
        to = "crate::entities::purchase_order::Column::Id"
    )]
    PurchaseOrder,
    #[sea_orm(
        belongs_to = "crate::entities::item::Entity",
        from = "Column::ItemId",
        to = "crate::entities::item::Column::Id"
    )]
    Item,
    #[sea_orm(has_many = "crate::entities::adjustment::Entity")]
    Adjustments,
}

impl Related<crate::entities::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrder.def()
    }
}

impl Related<crate::entities::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl Related<crate::entities::adjustment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Adjustments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
