pub mod adjustment;
pub mod inventory_level;
pub mod item;
pub mod location;
pub mod purchase_order;
pub mod purchase_order_line;
pub mod vendor;

pub use adjustment::AdjustmentReason;
pub use purchase_order::PurchaseOrderStatus;
