pub mod adjustments;
pub mod catalog;
pub mod inventory;
pub mod locations;
pub mod purchase_orders;
pub mod receiving;
pub mod reports;
pub mod vendors;
