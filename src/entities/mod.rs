//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod customer;
pub mod menu_item;
pub mod order;
pub mod order_item;

// Re-export specific types to avoid conflicts
pub use customer::{Entity as Customer, Model as CustomerModel};
pub use menu_item::{Availability, Category, Entity as MenuItem, Model as MenuItemModel};
pub use order::{Entity as Order, Model as OrderModel, OrderStatus, OrderType};
pub use order_item::{Entity as OrderItem, Model as OrderItemModel};
