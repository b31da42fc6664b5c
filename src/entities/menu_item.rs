//! Menu item entity - Represents sellable dishes and drinks.
//!
//! Each item has a name, category, integer price and availability flag.
//! Deleting an item only marks it deleted so historical order lines keep
//! resolving to it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Menu category. Stored and serialized with the restaurant's own labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Category {
    /// Food (`"Makanan"`)
    #[sea_orm(string_value = "Makanan")]
    #[serde(rename = "Makanan")]
    Food,
    /// Beverage (`"Minuman"`)
    #[sea_orm(string_value = "Minuman")]
    #[serde(rename = "Minuman")]
    Beverage,
}

/// Whether an item can currently be ordered from the public menu
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Availability {
    /// Can be ordered
    #[default]
    #[sea_orm(string_value = "Available")]
    Available,
    /// Temporarily unavailable
    #[sea_orm(string_value = "OutOfStock")]
    OutOfStock,
}

/// Menu item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_items")]
pub struct Model {
    /// Unique identifier for the menu item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Nasi Goreng")
    pub name: String,
    /// Food or beverage
    pub category: Category,
    /// Unit price in whole currency units
    pub price: i64,
    /// Whether the item can currently be ordered
    pub availability: Availability,
    /// Optional free-text description
    pub description: Option<String>,
    /// Optional image reference
    pub image_url: Option<String>,
    /// Soft delete flag - if true, item is hidden but order history still resolves it
    #[serde(default, skip_serializing)]
    pub is_deleted: bool,
    /// When the item was created
    pub created_at: DateTimeUtc,
    /// When the item was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between `MenuItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
