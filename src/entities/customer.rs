//! Customer entity - People who placed orders.
//!
//! Customers are created by staff or implicitly by the public checkout. No
//! deduplication by email or phone happens, every checkout inserts a new row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Unique identifier for the customer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer name
    pub name: String,
    /// Contact email, not validated
    pub email: String,
    /// Contact phone number, not validated
    pub phone: String,
    /// When the customer was created
    pub created_at: DateTimeUtc,
    /// When the customer was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Customer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One customer has many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
