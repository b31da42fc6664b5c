//! Order entity - A customer's order and its lifecycle status.
//!
//! Each order has a `customer_id`, an order type (dine-in or takeaway), the
//! table number or pickup time that goes with that type, a `total_price`
//! computed once at creation, and a status.

use crate::errors::Error;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How the order is served
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum OrderType {
    /// Eaten at a table; carries a table number
    #[sea_orm(string_value = "DineIn")]
    DineIn,
    /// Picked up by the customer; carries a pickup time
    #[sea_orm(string_value = "Takeaway")]
    Takeaway,
}

/// Lifecycle status of an order.
///
/// The kitchen flow is `Pending → Confirmed → Preparing → Completed`, with
/// `Canceled` reachable from any of the first three. `Completed` and
/// `Canceled` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum OrderStatus {
    /// Newly placed, not yet accepted
    #[sea_orm(string_value = "Pending")]
    Pending,
    /// Accepted by staff
    #[sea_orm(string_value = "Confirmed")]
    Confirmed,
    /// Being prepared in the kitchen
    #[sea_orm(string_value = "Preparing")]
    Preparing,
    /// Handed over to the customer
    #[sea_orm(string_value = "Completed")]
    Completed,
    /// Abandoned before completion
    #[sea_orm(string_value = "Canceled")]
    Canceled,
}

impl OrderStatus {
    /// Every status, in kitchen-flow order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Completed,
        Self::Canceled,
    ];

    /// The literal value used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Preparing",
            Self::Completed => "Completed",
            Self::Canceled => "Canceled",
        }
    }

    /// The status staff would normally move to next, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Preparing),
            Self::Preparing => Some(Self::Completed),
            Self::Completed | Self::Canceled => None,
        }
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }

    /// Whether `target` is a legal move in the state machine.
    ///
    /// Staying on the same status is not a transition and returns false.
    #[must_use]
    pub fn can_transition_to(self, target: Self) -> bool {
        if self.is_terminal() || self == target {
            return false;
        }
        target == Self::Canceled || self.next() == Some(target)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    /// Parses one of the five literal values, case-sensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| Error::InvalidStatus {
                value: value.to_string(),
            })
    }
}

/// Order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer who placed the order
    pub customer_id: i64,
    /// Dine-in or takeaway
    pub order_type: OrderType,
    /// Table number, only for dine-in orders
    pub table_number: Option<String>,
    /// Pickup time, only for takeaway orders
    pub pickup_time: Option<DateTimeUtc>,
    /// Total computed from catalog prices at creation; never recomputed
    pub total_price: i64,
    /// Current lifecycle status
    pub status: OrderStatus,
    /// When the order was placed
    pub created_at: DateTimeUtc,
    /// When the order was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    /// One order has many lines
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItems,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_exact_literals_only() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().ok(), Some(status));
        }

        for bad in ["pending", "PENDING", "Zebra", "", " Pending", "Cancelled"] {
            assert!(matches!(
                bad.parse::<OrderStatus>(),
                Err(Error::InvalidStatus { value }) if value == bad
            ));
        }
    }

    #[test]
    fn test_next_status_follows_kitchen_flow() {
        assert_eq!(OrderStatus::Pending.next(), Some(OrderStatus::Confirmed));
        assert_eq!(OrderStatus::Confirmed.next(), Some(OrderStatus::Preparing));
        assert_eq!(OrderStatus::Preparing.next(), Some(OrderStatus::Completed));
        assert_eq!(OrderStatus::Completed.next(), None);
        assert_eq!(OrderStatus::Canceled.next(), None);
    }

    #[test]
    fn test_transition_rules() {
        use OrderStatus::{Canceled, Completed, Confirmed, Pending, Preparing};

        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Canceled));
        assert!(Preparing.can_transition_to(Canceled));
        assert!(!Pending.can_transition_to(Preparing));
        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Canceled));
        assert!(!Canceled.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Confirmed));
    }

    #[test]
    fn test_status_serializes_as_literal() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap_or_default();
        assert_eq!(json, "\"Preparing\"");
    }
}
