//! Unified error type for the point-of-sale service.
//!
//! Business logic in [`crate::core`] returns these variants; the HTTP layer
//! maps each one onto a status code and a user-facing message.

use crate::entities::OrderStatus;
use thiserror::Error;

/// All errors that can occur in the application
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or environment problem
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Any failure reported by the persistence layer
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (binding the listener, reading files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Menu item does not exist or has been deleted
    #[error("Menu item not found: {id}")]
    MenuItemNotFound {
        /// Requested id
        id: i64,
    },

    /// Customer does not exist
    #[error("Customer not found: {id}")]
    CustomerNotFound {
        /// Requested id
        id: i64,
    },

    /// Order does not exist
    #[error("Order not found: {id}")]
    OrderNotFound {
        /// Requested id
        id: i64,
    },

    /// Status value outside the five literal statuses
    #[error("Invalid status: {value}")]
    InvalidStatus {
        /// The rejected value
        value: String,
    },

    /// Status change not allowed by the strict transition policy
    #[error("Cannot change order status from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: OrderStatus,
        /// Requested status
        to: OrderStatus,
    },

    /// Price that is not a non-negative integer
    #[error("Invalid price: {value}")]
    InvalidPrice {
        /// The rejected input, as received
        value: String,
    },

    /// Menu item payload that cannot be stored
    #[error("Invalid menu item: {message}")]
    InvalidMenuItem {
        /// Description of the problem
        message: String,
    },

    /// Order line quantity below one
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i32,
    },

    /// Order payload that violates an order invariant
    #[error("Invalid order: {message}")]
    InvalidOrder {
        /// Description of the violation
        message: String,
    },

    /// Report period reaching outside the representable date range
    #[error("Invalid report period: {days} days")]
    InvalidReportPeriod {
        /// Requested number of days
        days: u32,
    },

    /// Customer cannot be deleted while orders still reference it
    #[error("Customer {id} still has {order_count} order(s)")]
    CustomerHasOrders {
        /// Customer id
        id: i64,
        /// Number of orders referencing the customer
        order_count: u64,
    },

    /// Login attempt with a wrong username or password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Admin route called without a valid session token
    #[error("A valid admin session is required")]
    Unauthorized,
}

/// Convenience `Result` type
pub type Result<T, E = Error> = std::result::Result<T, E>;
