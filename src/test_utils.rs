//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        customer::{self, CustomerInput},
        menu::{self, NewMenuItem},
        order::{self, NewOrder, NewOrderLine, OrderDetails},
    },
    entities::{self, Category, OrderType},
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::config::database::create_connection("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a food menu item request with the given name and price.
#[must_use]
pub fn new_menu_item(name: &str, price: i64) -> NewMenuItem {
    NewMenuItem {
        name: name.to_string(),
        category: Category::Food,
        price,
        description: None,
        image_url: None,
    }
}

/// Creates a food menu item with the given name and price.
pub async fn create_test_menu_item(
    db: &DatabaseConnection,
    name: &str,
    price: i64,
) -> Result<entities::menu_item::Model> {
    menu::create_menu_item(db, new_menu_item(name, price)).await
}

/// Creates a menu item in a specific category.
pub async fn create_custom_menu_item(
    db: &DatabaseConnection,
    name: &str,
    category: Category,
    price: i64,
) -> Result<entities::menu_item::Model> {
    let mut input = new_menu_item(name, price);
    input.category = category;
    menu::create_menu_item(db, input).await
}

/// Creates a customer with the given name.
///
/// # Defaults
/// * `email`: `"<name>@example.com"` (lowercased)
/// * `phone`: `"0812"`
pub async fn create_test_customer(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::customer::Model> {
    customer::create_customer(
        db,
        CustomerInput {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "0812".to_string(),
        },
    )
    .await
}

/// Places a dine-in order at table `"A1"` for one product.
pub async fn create_test_order(
    db: &DatabaseConnection,
    customer_id: i64,
    product_id: i64,
    quantity: i32,
) -> Result<OrderDetails> {
    order::create_order(
        db,
        NewOrder {
            customer_id,
            order_type: OrderType::DineIn,
            table_number: Some("A1".to_string()),
            pickup_time: None,
            items: vec![NewOrderLine {
                product_id,
                quantity,
                price: None,
            }],
        },
    )
    .await
}

/// Sets up a database holding one pending order for two 25000 items.
/// Returns (db, order) for order lifecycle tests.
pub async fn setup_with_order() -> Result<(DatabaseConnection, OrderDetails)> {
    let db = setup_test_db().await?;
    let item = create_test_menu_item(&db, "Nasi Goreng", 25000).await?;
    let customer = create_test_customer(&db, "Budi").await?;
    let order = create_test_order(&db, customer.id, item.id, 2).await?;
    Ok((db, order))
}
