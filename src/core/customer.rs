//! Customer directory business logic.
//!
//! Customers are plain contact records. Nothing is validated or deduplicated: the
//! public checkout creates a fresh customer for every order it places. A customer
//! cannot be deleted while orders still reference it.

use crate::{
    entities::{Customer, Order, OrderStatus, customer, order},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Serialize;
use std::collections::HashMap;

/// Contact fields supplied when creating or editing a customer.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    /// Customer name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone number
    pub phone: String,
}

/// The slice of an order shown next to its customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    /// Order id
    pub id: i64,
    /// Order total
    pub total_price: i64,
    /// Current status
    pub status: OrderStatus,
    /// When the order was placed
    pub created_at: DateTimeUtc,
}

impl From<order::Model> for OrderSummary {
    fn from(order: order::Model) -> Self {
        Self {
            id: order.id,
            total_price: order.total_price,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

/// A customer together with the orders they placed, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerWithOrders {
    /// The customer record
    #[serde(flatten)]
    pub customer: customer::Model,
    /// Orders placed by the customer
    pub orders: Vec<OrderSummary>,
}

/// Lists every customer with their orders, both newest first.
///
/// # Errors
/// Returns an error if a database query fails.
pub async fn get_all_customers_with_orders(
    db: &DatabaseConnection,
) -> Result<Vec<CustomerWithOrders>> {
    let customers = Customer::find()
        .order_by_desc(customer::Column::CreatedAt)
        .order_by_desc(customer::Column::Id)
        .all(db)
        .await?;

    let ids: Vec<i64> = customers.iter().map(|c| c.id).collect();
    let orders = Order::find()
        .filter(order::Column::CustomerId.is_in(ids))
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;

    let mut by_customer: HashMap<i64, Vec<OrderSummary>> = HashMap::new();
    for order in orders {
        by_customer
            .entry(order.customer_id)
            .or_default()
            .push(order.into());
    }

    Ok(customers
        .into_iter()
        .map(|customer| CustomerWithOrders {
            orders: by_customer.remove(&customer.id).unwrap_or_default(),
            customer,
        })
        .collect())
}

/// Finds a customer by id.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_customer_by_id<C>(db: &C, customer_id: i64) -> Result<Option<customer::Model>>
where
    C: ConnectionTrait,
{
    Customer::find_by_id(customer_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a customer record exactly as supplied.
///
/// # Errors
/// Returns an error if the database insert fails.
pub async fn create_customer(
    db: &DatabaseConnection,
    input: CustomerInput,
) -> Result<customer::Model> {
    let now = chrono::Utc::now();
    let customer = customer::ActiveModel {
        name: Set(input.name),
        email: Set(input.email),
        phone: Set(input.phone),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    customer.insert(db).await.map_err(Into::into)
}

/// Replaces a customer's contact fields.
///
/// # Errors
/// Returns an error if the customer does not exist or the update fails.
pub async fn update_customer(
    db: &DatabaseConnection,
    customer_id: i64,
    input: CustomerInput,
) -> Result<customer::Model> {
    let mut customer: customer::ActiveModel = get_customer_by_id(db, customer_id)
        .await?
        .ok_or(Error::CustomerNotFound { id: customer_id })?
        .into();

    customer.name = Set(input.name);
    customer.email = Set(input.email);
    customer.phone = Set(input.phone);
    customer.updated_at = Set(chrono::Utc::now());

    customer.update(db).await.map_err(Into::into)
}

/// Deletes a customer that has no orders.
///
/// # Errors
/// Returns an error if:
/// - The customer does not exist
/// - Orders still reference the customer
/// - The database operation fails
pub async fn delete_customer(db: &DatabaseConnection, customer_id: i64) -> Result<()> {
    let customer = get_customer_by_id(db, customer_id)
        .await?
        .ok_or(Error::CustomerNotFound { id: customer_id })?;

    let order_count = Order::find()
        .filter(order::Column::CustomerId.eq(customer_id))
        .count(db)
        .await?;
    if order_count > 0 {
        return Err(Error::CustomerHasOrders {
            id: customer_id,
            order_count,
        });
    }

    customer.delete(db).await?;
    tracing::info!(customer_id, "customer deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_customer_keeps_input_verbatim() -> Result<()> {
        let db = setup_test_db().await?;

        let customer = create_customer(
            &db,
            CustomerInput {
                name: String::new(),
                email: "not-an-email".to_string(),
                phone: "abc".to_string(),
            },
        )
        .await?;

        assert_eq!(customer.name, "");
        assert_eq!(customer.email, "not-an-email");
        assert_eq!(customer.phone, "abc");

        Ok(())
    }

    #[tokio::test]
    async fn test_same_contact_creates_two_customers() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create_test_customer(&db, "Budi").await?;
        let second = create_test_customer(&db, "Budi").await?;
        assert_ne!(first.id, second.id);

        let customers = get_all_customers_with_orders(&db).await?;
        assert_eq!(customers.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_customers_with_orders_newest_first() -> Result<()> {
        let db = setup_test_db().await?;
        let item = create_test_menu_item(&db, "Nasi Goreng", 25000).await?;
        let budi = create_test_customer(&db, "Budi").await?;
        let siti = create_test_customer(&db, "Siti").await?;

        let older = create_test_order(&db, budi.id, item.id, 1).await?;
        let newer = create_test_order(&db, budi.id, item.id, 2).await?;

        let customers = get_all_customers_with_orders(&db).await?;
        assert_eq!(customers.len(), 2);

        assert_eq!(customers[0].customer.id, siti.id);
        assert!(customers[0].orders.is_empty());

        assert_eq!(customers[1].customer.id, budi.id);
        let order_ids: Vec<i64> = customers[1].orders.iter().map(|o| o.id).collect();
        assert_eq!(order_ids, vec![newer.order.id, older.order.id]);
        assert_eq!(customers[1].orders[0].total_price, 50000);
        assert_eq!(customers[1].orders[0].status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_customer() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Budi").await?;

        let updated = update_customer(
            &db,
            customer.id,
            CustomerInput {
                name: "Budi Santoso".to_string(),
                email: "budi@y.com".to_string(),
                phone: "0813".to_string(),
            },
        )
        .await?;

        assert_eq!(updated.id, customer.id);
        assert_eq!(updated.name, "Budi Santoso");
        assert_eq!(updated.email, "budi@y.com");
        assert_eq!(updated.phone, "0813");

        let missing = update_customer(
            &db,
            999,
            CustomerInput {
                name: String::new(),
                email: String::new(),
                phone: String::new(),
            },
        )
        .await;
        assert!(matches!(missing, Err(Error::CustomerNotFound { id: 999 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_customer_without_orders() -> Result<()> {
        let db = setup_test_db().await?;
        let customer = create_test_customer(&db, "Budi").await?;

        delete_customer(&db, customer.id).await?;
        assert!(get_customer_by_id(&db, customer.id).await?.is_none());

        let again = delete_customer(&db, customer.id).await;
        assert!(matches!(again, Err(Error::CustomerNotFound { id: _ })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_customer_with_orders_is_refused() -> Result<()> {
        let db = setup_test_db().await?;
        let item = create_test_menu_item(&db, "Nasi Goreng", 25000).await?;
        let customer = create_test_customer(&db, "Budi").await?;
        create_test_order(&db, customer.id, item.id, 1).await?;

        let result = delete_customer(&db, customer.id).await;
        assert!(matches!(
            result,
            Err(Error::CustomerHasOrders { order_count: 1, .. })
        ));
        assert!(get_customer_by_id(&db, customer.id).await?.is_some());

        Ok(())
    }
}
