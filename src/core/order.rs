//! Order lifecycle business logic - creation, pricing, status changes and removal.
//!
//! An order's total is computed once, when the order is created, from the catalog
//! prices current at that moment. Lines whose product cannot be found are still
//! stored, with the price the client sent (or zero), but add nothing to the total.
//! Creation and deletion each run inside a single database transaction.

use crate::{
    entities::{
        Category, Customer, MenuItem, Order, OrderItem, OrderStatus, OrderType, customer,
        menu_item, order, order_item,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How strictly order status updates are checked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any of the five statuses is accepted regardless of the current one
    #[default]
    Permissive,
    /// Only moves allowed by the status state machine are accepted
    Strict,
}

/// One requested order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderLine {
    /// Menu item being ordered
    pub product_id: i64,
    /// Number of units
    pub quantity: i32,
    /// Unit price sent by the client; only used when the product cannot be found
    pub price: Option<i64>,
}

/// Everything needed to place an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Customer placing the order
    pub customer_id: i64,
    /// Dine-in or takeaway
    pub order_type: OrderType,
    /// Required for dine-in, ignored for takeaway
    pub table_number: Option<String>,
    /// Required for takeaway, ignored for dine-in
    pub pickup_time: Option<DateTimeUtc>,
    /// Requested lines, in order
    pub items: Vec<NewOrderLine>,
}

/// A line after pricing against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    /// Menu item being ordered
    pub product_id: i64,
    /// Number of units
    pub quantity: i32,
    /// Unit price to store on the line
    pub unit_price: i64,
    /// Whether the product was found in the catalog
    pub resolved: bool,
}

/// Customer fields embedded in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerContact {
    /// Customer id
    pub id: i64,
    /// Customer name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone number
    pub phone: String,
}

impl From<customer::Model> for CustomerContact {
    fn from(customer: customer::Model) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
        }
    }
}

/// Menu item fields embedded in an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    /// Menu item id
    pub id: i64,
    /// Menu item name
    pub name: String,
    /// Current catalog price, which may differ from the line's unit price
    pub price: i64,
    /// Food or beverage
    pub category: Category,
}

impl From<menu_item::Model> for ProductSummary {
    fn from(item: menu_item::Model) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            category: item.category,
        }
    }
}

/// An order line with its product resolved, if it still exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    /// The stored line
    #[serde(flatten)]
    pub item: order_item::Model,
    /// The referenced menu item
    pub product: Option<ProductSummary>,
}

/// An order with its customer and lines resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDetails {
    /// The stored order
    #[serde(flatten)]
    pub order: order::Model,
    /// The customer who placed it
    pub customer: Option<CustomerContact>,
    /// Order lines in the order they were placed
    pub items: Vec<OrderLine>,
    /// Suggested next status for staff
    pub next_status: Option<OrderStatus>,
}

/// Checks an order request and drops the field that does not belong to its type.
///
/// # Errors
/// Returns an error if:
/// - A line has a quantity below one
/// - A line carries a negative client price
/// - A dine-in order has no table number
/// - A takeaway order has no pickup time
pub fn validate_new_order(mut input: NewOrder) -> Result<NewOrder> {
    for line in &input.items {
        if line.quantity < 1 {
            return Err(Error::InvalidQuantity {
                quantity: line.quantity,
            });
        }
        if let Some(price) = line.price.filter(|p| *p < 0) {
            return Err(Error::InvalidPrice {
                value: price.to_string(),
            });
        }
    }

    match input.order_type {
        OrderType::DineIn => {
            let table = input
                .table_number
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string)
                .ok_or_else(|| Error::InvalidOrder {
                    message: "Dine-in orders need a table number".to_string(),
                })?;
            input.table_number = Some(table);
            input.pickup_time = None;
        }
        OrderType::Takeaway => {
            if input.pickup_time.is_none() {
                return Err(Error::InvalidOrder {
                    message: "Takeaway orders need a pickup time".to_string(),
                });
            }
            input.table_number = None;
        }
    }

    Ok(input)
}

/// Prices order lines against catalog prices and returns them with the order total.
///
/// A line whose product is in `catalog` stores the catalog price and adds
/// `price × quantity` to the total. Any other line stores the client price or zero
/// and adds nothing.
///
/// # Errors
/// Returns `Error::InvalidOrder` if the total does not fit in an `i64`.
pub fn price_order_lines(
    lines: &[NewOrderLine],
    catalog: &HashMap<i64, i64>,
) -> Result<(Vec<PricedLine>, i64)> {
    let overflow = || Error::InvalidOrder {
        message: "Order total is too large".to_string(),
    };

    let mut total: i64 = 0;
    let mut priced = Vec::with_capacity(lines.len());
    for line in lines {
        let catalog_price = catalog.get(&line.product_id).copied();
        if let Some(price) = catalog_price {
            let subtotal = price
                .checked_mul(i64::from(line.quantity))
                .ok_or_else(overflow)?;
            total = total.checked_add(subtotal).ok_or_else(overflow)?;
        }
        priced.push(PricedLine {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price: catalog_price.or(line.price).unwrap_or(0),
            resolved: catalog_price.is_some(),
        });
    }

    Ok((priced, total))
}

/// Places an order: validates it, prices it from the catalog and stores it with
/// status `Pending`.
///
/// # Errors
/// Returns an error if:
/// - The request fails validation (see [`validate_new_order`])
/// - The customer does not exist
/// - Any database operation fails, in which case nothing is stored
pub async fn create_order(db: &DatabaseConnection, input: NewOrder) -> Result<OrderDetails> {
    let input = validate_new_order(input)?;

    let txn = db.begin().await?;

    if Customer::find_by_id(input.customer_id)
        .one(&txn)
        .await?
        .is_none()
    {
        return Err(Error::InvalidOrder {
            message: format!("Customer {} does not exist", input.customer_id),
        });
    }

    let product_ids: HashSet<i64> = input.items.iter().map(|l| l.product_id).collect();
    let catalog: HashMap<i64, i64> = MenuItem::find()
        .filter(menu_item::Column::Id.is_in(product_ids))
        .filter(menu_item::Column::IsDeleted.eq(false))
        .all(&txn)
        .await?
        .into_iter()
        .map(|item| (item.id, item.price))
        .collect();

    let (lines, total_price) = price_order_lines(&input.items, &catalog)?;
    let unresolved = lines.iter().filter(|l| !l.resolved).count();
    if unresolved > 0 {
        tracing::warn!(
            unresolved,
            "order lines reference unknown products; they add nothing to the total"
        );
    }

    let now = chrono::Utc::now();
    let order = order::ActiveModel {
        customer_id: Set(input.customer_id),
        order_type: Set(input.order_type),
        table_number: Set(input.table_number),
        pickup_time: Set(input.pickup_time),
        total_price: Set(total_price),
        status: Set(OrderStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for line in lines {
        order_item::ActiveModel {
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    tracing::info!(order_id = order.id, total_price, "order created");

    get_order_by_id(db, order.id)
        .await?
        .ok_or(Error::OrderNotFound { id: order.id })
}

/// Lists every order with customer and lines resolved, newest first.
///
/// # Errors
/// Returns an error if a database query fails.
pub async fn get_all_orders(db: &DatabaseConnection) -> Result<Vec<OrderDetails>> {
    let orders = Order::find()
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;
    load_details(db, orders).await
}

/// Finds one order with customer and lines resolved.
///
/// # Errors
/// Returns an error if a database query fails.
pub async fn get_order_by_id(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Option<OrderDetails>> {
    let Some(order) = Order::find_by_id(order_id).one(db).await? else {
        return Ok(None);
    };
    Ok(load_details(db, vec![order]).await?.pop())
}

/// Sets an order's status and refreshes its update time.
///
/// `status` must be one of the five literal values. Under
/// [`TransitionPolicy::Strict`] the move must also be allowed by
/// [`OrderStatus::can_transition_to`]; setting the current status again is
/// always accepted. Nothing is written when the request is rejected. The total
/// price is never touched.
///
/// # Errors
/// Returns an error if:
/// - `status` is not a known status
/// - The order does not exist
/// - The strict policy rejects the transition
/// - The database update fails
pub async fn update_order_status(
    db: &DatabaseConnection,
    order_id: i64,
    status: &str,
    policy: TransitionPolicy,
) -> Result<OrderDetails> {
    let target: OrderStatus = status.parse()?;

    let current = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    let from = current.status;
    if policy == TransitionPolicy::Strict && from != target && !from.can_transition_to(target) {
        return Err(Error::InvalidTransition { from, to: target });
    }

    let mut active: order::ActiveModel = current.into();
    active.status = Set(target);
    active.updated_at = Set(chrono::Utc::now());
    active.update(db).await?;
    tracing::info!(order_id, %from, to = %target, "order status updated");

    get_order_by_id(db, order_id)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })
}

/// Deletes an order and all of its lines in one transaction.
///
/// # Errors
/// Returns an error if the order does not exist or a database operation fails,
/// in which case nothing is removed.
pub async fn delete_order(db: &DatabaseConnection, order_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let order = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    let removed = OrderItem::delete_many()
        .filter(order_item::Column::OrderId.eq(order_id))
        .exec(&txn)
        .await?;
    order.delete(&txn).await?;

    txn.commit().await?;
    tracing::info!(
        order_id,
        removed_items = removed.rows_affected,
        "order deleted"
    );
    Ok(())
}

/// Resolves customers, lines and products for a batch of orders, keeping their order.
async fn load_details(
    db: &DatabaseConnection,
    orders: Vec<order::Model>,
) -> Result<Vec<OrderDetails>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let customer_ids: HashSet<i64> = orders.iter().map(|o| o.customer_id).collect();

    let customers: HashMap<i64, customer::Model> = Customer::find()
        .filter(customer::Column::Id.is_in(customer_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let items = OrderItem::find()
        .filter(order_item::Column::OrderId.is_in(order_ids))
        .order_by_asc(order_item::Column::Id)
        .all(db)
        .await?;

    // Deleted menu items are included so history keeps its product names
    let product_ids: HashSet<i64> = items.iter().map(|i| i.product_id).collect();
    let products: HashMap<i64, menu_item::Model> = MenuItem::find()
        .filter(menu_item::Column::Id.is_in(product_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut lines_by_order: HashMap<i64, Vec<OrderLine>> = HashMap::new();
    for item in items {
        let product = products.get(&item.product_id).cloned().map(Into::into);
        lines_by_order
            .entry(item.order_id)
            .or_default()
            .push(OrderLine { item, product });
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            // A customer may own several orders in the batch
            let customer = customers
                .get(&order.customer_id)
                .cloned()
                .map(CustomerContact::from);
            OrderDetails {
                customer,
                items: lines_by_order.remove(&order.id).unwrap_or_default(),
                next_status: order.status.next(),
                order,
            }
        })
        .collect())
}
