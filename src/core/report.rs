//! Sales report generation.
//!
//! Reports are pure read-side summaries over stored orders: revenue from completed
//! orders, completion rate, best sellers and revenue per menu category. Nothing here
//! writes to the database.

use crate::{
    core::order::{OrderDetails, get_all_orders},
    entities::{Category, OrderStatus},
    errors::Result,
};
use sea_orm::{DatabaseConnection, Iterable, prelude::DateTimeUtc};
use serde::Serialize;
use std::collections::HashMap;

/// How many best sellers a report lists.
pub const TOP_SELLER_LIMIT: usize = 5;

/// A menu item ranked by units sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopSeller {
    /// Menu item id
    pub product_id: i64,
    /// Menu item name
    pub name: String,
    /// Units sold across the reported orders
    pub quantity_sold: i64,
}

/// Line revenue attributed to one menu category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRevenue {
    /// Food or beverage
    pub category: Category,
    /// Sum of unit price × quantity over the category's lines
    pub revenue: i64,
}

/// Summary of orders placed since a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    /// Start of the reported period; `None` means all time
    pub since: Option<DateTimeUtc>,
    /// Sum of totals of completed orders
    pub total_revenue: i64,
    /// Number of orders in the period
    pub total_orders: usize,
    /// Number of completed orders in the period
    pub completed_orders: usize,
    /// Completed orders as a percentage of all orders (0-100)
    pub completion_rate: f64,
    /// Number of distinct customers who ordered
    pub unique_customers: usize,
    /// Best sellers by units sold, most first
    pub top_sellers: Vec<TopSeller>,
    /// Line revenue per category, in catalog order
    pub revenue_by_category: Vec<CategoryRevenue>,
}

/// Calculates completed orders as a percentage of all orders.
///
/// Returns 0 when there are no orders.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_completion_rate(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    (completed as f64 / total as f64) * 100.0
}

/// Builds a report from already loaded orders.
///
/// Only orders created at or after `since` are counted. Lines whose product no
/// longer resolves are left out of best sellers and category revenue.
#[must_use]
pub fn summarize_orders(orders: &[OrderDetails], since: Option<DateTimeUtc>) -> SalesReport {
    let in_period: Vec<&OrderDetails> = orders
        .iter()
        .filter(|o| since.is_none_or(|start| o.order.created_at >= start))
        .collect();

    let completed: Vec<&&OrderDetails> = in_period
        .iter()
        .filter(|o| o.order.status == OrderStatus::Completed)
        .collect();
    let total_revenue = completed.iter().map(|o| o.order.total_price).sum();

    let mut customers: Vec<i64> = in_period.iter().map(|o| o.order.customer_id).collect();
    customers.sort_unstable();
    customers.dedup();

    let mut sold: HashMap<i64, TopSeller> = HashMap::new();
    let mut by_category: HashMap<Category, i64> = HashMap::new();
    for line in in_period.iter().flat_map(|o| &o.items) {
        let Some(product) = &line.product else {
            continue;
        };
        let quantity = i64::from(line.item.quantity);

        sold.entry(product.id)
            .or_insert_with(|| TopSeller {
                product_id: product.id,
                name: product.name.clone(),
                quantity_sold: 0,
            })
            .quantity_sold += quantity;

        *by_category.entry(product.category).or_insert(0) +=
            line.item.unit_price.saturating_mul(quantity);
    }

    let mut top_sellers: Vec<TopSeller> = sold.into_values().collect();
    top_sellers.sort_by(|a, b| {
        b.quantity_sold
            .cmp(&a.quantity_sold)
            .then(a.product_id.cmp(&b.product_id))
    });
    top_sellers.truncate(TOP_SELLER_LIMIT);

    let revenue_by_category = Category::iter()
        .map(|category| CategoryRevenue {
            category,
            revenue: by_category.get(&category).copied().unwrap_or(0),
        })
        .collect();

    SalesReport {
        since,
        total_revenue,
        total_orders: in_period.len(),
        completed_orders: completed.len(),
        completion_rate: calculate_completion_rate(completed.len(), in_period.len()),
        unique_customers: customers.len(),
        top_sellers,
        revenue_by_category,
    }
}

/// Generates a sales report over orders created since `since` (all time if `None`).
///
/// # Errors
/// Returns an error if loading orders fails.
pub async fn generate_sales_report(
    db: &DatabaseConnection,
    since: Option<DateTimeUtc>,
) -> Result<SalesReport> {
    let orders = get_all_orders(db).await?;
    Ok(summarize_orders(&orders, since))
}
