//! `/orders` handlers.

use super::{
    AppState,
    error::{ApiError, MessageBody},
};
use crate::{
    core::order::{self, NewOrder, NewOrderLine, OrderDetails},
    entities::OrderType,
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// One line of `POST /orders`
#[derive(Debug, Deserialize)]
pub struct OrderLineRequest {
    product_id: i64,
    #[serde(alias = "quantity")]
    qty: i32,
    #[serde(default, alias = "harga")]
    price: Option<i64>,
}

/// Body of `POST /orders`
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    customer_id: i64,
    order_type: OrderType,
    #[serde(default)]
    table_number: Option<String>,
    #[serde(default)]
    pickup_time: Option<String>,
    #[serde(default, alias = "orderItems")]
    items: Vec<OrderLineRequest>,
}

impl TryFrom<CreateOrderRequest> for NewOrder {
    type Error = Error;

    fn try_from(body: CreateOrderRequest) -> Result<Self> {
        Ok(Self {
            customer_id: body.customer_id,
            order_type: body.order_type,
            table_number: body.table_number,
            pickup_time: parse_pickup_time(body.pickup_time.as_deref())?,
            items: body
                .items
                .into_iter()
                .map(|line| NewOrderLine {
                    product_id: line.product_id,
                    quantity: line.qty,
                    price: line.price,
                })
                .collect(),
        })
    }
}

/// Parses an RFC 3339 pickup time. Blank means none.
fn parse_pickup_time(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(raw)
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|e| Error::InvalidOrder {
            message: format!("pickup_time must be an RFC 3339 timestamp: {e}"),
        })
}

/// Body of `PUT /orders/{id}`. Any JSON value is accepted so that a
/// non-string status is reported as an invalid status.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    status: Option<Value>,
}

impl UpdateStatusRequest {
    /// The requested status text, or `Error::InvalidStatus` when it is not a string.
    fn status(&self) -> Result<&str> {
        match &self.status {
            Some(Value::String(status)) => Ok(status),
            other => Err(Error::InvalidStatus {
                value: other.as_ref().map_or_else(String::new, Value::to_string),
            }),
        }
    }
}

pub(super) async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderDetails>>, ApiError> {
    let orders = order::get_all_orders(&state.db)
        .await
        .map_err(ApiError::context("Failed to fetch orders"))?;
    Ok(Json(orders))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderDetails>), ApiError> {
    let context = ApiError::context("Failed to create order");
    let input = NewOrder::try_from(body).map_err(context)?;
    let created = order::create_order(&state.db, input)
        .await
        .map_err(context)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderDetails>, ApiError> {
    let context = ApiError::context("Failed to fetch order");
    let found = order::get_order_by_id(&state.db, id)
        .await
        .map_err(context)?
        .ok_or(Error::OrderNotFound { id })
        .map_err(context)?;
    Ok(Json(found))
}

pub(super) async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<OrderDetails>, ApiError> {
    let context = ApiError::context("Failed to update order");
    let status = body.status().map_err(context)?;
    let updated = order::update_order_status(&state.db, id, status, state.transition_policy)
        .await
        .map_err(context)?;
    Ok(Json(updated))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageBody>, ApiError> {
    order::delete_order(&state.db, id)
        .await
        .map_err(ApiError::context("Failed to delete order"))?;
    Ok(MessageBody::new("Order deleted successfully"))
}
