//! `/customers` handlers.

use super::{
    AppState,
    error::{ApiError, MessageBody},
};
use crate::{
    core::customer::{self, CustomerInput, CustomerWithOrders},
    entities::customer as customer_entity,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

/// Body of `POST /customers` and `PUT /customers/{id}`. Missing fields are empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CustomerRequest {
    #[serde(alias = "nama")]
    name: String,
    email: String,
    #[serde(alias = "telepon")]
    phone: String,
}

impl From<CustomerRequest> for CustomerInput {
    fn from(body: CustomerRequest) -> Self {
        Self {
            name: body.name,
            email: body.email,
            phone: body.phone,
        }
    }
}

pub(super) async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerWithOrders>>, ApiError> {
    let customers = customer::get_all_customers_with_orders(&state.db)
        .await
        .map_err(ApiError::context("Failed to fetch customers"))?;
    Ok(Json(customers))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Json(body): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<customer_entity::Model>), ApiError> {
    let created = customer::create_customer(&state.db, body.into())
        .await
        .map_err(ApiError::context("Failed to create customer"))?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<CustomerRequest>,
) -> Result<Json<customer_entity::Model>, ApiError> {
    let updated = customer::update_customer(&state.db, id, body.into())
        .await
        .map_err(ApiError::context("Failed to update customer"))?;
    Ok(Json(updated))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageBody>, ApiError> {
    customer::delete_customer(&state.db, id)
        .await
        .map_err(ApiError::context("Failed to delete customer"))?;
    Ok(MessageBody::new("Customer deleted successfully"))
}
