//! `/menu` handlers.

use super::{
    AppState,
    error::{ApiError, MessageBody},
};
use crate::{
    core::menu::{self, MenuItemChanges, NewMenuItem},
    entities::{Availability, Category, menu_item},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

/// A price as sent by a form: either a JSON number or numeric text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    /// `25000`
    Number(i64),
    /// `"25000"`
    Text(String),
}

impl PriceInput {
    /// Converts to whole currency units.
    ///
    /// # Errors
    /// Returns `Error::InvalidPrice` for non-numeric text or a negative value.
    pub fn parse(&self) -> Result<i64> {
        match self {
            Self::Number(n) if *n < 0 => Err(Error::InvalidPrice {
                value: n.to_string(),
            }),
            Self::Number(n) => Ok(*n),
            Self::Text(text) => menu::parse_price(text),
        }
    }
}

/// Body of `POST /menu` and `PUT /menu/{id}`
#[derive(Debug, Deserialize)]
pub struct MenuItemRequest {
    #[serde(alias = "nama_item")]
    name: String,
    #[serde(alias = "kategori")]
    category: Category,
    #[serde(alias = "harga")]
    price: PriceInput,
    #[serde(default, alias = "deskripsi")]
    description: Option<String>,
    #[serde(default, alias = "gambar_url")]
    image_url: Option<String>,
    #[serde(default, alias = "ketersediaan")]
    availability: Option<Availability>,
}

pub(super) async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<menu_item::Model>>, ApiError> {
    let items = menu::get_all_menu_items(&state.db)
        .await
        .map_err(ApiError::context("Failed to fetch menu items"))?;
    Ok(Json(items))
}

pub(super) async fn create(
    State(state): State<AppState>,
    Json(body): Json<MenuItemRequest>,
) -> Result<(StatusCode, Json<menu_item::Model>), ApiError> {
    let context = ApiError::context("Failed to create menu item");
    let price = body.price.parse().map_err(context)?;

    let item = menu::create_menu_item(
        &state.db,
        NewMenuItem {
            name: body.name,
            category: body.category,
            price,
            description: body.description,
            image_url: body.image_url,
        },
    )
    .await
    .map_err(context)?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub(super) async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<menu_item::Model>, ApiError> {
    let context = ApiError::context("Failed to fetch menu item");
    let item = menu::get_menu_item_by_id(&state.db, id)
        .await
        .map_err(context)?
        .ok_or(Error::MenuItemNotFound { id })
        .map_err(context)?;
    Ok(Json(item))
}

pub(super) async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<MenuItemRequest>,
) -> Result<Json<menu_item::Model>, ApiError> {
    let context = ApiError::context("Failed to update menu item");
    let price = body.price.parse().map_err(context)?;

    let item = menu::update_menu_item(
        &state.db,
        id,
        MenuItemChanges {
            name: body.name,
            category: body.category,
            price,
            description: body.description,
            image_url: body.image_url,
            availability: body.availability,
        },
    )
    .await
    .map_err(context)?;
    Ok(Json(item))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageBody>, ApiError> {
    menu::delete_menu_item(&state.db, id)
        .await
        .map_err(ApiError::context("Failed to delete menu item"))?;
    Ok(MessageBody::new("Menu item deleted successfully"))
}
