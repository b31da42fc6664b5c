//! Menu catalog business logic - Handles all menu item operations.
//!
//! This module provides functions for listing, creating, updating and removing the
//! dishes and drinks the restaurant sells. Prices are whole currency units. Removing
//! an item only marks it deleted: it disappears from the catalog and can no longer be
//! priced into new orders, but existing order lines still resolve it.

use crate::{
    entities::{Availability, Category, MenuItem, menu_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields needed to add an item to the menu.
#[derive(Debug, Clone)]
pub struct NewMenuItem {
    /// Display name
    pub name: String,
    /// Food or beverage
    pub category: Category,
    /// Unit price
    pub price: i64,
    /// Optional description
    pub description: Option<String>,
    /// Optional image reference
    pub image_url: Option<String>,
}

/// Full replacement of an item's editable fields.
#[derive(Debug, Clone)]
pub struct MenuItemChanges {
    /// Display name
    pub name: String,
    /// Food or beverage
    pub category: Category,
    /// Unit price
    pub price: i64,
    /// Optional description
    pub description: Option<String>,
    /// Optional image reference
    pub image_url: Option<String>,
    /// Whether the item can be ordered; `None` keeps the current value
    pub availability: Option<Availability>,
}

/// Parses a price typed into a form into whole currency units.
///
/// Surrounding whitespace is ignored. Anything that is not a non-negative
/// integer is rejected.
///
/// # Errors
/// Returns `Error::InvalidPrice` for non-numeric or negative input.
pub fn parse_price(raw: &str) -> Result<i64> {
    let price = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidPrice {
            value: raw.to_string(),
        })?;
    validate_price(price)
}

fn validate_price(price: i64) -> Result<i64> {
    if price < 0 {
        return Err(Error::InvalidPrice {
            value: price.to_string(),
        });
    }
    Ok(price)
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidMenuItem {
            message: "Menu item name cannot be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Retrieves all menu items that have not been deleted, newest first.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_menu_items(db: &DatabaseConnection) -> Result<Vec<menu_item::Model>> {
    MenuItem::find()
        .filter(menu_item::Column::IsDeleted.eq(false))
        .order_by_desc(menu_item::Column::CreatedAt)
        .order_by_desc(menu_item::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a menu item by id, returning None if it does not exist or was deleted.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_menu_item_by_id<C>(db: &C, item_id: i64) -> Result<Option<menu_item::Model>>
where
    C: ConnectionTrait,
{
    MenuItem::find_by_id(item_id)
        .filter(menu_item::Column::IsDeleted.eq(false))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Adds a new item to the menu. New items start out `Available`.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - The price is negative
/// - The database insert operation fails
pub async fn create_menu_item(
    db: &DatabaseConnection,
    input: NewMenuItem,
) -> Result<menu_item::Model> {
    let name = validate_name(&input.name)?;
    let price = validate_price(input.price)?;
    let now = chrono::Utc::now();

    let item = menu_item::ActiveModel {
        name: Set(name),
        category: Set(input.category),
        price: Set(price),
        availability: Set(Availability::Available),
        description: Set(input.description),
        image_url: Set(input.image_url),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    item.insert(db).await.map_err(Into::into)
}

/// Replaces the editable fields of a menu item and refreshes its update time.
///
/// Existing orders keep the prices they were created with.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or the price negative
/// - The item does not exist or is deleted
/// - The database update operation fails
pub async fn update_menu_item(
    db: &DatabaseConnection,
    item_id: i64,
    changes: MenuItemChanges,
) -> Result<menu_item::Model> {
    let name = validate_name(&changes.name)?;
    let price = validate_price(changes.price)?;

    let mut item: menu_item::ActiveModel = get_menu_item_by_id(db, item_id)
        .await?
        .ok_or(Error::MenuItemNotFound { id: item_id })?
        .into();

    item.name = Set(name);
    item.category = Set(changes.category);
    item.price = Set(price);
    item.description = Set(changes.description);
    item.image_url = Set(changes.image_url);
    if let Some(availability) = changes.availability {
        item.availability = Set(availability);
    }
    item.updated_at = Set(chrono::Utc::now());

    item.update(db).await.map_err(Into::into)
}

/// Soft deletes a menu item, preserving order history.
///
/// # Errors
/// Returns an error if:
/// - The item does not exist or is already deleted
/// - The database update operation fails
pub async fn delete_menu_item(db: &DatabaseConnection, item_id: i64) -> Result<menu_item::Model> {
    let mut item: menu_item::ActiveModel = get_menu_item_by_id(db, item_id)
        .await?
        .ok_or(Error::MenuItemNotFound { id: item_id })?
        .into();

    item.is_deleted = Set(true);
    item.updated_at = Set(chrono::Utc::now());

    let deleted = item.update(db).await?;
    tracing::info!(menu_item_id = item_id, "menu item deleted");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("25000").unwrap(), 25000);
        assert_eq!(parse_price(" 15000 ").unwrap(), 15000);
        assert_eq!(parse_price("0").unwrap(), 0);

        for bad in ["", "abc", "12.5", "25000abc", "-1"] {
            assert!(matches!(
                parse_price(bad),
                Err(Error::InvalidPrice { value: _ })
            ));
        }
    }

    #[tokio::test]
    async fn test_create_menu_item_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let mut input = new_menu_item("   ", 10_000);
        let result = create_menu_item(&db, input.clone()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidMenuItem { message: _ }
        ));

        input.name = "Es Teh".to_string();
        input.price = -5;
        let result = create_menu_item(&db, input).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidPrice { value: _ }
        ));

        assert!(get_all_menu_items(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_menu_item_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let item = create_menu_item(
            &db,
            NewMenuItem {
                name: "  Es Jeruk ".to_string(),
                category: Category::Beverage,
                price: 8000,
                description: Some("Fresh orange".to_string()),
                image_url: None,
            },
        )
        .await?;

        assert_eq!(item.name, "Es Jeruk");
        assert_eq!(item.category, Category::Beverage);
        assert_eq!(item.price, 8000);
        assert_eq!(item.availability, Availability::Available);
        assert_eq!(item.description.as_deref(), Some("Fresh orange"));
        assert!(!item.is_deleted);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_all_menu_items_newest_first() -> Result<()> {
        let db = setup_test_db().await?;

        let first = create_test_menu_item(&db, "Nasi Goreng", 25000).await?;
        let second = create_test_menu_item(&db, "Mie Ayam", 20000).await?;

        let items = get_all_menu_items(&db).await?;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, second.id);
        assert_eq!(items[1].id, first.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_menu_item_replaces_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let item = create_test_menu_item(&db, "Sate", 30000).await?;

        let updated = update_menu_item(
            &db,
            item.id,
            MenuItemChanges {
                name: "Sate Ayam".to_string(),
                category: Category::Food,
                price: 32000,
                description: None,
                image_url: Some("/img/sate.png".to_string()),
                availability: Some(Availability::OutOfStock),
            },
        )
        .await?;

        assert_eq!(updated.id, item.id);
        assert_eq!(updated.name, "Sate Ayam");
        assert_eq!(updated.price, 32000);
        assert_eq!(updated.availability, Availability::OutOfStock);
        assert_eq!(updated.image_url.as_deref(), Some("/img/sate.png"));
        assert!(updated.updated_at >= item.updated_at);

        let retrieved = get_menu_item_by_id(&db, item.id).await?.unwrap();
        assert_eq!(retrieved, updated);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_menu_item_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_menu_item(
            &db,
            999,
            MenuItemChanges {
                name: "Ghost".to_string(),
                category: Category::Food,
                price: 1,
                description: None,
                image_url: None,
                availability: None,
            },
        )
        .await;
        assert!(matches!(result, Err(Error::MenuItemNotFound { id: 999 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_menu_item_hides_it() -> Result<()> {
        let db = setup_test_db().await?;
        let kept = create_test_menu_item(&db, "Bakso", 18000).await?;
        let removed = create_test_menu_item(&db, "Soto", 22000).await?;

        let deleted = delete_menu_item(&db, removed.id).await?;
        assert!(deleted.is_deleted);

        let items = get_all_menu_items(&db).await?;
        assert_eq!(items, vec![kept]);
        assert!(get_menu_item_by_id(&db, removed.id).await?.is_none());

        // Row is still there for order history
        assert!(MenuItem::find_by_id(removed.id).one(&db).await?.is_some());

        // Deleting twice reports not found
        let again = delete_menu_item(&db, removed.id).await;
        assert!(matches!(again, Err(Error::MenuItemNotFound { id: _ })));

        Ok(())
    }
}
