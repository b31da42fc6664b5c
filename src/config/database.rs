//! Database configuration module.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust models.

use crate::entities::{Customer, MenuItem, Order, OrderItem};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

/// Default location of the `SQLite` file when nothing is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://resto_pos.sqlite?mode=rwc";

/// Establishes a connection to the database at `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    tracing::debug!(database_url, "connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates every table that does not exist yet.
///
/// Customers and menu items come first so the foreign keys of orders and order
/// lines point at existing tables.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, Customer).await?;
    create_table(db, MenuItem).await?;
    create_table(db, Order).await?;
    create_table(db, OrderItem).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}
