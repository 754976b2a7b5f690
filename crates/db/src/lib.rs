//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - The `customers` entity, whose ledger lives in a JSONB column
//! - [`CustomerRepository`], the PostgreSQL [`LedgerStore`](haulbook_core::ledger::LedgerStore)
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::CustomerRepository;

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a pooled connection with explicit pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_pooled(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}
