//! Database module
//!
//! This module provides all database functionality including:
//! - Schema and migrations
//! - The SQL catalog for the `Content` table
//! - Model definitions
//! - Repository layer for CRUD operations

pub mod catalog;
pub mod models;
pub mod repository;
pub mod schema;

pub use catalog::{QueryKey, Sort, SortColumn, SortDirection};
pub use models::*;
pub use repository::{EntryQuery, Repository, WriteOutcome};
pub use schema::initialize_database;

use crate::config::{DATABASE_BUSY_TIMEOUT_SECS, DATABASE_MAX_CONNECTIONS};
use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

/// Options for the content database file. Writers wait on a busy database
/// instead of failing at once.
fn connect_options(db_path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(DATABASE_BUSY_TIMEOUT_SECS))
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
}

/// Open the content database at `db_path`, creating file and schema as needed.
///
/// The schema is brought up to date on its own single connection, which is
/// closed before the shared pool opens.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::info!("Opening content database at: {:?}", db_path);

    // Data directory may not exist on first run
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let migration_pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options(db_path))
        .await?;

    initialize_database(&migration_pool).await?;
    migration_pool.close().await;

    // Shared pool for the repository
    let pool = SqlitePoolOptions::new()
        .max_connections(DATABASE_MAX_CONNECTIONS)
        .connect_with(connect_options(db_path))
        .await?;

    tracing::info!("Content database ready");

    Ok(pool)
}

/// Private in-memory database with the schema applied.
///
/// Every connection to `sqlite::memory:` is a separate database, so the
/// pool is held to a single connection.
pub async fn create_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    initialize_database(&pool).await?;
    tracing::debug!("In-memory content database ready");

    Ok(pool)
}
