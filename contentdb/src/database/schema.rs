//! Database schema and migrations
//!
//! Creates the `User` and `Content` tables on first use and upgrades older
//! databases by replaying the embedded migration scripts in order.

use crate::error::Result;
use sqlx::{sqlite::SqlitePool, Row};

/// Embedded migration scripts, keyed by the schema version they produce.
const MIGRATIONS: &[(i32, &str)] = &[(1, include_str!("migrations/001_initial_schema.sql"))];

/// Initialize database with schema
pub async fn initialize_database(pool: &SqlitePool) -> Result<()> {
    tracing::info!("Initializing content schema");

    // WAL lets readers of the content listing run beside a writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    // Content.idUser references User(id)
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    // Bookkeeping for applied scripts
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    let current_version = schema_version(pool).await?;
    tracing::info!("Content schema version: {}", current_version);

    apply_migrations(pool, current_version).await?;

    tracing::info!("Content schema ready");
    Ok(())
}

/// Highest applied migration, 0 for a fresh database
pub async fn schema_version(pool: &SqlitePool) -> Result<i32> {
    let version: i32 = sqlx::query("SELECT COALESCE(MAX(version), 0) FROM migrations")
        .fetch_one(pool)
        .await?
        .get(0);

    Ok(version)
}

async fn apply_migrations(pool: &SqlitePool, current_version: i32) -> Result<()> {
    for &(version, script) in MIGRATIONS.iter().filter(|(v, _)| *v > current_version) {
        tracing::info!("Applying content migration {}", version);

        // One transaction per script, so a failed script leaves no trace
        let mut tx = pool.begin().await?;

        for statement in statements(script) {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        sqlx::query("INSERT INTO migrations (version) VALUES (?)")
            .bind(version)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("Content migration {} applied", version);
    }

    Ok(())
}

/// Split a script on `;`, dropping chunks that hold only comments
fn statements(script: &str) -> impl Iterator<Item = &str> {
    script.split(';').filter(|chunk| {
        chunk
            .lines()
            .map(str::trim)
            .any(|line| !line.is_empty() && !line.starts_with("--"))
    })
}
