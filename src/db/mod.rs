//! Database module for SQLite persistence.
//!
//! SQLite is the source of truth for all checklist data. Checklist form data
//! and materials are stored as JSON documents in TEXT columns.

mod repository;

pub use repository::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Run embedded migrations
    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Checklist numbers are unique per project; the composite key is the
    // safety net against concurrent creations racing the allocator.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS checklists (
            project_id TEXT NOT NULL,
            id TEXT NOT NULL,
            status TEXT NOT NULL,
            responsible TEXT NOT NULL,
            created_or_modified_at TEXT NOT NULL,
            form_data TEXT NOT NULL,
            materials TEXT NOT NULL,
            PRIMARY KEY (project_id, id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS checklist_versions (
            id TEXT PRIMARY KEY,
            project_id TEXT NOT NULL,
            checklist_id TEXT NOT NULL,
            saved_at TEXT NOT NULL,
            saved_by TEXT NOT NULL,
            form_data TEXT NOT NULL,
            materials TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Index for the newest-first history listing
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_versions_checklist_saved_at
            ON checklist_versions(project_id, checklist_id, saved_at);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
