//! Schema migrations embedded from the workspace `migrations/` directory.

use std::collections::HashSet;

use serde::Serialize;
use sqlx::PgPool;
use sqlx::migrate::{Migrate, MigrateError, Migrator};
use tracing::info;

use cipherstudio_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// One embedded migration and whether the database has applied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    /// Migration version (the file's timestamp prefix).
    pub version: i64,
    /// Description taken from the file name.
    pub description: String,
    /// Whether the database records it as applied.
    pub applied: bool,
}

/// Outcome of a migration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Migrations applied by this run.
    pub newly_applied: usize,
    /// Migrations applied in total after the run.
    pub total_applied: usize,
}

fn migrate_error(e: MigrateError, context: &str) -> AppError {
    AppError::with_source(ErrorKind::Database, format!("{context}: {e}"), e)
}

/// The embedded up-migrations, oldest first.
fn embedded() -> impl Iterator<Item = &'static sqlx::migrate::Migration> {
    MIGRATOR
        .iter()
        .filter(|m| !m.migration_type.is_down_migration())
}

async fn applied_versions(pool: &PgPool) -> Result<HashSet<i64>, AppError> {
    let mut conn = pool.acquire().await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to acquire connection: {e}"),
            e,
        )
    })?;
    conn.ensure_migrations_table()
        .await
        .map_err(|e| migrate_error(e, "Failed to prepare migrations table"))?;
    let applied = conn
        .list_applied_migrations()
        .await
        .map_err(|e| migrate_error(e, "Failed to list applied migrations"))?;
    Ok(applied.into_iter().map(|m| m.version).collect())
}

/// Run all pending database migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<MigrationReport, AppError> {
    info!("Running database migrations...");
    let before = applied_versions(pool).await?;

    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| migrate_error(e, "Failed to run migrations"))?;

    let after = applied_versions(pool).await?;
    let report = MigrationReport {
        newly_applied: after.difference(&before).count(),
        total_applied: after.len(),
    };
    info!(
        newly_applied = report.newly_applied,
        total_applied = report.total_applied,
        "Database migrations completed"
    );
    Ok(report)
}

/// Every embedded migration, oldest first, with its applied state.
pub async fn migration_status(pool: &PgPool) -> Result<Vec<MigrationStatus>, AppError> {
    let applied = applied_versions(pool).await?;
    Ok(embedded()
        .map(|m| MigrationStatus {
            version: m.version,
            description: m.description.to_string(),
            applied: applied.contains(&m.version),
        })
        .collect())
}
