//! Database migration management commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use cipherstudio_core::config::AppConfig;
use cipherstudio_core::error::AppError;
use cipherstudio_database::DatabasePool;
use cipherstudio_database::migration;

use crate::output::{self, OutputFormat};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show which migrations have been applied
    Status,
}

/// Migration display row
#[derive(Debug, Serialize, Tabled)]
struct MigrationRow {
    /// Version
    version: i64,
    /// Description
    description: String,
    /// Applied
    applied: bool,
}

/// Execute migration commands
pub async fn execute(
    args: &MigrateArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let db = DatabasePool::connect(&config.database).await?;

    let result = match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            migration::run_migrations(&db.pool()).await.map(|report| {
                output::print_success(&format!(
                    "Applied {} migration(s); {} applied in total.",
                    report.newly_applied, report.total_applied
                ));
            })
        }
        MigrateCommand::Status => migration::migration_status(&db.pool()).await.map(|status| {
            let rows: Vec<MigrationRow> = status
                .into_iter()
                .map(|m| MigrationRow {
                    version: m.version,
                    description: m.description,
                    applied: m.applied,
                })
                .collect();
            output::print_list(&rows, format);
        }),
    };

    db.close().await;
    result
}
