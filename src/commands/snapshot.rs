//! Virtual filesystem snapshot command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use cipherstudio_core::error::AppError;
use cipherstudio_core::types::ProjectId;

use super::App;
use crate::output::{self, OutputFormat};

/// Arguments for the snapshot command
#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Project ID
    pub project: ProjectId,
}

/// Snapshot display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// Absolute path
    path: String,
    /// Body length in bytes
    bytes: usize,
}

/// Execute the snapshot command
pub async fn execute(args: &SnapshotArgs, app: &App, format: OutputFormat) -> Result<(), AppError> {
    let files = app.tree.snapshot(&app.ctx, args.project).await?;

    match format {
        OutputFormat::Json => output::print_json(&files, "{}"),
        OutputFormat::Table => {
            let rows: Vec<FileRow> = files
                .iter()
                .map(|(path, body)| FileRow {
                    path: path.clone(),
                    bytes: body.len(),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }
    Ok(())
}
