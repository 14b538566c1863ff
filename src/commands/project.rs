//! Project management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use cipherstudio_core::error::AppError;
use cipherstudio_core::types::ProjectId;
use cipherstudio_entity::project::{Project, ProjectTemplate};
use cipherstudio_service::{CreateProjectRequest, UpdateProjectRequest};

use super::App;
use super::node::NodeRow;
use crate::output::{self, OutputFormat};

/// Arguments for project commands
#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Project subcommand
    #[command(subcommand)]
    pub command: ProjectCommand,
}

/// Project subcommands
#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Create a project with the starter tree
    Create {
        /// Project name
        #[arg(short, long)]
        name: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Starter template (react, react-ts, vanilla, vue, angular, svelte)
        #[arg(short, long)]
        template: Option<ProjectTemplate>,
    },
    /// List your projects
    List,
    /// Show a project and its nodes
    Show {
        /// Project ID
        id: ProjectId,
    },
    /// Update a project's name, description or visibility
    Update {
        /// Project ID
        id: ProjectId,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// Make the project public or private
        #[arg(long)]
        public: Option<bool>,
    },
    /// Delete a project with all its files
    Delete {
        /// Project ID
        id: ProjectId,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Project display row
#[derive(Debug, Serialize, Tabled)]
struct ProjectRow {
    /// Project ID
    id: String,
    /// Name
    name: String,
    /// Template
    template: String,
    /// Public
    public: bool,
    /// Last opened
    last_opened: String,
    /// Updated at
    updated_at: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            template: p.template.to_string(),
            public: p.is_public,
            last_opened: p.last_opened_at.format("%Y-%m-%d %H:%M").to_string(),
            updated_at: p.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn print_project(project: &Project, format: OutputFormat) {
    output::print_item(
        project,
        &[
            ("ID", project.id.to_string()),
            ("Name", project.name.clone()),
            ("Description", project.description.clone()),
            ("Template", project.template.to_string()),
            ("Public", project.is_public.to_string()),
            ("Last opened", project.last_opened_at.to_rfc3339()),
            ("Created", project.created_at.to_rfc3339()),
            ("Updated", project.updated_at.to_rfc3339()),
        ],
        format,
    );
}

/// Execute project commands
pub async fn execute(args: &ProjectArgs, app: &App, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ProjectCommand::Create {
            name,
            description,
            template,
        } => {
            let project = app
                .projects
                .create_project(
                    &app.ctx,
                    CreateProjectRequest {
                        name: name.clone(),
                        description: description.clone(),
                        template: *template,
                    },
                )
                .await?;
            output::print_success(&format!(
                "Project '{}' created (id: {})",
                project.name, project.id
            ));
        }
        ProjectCommand::List => {
            let projects = app.projects.list_projects(&app.ctx).await?;
            let rows: Vec<ProjectRow> = projects.iter().map(ProjectRow::from).collect();
            output::print_list(&rows, format);
        }
        ProjectCommand::Show { id } => {
            let opened = app.projects.get_project(&app.ctx, *id).await?;
            match format {
                OutputFormat::Json => output::print_json(&opened, "{}"),
                OutputFormat::Table => {
                    print_project(&opened.project, format);
                    println!();
                    let rows: Vec<NodeRow> = opened.nodes.iter().map(NodeRow::from).collect();
                    output::print_list(&rows, format);
                }
            }
        }
        ProjectCommand::Update {
            id,
            name,
            description,
            public,
        } => {
            let project = app
                .projects
                .update_project(
                    &app.ctx,
                    *id,
                    UpdateProjectRequest {
                        name: name.clone(),
                        description: description.clone(),
                        is_public: *public,
                    },
                )
                .await?;
            print_project(&project, format);
        }
        ProjectCommand::Delete { id, force } => {
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete project {id} and all of its files? This cannot be undone."
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let outcome = app.projects.delete_project(&app.ctx, *id).await?;
            if outcome.blobs_failed > 0 {
                output::print_warning(&format!(
                    "{} file bodies could not be released from blob storage",
                    outcome.blobs_failed
                ));
            }
            output::print_success(&format!(
                "Project deleted ({} nodes, {} blobs released)",
                outcome.nodes_removed, outcome.blobs_released
            ));
        }
    }

    Ok(())
}
