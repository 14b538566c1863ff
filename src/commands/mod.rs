//! CLI command definitions and dispatch.

pub mod check;
pub mod migrate;
pub mod node;
pub mod project;
pub mod snapshot;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use cipherstudio_core::config::AppConfig;
use cipherstudio_core::error::AppError;
use cipherstudio_core::types::UserId;
use cipherstudio_database::{DatabasePool, PgNodeRepository, PgProjectRepository};
use cipherstudio_service::{ProjectLocks, ProjectService, RequestContext, TieringPolicy, TreeService};

use crate::output::OutputFormat;

/// CipherStudio project and file tree administration
#[derive(Debug, Parser)]
#[command(name = "cipherstudio", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// User to act as (project owner)
    #[arg(short, long, global = true)]
    pub user: Option<UserId>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check database and blob store connectivity
    Check,
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Project management
    Project(project::ProjectArgs),
    /// File and folder management
    Node(node::NodeArgs),
    /// Print the path to content map of a project
    Snapshot(snapshot::SnapshotArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Check => check::execute(config, self.format).await,
            Commands::Migrate(args) => migrate::execute(args, config, self.format).await,
            Commands::Project(args) => {
                let app = App::connect(config, self.requester()?).await?;
                project::execute(args, &app, self.format).await
            }
            Commands::Node(args) => {
                let app = App::connect(config, self.requester()?).await?;
                node::execute(args, &app, self.format).await
            }
            Commands::Snapshot(args) => {
                let app = App::connect(config, self.requester()?).await?;
                snapshot::execute(args, &app, self.format).await
            }
        }
    }

    fn requester(&self) -> Result<RequestContext, AppError> {
        self.user
            .map(RequestContext::new)
            .ok_or_else(|| AppError::validation("--user <UUID> is required for this command"))
    }
}

/// Services wired against PostgreSQL and the configured blob store.
pub struct App {
    /// The acting user.
    pub ctx: RequestContext,
    /// Project lifecycle operations.
    pub projects: ProjectService,
    /// File and folder operations.
    pub tree: Arc<TreeService>,
}

impl App {
    /// Connect to the database and blob store and build the services.
    pub async fn connect(config: &AppConfig, ctx: RequestContext) -> Result<Self, AppError> {
        let db = DatabasePool::connect(&config.database).await?;
        let nodes = Arc::new(PgNodeRepository::new(db.pool()));
        let projects = Arc::new(PgProjectRepository::new(db.pool()));

        let store = cipherstudio_storage::build_blob_store(&config.storage).await?;
        let tiering = TieringPolicy::new(store, config.tiering.clone());

        let tree = Arc::new(TreeService::new(
            nodes.clone(),
            projects.clone(),
            tiering,
            ProjectLocks::new(),
            config.tiering.hydration_concurrency,
        ));
        let projects = ProjectService::new(projects, nodes, tree.clone());

        Ok(Self {
            ctx,
            projects,
            tree,
        })
    }
}

/// Read a body from `--content` or `--from-file`.
pub(crate) async fn read_body(
    content: &Option<String>,
    from_file: &Option<std::path::PathBuf>,
) -> Result<Option<String>, AppError> {
    match (content, from_file) {
        (Some(_), Some(_)) => Err(AppError::validation(
            "Use either --content or --from-file, not both",
        )),
        (Some(text), None) => Ok(Some(text.clone())),
        (None, Some(path)) => Ok(Some(tokio::fs::read_to_string(path).await?)),
        (None, None) => Ok(None),
    }
}
