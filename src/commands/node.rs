//! File and folder CLI commands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use cipherstudio_core::error::AppError;
use cipherstudio_core::types::{NodeId, ProjectId};
use cipherstudio_entity::node::{Node, NodeKind};
use cipherstudio_service::CreateNodeRequest;

use super::{App, read_body};
use crate::output::{self, OutputFormat};

/// Arguments for node commands
#[derive(Debug, Args)]
pub struct NodeArgs {
    /// Node subcommand
    #[command(subcommand)]
    pub command: NodeCommand,
}

/// Node subcommands
#[derive(Debug, Subcommand)]
pub enum NodeCommand {
    /// Create a file or folder
    Create {
        /// Project ID
        #[arg(short, long)]
        project: ProjectId,
        /// Parent folder ID (omit for a root)
        #[arg(long)]
        parent: Option<NodeId>,
        /// Name, including extension
        #[arg(short, long)]
        name: String,
        /// file or folder
        #[arg(short, long, default_value = "file")]
        kind: NodeKind,
        /// Initial content
        #[arg(long)]
        content: Option<String>,
        /// Read initial content from a local file
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
    /// Show a node and its content
    Show {
        /// Node ID
        id: NodeId,
    },
    /// List the children of a folder (roots when no parent is given)
    Ls {
        /// Project ID
        #[arg(short, long)]
        project: ProjectId,
        /// Parent folder ID
        #[arg(long)]
        parent: Option<NodeId>,
        /// List every node of the project
        #[arg(short, long)]
        all: bool,
    },
    /// Rename a node
    Rename {
        /// Node ID
        id: NodeId,
        /// New name
        name: String,
    },
    /// Replace a file's content
    Write {
        /// Node ID
        id: NodeId,
        /// New content
        #[arg(long)]
        content: Option<String>,
        /// Read new content from a local file
        #[arg(long)]
        from_file: Option<PathBuf>,
    },
    /// Move a node under another folder
    Mv {
        /// Node ID
        id: NodeId,
        /// New parent folder ID
        parent: NodeId,
    },
    /// Delete a node (folders are deleted with everything inside)
    Rm {
        /// Node ID
        id: NodeId,
    },
}

/// Node display row
#[derive(Debug, Serialize, Tabled)]
pub struct NodeRow {
    /// Node ID
    id: String,
    /// Kind
    kind: String,
    /// Name
    name: String,
    /// Parent ID
    parent: String,
    /// Size in bytes
    size: String,
    /// Body location
    stored: String,
}

impl From<&Node> for NodeRow {
    fn from(n: &Node) -> Self {
        Self {
            id: n.id.to_string(),
            kind: n.kind.to_string(),
            name: n.name.clone(),
            parent: n.parent_id.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
            size: n.size_bytes.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
            stored: match (n.is_file(), n.is_offloaded()) {
                (false, _) => "-".into(),
                (true, true) => "blob".into(),
                (true, false) => "inline".into(),
            },
        }
    }
}

fn print_node(node: &Node, format: OutputFormat) {
    let row = NodeRow::from(node);
    output::print_item(
        node,
        &[
            ("ID", row.id),
            ("Kind", row.kind),
            ("Name", row.name),
            ("Parent", row.parent),
            ("Extension", node.extension.clone().unwrap_or_default()),
            ("Size", row.size),
            ("Stored", row.stored),
            ("Updated", node.updated_at.to_rfc3339()),
        ],
        format,
    );
}

/// Execute node commands
pub async fn execute(args: &NodeArgs, app: &App, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        NodeCommand::Create {
            project,
            parent,
            name,
            kind,
            content,
            from_file,
        } => {
            let content = read_body(content, from_file).await?;
            let node = app
                .tree
                .create_node(
                    &app.ctx,
                    CreateNodeRequest {
                        project_id: *project,
                        parent_id: *parent,
                        name: name.clone(),
                        kind: *kind,
                        content,
                    },
                )
                .await?;
            output::print_success(&format!("{} '{}' created (id: {})", node.kind, node.name, node.id));
        }
        NodeCommand::Show { id } => {
            let node = app.tree.get_node(&app.ctx, *id).await?;
            print_node(&node, format);
            if format == OutputFormat::Table && node.is_file() {
                println!();
                println!("{}", node.body());
            }
        }
        NodeCommand::Ls {
            project,
            parent,
            all,
        } => {
            let nodes = if *all {
                app.tree.list_project_nodes(&app.ctx, *project).await?
            } else {
                app.tree.list_children(&app.ctx, *project, *parent).await?
            };
            let rows: Vec<NodeRow> = nodes.iter().map(NodeRow::from).collect();
            output::print_list(&rows, format);
        }
        NodeCommand::Rename { id, name } => {
            let node = app.tree.rename_node(&app.ctx, *id, name.clone()).await?;
            print_node(&node, format);
        }
        NodeCommand::Write {
            id,
            content,
            from_file,
        } => {
            let body = read_body(content, from_file)
                .await?
                .ok_or_else(|| AppError::validation("Provide --content or --from-file"))?;
            let node = app.tree.update_file_content(&app.ctx, *id, body).await?;
            print_node(&node, format);
        }
        NodeCommand::Mv { id, parent } => {
            let node = app.tree.move_node(&app.ctx, *id, *parent).await?;
            print_node(&node, format);
        }
        NodeCommand::Rm { id } => {
            let removed = app.tree.delete_node(&app.ctx, *id).await?;
            output::print_success(&format!("Deleted {removed} node(s)"));
        }
    }

    Ok(())
}
