//! File and folder operations within a project's tree.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::OwnedMutexGuard;
use tracing::{info, warn};
use validator::Validate;

use cipherstudio_core::error::AppError;
use cipherstudio_core::result::AppResult;
use cipherstudio_core::traits::Repository;
use cipherstudio_core::types::{NodeId, ProjectId};
use cipherstudio_database::{NodeRepository, ProjectRepository};
use cipherstudio_entity::node::{CreateNode, Node, NodeKind};
use cipherstudio_entity::project::Project;

use crate::access::{invalid, owned_project};
use crate::context::RequestContext;
use crate::lock::ProjectLocks;
use crate::tiering::TieringPolicy;
use crate::tree::path::build_file_map;

/// Request to create a file or folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNodeRequest {
    /// Owning project.
    pub project_id: ProjectId,
    /// Parent folder; `None` creates a root.
    pub parent_id: Option<NodeId>,
    /// Name, including any extension.
    #[validate(length(min = 1, max = 255, message = "Node name must be 1-255 characters"))]
    pub name: String,
    /// File or folder.
    pub kind: NodeKind,
    /// Initial body (files only).
    pub content: Option<String>,
}

/// Partial update of a node: a rename, a content write, or both.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateNodeRequest {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Node name must be 1-255 characters"))]
    pub name: Option<String>,
    /// New body (files only).
    pub content: Option<String>,
}

/// Manages the nodes of caller-owned projects.
///
/// Every mutation runs under its project's lock from [`ProjectLocks`].
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Node records.
    nodes: Arc<dyn NodeRepository>,
    /// Project records, for ownership checks.
    projects: Arc<dyn ProjectRepository>,
    /// Where file bodies live.
    tiering: TieringPolicy,
    /// Per-project mutation locks.
    locks: ProjectLocks,
    /// Maximum concurrent blob fetches when hydrating many nodes.
    hydration_concurrency: usize,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(
        nodes: Arc<dyn NodeRepository>,
        projects: Arc<dyn ProjectRepository>,
        tiering: TieringPolicy,
        locks: ProjectLocks,
        hydration_concurrency: usize,
    ) -> Self {
        Self {
            nodes,
            projects,
            tiering,
            locks,
            hydration_concurrency: hydration_concurrency.max(1),
        }
    }

    /// The tiering policy used for file bodies.
    pub fn tiering(&self) -> &TieringPolicy {
        &self.tiering
    }

    /// The lock table shared with the project service.
    pub fn locks(&self) -> &ProjectLocks {
        &self.locks
    }

    /// Creates a file or folder.
    ///
    /// The parent must be a folder of the same project. A non-empty file
    /// body may be offloaded before the record is written; if the record
    /// write then fails the blob is released again.
    pub async fn create_node(
        &self,
        ctx: &RequestContext,
        mut req: CreateNodeRequest,
    ) -> AppResult<Node> {
        req.name = req.name.trim().to_string();
        req.validate().map_err(invalid)?;

        let (_guard, _) = self.locked_project(ctx, req.project_id).await?;

        if let Some(parent_id) = req.parent_id {
            let parent = self.nodes.find_by_id(&parent_id).await?;
            match parent {
                Some(p) if p.is_folder() && p.project_id == req.project_id => {}
                _ => {
                    return Err(AppError::invalid_parent(
                        "Parent must be an existing folder in the same project",
                    ));
                }
            }
        }

        let mut node = Node::from_create(CreateNode {
            project_id: req.project_id,
            parent_id: req.parent_id,
            name: req.name,
            kind: req.kind,
            content: req.content,
        });
        self.tiering.place(&mut node).await?;

        let node = match self.nodes.insert(&node).await {
            Ok(stored) => stored,
            Err(e) => {
                self.tiering.release(&node).await;
                return Err(e);
            }
        };

        info!(
            user_id = %ctx.user_id,
            project_id = %node.project_id,
            node_id = %node.id,
            kind = %node.kind,
            offloaded = node.is_offloaded(),
            "Node created"
        );
        Ok(node)
    }

    /// Gets a node with its full body.
    pub async fn get_node(&self, ctx: &RequestContext, node_id: NodeId) -> AppResult<Node> {
        let (mut node, _) = self.visible_node(ctx, node_id).await?;
        self.tiering.hydrate(&mut node).await;
        Ok(node)
    }

    /// Lists the direct children of `parent_id` (roots when `None`).
    ///
    /// Folders come first, then files, each by name. Bodies are not fetched.
    pub async fn list_children(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        parent_id: Option<NodeId>,
    ) -> AppResult<Vec<Node>> {
        owned_project(self.projects.as_ref(), &project_id, ctx).await?;
        self.nodes
            .find_children(&project_id, parent_id.as_ref())
            .await
    }

    /// Lists every node of a project in tree order. Bodies are not fetched.
    pub async fn list_project_nodes(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> AppResult<Vec<Node>> {
        owned_project(self.projects.as_ref(), &project_id, ctx).await?;
        self.nodes.find_by_project(&project_id).await
    }

    /// Renames a node. Files get their extension recomputed.
    pub async fn rename_node(
        &self,
        ctx: &RequestContext,
        node_id: NodeId,
        new_name: impl Into<String>,
    ) -> AppResult<Node> {
        self.update_node(
            ctx,
            node_id,
            UpdateNodeRequest {
                name: Some(new_name.into()),
                content: None,
            },
        )
        .await
    }

    /// Replaces a file's body.
    pub async fn update_file_content(
        &self,
        ctx: &RequestContext,
        node_id: NodeId,
        content: impl Into<String>,
    ) -> AppResult<Node> {
        self.update_node(
            ctx,
            node_id,
            UpdateNodeRequest {
                name: None,
                content: Some(content.into()),
            },
        )
        .await
    }

    /// Applies a rename and then a content write, as one locked operation.
    ///
    /// The returned node carries its full body, fetched back for offloaded files.
    pub async fn update_node(
        &self,
        ctx: &RequestContext,
        node_id: NodeId,
        mut req: UpdateNodeRequest,
    ) -> AppResult<Node> {
        req.name = req.name.map(|n| n.trim().to_string());
        req.validate().map_err(invalid)?;

        let (_guard, mut node) = self.locked_node(ctx, node_id).await?;
        if req.content.is_some() && node.is_folder() {
            return Err(AppError::invalid_operation(
                "Cannot write content to a folder",
            ));
        }

        if let Some(name) = req.name {
            node.rename(name);
        }
        if let Some(content) = req.content {
            self.tiering.write(&mut node, content).await?;
        }

        let mut node = self.nodes.update(&node).await?;
        self.tiering.hydrate(&mut node).await;
        info!(
            user_id = %ctx.user_id,
            project_id = %node.project_id,
            node_id = %node.id,
            "Node updated"
        );
        Ok(node)
    }

    /// Moves a node under another folder of the same project.
    ///
    /// The target may not be the node itself or any of its descendants.
    pub async fn move_node(
        &self,
        ctx: &RequestContext,
        node_id: NodeId,
        new_parent_id: NodeId,
    ) -> AppResult<Node> {
        let (_guard, mut node) = self.locked_node(ctx, node_id).await?;

        let all = self.nodes.find_by_project(&node.project_id).await?;
        let by_id: HashMap<NodeId, &Node> = all.iter().map(|n| (n.id, n)).collect();

        match by_id.get(&new_parent_id) {
            Some(target) if target.is_folder() => {}
            _ => {
                return Err(AppError::invalid_parent(
                    "Target must be an existing folder in the same project",
                ));
            }
        }

        // Walk up from the target; meeting the node means the move makes a cycle.
        let mut visited = HashSet::new();
        let mut cursor = Some(new_parent_id);
        while let Some(id) = cursor {
            if id == node.id {
                return Err(AppError::invalid_parent(
                    "Cannot move a node into itself or its descendants",
                ));
            }
            if !visited.insert(id) {
                break;
            }
            cursor = by_id.get(&id).and_then(|n| n.parent_id);
        }

        node.parent_id = Some(new_parent_id);
        node.updated_at = Utc::now();
        let node = self.nodes.update(&node).await?;

        info!(
            user_id = %ctx.user_id,
            project_id = %node.project_id,
            node_id = %node.id,
            parent_id = %new_parent_id,
            "Node moved"
        );
        Ok(node)
    }

    /// Deletes a node and, for folders, its whole subtree.
    ///
    /// Descendants are removed before their parents. Blob releases are
    /// best-effort; a failed release is logged and the record is still
    /// removed. Returns the number of records removed.
    pub async fn delete_node(&self, ctx: &RequestContext, node_id: NodeId) -> AppResult<usize> {
        let (_guard, node) = self.locked_node(ctx, node_id).await?;

        let all = self.nodes.find_by_project(&node.project_id).await?;
        let mut children: HashMap<NodeId, Vec<&Node>> = HashMap::new();
        for n in &all {
            if let Some(parent_id) = n.parent_id {
                children.entry(parent_id).or_default().push(n);
            }
        }

        // Pre-order with an explicit stack, reversed so children precede parents.
        let mut order: Vec<&Node> = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![&node];
        while let Some(current) = stack.pop() {
            if !seen.insert(current.id) {
                continue;
            }
            order.push(current);
            if let Some(kids) = children.get(&current.id) {
                stack.extend(kids.iter().copied());
            }
        }
        order.reverse();

        let mut released_failures = 0usize;
        for doomed in &order {
            if doomed.is_offloaded() && !self.tiering.release(doomed).await {
                released_failures += 1;
            }
            self.nodes.delete(&doomed.id).await?;
        }

        if released_failures > 0 {
            warn!(
                node_id = %node.id,
                failures = released_failures,
                "Some file bodies could not be released"
            );
        }
        info!(
            user_id = %ctx.user_id,
            project_id = %node.project_id,
            node_id = %node.id,
            removed = order.len(),
            "Node deleted"
        );
        Ok(order.len())
    }

    /// The path → body map of every file in a project, for the bundler.
    ///
    /// Offloaded bodies are fetched with bounded concurrency; a failed fetch
    /// yields an empty body.
    pub async fn snapshot(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> AppResult<BTreeMap<String, String>> {
        let project = owned_project(self.projects.as_ref(), &project_id, ctx).await?;
        let nodes = self.nodes.find_by_project(&project_id).await?;
        let nodes = self.hydrate_all(nodes).await;
        Ok(build_file_map(&project.name, &nodes))
    }

    /// Fetch the bodies of every offloaded file in `nodes`, keeping order.
    pub async fn hydrate_all(&self, nodes: Vec<Node>) -> Vec<Node> {
        let tiering = &self.tiering;
        stream::iter(nodes)
            .map(|mut node| async move {
                tiering.hydrate(&mut node).await;
                node
            })
            .buffered(self.hydration_concurrency)
            .collect()
            .await
    }

    /// Load a node and check that the caller owns its project.
    ///
    /// A node whose project record is gone is reported as not found.
    async fn visible_node(
        &self,
        ctx: &RequestContext,
        node_id: NodeId,
    ) -> AppResult<(Node, Project)> {
        let node = self
            .nodes
            .find_by_id(&node_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Node {node_id} not found")))?;
        let project = owned_project(self.projects.as_ref(), &node.project_id, ctx).await?;
        Ok((node, project))
    }

    /// Like [`Self::visible_node`], but holding the project lock and with the
    /// node re-read under it.
    async fn locked_node(
        &self,
        ctx: &RequestContext,
        node_id: NodeId,
    ) -> AppResult<(OwnedMutexGuard<()>, Node)> {
        let (node, _) = self.visible_node(ctx, node_id).await?;
        let project_id = node.project_id;
        let guard = self.locks.acquire(project_id).await;
        match self.visible_node(ctx, node_id).await {
            Ok((node, _)) => Ok((guard, node)),
            Err(e) => {
                drop(guard);
                self.locks.forget(&project_id);
                Err(e)
            }
        }
    }

    /// Check ownership, take the project lock, and check again under it.
    ///
    /// Only projects the caller can see get a lock entry; the entry is
    /// dropped again if the project vanished while waiting.
    pub(crate) async fn locked_project(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> AppResult<(OwnedMutexGuard<()>, Project)> {
        owned_project(self.projects.as_ref(), &project_id, ctx).await?;
        let guard = self.locks.acquire(project_id).await;
        match owned_project(self.projects.as_ref(), &project_id, ctx).await {
            Ok(project) => Ok((guard, project)),
            Err(e) => {
                drop(guard);
                self.locks.forget(&project_id);
                Err(e)
            }
        }
    }
}
