//! Absolute path reconstruction from parent pointers.

use std::collections::{BTreeMap, HashMap, HashSet};

use cipherstudio_core::types::NodeId;
use cipherstudio_entity::node::Node;

/// Resolves node paths within one project's flat node list.
///
/// Built once per snapshot so each lookup is a map walk rather than a scan.
#[derive(Debug)]
pub struct PathResolver<'a> {
    /// The project's display name; an ancestor with this name is elided.
    project_name: &'a str,
    /// Every node of the project, by id.
    by_id: HashMap<NodeId, &'a Node>,
}

impl<'a> PathResolver<'a> {
    /// Index `nodes` for resolution.
    pub fn new(project_name: &'a str, nodes: &'a [Node]) -> Self {
        Self {
            project_name,
            by_id: nodes.iter().map(|n| (n.id, n)).collect(),
        }
    }

    /// The `/`-separated absolute path of `node`.
    ///
    /// Walks parent pointers up to a root, skipping any ancestor named like
    /// the project. A dangling parent counts as reaching the root, and a
    /// revisited id stops the walk, so resolution always terminates.
    pub fn resolve(&self, node: &Node) -> String {
        let mut segments = vec![node.name.as_str()];
        let mut visited = HashSet::from([node.id]);
        let mut next = node.parent_id;

        while let Some(parent_id) = next {
            if !visited.insert(parent_id) {
                break;
            }
            let Some(parent) = self.by_id.get(&parent_id) else {
                break;
            };
            if parent.name != self.project_name {
                segments.push(parent.name.as_str());
            }
            next = parent.parent_id;
        }

        segments.reverse();
        format!("/{}", segments.join("/"))
    }

    /// Path of every file node, paired with the node.
    pub fn files(&self, nodes: &'a [Node]) -> Vec<(String, &'a Node)> {
        nodes
            .iter()
            .filter(|n| n.is_file())
            .map(|n| (self.resolve(n), n))
            .collect()
    }
}

/// Resolve one node's path against its project's nodes.
pub fn resolve_path(project_name: &str, node: &Node, all_nodes: &[Node]) -> String {
    PathResolver::new(project_name, all_nodes).resolve(node)
}

/// The path → body map handed to the bundler, built from hydrated nodes.
///
/// Folders are skipped. When two files resolve to the same path the later
/// one in `nodes` wins.
pub fn build_file_map(project_name: &str, nodes: &[Node]) -> BTreeMap<String, String> {
    let resolver = PathResolver::new(project_name, nodes);
    resolver
        .files(nodes)
        .into_iter()
        .map(|(path, node)| (path, node.body().to_owned()))
        .collect()
}
