//! Node entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cipherstudio_core::types::{NodeId, ProjectId};

/// Whether a node is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "node_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A folder; may parent other nodes.
    Folder,
    /// A file with a body.
    File,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Folder => write!(f, "folder"),
            Self::File => write!(f, "file"),
        }
    }
}

impl std::str::FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "folder" => Ok(Self::Folder),
            "file" => Ok(Self::File),
            other => Err(format!("unknown node kind '{other}'")),
        }
    }
}

/// A file or folder in a project's tree.
///
/// Folders never carry `extension`, `size_bytes`, `content`, or `blob_key`.
/// For files, when `blob_key` is set the body lives in the blob store and
/// `content` is empty in the stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Node {
    /// Unique node identifier.
    pub id: NodeId,
    /// Owning project. Never changes after creation.
    pub project_id: ProjectId,
    /// Parent folder (None for a project's root folder).
    pub parent_id: Option<NodeId>,
    /// Display name, including any extension.
    pub name: String,
    /// File or folder.
    pub kind: NodeKind,
    /// Text after the last `.` of `name` (files only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    /// Byte length of the current body (files only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,
    /// Inline body (files only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Blob store key when the body was offloaded.
    #[serde(default, skip_serializing)]
    pub blob_key: Option<String>,
    /// When the node was created.
    pub created_at: DateTime<Utc>,
    /// When the node was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Build a new node record from creation data.
    ///
    /// File nodes start with their whole body inline; the tiering policy
    /// may later move it out with [`Node::offload`].
    pub fn from_create(data: CreateNode) -> Self {
        let now = Utc::now();
        let (extension, size_bytes, content) = match data.kind {
            NodeKind::Folder => (None, None, None),
            NodeKind::File => {
                let body = data.content.unwrap_or_default();
                (
                    Some(extension_of(&data.name).to_string()),
                    Some(body.len() as i64),
                    Some(body),
                )
            }
        };

        Self {
            id: NodeId::new(),
            project_id: data.project_id,
            parent_id: data.parent_id,
            name: data.name,
            kind: data.kind,
            extension,
            size_bytes,
            content,
            blob_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Check if this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Check if this is a root node (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if the body lives in the blob store.
    pub fn is_offloaded(&self) -> bool {
        self.blob_key.is_some()
    }

    /// The inline body, or `""` when there is none.
    pub fn body(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Rename the node, recomputing the extension for files.
    pub fn rename(&mut self, new_name: impl Into<String>) {
        self.name = new_name.into();
        if self.is_file() {
            self.extension = Some(extension_of(&self.name).to_string());
        }
        self.updated_at = Utc::now();
    }

    /// Replace the body of a file, recomputing its size.
    ///
    /// For an offloaded file the record keeps an empty inline field; the
    /// caller is responsible for writing the bytes to the blob store.
    pub fn replace_body(&mut self, body: String) {
        self.size_bytes = Some(body.len() as i64);
        self.content = if self.is_offloaded() {
            Some(String::new())
        } else {
            Some(body)
        };
        self.updated_at = Utc::now();
    }

    /// Mark the body as stored in the blob store under `key`.
    pub fn offload(&mut self, key: impl Into<String>) {
        self.blob_key = Some(key.into());
        self.content = Some(String::new());
    }
}

/// Data required to create a new node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNode {
    /// Owning project.
    pub project_id: ProjectId,
    /// Parent folder (None for a root).
    pub parent_id: Option<NodeId>,
    /// Node name.
    pub name: String,
    /// File or folder.
    pub kind: NodeKind,
    /// Initial body for files; ignored for folders.
    pub content: Option<String>,
}

/// The extension of a file name: everything after the last `.`, or `""`.
pub fn extension_of(name: &str) -> &str {
    name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("")
}
