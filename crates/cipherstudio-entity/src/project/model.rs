//! Project entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use cipherstudio_core::types::{ProjectId, UserId};

use super::template::ProjectTemplate;

/// A user's project: the owner of one file tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// The only user allowed to read or mutate the project and its tree.
    pub owner_id: UserId,
    /// Project name; also the name of the root folder.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Starter template tag.
    pub template: ProjectTemplate,
    /// Whether the project is publicly listed.
    pub is_public: bool,
    /// Last time the full project was fetched.
    pub last_opened_at: DateTime<Utc>,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When the project was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Build a new project record from creation data.
    pub fn from_create(data: CreateProject) -> Self {
        let now = Utc::now();
        Self {
            id: ProjectId::new(),
            owner_id: data.owner_id,
            name: data.name,
            description: data.description,
            template: data.template,
            is_public: false,
            last_opened_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether `user_id` owns this project.
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    /// Apply a partial update. Absent fields are left untouched.
    pub fn apply(&mut self, update: UpdateProject) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(is_public) = update.is_public {
            self.is_public = is_public;
        }
        self.updated_at = Utc::now();
    }
}

/// Data required to create a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// The owning user.
    pub owner_id: UserId,
    /// Project name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Starter template.
    pub template: ProjectTemplate,
}

/// Partial update of a project's editable fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New visibility.
    pub is_public: Option<bool>,
}
