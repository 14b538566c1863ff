//! Starter template tags.

use serde::{Deserialize, Serialize};

/// The framework a project was created from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_template")]
pub enum ProjectTemplate {
    /// React (JavaScript).
    #[default]
    #[serde(rename = "react")]
    #[sqlx(rename = "react")]
    React,
    /// React with TypeScript.
    #[serde(rename = "react-ts")]
    #[sqlx(rename = "react-ts")]
    ReactTs,
    /// Plain JavaScript.
    #[serde(rename = "vanilla")]
    #[sqlx(rename = "vanilla")]
    Vanilla,
    /// Vue.
    #[serde(rename = "vue")]
    #[sqlx(rename = "vue")]
    Vue,
    /// Angular.
    #[serde(rename = "angular")]
    #[sqlx(rename = "angular")]
    Angular,
    /// Svelte.
    #[serde(rename = "svelte")]
    #[sqlx(rename = "svelte")]
    Svelte,
}

impl ProjectTemplate {
    /// All templates, in display order.
    pub const ALL: [ProjectTemplate; 6] = [
        Self::React,
        Self::ReactTs,
        Self::Vanilla,
        Self::Vue,
        Self::Angular,
        Self::Svelte,
    ];

    /// The wire tag of this template.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::React => "react",
            Self::ReactTs => "react-ts",
            Self::Vanilla => "vanilla",
            Self::Vue => "vue",
            Self::Angular => "angular",
            Self::Svelte => "svelte",
        }
    }
}

impl std::fmt::Display for ProjectTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Invalid template '{s}'"))
    }
}
